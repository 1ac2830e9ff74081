use std::collections::BTreeMap;
use std::fmt;

use crate::compressor::Compressor;
use crate::dense::DenseCompressor;
use crate::error::RegistryError;
use crate::fast::FastCompressor;

/// Identifier of [`FastCompressor`] in the standard registry.
pub const FAST_ID: u8 = 1;

/// Identifier of [`DenseCompressor`] in the standard registry.
pub const DENSE_ID: u8 = 2;

/// Identifier → compressor table.
///
/// New segments are always written with the numerically highest
/// identifier; decoding dispatches on whatever identifier the segment
/// carries. Registering a new compressor under a higher identifier
/// therefore changes what gets written without breaking anything that
/// was written before.
///
/// ```text
///   ┌────┬──────────────────┬─────────────────────┐
///   │ id │ compressor       │ used for            │
///   ├────┼──────────────────┼─────────────────────┤
///   │ 1  │ FastCompressor   │ decode only         │
///   │ 2  │ DenseCompressor  │ encode + decode     │
///   └────┴──────────────────┴─────────────────────┘
/// ```
///
/// Read-only after construction.
pub struct CompressorRegistry {
    newest: (u8, Box<dyn Compressor>),
    older: BTreeMap<u8, Box<dyn Compressor>>,
}

impl CompressorRegistry {
    /// Build a registry from `(identifier, compressor)` pairs in any order.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::Empty`] if no pair is given.
    /// - [`RegistryError::ReservedIdentifier`] for identifier 0.
    /// - [`RegistryError::DuplicateIdentifier`] if an identifier repeats.
    pub fn new(
        compressors: impl IntoIterator<Item = (u8, Box<dyn Compressor>)>,
    ) -> Result<Self, RegistryError> {
        let mut table = BTreeMap::new();
        for (id, compressor) in compressors {
            if id == 0 {
                return Err(RegistryError::ReservedIdentifier);
            }
            if table.insert(id, compressor).is_some() {
                return Err(RegistryError::DuplicateIdentifier { id });
            }
        }

        let newest = table.pop_last().ok_or(RegistryError::Empty)?;
        Ok(Self::assemble(newest, table))
    }

    /// `1 → Fast`, `2 → Dense`, both bounded by `max_output`.
    pub fn standard(max_output: usize) -> Self {
        Self::assemble(
            (DENSE_ID, Box::new(DenseCompressor::with_limit(max_output))),
            BTreeMap::from([(
                FAST_ID,
                Box::new(FastCompressor::with_limit(max_output)) as Box<dyn Compressor>,
            )]),
        )
    }

    fn assemble(
        newest: (u8, Box<dyn Compressor>),
        older: BTreeMap<u8, Box<dyn Compressor>>,
    ) -> Self {
        log::debug!(
            "compressor registry: encoding with {} ({}), {} older",
            newest.0,
            newest.1.name(),
            older.len()
        );
        Self { newest, older }
    }

    /// The compressor used for every new encode.
    pub fn highest(&self) -> (u8, &dyn Compressor) {
        (self.newest.0, self.newest.1.as_ref())
    }

    pub fn lookup(&self, id: u8) -> Option<&dyn Compressor> {
        if id == self.newest.0 {
            Some(self.newest.1.as_ref())
        } else {
            self.older.get(&id).map(|c| c.as_ref())
        }
    }

    /// All entries in ascending identifier order.
    pub fn entries(&self) -> impl Iterator<Item = (u8, &dyn Compressor)> {
        self.older
            .iter()
            .map(|(id, c)| (*id, c.as_ref()))
            .chain(std::iter::once(self.highest()))
    }

    pub fn len(&self) -> usize {
        self.older.len() + 1
    }

    /// Always `false`; kept alongside [`len`](Self::len).
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl fmt::Debug for CompressorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries().map(|(id, c)| (id, c.name())))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CompressionError;

    /// Compressor that only reports its name.
    struct Named(&'static str);

    impl Compressor for Named {
        fn name(&self) -> &'static str {
            self.0
        }

        fn compress(&self, text: &str) -> Result<Vec<u8>, CompressionError> {
            Ok(text.as_bytes().to_vec())
        }

        fn decompress(&self, data: &[u8]) -> Result<String, CompressionError> {
            Ok(String::from_utf8_lossy(data).into_owned())
        }
    }

    fn named(id: u8, name: &'static str) -> (u8, Box<dyn Compressor>) {
        (id, Box::new(Named(name)))
    }

    #[test]
    fn highest_identifier_wins_regardless_of_order() {
        let registry = CompressorRegistry::new([named(7, "seven"), named(3, "three"), named(5, "five")])
            .unwrap();
        let (id, compressor) = registry.highest();
        assert_eq!(id, 7);
        assert_eq!(compressor.name(), "seven");
    }

    #[test]
    fn lookup_finds_every_entry() {
        let registry = CompressorRegistry::new([named(1, "one"), named(2, "two")]).unwrap();
        assert_eq!(registry.lookup(1).map(|c| c.name()), Some("one"));
        assert_eq!(registry.lookup(2).map(|c| c.name()), Some("two"));
        assert!(registry.lookup(3).is_none());
        assert!(registry.lookup(0).is_none());
    }

    #[test]
    fn entries_are_ascending() {
        let registry = CompressorRegistry::new([named(9, "b"), named(4, "a")]).unwrap();
        let ids: Vec<u8> = registry.entries().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![4, 9]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn single_entry_registry() {
        let registry = CompressorRegistry::new([named(1, "only")]).unwrap();
        assert_eq!(registry.highest().0, 1);
        assert_eq!(registry.entries().count(), 1);
    }

    #[test]
    fn rejects_empty() {
        let result = CompressorRegistry::new(std::iter::empty());
        assert!(matches!(result, Err(RegistryError::Empty)));
    }

    #[test]
    fn rejects_identifier_zero() {
        let result = CompressorRegistry::new([named(0, "zero"), named(1, "one")]);
        assert!(matches!(result, Err(RegistryError::ReservedIdentifier)));
    }

    #[test]
    fn rejects_duplicates() {
        let result = CompressorRegistry::new([named(2, "a"), named(2, "b")]);
        assert!(matches!(
            result,
            Err(RegistryError::DuplicateIdentifier { id: 2 })
        ));
    }

    #[test]
    fn standard_registry_layout() {
        let registry = CompressorRegistry::standard(1024);
        let listed: Vec<(u8, &str)> = registry.entries().map(|(id, c)| (id, c.name())).collect();
        assert_eq!(listed, vec![(FAST_ID, "deflate"), (DENSE_ID, "zstd")]);
        assert_eq!(registry.highest().0, DENSE_ID);
    }

    #[test]
    fn debug_lists_names() {
        let registry = CompressorRegistry::standard(1024);
        assert_eq!(format!("{registry:?}"), r#"{1: "deflate", 2: "zstd"}"#);
    }

    // ── Logging ──

    struct Capture(std::sync::Mutex<Vec<String>>);

    impl log::Log for Capture {
        fn enabled(&self, _: &log::Metadata<'_>) -> bool {
            true
        }

        fn log(&self, record: &log::Record<'_>) {
            self.0.lock().unwrap().push(record.args().to_string());
        }

        fn flush(&self) {}
    }

    static CAPTURE: Capture = Capture(std::sync::Mutex::new(Vec::new()));

    #[test]
    fn standard_registry_logs_construction() {
        let _ = log::set_logger(&CAPTURE);
        log::set_max_level(log::LevelFilter::Debug);

        let _registry = CompressorRegistry::standard(4321);

        let records = CAPTURE.0.lock().unwrap();
        assert!(
            records
                .iter()
                .any(|r| r == "compressor registry: encoding with 2 (zstd), 1 older"),
            "{records:?}"
        );
    }
}
