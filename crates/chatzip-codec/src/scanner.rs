use regex::Regex;

use crate::error::ConfigError;

/// Finds marker-delimited segments in free text.
///
/// A segment is `start ‖ inner ‖ end` where `inner` is at least one
/// character, never contains a line break, and is as short as possible.
/// Matches never overlap and are visited left to right.
///
/// ```text
///   "a $!XX!$ b $!YY!$ c"
///      └─┬──┘   └─┬──┘
///       "XX"     "YY"       ← inner contents handed to the callback
/// ```
#[derive(Clone, Debug)]
pub struct SegmentScanner {
    pattern: Regex,
    start: String,
    end: String,
}

impl SegmentScanner {
    /// # Errors
    ///
    /// - [`ConfigError::InvalidDelimiter`] if either marker is empty or
    ///   contains a line break.
    /// - [`ConfigError::Pattern`] if the resulting pattern does not compile.
    pub fn new(start: &str, end: &str) -> Result<Self, ConfigError> {
        for marker in [start, end] {
            if marker.is_empty() {
                return Err(ConfigError::InvalidDelimiter {
                    reason: "segment markers must not be empty",
                });
            }
            if marker.contains('\n') {
                return Err(ConfigError::InvalidDelimiter {
                    reason: "segment markers must not contain a line break",
                });
            }
        }

        let pattern = Regex::new(&format!(
            "{}(.+?){}",
            regex::escape(start),
            regex::escape(end)
        ))?;

        Ok(Self {
            pattern,
            start: start.to_owned(),
            end: end.to_owned(),
        })
    }

    pub fn start(&self) -> &str {
        &self.start
    }

    pub fn end(&self) -> &str {
        &self.end
    }

    /// Wrap `inner` in the markers.
    pub fn wrap(&self, inner: &str) -> String {
        let mut out = String::with_capacity(self.start.len() + inner.len() + self.end.len());
        out.push_str(&self.start);
        out.push_str(inner);
        out.push_str(&self.end);
        out
    }

    /// Inner contents of every segment, in order.
    pub fn segments<'t>(&self, text: &'t str) -> impl Iterator<Item = &'t str> {
        self.pattern
            .captures_iter(text)
            .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
    }

    /// Replace every whole segment (markers included) with what `replace`
    /// returns for its inner content. Text outside segments is copied
    /// through untouched. The first error aborts the scan.
    ///
    /// # Errors
    ///
    /// Whatever `replace` returns.
    pub fn try_replace<E>(
        &self,
        text: &str,
        mut replace: impl FnMut(&str) -> Result<String, E>,
    ) -> Result<String, E> {
        let mut out = String::with_capacity(text.len());
        let mut copied = 0;

        for caps in self.pattern.captures_iter(text) {
            let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            out.push_str(&text[copied..whole.start()]);
            out.push_str(&replace(inner.as_str())?);
            copied = whole.end();
        }

        out.push_str(&text[copied..]);
        Ok(out)
    }
}
