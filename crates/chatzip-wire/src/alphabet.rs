use std::collections::HashMap;

use unicode_general_category::{GeneralCategory, get_general_category};

use crate::error::AlphabetError;

/// First codepoint of the standard alphabet: `!` (U+0021).
///
/// Everything below it is either a control character or a space, and
/// chat clients tend to collapse or strip those.
pub const STANDARD_FROM: char = '\u{0021}';

/// Last codepoint of the standard alphabet: the end of the Basic
/// Multilingual Plane.
pub const STANDARD_TO: char = '\u{FFFF}';

/// Codepoints excluded from the standard alphabet on top of the
/// category filter.
///
/// - `U+007F` DELETE
/// - `U+00A7` SECTION SIGN (formatting escape in several game chats)
pub const STANDARD_BLACKLIST: [char; 2] = ['\u{007F}', '\u{00A7}'];

/// Default inclusion predicate for alphabet symbols.
///
/// ```text
/// ┌────────────┬──────────────────────────────────────────────┐
/// │ Category   │ Reason for exclusion                         │
/// ├────────────┼──────────────────────────────────────────────┤
/// │ Cc Control │ Stripped or interpreted by transports        │
/// │ Cn Unassig │ Rendering and normalisation are undefined    │
/// │ Co Private │ Font-dependent, often filtered               │
/// │ Cs Surrog. │ Not scalar values (never a `char` anyway)    │
/// └────────────┴──────────────────────────────────────────────┘
/// ```
///
/// Plus the explicit [`STANDARD_BLACKLIST`].
pub fn is_standard_symbol(ch: char) -> bool {
    !STANDARD_BLACKLIST.contains(&ch) && is_visible_category(ch)
}

/// The category half of [`is_standard_symbol`], without the blacklist.
pub fn is_visible_category(ch: char) -> bool {
    !matches!(
        get_general_category(ch),
        GeneralCategory::Control
            | GeneralCategory::Unassigned
            | GeneralCategory::PrivateUse
            | GeneralCategory::Surrogate
    )
}

/// Bijection between digit indices `[0, base)` and alphabet symbols.
///
/// The table is built once by walking an inclusive codepoint range in
/// ascending order and handing out the next digit index to every
/// codepoint the predicate accepts. After construction it is immutable
/// and can be shared freely between threads.
///
/// ```text
///   codepoint:  U+0021  U+0022  ...  U+007E  U+00A0  U+00A1 ...
///   accepted:     yes     yes          yes     yes     yes
///   digit:         0       1    ...    93      94      95   ...
/// ```
///
/// Codepoints in the range that are not Unicode scalar values (the
/// surrogate block) are skipped before the predicate runs.
#[derive(Clone, Debug)]
pub struct AlphabetTable {
    /// `symbols[d]` is the symbol for digit `d`.
    symbols: Vec<char>,
    /// Inverse of `symbols`.
    digits: HashMap<char, u32>,
}

impl AlphabetTable {
    /// Build a table from the inclusive range `[from, to]`, keeping the
    /// codepoints accepted by `accept`.
    ///
    /// # Errors
    ///
    /// Returns [`AlphabetError::TooSmall`] if fewer than two codepoints are
    /// accepted (including the case `from > to`).
    pub fn build(
        from: char,
        to: char,
        accept: impl Fn(char) -> bool,
    ) -> Result<Self, AlphabetError> {
        let symbols: Vec<char> = (u32::from(from)..=u32::from(to))
            .filter_map(char::from_u32)
            .filter(|&ch| accept(ch))
            .collect();

        if symbols.len() < 2 {
            return Err(AlphabetError::TooSmall {
                accepted: symbols.len(),
            });
        }

        // At most 0x110000 scalar values exist, so every index fits in u32.
        let digits = symbols
            .iter()
            .zip(0u32..)
            .map(|(&ch, digit)| (ch, digit))
            .collect();

        Ok(Self { symbols, digits })
    }

    /// The standard chat alphabet: `U+0021 ..= U+FFFF` filtered by
    /// [`is_standard_symbol`].
    ///
    /// # Errors
    ///
    /// Never fails in practice; the signature mirrors [`build`](Self::build).
    pub fn standard() -> Result<Self, AlphabetError> {
        Self::build(STANDARD_FROM, STANDARD_TO, is_standard_symbol)
    }

    /// The numeric radix: number of distinct symbols.
    pub fn base(&self) -> u32 {
        // Bounded by the scalar value count, see `build`.
        u32::try_from(self.symbols.len()).unwrap_or(u32::MAX)
    }

    /// Symbol for `digit`, or `None` if `digit >= base`.
    pub fn digit_to_symbol(&self, digit: u32) -> Option<char> {
        self.symbols.get(digit as usize).copied()
    }

    /// Digit value of `symbol`, or `None` if it is not in the alphabet.
    pub fn symbol_to_digit(&self, symbol: char) -> Option<u32> {
        self.digits.get(&symbol).copied()
    }

    /// Whether `symbol` is a digit of this alphabet.
    pub fn contains(&self, symbol: char) -> bool {
        self.digits.contains_key(&symbol)
    }

    /// All symbols in digit order.
    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }

    /// Symbol for a digit already known to be in range.
    pub(crate) fn symbol_at(&self, digit: usize) -> char {
        self.symbols[digit]
    }
}
