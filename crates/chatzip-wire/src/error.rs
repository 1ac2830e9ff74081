/// Errors raised while building an [`AlphabetTable`](crate::AlphabetTable).
///
/// These are configuration errors: they surface once, at startup, and the
/// caller is expected to abort rather than run with a broken alphabet.
#[derive(Debug, thiserror::Error)]
pub enum AlphabetError {
    /// The codepoint range and predicate accepted fewer than two symbols.
    ///
    /// A radix below 2 cannot represent anything, so the table refuses
    /// to exist at all.
    #[error("alphabet too small: {accepted} symbols accepted, need at least 2")]
    TooSmall { accepted: usize },
}

/// A symbol that is not part of the alphabet was fed to the decoder.
///
/// `position` is the zero-based char index inside the encoded string,
/// which is also the digit's power of the base (position 0 is the least
/// significant digit).
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unexpected character {symbol:?} at position {position}")]
pub struct InvalidSymbol {
    pub symbol: char,
    pub position: usize,
}
