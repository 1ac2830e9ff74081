use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::Zero;

use crate::alphabet::AlphabetTable;
use crate::error::InvalidSymbol;

// The byte string is read as one unsigned big-endian integer and then
// re-expressed in the alphabet's base. Two orders are load-bearing and
// must never change, since they decide how already-sent messages parse:
//
//   bytes:   most significant byte FIRST   (bytes[0] is the top byte)
//   symbols: least significant digit FIRST (symbol 0 is N mod base)
//
// BigUint does the arbitrary-precision part. The base is far above 256,
// so BigUint::to_radix_le cannot be used and we divide by hand.

/// Encode `bytes` as an alphabet string, least-significant digit first.
///
/// A zero integer (empty input or all-zero bytes) encodes to the empty
/// string. Leading zero bytes are not representable: they carry no value
/// and are lost.
///
/// # Example
///
/// ```rust
/// use chatzip_wire::AlphabetTable;
/// use chatzip_wire::radix::encode;
///
/// let decimal = AlphabetTable::build('0', '9', |_| true).unwrap();
/// // 0x01_00 = 256, written least-significant digit first.
/// assert_eq!(encode(&[0x01, 0x00], &decimal), "652");
/// ```
pub fn encode(bytes: &[u8], alphabet: &AlphabetTable) -> String {
    let base = BigUint::from(alphabet.base());
    let mut n = BigUint::from_bytes_be(bytes);
    let mut out = String::new();

    while !n.is_zero() {
        let (quotient, remainder) = n.div_rem(&base);
        // remainder < base <= u32::MAX, so it is at most one u32 digit;
        // zero has no digits at all.
        let digit = remainder.iter_u32_digits().next().unwrap_or(0);
        out.push(alphabet.symbol_at(digit as usize));
        n = quotient;
    }

    out
}

/// Decode an alphabet string back into the minimal big-endian byte string
/// of the integer it represents.
///
/// ```text
///   N = Σ digit(symbol_i) · base^i        (i = char position)
/// ```
///
/// An empty string has no digits and yields an empty byte vector. A
/// non-empty string whose value is zero yields `[0x00]`, the minimal
/// encoding of zero.
///
/// # Errors
///
/// Returns [`InvalidSymbol`] for the first char that is not in the
/// alphabet.
pub fn decode(encoded: &str, alphabet: &AlphabetTable) -> Result<Vec<u8>, InvalidSymbol> {
    let digits = encoded
        .chars()
        .enumerate()
        .map(|(position, symbol)| {
            alphabet
                .symbol_to_digit(symbol)
                .ok_or(InvalidSymbol { symbol, position })
        })
        .collect::<Result<Vec<u32>, _>>()?;

    if digits.is_empty() {
        return Ok(Vec::new());
    }

    // Horner's rule from the most significant digit (the last symbol).
    let base = BigUint::from(alphabet.base());
    let mut n = BigUint::zero();
    for &digit in digits.iter().rev() {
        n *= &base;
        n += digit;
    }

    Ok(n.to_bytes_be())
}
