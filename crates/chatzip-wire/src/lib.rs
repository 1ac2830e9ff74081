#![warn(clippy::pedantic)]

pub mod alphabet;
pub mod error;
pub mod radix;

pub use alphabet::AlphabetTable;
pub use error::{AlphabetError, InvalidSymbol};
