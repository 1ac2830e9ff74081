#![warn(clippy::pedantic)]

pub mod compressor;
pub mod dense;
pub mod error;
pub mod fast;
pub mod registry;

mod buffer;

pub use compressor::{Compressor, DECOMPRESSION_SIZE_LIMIT};
pub use dense::DenseCompressor;
pub use error::{CompressionError, RegistryError};
pub use fast::FastCompressor;
pub use registry::{CompressorRegistry, DENSE_ID, FAST_ID};
