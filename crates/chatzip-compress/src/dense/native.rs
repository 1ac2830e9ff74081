use std::fmt;
use std::panic::{self, AssertUnwindSafe};

// The boundary to a streaming compression library, in the shape such C
// libraries expose: create an instance, optionally set encoder
// parameters, then alternate "process a chunk" and "take available
// output" until the instance reports it is finished, then destroy it.
//
// Everything on the far side of these traits is foreign: its state lives
// outside Rust's ownership, which is why instances are only ever handled
// through `NativeInstance`.

/// Error reported by the native library, carrying its static error name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NativeFault(pub &'static str);

impl fmt::Display for NativeFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Outcome of a single [`NativeStream::step`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StreamStatus {
    /// The stream is complete; once drained, no more output will appear.
    Finished,
    /// Not finished yet: drain any pending output and step again.
    NeedsMoreOutput,
    /// All supplied input was consumed and the stream is not complete.
    NeedsMoreInput,
}

/// Encoder mode hint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EncoderMode {
    Generic,
    /// Input is UTF-8 text.
    Text,
}

/// Encoder parameters, set after creation and before the first step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EncoderParameter {
    Mode(EncoderMode),
    Quality(i32),
}

/// One live native encoder or decoder instance.
pub trait NativeStream {
    /// Feed `input` to the instance. On return `input` has been advanced
    /// past the bytes the library consumed.
    ///
    /// # Errors
    ///
    /// Returns the library's fault if the stream is corrupt or the
    /// instance is in a bad state.
    fn step(&mut self, input: &mut &[u8]) -> Result<StreamStatus, NativeFault>;

    /// Whether produced output is waiting to be taken.
    fn has_more_output(&self) -> bool;

    /// Take up to `max` bytes of pending output.
    fn take_output(&mut self, max: usize) -> &[u8];

    /// Release the native instance. Called exactly once, by
    /// [`NativeInstance`]'s destructor.
    fn destroy(self)
    where
        Self: Sized;
}

/// Native encoder: a stream that accepts parameters.
pub trait NativeEncoder: NativeStream {
    /// # Errors
    ///
    /// Returns the library's fault if the parameter is rejected.
    fn set_parameter(&mut self, parameter: EncoderParameter) -> Result<(), NativeFault>;
}

/// Factory for native instances.
///
/// Implementations hold no per-stream state; every call to `create_*`
/// hands out an independent instance.
pub trait NativeLibrary: Send + Sync {
    type Encoder: NativeEncoder;
    type Decoder: NativeStream;

    /// Highest quality level the encoder accepts.
    const MAX_QUALITY: i32;

    /// `None` when the library cannot allocate an instance.
    fn create_encoder(&self) -> Option<Self::Encoder>;

    /// Decoder whose working memory is sized for at most `max_output`
    /// bytes of output. Streams that declare a larger history window must
    /// fail on their first step instead of allocating it.
    ///
    /// `None` when the library cannot allocate an instance.
    fn create_decoder(&self, max_output: usize) -> Option<Self::Decoder>;

    /// Decompressed size recorded in the stream header, if the format
    /// carries one.
    fn declared_size(&self, _data: &[u8]) -> Option<u64> {
        None
    }
}

/// Owning wrapper around a native instance.
///
/// Acquisition hands back the wrapper immediately, and dropping it calls
/// [`NativeStream::destroy`] exactly once. That covers every way out of a
/// compress/decompress call: normal return, `?` on a library error, or a
/// panic unwinding through the caller.
pub struct NativeInstance<S: NativeStream> {
    stream: Option<S>,
}

impl<S: NativeStream> NativeInstance<S> {
    /// Wrap the result of a `create_*` call; `None` stays `None`.
    pub fn acquire(created: Option<S>) -> Option<Self> {
        created.map(|stream| Self {
            stream: Some(stream),
        })
    }

    /// One library step.
    ///
    /// A panic raised inside the foreign call is caught here and reported
    /// as a fault, so callers see a single error path.
    ///
    /// # Errors
    ///
    /// Returns the library's fault, or a synthetic one if the step panicked.
    pub fn step(&mut self, input: &mut &[u8]) -> Result<StreamStatus, NativeFault> {
        let stream = self.live()?;
        panic::catch_unwind(AssertUnwindSafe(|| stream.step(input)))
            .unwrap_or(Err(NativeFault("native step panicked")))
    }

    /// Mutable access to the live instance, for draining output and for
    /// library-specific calls such as [`NativeEncoder::set_parameter`].
    ///
    /// # Errors
    ///
    /// Fails only if the instance was already released.
    pub fn live(&mut self) -> Result<&mut S, NativeFault> {
        self.stream.as_mut().ok_or(NativeFault("native instance already destroyed"))
    }
}

impl<S: NativeStream> Drop for NativeInstance<S> {
    fn drop(&mut self) {
        if let Some(stream) = self.stream.take() {
            log::trace!("destroying native stream instance");
            stream.destroy();
        }
    }
}
