use std::ops::Range;

use zstd::zstd_safe::zstd_sys::ZSTD_EndDirective;
use zstd::zstd_safe::{self, CCtx, CParameter, DCtx, DParameter, InBuffer, OutBuffer, Strategy};

use super::native::{
    EncoderMode, EncoderParameter, NativeEncoder, NativeFault, NativeLibrary, NativeStream,
    StreamStatus,
};

/// Size of the per-instance staging window the library writes into.
const STAGING_SIZE: usize = 16 * 1024;

/// `ZSTD_maxCLevel()`.
const ZSTD_MAX_LEVEL: i32 = 22;

/// `ZSTD_WINDOWLOG_ABSOLUTEMIN` and `ZSTD_WINDOWLOG_LIMIT_DEFAULT`.
const WINDOW_LOG_RANGE: (u32, u32) = (10, 27);

/// Smallest window log whose window holds `max_output` bytes.
fn window_log_for(max_output: usize) -> u32 {
    let log = usize::BITS - max_output.saturating_sub(1).leading_zeros();
    log.clamp(WINDOW_LOG_RANGE.0, WINDOW_LOG_RANGE.1)
}

/// libzstd, reached through the `zstd-safe` bindings re-exported by `zstd`.
///
/// Each instance owns a `ZSTD_CCtx`/`ZSTD_DCtx` plus a staging window.
/// A step lets the library write into the window; the caller then takes
/// the produced bytes out before stepping again, the same
/// process-then-take rhythm as the other streaming C codecs.
#[derive(Clone, Copy, Debug, Default)]
pub struct LibZstd;

impl NativeLibrary for LibZstd {
    type Encoder = ZstdEncoder;
    type Decoder = ZstdDecoder;

    const MAX_QUALITY: i32 = ZSTD_MAX_LEVEL;

    fn create_encoder(&self) -> Option<ZstdEncoder> {
        CCtx::try_create().map(|cctx| ZstdEncoder {
            cctx,
            staging: Staging::new(),
            finished: false,
        })
    }

    fn create_decoder(&self, max_output: usize) -> Option<ZstdDecoder> {
        let mut dctx = DCtx::try_create()?;
        // A frame whose header asks for a larger window is refused before
        // libzstd allocates it.
        dctx.set_parameter(DParameter::WindowLogMax(window_log_for(max_output))).ok()?;
        Some(ZstdDecoder {
            dctx,
            staging: Staging::new(),
            finished: false,
        })
    }

    fn declared_size(&self, data: &[u8]) -> Option<u64> {
        zstd_safe::get_frame_content_size(data).ok().flatten()
    }
}

fn fault(code: usize) -> NativeFault {
    NativeFault(zstd_safe::get_error_name(code))
}

/// Staging window plus the range of it that has not been taken yet.
struct Staging {
    window: Box<[u8]>,
    pending: Range<usize>,
}

impl Staging {
    fn new() -> Self {
        Self {
            window: vec![0u8; STAGING_SIZE].into_boxed_slice(),
            pending: 0..0,
        }
    }

    fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    fn take(&mut self, max: usize) -> &[u8] {
        let start = self.pending.start;
        let end = self.pending.end.min(start.saturating_add(max));
        self.pending.start = end;
        &self.window[start..end]
    }
}

pub struct ZstdEncoder {
    cctx: CCtx<'static>,
    staging: Staging,
    finished: bool,
}

impl NativeStream for ZstdEncoder {
    fn step(&mut self, input: &mut &[u8]) -> Result<StreamStatus, NativeFault> {
        if self.staging.has_pending() {
            return Ok(StreamStatus::NeedsMoreOutput);
        }
        if self.finished {
            return Ok(StreamStatus::Finished);
        }

        let mut dst = OutBuffer::around(&mut self.staging.window[..]);

        // Every call offers all remaining input with `ZSTD_e_end`. On the
        // first call that tells libzstd the exact source size, which keeps
        // level 22 from sizing its tables for a 128 MiB window.
        let data = *input;
        let mut src = InBuffer::around(data);
        let remaining = self
            .cctx
            .compress_stream2(&mut dst, &mut src, ZSTD_EndDirective::ZSTD_e_end)
            .map_err(fault)?;
        *input = &data[src.pos()..];

        let status = if remaining == 0 {
            self.finished = true;
            StreamStatus::Finished
        } else {
            StreamStatus::NeedsMoreOutput
        };

        self.staging.pending = 0..dst.pos();
        Ok(status)
    }

    fn has_more_output(&self) -> bool {
        self.staging.has_pending()
    }

    fn take_output(&mut self, max: usize) -> &[u8] {
        self.staging.take(max)
    }

    fn destroy(self) {
        // ZSTD_freeCCtx runs in CCtx's destructor.
        drop(self.cctx);
    }
}

impl NativeEncoder for ZstdEncoder {
    fn set_parameter(&mut self, parameter: EncoderParameter) -> Result<(), NativeFault> {
        let parameter = match parameter {
            // zstd has no text mode; its strongest optimal-parsing strategy
            // is the closest match for short natural-language input.
            EncoderParameter::Mode(EncoderMode::Text) => CParameter::Strategy(Strategy::ZSTD_btultra2),
            EncoderParameter::Mode(EncoderMode::Generic) => return Ok(()),
            EncoderParameter::Quality(level) => CParameter::CompressionLevel(level),
        };
        self.cctx.set_parameter(parameter).map(drop).map_err(fault)
    }
}

pub struct ZstdDecoder {
    dctx: DCtx<'static>,
    staging: Staging,
    finished: bool,
}

impl NativeStream for ZstdDecoder {
    fn step(&mut self, input: &mut &[u8]) -> Result<StreamStatus, NativeFault> {
        if self.staging.has_pending() {
            return Ok(StreamStatus::NeedsMoreOutput);
        }
        if self.finished {
            return Ok(StreamStatus::Finished);
        }

        let mut dst = OutBuffer::around(&mut self.staging.window[..]);
        let data = *input;
        let mut src = InBuffer::around(data);
        let hint = self.dctx.decompress_stream(&mut dst, &mut src).map_err(fault)?;
        let written = dst.pos();
        *input = &data[src.pos()..];
        self.staging.pending = 0..written;

        // A zero hint means the frame is fully decoded and flushed.
        if hint == 0 {
            self.finished = true;
            Ok(StreamStatus::Finished)
        } else if written < STAGING_SIZE && input.is_empty() {
            Ok(StreamStatus::NeedsMoreInput)
        } else {
            Ok(StreamStatus::NeedsMoreOutput)
        }
    }

    fn has_more_output(&self) -> bool {
        self.staging.has_pending()
    }

    fn take_output(&mut self, max: usize) -> &[u8] {
        self.staging.take(max)
    }

    fn destroy(self) {
        drop(self.dctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Frame header without a content size, window descriptor 0x88
    // (128 MiB), then one last RLE block of ten `A` bytes.
    const WIDE_WINDOW_FRAME: [u8; 10] = [
        0x28, 0xB5, 0x2F, 0xFD, 0x00, 0x88, 0x53, 0x00, 0x00, 0x41,
    ];

    #[test]
    fn window_log_tracks_limit() {
        assert_eq!(window_log_for(0), 10);
        assert_eq!(window_log_for(1000), 10);
        assert_eq!(window_log_for(64 * 1024), 16);
        assert_eq!(window_log_for(64 * 1024 + 1), 17);
        assert_eq!(window_log_for(usize::MAX), 27);
    }

    #[test]
    fn wide_window_frame_is_refused_without_allocating() {
        let mut decoder = LibZstd.create_decoder(64 * 1024).unwrap();
        let mut input = &WIDE_WINDOW_FRAME[..];
        assert!(decoder.step(&mut input).is_err());
        assert!(
            decoder.dctx.sizeof() < 1024 * 1024,
            "decoder holds {} bytes",
            decoder.dctx.sizeof()
        );
    }

    #[test]
    fn frame_within_limit_decodes() {
        let mut decoder = LibZstd.create_decoder(1000).unwrap();
        // Same RLE block, but single-segment with a content size of 10.
        let frame = [0x28, 0xB5, 0x2F, 0xFD, 0x20, 0x0A, 0x53, 0x00, 0x00, 0x41];
        let mut input = &frame[..];
        assert_eq!(decoder.step(&mut input), Ok(StreamStatus::Finished));
        assert_eq!(decoder.take_output(usize::MAX), b"AAAAAAAAAA");
    }

    #[test]
    fn declared_size_reads_frame_header() {
        let mut encoder = LibZstd.create_encoder().unwrap();
        let mut input = &b"hello hello hello"[..];
        let mut frame = Vec::new();
        loop {
            let status = encoder.step(&mut input).unwrap();
            frame.extend_from_slice(encoder.take_output(usize::MAX));
            if status == StreamStatus::Finished && !encoder.has_more_output() {
                break;
            }
        }
        assert_eq!(LibZstd.declared_size(&frame), Some(17));
        assert_eq!(LibZstd.declared_size(&WIDE_WINDOW_FRAME), None);
        assert_eq!(LibZstd.declared_size(b"not zstd"), None);
    }
}
