/// Implementation of `chatzip inspect`.
///
/// Parses one segment's envelope without decompressing it.
///
/// # Output format
///
/// ```text
/// Identifier: 2 (zstd)
/// Symbols:    41
/// Body:       73 bytes
/// Envelope:   02 28 b5 2f fd ...        (only with --hex)
/// ```
///
/// With `--json` the same fields are printed as one JSON object
/// (`identifier`, `compressor`, `body_len`, `symbols`, and `envelope_hex`
/// when `--hex` is also given).
use anyhow::{Context, Result};
use chatzip_codec::MessageCodec;
use chatzip_wire::radix;

use crate::InspectArgs;

/// Run the `chatzip inspect` command.
///
/// # Errors
///
/// Returns an error if the segment contains foreign symbols or has no
/// envelope.
pub fn run(codec: &MessageCodec, args: &InspectArgs) -> Result<()> {
    let segment = strip_markers(codec, args.segment.trim());

    let info = codec
        .inspect_segment(segment)
        .context("failed to inspect segment")?;

    // inspect_segment already validated every symbol, so this cannot fail.
    let envelope = if args.hex {
        Some(hex::encode(
            radix::decode(segment, codec.alphabet()).context("failed to decode segment")?,
        ))
    } else {
        None
    };

    if args.json {
        let mut value = serde_json::to_value(&info).context("failed to serialise summary")?;
        if let (Some(envelope), Some(object)) = (envelope, value.as_object_mut()) {
            object.insert("envelope_hex".to_owned(), serde_json::Value::String(envelope));
        }
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!(
        "Identifier: {} ({})",
        info.identifier,
        info.compressor.unwrap_or("unknown compressor")
    );
    println!("Symbols:    {}", info.symbols);
    println!("Body:       {} bytes", info.body_len);
    if let Some(envelope) = envelope {
        println!("Envelope:   {}", spaced(&envelope));
    }
    Ok(())
}

/// Accept a segment pasted with or without its markers.
fn strip_markers<'a>(codec: &MessageCodec, segment: &'a str) -> &'a str {
    let scanner = codec.scanner();
    segment
        .strip_prefix(scanner.start())
        .and_then(|s| s.strip_suffix(scanner.end()))
        .unwrap_or(segment)
}

/// `"0228b5"` → `"02 28 b5"`.
fn spaced(hex: &str) -> String {
    hex.as_bytes()
        .chunks(2)
        .map(|pair| String::from_utf8_lossy(pair))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spaced_groups_bytes() {
        assert_eq!(spaced("0228b5"), "02 28 b5");
        assert_eq!(spaced(""), "");
    }

    #[test]
    fn markers_are_optional() {
        let codec = MessageCodec::standard().unwrap();
        assert_eq!(strip_markers(&codec, "$!abc!$"), "abc");
        assert_eq!(strip_markers(&codec, "abc"), "abc");
        assert_eq!(strip_markers(&codec, "$!abc"), "$!abc");
    }
}
