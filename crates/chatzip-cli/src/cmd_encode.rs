/// Implementation of `chatzip encode`.
///
/// ```text
/// $ chatzip encode 'see $!the full stack trace here!$ above'
/// see $!<symbols>!$ above
///
/// $ chatzip encode --segment 'the whole thing'
/// $!<symbols>!$
/// ```
use anyhow::{Context, Result};
use chatzip_codec::MessageCodec;

use crate::{EncodeArgs, read_input};

/// Run the `chatzip encode` command.
///
/// # Errors
///
/// Returns an error if stdin cannot be read or a segment fails to
/// compress.
pub fn run(codec: &MessageCodec, args: &EncodeArgs) -> Result<()> {
    let text = read_input(args.text.as_deref())?;

    let encoded = if args.segment {
        codec.encode_wrapped(&text).context("failed to encode segment")?
    } else {
        codec.encode_message(&text).context("failed to encode message")?
    };

    log::debug!(
        "{} chars in, {} chars out",
        text.chars().count(),
        encoded.chars().count()
    );
    println!("{encoded}");
    Ok(())
}
