/// Implementation of `chatzip decode`.
use anyhow::Result;
use chatzip_codec::MessageCodec;

use crate::{DecodeArgs, read_input};

/// Run the `chatzip decode` command.
///
/// # Errors
///
/// Returns an error only if stdin cannot be read. Segment failures are
/// rendered inline.
pub fn run(codec: &MessageCodec, args: &DecodeArgs) -> Result<()> {
    let text = read_input(args.text.as_deref())?;
    println!("{}", codec.decode_message(&text));
    Ok(())
}
