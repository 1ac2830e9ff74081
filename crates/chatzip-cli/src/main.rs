/// chatzip command-line tool: encode, decode, and inspect compressed chat
/// segments.
///
/// # Command overview
///
/// ```text
/// chatzip <COMMAND> [OPTIONS]
///
/// Commands:
///   encode     Compress every $!…!$ segment of a message
///   decode     Expand every $!…!$ segment of a message
///   inspect    Show the envelope of one encoded segment
///   help       Print help information
///
/// Global options:
///   --max-size <BYTES>   Decompression limit per segment (default 65536)
///   -v, --verbose        Debug logging (RUST_LOG still wins when set)
///   -h, --help           Print help
///   -V, --version        Print version
/// ```
///
/// # Exit codes
///
/// | Code | Meaning                                      |
/// |------|----------------------------------------------|
/// | 0    | Success                                      |
/// | 1    | Error (bad input, I/O failure, config error) |
///
/// Text is read from the positional argument or, when absent, from stdin.
/// Errors go to stderr so stdout can be piped cleanly.
use std::io::{self, Read};
use std::process;

use anyhow::{Context, Result};
use chatzip_codec::{CodecConfig, MessageCodec};
use clap::{Parser, Subcommand};

mod cmd_decode;
mod cmd_encode;
mod cmd_inspect;

// ── CLI root ──────────────────────────────────────────────────────────────────

/// Embed compressed text in chat messages.
#[derive(Parser)]
#[command(name = "chatzip", version, about = "Chat message compression CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Maximum decompressed size of one segment, in bytes.
    #[arg(long, global = true, value_name = "BYTES")]
    max_size: Option<usize>,

    /// Enable debug logging.
    #[arg(short, long, global = true)]
    verbose: bool,
}

// ── Sub-commands ──────────────────────────────────────────────────────────────

#[derive(Subcommand)]
enum Commands {
    /// Compress the segments of a message.
    Encode(EncodeArgs),
    /// Expand the segments of a message.
    Decode(DecodeArgs),
    /// Print the envelope of a single encoded segment.
    Inspect(InspectArgs),
}

// ── Argument structs ──────────────────────────────────────────────────────────

/// Arguments for `chatzip encode`.
///
/// Without `--segment`, only `$!…!$` spans are encoded and everything else
/// is copied through. With `--segment`, the whole input becomes one
/// segment and the output is wrapped in markers, ready to paste.
#[derive(clap::Args)]
pub struct EncodeArgs {
    /// Message text. Read from stdin when omitted.
    pub text: Option<String>,

    /// Treat the whole input as a single segment.
    #[arg(long)]
    pub segment: bool,
}

/// Arguments for `chatzip decode`.
///
/// Segments that fail to decode are replaced by `!<error>!` inline; the
/// command itself still succeeds.
#[derive(clap::Args)]
pub struct DecodeArgs {
    /// Message text. Read from stdin when omitted.
    pub text: Option<String>,
}

/// Arguments for `chatzip inspect`.
///
/// ```text
/// ┌──────────┬──────────────────────────────────────────────────┐
/// │ Flag     │ Effect                                           │
/// ├──────────┼──────────────────────────────────────────────────┤
/// │ --json   │ Print the summary as a JSON object               │
/// │ --hex    │ Also dump the envelope bytes as hex (text only)  │
/// └──────────┴──────────────────────────────────────────────────┘
/// ```
#[derive(clap::Args)]
pub struct InspectArgs {
    /// Encoded segment, with or without its `$!`/`!$` markers.
    pub segment: String,

    /// Print JSON instead of text.
    #[arg(long)]
    pub json: bool,

    /// Dump the envelope bytes in hex.
    #[arg(long)]
    pub hex: bool,
}

// ── Shared helpers ────────────────────────────────────────────────────────────

/// The positional text, or all of stdin.
fn read_input(text: Option<&str>) -> Result<String> {
    if let Some(text) = text {
        return Ok(text.to_owned());
    }
    let mut buf = String::new();
    io::stdin()
        .read_to_string(&mut buf)
        .context("cannot read message from stdin")?;
    // A trailing newline from `echo` or a heredoc is not part of the message.
    if buf.ends_with('\n') {
        buf.pop();
        if buf.ends_with('\r') {
            buf.pop();
        }
    }
    Ok(buf)
}

fn build_codec(max_size: Option<usize>) -> Result<MessageCodec> {
    let mut config = CodecConfig::default();
    if let Some(limit) = max_size {
        config = config.with_max_decompressed_size(limit);
    }
    MessageCodec::from_config(&config).context("invalid codec configuration")
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .init();
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = build_codec(cli.max_size).and_then(|codec| match cli.command {
        Commands::Encode(args) => cmd_encode::run(&codec, &args),
        Commands::Decode(args) => cmd_decode::run(&codec, &args),
        Commands::Inspect(args) => cmd_inspect::run(&codec, &args),
    });

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}
