use std::io::{self, Read};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use radarframe_core::{Report, analyze_buffer, parse_hex_dump};
use tracing::{debug, info};
use tracing_subscriber::filter::LevelFilter;

mod render;

#[derive(Parser, Debug)]
#[command(name = "radarframe")]
#[command(version)]
#[command(long_version = concat!(
    env!("CARGO_PKG_VERSION"),
    " (commit ",
    env!("RADARFRAME_BUILD_COMMIT"),
    ", ",
    env!("RADARFRAME_BUILD_DATE"),
    ")"
))]
#[command(
    about = "Decoder for radar sensor frames (base info and target info modules).",
    long_about = None,
    after_help = "Examples:\n  radarframe frame decode ABCD0006 4A420006007F\n  radarframe frame decode --json --pretty < frame.hex"
)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Operations on raw frame buffers.
    Frame {
        #[command(subcommand)]
        command: FrameCommands,
    },
}

#[derive(Subcommand, Debug)]
enum FrameCommands {
    /// Decode one frame and print its modules and targets.
    #[command(alias = "parse")]
    #[command(
        after_help = "Examples:\n  radarframe frame decode ABCD0006 4A420006007F\n  radarframe frame parse --json < frame.hex"
    )]
    Decode {
        /// Frame bytes as hex; read from stdin when omitted
        hex: Vec<String>,

        /// Print the JSON report instead of tables
        #[arg(long)]
        json: bool,

        /// Pretty-print JSON output
        #[arg(long, conflicts_with = "compact")]
        pretty: bool,

        /// Compact JSON output (default)
        #[arg(long)]
        compact: bool,

        /// Suppress non-error output on stderr
        #[arg(long)]
        quiet: bool,

        /// Exit with a non-zero code if decoding halted or a field is out of range
        #[arg(long)]
        strict: bool,

        /// List out-of-range target fields after decoding
        #[arg(long)]
        list_invalid: bool,
    },
}

struct DecodeOptions {
    json: bool,
    pretty: bool,
    compact: bool,
    quiet: bool,
    strict: bool,
    list_invalid: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let quiet = match &cli.command {
        Commands::Frame {
            command: FrameCommands::Decode { quiet, .. },
        } => *quiet,
    };
    init_tracing(&cli.log_level, quiet);

    let result = match cli.command {
        Commands::Frame { command } => match command {
            FrameCommands::Decode {
                hex,
                json,
                pretty,
                compact,
                quiet,
                strict,
                list_invalid,
            } => cmd_frame_decode(
                hex,
                DecodeOptions {
                    json,
                    pretty,
                    compact,
                    quiet,
                    strict,
                    list_invalid,
                },
            ),
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

fn init_tracing(level: &str, quiet: bool) {
    let mut filter = level.parse::<LevelFilter>().unwrap_or(LevelFilter::WARN);
    if quiet {
        filter = filter.min(LevelFilter::ERROR);
    }
    tracing_subscriber::fmt()
        .with_max_level(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(io::stderr)
        .init();
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(format!("{:#}", err), None)
    }
}

fn cmd_frame_decode(hex: Vec<String>, opts: DecodeOptions) -> Result<(), CliError> {
    if !opts.json && (opts.pretty || opts.compact) {
        return Err(CliError::new(
            "--pretty and --compact only apply to JSON output",
            Some("add --json".to_string()),
        ));
    }

    let text = if hex.is_empty() {
        read_stdin().context("Failed to read hex input from stdin")?
    } else {
        hex.join(" ")
    };
    let bytes = parse_hex_dump(&text).map_err(|err| {
        CliError::new(
            err.to_string(),
            Some("pass frame bytes as hex, e.g. `ABCD0006 4A420006007F`".to_string()),
        )
    })?;
    debug!(bytes = bytes.len(), "decoding buffer");

    let report = analyze_buffer(&bytes);
    let frame_found = report.frame.is_some();

    if frame_found {
        let output = if opts.json {
            serialize_report(&report, opts.pretty)?
        } else {
            render::render_tables(&report)
        };
        print!("{}", output);
    }

    let halt = report.halt.clone();
    if !frame_found {
        let message = halt
            .map(|halt| halt.message)
            .unwrap_or_else(|| "no frame decoded".to_string());
        return Err(CliError::new(
            message,
            Some("check that the input contains the 0xABCD sync marker".to_string()),
        ));
    }

    if !opts.quiet {
        if let Some(halt) = &halt {
            eprintln!("warning: decoding halted ({}): {}", halt.id, halt.message);
        }
        if opts.list_invalid {
            print_invalid_fields(&report);
        }
    }
    info!(
        invalid_fields = report.invalid_fields.len(),
        halted = halt.is_some(),
        "frame decoded"
    );

    if opts.strict && (halt.is_some() || !report.invalid_fields.is_empty()) {
        return Err(CliError::new(
            "frame decoded with problems",
            Some("use --list-invalid to inspect out-of-range fields".to_string()),
        ));
    }
    Ok(())
}

fn read_stdin() -> Result<String> {
    let mut text = String::new();
    io::stdin().read_to_string(&mut text)?;
    Ok(text)
}

fn serialize_report(report: &Report, pretty: bool) -> Result<String, CliError> {
    let json = if pretty {
        serde_json::to_string_pretty(report)
    } else {
        serde_json::to_string(report)
    };
    let mut json = json.context("JSON serialization failed")?;
    json.push('\n');
    Ok(json)
}

fn print_invalid_fields(report: &Report) {
    eprintln!("Out-of-range fields:");
    for entry in &report.invalid_fields {
        eprintln!(
            "  target {} {} (raw {})",
            entry.target,
            entry.field.label(),
            entry.raw
        );
    }
}
