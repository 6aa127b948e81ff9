use anyhow::Context;
use apachescope::observer::TracingObserver;
use apachescope::parser::{ParseOpts, TimestampPolicy};
use apachescope::{render, LogAnalyzer};
use clap::{Parser, ValueEnum};
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(
    name = "apachescope",
    version,
    about = "Hourly traffic anomalies and status codes from Apache access logs"
)]
struct Cli {
    /// Apache common/combined format access log
    input: PathBuf,

    /// Report format
    #[arg(long = "format", value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Fail the whole file on a matched line with an unparseable timestamp
    #[arg(long = "strict-timestamps", default_value_t = false)]
    strict_timestamps: bool,

    /// Log level (overridden by RUST_LOG)
    #[arg(long = "log-level", default_value = "info")]
    log_level: String,

    /// Append diagnostics to this file instead of stderr
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,
}

fn init_tracing(cli: &Cli) -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));
    match &cli.log_file {
        Some(path) => {
            let f = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("opening log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(f))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli)?;

    let timestamp_policy =
        if cli.strict_timestamps { TimestampPolicy::Abort } else { TimestampPolicy::Skip };
    let opts = ParseOpts { timestamp_policy };
    let analyzer = LogAnalyzer::new(opts, Box::new(TracingObserver));

    let Some(report) = analyzer.run(&cli.input) else {
        tracing::error!("Failed to parse logs.");
        std::process::exit(1);
    };

    match cli.format {
        OutputFormat::Json => println!("{}", render::render_json(&report)?),
        OutputFormat::Text => print!("{}", render::render_text(&report)),
    }
    Ok(())
}
