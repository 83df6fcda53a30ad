//! s3events - normalize S3 object notifications into domain events
//!
//! Local driver for the handler: feeds SNS deliveries or raw notification
//! messages from files or stdin and writes one envelope per line.

mod commands;

use clap::{Parser, Subcommand};
use commands::CommandContext;
use s3events_core::config::{FailurePolicy, InputFormat, LoggingConfig, OutputTarget};
use s3events_core::HandlerConfig;
use s3events_handler::EVENTS_LOG_TARGET;
use std::path::PathBuf;
use tracing_subscriber::{filter::Directive, fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "s3events")]
#[command(version = s3events_core::VERSION)]
#[command(about = "Normalize S3 object notifications into domain events", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true, env = "S3EVENTS_CONFIG")]
    config: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// What to report when records degrade (best-effort, surface)
    #[arg(long, global = true)]
    failure_policy: Option<String>,

    /// Where envelopes go (stdout, log)
    #[arg(short, long, global = true)]
    output: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Process one document from a file or stdin
    Process {
        /// Input file (stdin if omitted)
        file: Option<PathBuf>,

        /// Document shape (sns, raw)
        #[arg(short, long)]
        input: Option<String>,
    },

    /// Process stdin line by line, one raw message per line
    Stream,

    /// Show version information
    Version,
}

impl Cli {
    /// Resolve config: file (or defaults), then environment, then flags
    fn load_config(&self) -> anyhow::Result<HandlerConfig> {
        let mut config = match &self.config {
            Some(path) => HandlerConfig::from_file(path)?,
            None => HandlerConfig::default(),
        };
        config.apply_env();

        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        if let Some(policy) = &self.failure_policy {
            config.handler.failure_policy = policy.parse::<FailurePolicy>()?;
        }
        if let Some(output) = &self.output {
            config.output.target = output.parse::<OutputTarget>()?;
        }
        if let Commands::Process {
            input: Some(input), ..
        } = &self.command
        {
            config.handler.input_format = input.parse::<InputFormat>()?;
        }

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let config = cli.load_config()?;

    init_logging(&config)?;

    let ctx = CommandContext { config };

    match cli.command {
        Commands::Process { file, .. } => commands::process::execute(&ctx, file.as_deref()).await,
        Commands::Stream => commands::stream::execute(&ctx).await,
        Commands::Version => {
            println!("s3events {}", s3events_core::VERSION);
            Ok(())
        }
    }
}

/// Logs go to stderr so stdout carries only envelopes
fn init_logging(config: &HandlerConfig) -> anyhow::Result<()> {
    let filter = log_filter(config)?;

    if config.logging.is_json() {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .with(filter)
            .init();
    }
    Ok(())
}

/// Envelopes logged on the events target must pass whatever level is set
fn log_filter(config: &HandlerConfig) -> anyhow::Result<EnvFilter> {
    let filter = base_filter(&config.logging);
    if config.output.target != OutputTarget::Log {
        return Ok(filter);
    }
    let directive: Directive = format!("{}=info", EVENTS_LOG_TARGET).parse()?;
    Ok(filter.add_directive(directive))
}

fn base_filter(logging: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level))
}
