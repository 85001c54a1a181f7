//! Command-line interface definitions using clap derive macros.
//!
//! Contains the top-level [`Cli`] parser, the [`Commands`] enum for
//! subcommands (run, health), and their associated argument structs.
//! Every flag has an environment variable equivalent for container
//! deployments; the four backend URLs in particular are normally set
//! via `*_SERVICE_URL` variables.

use clap::{Args, Parser, Subcommand, ValueEnum};
use url::Url;

#[derive(Parser)]
#[command(
    name = "fingate",
    version,
    about = "Backend-for-frontend gateway for the finances services",
    propagate_version = true,
    after_help = "\x1b[1mQuick start:\x1b[0m\n  \
        fingate run                          Start with *_SERVICE_URL env vars\n  \
        fingate run --tag-url http://tags:8000 ...\n  \
        fingate health                       Probe a running instance"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the gateway server
    Run(Box<RunArgs>),

    /// Check health of a running instance
    Health(HealthArgs),
}

#[derive(Args)]
#[command(after_help = "\x1b[1mExamples:\x1b[0m\n  \
        fingate run                                       URLs from env vars\n  \
        fingate run -p 8080 --pretty                      Local dev mode\n  \
        fingate run --account-url http://accounts:8000    Explicit backend URL")]
pub struct RunArgs {
    /// Listen port
    #[arg(short, long, env = "PORT", default_value_t = 8000)]
    pub port: u16,

    /// Listen address
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    // -- Backend Services --
    /// Account service base URL
    #[arg(long, env = "ACCOUNT_SERVICE_URL", help_heading = "Backend Services")]
    pub account_url: Option<Url>,

    /// File service base URL
    #[arg(long, env = "FILE_SERVICE_URL", help_heading = "Backend Services")]
    pub file_url: Option<Url>,

    /// Statement service base URL
    #[arg(long, env = "STATEMENT_SERVICE_URL", help_heading = "Backend Services")]
    pub statement_url: Option<Url>,

    /// Tag service base URL
    #[arg(long, env = "TAG_SERVICE_URL", help_heading = "Backend Services")]
    pub tag_url: Option<Url>,

    // -- Logging --
    /// Log level
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: LogLevel,

    /// Force pretty (human-readable) log output
    #[arg(long)]
    pub pretty: bool,

    /// Force JSON log output (overrides TTY detection)
    #[arg(long, conflicts_with = "pretty")]
    pub json: bool,

    // -- Tuning --
    /// Backend request timeout in milliseconds (instance-wide)
    #[arg(
        long,
        env = "REQUEST_TIMEOUT_MS",
        default_value_t = 5000,
        help_heading = "Tuning"
    )]
    pub timeout: u64,

    /// Max request body size in bytes (bounds file uploads)
    #[arg(
        long,
        env = "MAX_BODY_SIZE",
        default_value_t = 10_485_760,
        help_heading = "Tuning"
    )]
    pub max_body: usize,
}

#[derive(Args)]
pub struct HealthArgs {
    /// URL of the running instance
    #[arg(default_value = "http://localhost:8000")]
    pub url: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    #[must_use]
    pub const fn to_tracing_level(&self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}
