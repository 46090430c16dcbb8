mod cli;

/// Version injected at compile time via SCMCTL_VERSION env var (set by CI/CD),
/// or "dev" for local builds.
pub const VERSION: &str = match option_env!("SCMCTL_VERSION") {
    Some(v) => v,
    None => "dev",
};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use cli::{Command, RulebaseArg};
use scm_client::{Config, ScmClient, ScmError};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Command-line client for the Strata Cloud Manager configuration API
#[derive(Parser, Debug)]
#[command(name = "scmctl", version, about, long_about = None)]
struct Args {
    /// API base URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Tenant service group id
    #[arg(long, global = true)]
    tsg_id: Option<String>,

    /// OAuth2 client id
    #[arg(long, global = true)]
    client_id: Option<String>,

    /// Page size for list calls (1-5000)
    #[arg(long, global = true)]
    max_limit: Option<u32>,

    /// Fail when a fetched name matches more than one object
    #[arg(long, global = true)]
    strict: bool,

    /// Security rule rulebase
    #[arg(long, value_enum, global = true, default_value = "pre")]
    rulebase: RulebaseArg,

    /// Log level for debugging
    #[arg(long, value_enum, global = true, default_value = "off")]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn directive(self) -> Option<&'static str> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some("error"),
            LogLevel::Warn => Some("warn"),
            LogLevel::Info => Some("info"),
            LogLevel::Debug => Some("debug"),
            LogLevel::Trace => Some("trace"),
        }
    }
}

/// File logging; `RUST_LOG` takes precedence over `--log-level` when set
fn setup_logging(level: LogLevel) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new(level.directive()?),
    };

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        Ok(file) => file,
        Err(e) => {
            eprintln!("warning: cannot open log file {}: {}", log_path.display(), e);
            return None;
        },
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("scmctl {} started with log level: {:?}", VERSION, level);
    tracing::info!("Log file: {:?}", log_path);

    Some(guard)
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("scm").join("scmctl.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".scm").join("scmctl.log");
    }
    PathBuf::from("scmctl.log")
}

/// Flags > environment > config file > defaults
fn resolve_config(args: &Args) -> Result<Config> {
    let mut config = Config::load()
        .context("failed to load configuration")?
        .merge_env();

    if let Some(url) = &args.base_url {
        config.base_url = Some(url.clone());
    }
    if let Some(tsg) = &args.tsg_id {
        config.tsg_id = Some(tsg.clone());
    }
    if let Some(id) = &args.client_id {
        config.client_id = Some(id.clone());
    }
    if args.max_limit.is_some() {
        config.max_limit = args.max_limit;
    }
    if args.strict {
        config.strict_fetch = true;
    }
    Ok(config)
}

async fn run(args: Args) -> Result<()> {
    let config = resolve_config(&args)?;
    let client = ScmClient::from_config(&config).context("failed to create API client")?;
    tracing::info!("Using {} (strict fetch: {})", client.base_url(), config.strict_fetch);

    let output = cli::run(&client, args.command, args.rulebase.into()).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let log_guard = setup_logging(args.log_level);

    let exit_code = match run(args).await {
        Ok(()) => 0,
        Err(err) => {
            tracing::error!("{:#}", err);
            match err.downcast_ref::<ScmError>() {
                Some(scm) => eprintln!("Error [{}]: {:#}", scm.code(), err),
                None => eprintln!("Error: {:#}", err),
            }
            1
        },
    };

    // Flush the log writer before exiting
    drop(log_guard);
    std::process::exit(exit_code);
}
