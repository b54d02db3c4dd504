use anyhow::Result;
use armsweep::api::{create_router, AppState};
use armsweep::config::Config;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing::Level;

/// Version injected at compile time via ARMSWEEP_VERSION env var (set by CI/CD),
/// or "dev" for local builds.
pub const VERSION: &str = match option_env!("ARMSWEEP_VERSION") {
    Some(v) => v,
    None => "dev",
};

/// HTTP API for orphaned and deprecated Azure resources
#[derive(Parser, Debug)]
#[command(name = "armsweep", version, about, long_about = None)]
struct Args {
    /// Address to bind to
    #[arg(short, long)]
    bind: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Path to a config file (defaults to the platform config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log level
    #[arg(long, value_enum, default_value = "info")]
    log_level: LogLevel,

    /// Log to this file instead of stdout
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Run in read-only mode (block all write operations)
    #[arg(long)]
    readonly: bool,
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
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(
    level: LogLevel,
    log_file: Option<&PathBuf>,
) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let Some(tracing_level) = level.to_tracing_level() else {
        return Ok(None);
    };

    let guard = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            let (non_blocking, guard) = tracing_appender::non_blocking(file);
            tracing_subscriber::fmt()
                .with_max_level(tracing_level)
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .init();
            guard
        }
        None => {
            let (non_blocking, guard) = tracing_appender::non_blocking(std::io::stdout());
            tracing_subscriber::fmt()
                .with_max_level(tracing_level)
                .with_writer(non_blocking)
                .with_target(true)
                .init();
            guard
        }
    };

    tracing::info!("armsweep {} started with log level: {:?}", VERSION, level);
    Ok(Some(guard))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level, args.log_file.as_ref())?;

    let mut config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load(),
    };
    if let Some(bind) = args.bind {
        config.bind_address = bind;
    }
    if let Some(port) = args.port {
        config.port = port;
    }

    if args.readonly {
        tracing::info!("running in read-only mode; delete and upgrade are disabled");
    }

    let addr = format!("{}:{}", config.bind_address, config.port);
    let arm_base = config.effective_arm_base_url();
    let state = AppState::new(config, args.readonly)?;
    let app = create_router(state);

    tracing::info!(address = %addr, arm = %arm_base, "starting armsweep API");

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
