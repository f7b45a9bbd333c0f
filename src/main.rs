use std::process::ExitCode;

use clap::Parser;
use rediswatch::Outcome;
use rediswatch::Result;
use rediswatch::WatchConfig;
use tracing::debug;
use tracing::error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Layer;

#[derive(Parser, Debug)]
#[command(name = "rediswatch")]
#[command(version)]
#[command(about = "Print Redis keyspace notifications as \"<command> <key>\" lines", long_about = None)]
struct Cli {
    /// Redis server IP address or host name
    #[arg(value_name = "serverip")]
    serverip: String,

    /// Redis server port
    #[arg(value_name = "port")]
    port: u16,

    /// Redis database to select (Default DB 0)
    #[arg(value_name = "DB 0-15")]
    db: Option<i64>,

    /// Extra TOML config file merged over REDISWATCH_CONFIG and defaults
    #[arg(long, value_name = "PATH")]
    config: Option<String>,

    /// Print shutdown diagnostics and debug logs to stderr
    #[arg(long, default_value_t = false)]
    debug: bool,
}

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings = match load_settings(&cli) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Initializing Logs
    let _guard = init_observability(settings.debug);
    debug!(?settings, "settings loaded");

    match rediswatch::run(settings).await {
        Ok(Outcome::Signalled) | Ok(Outcome::OutputClosed) => ExitCode::SUCCESS,
        Err(e) => {
            debug!("watch failed: {:?}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_settings(cli: &Cli) -> Result<WatchConfig> {
    let mut settings = WatchConfig::new()?;
    if let Some(path) = &cli.config {
        settings = settings.with_override_config(path)?;
    }
    settings.debug |= cli.debug;

    settings.with_endpoint(cli.serverip.clone(), cli.port, cli.db).validate()
}

/// Logs go to stderr so stdout carries events only.
///
/// `RUST_LOG` takes precedence; otherwise `warn`, or `debug` for this crate
/// when debug mode is on.
fn init_observability(debug: bool) -> WorkerGuard {
    let (non_blocking, guard) = tracing_appender::non_blocking(std::io::stderr());

    let default_directive = if debug { "warn,rediswatch=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    let base_subscriber = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_filter(filter);
    if let Err(e) = tracing_subscriber::registry().with(base_subscriber).try_init() {
        error!("logging already initialized: {}", e);
    }

    guard
}
