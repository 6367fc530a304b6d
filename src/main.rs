// Main entry point for the celador console
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::sync::mpsc;
use tracing::{info, warn};

use celador::config::Config;
use celador::console::dispatcher::Console;
use celador::console::transport::{spawn_update_poller, TelegramApi};
use celador::core::constants::limits;
use celador::core::registry::UserRegistry;
use celador::core::store::{JsonFileStore, MemoryStore, RegistryStore};
use celador::reports::ReportRunner;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the persisted user registry (overrides USERS_FILE)
    #[arg(long)]
    users_file: Option<PathBuf>,

    /// Run without the reporting database and with an ephemeral registry
    #[arg(long)]
    offline: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    install_panic_hook();

    let mut config = Config::from_env()?;
    if let Some(path) = cli.users_file {
        config.users_file = path;
    }

    init_tracing(&config);

    // A corrupt registry is startup-fatal: the console must not run with
    // an unreadable source of truth.
    let store: Arc<dyn RegistryStore> = if cli.offline {
        Arc::new(MemoryStore::new())
    } else {
        Arc::new(JsonFileStore::new(&config.users_file))
    };
    let registry = UserRegistry::open(config.creator_id.clone(), store)?;

    let api = Arc::new(TelegramApi::new(&config.telegram_token)?);
    if let Err(e) = api.set_my_commands().await {
        warn!("could not publish command menu: {}", e);
    }

    let reports = match (&config.db, cli.offline) {
        (Some(db), false) => Some(ReportRunner::connect(db)),
        _ => {
            warn!("reporting database not configured, academic commands disabled");
            None
        }
    };

    let (tx, rx) = mpsc::channel(limits::EVENT_CHANNEL_CAPACITY);
    spawn_update_poller(api.clone(), tx);

    info!("celador corriendo, creador {}", config.creator_id);
    let console = Console::new(registry, api, reports);
    console.run(rx).await;

    Ok(())
}

fn install_panic_hook() {
    std::panic::set_hook(Box::new(|panic_info| {
        let location = panic_info
            .location()
            .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
            .unwrap_or_else(|| "unknown".to_string());

        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        eprintln!("PANIC: {} at {}", message, location);
    }));
}

fn init_tracing(config: &Config) {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("celador=debug,info"));

    let subscriber = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr);

    if config.log_format == "json" {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}
