use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use newsdesk::app::{App, AppEvent, SyncKind};
use newsdesk::config::{Config, ConnectivityMode};
use newsdesk::connectivity::{probe_once, ConnectivityMonitor, ManualMonitor, ProbeMonitor};
use newsdesk::news::{ContentSource, FixtureSource};
use newsdesk::storage::{
    DatabaseError, MemoryStore, PersistentStore, SqliteStore, CACHE_KEY, LAST_UPDATE_KEY,
};
use newsdesk::sync::SyncCache;
use newsdesk::ui;

/// Timeout for a single connectivity probe.
const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Get the config directory path (~/.config/newsdesk/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("newsdesk"))
}

#[derive(Parser, Debug)]
#[command(name = "newsdesk", about = "Terminal news reader with offline cache")]
struct Args {
    /// Config file (default: ~/.config/newsdesk/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Cache database (default: ~/.config/newsdesk/cache.db)
    #[arg(long, value_name = "FILE")]
    db: Option<PathBuf>,

    /// Keep the cache in memory only
    #[arg(long)]
    ephemeral: bool,

    /// Start disconnected; connectivity is then toggled with `o`
    #[arg(long)]
    offline: bool,

    /// Clear the cached articles before starting
    #[arg(long)]
    reset_cache: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_dir = get_config_dir()?;
    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir).context("Failed to create config directory")?;
    }

    // Set directory permissions on Unix (user-only access)
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Err(e) =
            std::fs::set_permissions(&config_dir, std::fs::Permissions::from_mode(0o700))
        {
            eprintln!("Warning: could not restrict {}: {}", config_dir.display(), e);
        }
    }

    // The terminal belongs to the UI, so logs go to a daily file
    let file_appender = tracing_appender::rolling::daily(config_dir.join("logs"), "newsdesk.log");
    let (writer, _log_guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(writer)
        .with_ansi(false)
        .init();

    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| config_dir.join("config.toml"));
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    let store = open_store(&args, &config_dir).await?;
    if args.reset_cache {
        store.remove(CACHE_KEY).await.context("Failed to reset cache")?;
        store.remove(LAST_UPDATE_KEY).await.context("Failed to reset cache")?;
        tracing::info!("Cache reset");
    }

    let source: Arc<dyn ContentSource> = match &config.fixture_path {
        Some(path) => Arc::new(
            FixtureSource::from_file(path, config.fixture_latency())
                .with_context(|| format!("Failed to load articles from {}", path.display()))?,
        ),
        None => Arc::new(FixtureSource::builtin(config.fixture_latency())),
    };

    // Manual mode keeps a handle so the UI can flip the state
    let (monitor, manual_monitor): (Arc<dyn ConnectivityMonitor>, Option<Arc<ManualMonitor>>) =
        if args.offline || config.connectivity == ConnectivityMode::Manual {
            let manual = Arc::new(ManualMonitor::new(!args.offline));
            (manual.clone() as Arc<dyn ConnectivityMonitor>, Some(manual))
        } else {
            let initial = probe_once(&config.probe_addr, PROBE_TIMEOUT).await;
            let probe = ProbeMonitor::spawn(
                config.probe_addr.clone(),
                config.probe_interval(),
                PROBE_TIMEOUT,
                initial,
            );
            (Arc::new(probe) as Arc<dyn ConnectivityMonitor>, None)
        };

    let online = monitor.is_connected();
    tracing::info!(online, "Starting newsdesk");

    let (sync, advisories) = SyncCache::new(source, store, online);
    let sync = Arc::new(sync.with_fetch_timeout(config.fetch_timeout()));
    let _listener = sync.listen(monitor.as_ref());

    let mut app = App::new(sync, manual_monitor);
    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);
    ui::spawn_sync(&mut app, SyncKind::Load, &event_tx);

    let result = ui::run(&mut app, advisories, event_tx, event_rx).await;
    drop(app);
    drop(monitor);
    result?;

    println!("Goodbye!");
    Ok(())
}

/// Open the persistent store selected on the command line.
async fn open_store(args: &Args, config_dir: &Path) -> Result<Arc<dyn PersistentStore>> {
    if args.ephemeral {
        tracing::info!("Using in-memory cache");
        return Ok(Arc::new(MemoryStore::new()));
    }

    let db_path = args
        .db
        .clone()
        .unwrap_or_else(|| config_dir.join("cache.db"));
    let db_path_str = db_path
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("Invalid UTF-8 in database path"))?;

    match SqliteStore::open(db_path_str).await {
        Ok(store) => Ok(Arc::new(store)),
        Err(DatabaseError::InstanceLocked) => {
            eprintln!(
                "Error: Another instance of newsdesk appears to be running. Please close it and try again."
            );
            std::process::exit(1);
        }
        Err(e) => Err(anyhow::anyhow!("Failed to open cache database: {}", e)),
    }
}
