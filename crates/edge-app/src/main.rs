// Dynasty edge CLI entry point.
//
// Startup sequence:
// 1. Initialize tracing (stderr, so stdout stays machine-readable)
// 2. Load config, installing shipped defaults on first run
// 3. Read league snapshots from the given JSON files
// 4. Score every league on the blocking pool, in parallel
// 5. Print the reports as JSON on stdout

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};

use edge_engine::config::{self, ConfigError, EngineConfig};
use edge_engine::snapshot::LeagueSnapshot;
use edge_engine::{score_snapshot, LeagueReport};

#[derive(Parser, Debug)]
#[command(name = "dynasty-edge")]
#[command(about = "Scores dynasty fantasy football rosters against their league", long_about = None)]
#[command(version)]
struct Cli {
    /// Directory holding config/ and defaults/ (defaults to the current directory)
    #[arg(short, long)]
    base_dir: Option<PathBuf>,

    /// Emit compact JSON instead of pretty-printed
    #[arg(long)]
    compact: bool,

    /// League snapshot JSON files
    #[arg(required = true)]
    snapshots: Vec<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 1. Initialize tracing
    init_tracing()?;
    info!("Dynasty edge starting up");

    // 2. Load config
    let base_dir = match cli.base_dir {
        Some(dir) => dir,
        None => std::env::current_dir().context("failed to resolve current directory")?,
    };
    let config = Arc::new(load_engine_config(&base_dir)?);

    // 3. Read snapshots
    let snapshots = cli
        .snapshots
        .iter()
        .map(|path| load_snapshot(path))
        .collect::<anyhow::Result<Vec<_>>>()?;
    info!("Loaded {} league snapshot(s)", snapshots.len());

    // 4. Score
    let reports = score_all(snapshots, config).await?;

    // 5. Output
    let json = if cli.compact {
        serde_json::to_string(&reports)
    } else {
        serde_json::to_string_pretty(&reports)
    }
    .context("failed to serialize reports")?;
    println!("{json}");

    info!("Scored {} league(s)", reports.len());
    Ok(())
}

/// Load config from `base_dir`. A base dir without shipped defaults or a
/// config directory runs on built-in defaults instead of failing.
fn load_engine_config(base_dir: &Path) -> anyhow::Result<EngineConfig> {
    let config = match config::load_config(base_dir) {
        Ok(config) => config,
        Err(e @ ConfigError::NoConfig { .. }) => {
            warn!("{e}; using built-in defaults");
            EngineConfig::default()
        }
        Err(e) => return Err(e).context("failed to load configuration"),
    };
    config::validate(&config).context("invalid configuration")?;
    info!(
        "Config loaded: {} age windows, needs surplus>={} shallow<{}",
        config.age_curve.windows.len(),
        config.needs.surplus_min,
        config.needs.shallow_max
    );
    Ok(config)
}

fn load_snapshot(path: &Path) -> anyhow::Result<LeagueSnapshot> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read snapshot {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse snapshot {}", path.display()))
}

/// Score each snapshot on the blocking pool. Reports come back in input order.
async fn score_all(snapshots: Vec<LeagueSnapshot>, config: Arc<EngineConfig>) -> anyhow::Result<Vec<LeagueReport>> {
    let handles: Vec<_> = snapshots
        .into_iter()
        .map(|snapshot| {
            let config = Arc::clone(&config);
            tokio::task::spawn_blocking(move || {
                score_snapshot(&snapshot, &config)
                    .with_context(|| format!("failed to score league {}", snapshot.league_id))
            })
        })
        .collect();

    let mut reports = Vec::with_capacity(handles.len());
    for handle in handles {
        reports.push(handle.await.context("scoring task panicked")??);
    }
    Ok(reports)
}

/// Initialize tracing to stderr with an env-filter.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("edge_engine=info,dynasty_edge=info,warn")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber).context("failed to set tracing subscriber")?;

    Ok(())
}
