use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use srpg_notifier::config::NotifierConfig;
use srpg_notifier::leaderboard::HttpLeaderboardSource;
use srpg_notifier::notify::WebhookSink;
use srpg_notifier::pipeline::AppContext;
use srpg_notifier::server;
use srpg_notifier::store::SqliteStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Serve,
    Run,
}

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "srpg_notifier=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let mode = parse_mode(&args)?;

    let mut config = NotifierConfig::from_env()?;
    if let Some(path) = parse_db_path_arg(&args) {
        config.db_path = Some(path);
    }
    let db_path = config
        .db_path
        .clone()
        .context("unable to resolve snapshot db path")?;

    let ctx = Arc::new(AppContext {
        source: Box::new(HttpLeaderboardSource::new(config.leaderboard_url.clone())),
        store: Box::new(SqliteStore::open(&db_path)?),
        sink: Box::new(WebhookSink::new(config.webhook_url.clone())),
        config,
    });
    tracing::info!(db = %db_path.display(), ?mode, "srpg_notifier starting");

    match mode {
        Mode::Run => {
            let outcome = ctx.run()?;
            println!("Run complete");
            println!("Players: {}", outcome.interesting_players.len());
            println!("Lines: {}", outcome.output_lines.len());
            let failures = outcome.delivery.failures();
            if !failures.is_empty() {
                println!("Failed sends: {}", failures.len());
                for (position, outcome) in failures {
                    println!(" - #{position}: {outcome:?}");
                }
            }
            Ok(())
        }
        Mode::Serve => {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .context("build tokio runtime")?;
            runtime.block_on(server::serve(ctx))
        }
    }
}

fn parse_mode(args: &[String]) -> Result<Mode> {
    let positional = args.iter().find(|arg| !arg.starts_with("--"));
    match positional.map(String::as_str) {
        None | Some("serve") => Ok(Mode::Serve),
        Some("run") => Ok(Mode::Run),
        Some(other) => Err(anyhow!("unknown command {other:?}, expected serve or run")),
    }
}

fn parse_db_path_arg(args: &[String]) -> Option<PathBuf> {
    args.iter()
        .filter_map(|arg| arg.strip_prefix("--db="))
        .map(str::trim)
        .find(|path| !path.is_empty())
        .map(PathBuf::from)
}
