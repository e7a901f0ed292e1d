use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use chatfilter::config::{Config, RuleWatcher};
use chatfilter::filter::{Destination, FilterEngine, MessageContext, MessageKind};
use chatfilter::host::{ChannelRef, TracingHooks, UserRef};
use chatfilter::telemetry::{init_tracing, TracingConfig};

#[derive(Parser, Debug)]
#[command(name = "chatfilter")]
#[command(author, version, about = "Run chat text through keyword filter rules")]
struct Args {
    /// Path to the server config file
    #[arg(short, long, value_name = "FILE")]
    config: PathBuf,

    /// Validate config and rules, then exit
    #[arg(long)]
    validate: bool,

    /// Nick of the simulated sender
    #[arg(long, default_value = "tester")]
    from: String,

    /// Target nick, or channel when it starts with '#' or '&'
    #[arg(long, default_value = "#test")]
    to: String,

    /// Treat input lines as notices instead of messages
    #[arg(long)]
    notice: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration first (to get log settings)
    let config = Config::load(&args.config)?;

    init_tracing(&TracingConfig::from(&config.telemetry))?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %args.config.display(),
        "starting chatfilter"
    );

    let engine = Arc::new(
        FilterEngine::new(&args.config, Arc::new(TracingHooks))
            .with_event_log_size(config.filter.event_log_size),
    );

    let report = engine
        .initialize()
        .context("failed to load keyword rules")?;

    if args.validate {
        info!(rules = report.rules, "configuration is valid");
        return Ok(());
    }

    info!(
        from = %args.from,
        to = %args.to,
        notice = args.notice,
        "reading messages from stdin"
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let watcher_handle = if config.filter.watch {
        let mut watcher = RuleWatcher::new(engine.clone(), config.filter.debounce)?;
        watcher.start()?;
        let rx = shutdown_rx.clone();
        Some(tokio::spawn(async move { watcher.run(rx).await }))
    } else {
        None
    };

    let rehash_handle = spawn_rehash_listener(engine.clone(), shutdown_rx);

    let sender = UserRef::new(1, args.from.clone());
    let destination = if args.to.starts_with('#') || args.to.starts_with('&') {
        Destination::Channel(ChannelRef::new(args.to.clone()))
    } else {
        Destination::User(UserRef::new(2, args.to.clone()))
    };
    let kind = if args.notice {
        MessageKind::Notice
    } else {
        MessageKind::Message
    };

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read stdin")? else {
                    break;
                };
                let outcome = engine.check(kind, &MessageContext::new(&sender, &destination, &line));
                let verdict = match outcome.action {
                    Some(action) => format!("filtered ({})", action),
                    None => "delivered".to_string(),
                };
                println!("{}\t{}", verdict, line);
            }
            _ = tokio::signal::ctrl_c() => {
                info!("received SIGINT (Ctrl+C)");
                break;
            }
        }
    }

    let _ = shutdown_tx.send(true);
    if let Some(handle) = watcher_handle {
        let _ = handle.await;
    }
    if let Some(handle) = rehash_handle {
        let _ = handle.await;
    }

    let stats = engine.events().stats();
    info!(
        suppressed = stats.suppressed,
        blocked = stats.blocked,
        killed = stats.killed,
        "filter statistics"
    );

    engine.shutdown();

    Ok(())
}

/// Reload rules on SIGHUP, like a server rehash.
#[cfg(unix)]
fn spawn_rehash_listener(
    engine: Arc<FilterEngine>,
    mut shutdown: watch::Receiver<bool>,
) -> Option<tokio::task::JoinHandle<()>> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut hangup = match signal(SignalKind::hangup()) {
        Ok(s) => s,
        Err(e) => {
            warn!(error = %e, "failed to install SIGHUP handler, rehash disabled");
            return None;
        }
    };

    Some(tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = hangup.recv() => {
                    info!("received SIGHUP, reloading rules");
                    if let Err(e) = engine.on_reload("SIGHUP") {
                        debug!(error = %e, "rehash left previous rules in place");
                    }
                }
                _ = shutdown.changed() => break,
            }
        }
    }))
}

#[cfg(not(unix))]
fn spawn_rehash_listener(
    _engine: Arc<FilterEngine>,
    _shutdown: watch::Receiver<bool>,
) -> Option<tokio::task::JoinHandle<()>> {
    None
}
