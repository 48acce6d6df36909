//! fleet - operator console for a distributed compute cluster.
//!
//! One-shot subcommands for listing and mutating cluster state, plus a
//! `watch` mode that keeps the view synchronized on a poll interval.

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use fleet_console::{
    view, ClusterClient, CommandDispatcher, Config, Notification, NotificationCenter, Severity,
    SnapshotStore, SyncEngine,
};

#[derive(Debug, Parser)]
#[command(name = "fleet", about = "Operator console for a distributed compute cluster")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Watch the cluster, refreshing on the poll interval.
    Watch,

    /// List worker nodes.
    Nodes,

    /// List pods.
    Pods,

    /// Add a worker node with the given CPU capacity.
    AddNode {
        #[arg(long, default_value_t = 1)]
        cpu_cores: u32,
    },

    /// Stop a healthy node; its pods are rescheduled.
    StopNode {
        /// Node ID.
        node: String,
    },

    /// Resume a stopped node.
    ResumeNode {
        /// Node ID.
        node: String,
    },

    /// Launch a pod with the given CPU requirement.
    LaunchPod {
        #[arg(long, default_value_t = 1)]
        cpu_required: u32,
    },
}

/// Engine wiring shared by every subcommand.
struct Console {
    store: Arc<SnapshotStore>,
    notifications: NotificationCenter,
    sync: Arc<SyncEngine>,
    dispatcher: CommandDispatcher,
}

fn build_console(config: &Config) -> Result<Console> {
    let client = Arc::new(ClusterClient::new(config)?);
    let store = Arc::new(SnapshotStore::new());
    let notifications = NotificationCenter::new(config.notification_ttl);
    let sync = Arc::new(SyncEngine::new(
        Arc::clone(&client),
        Arc::clone(&store),
        notifications.clone(),
    ));
    let dispatcher = CommandDispatcher::new(client, Arc::clone(&sync), notifications.clone());

    Ok(Console {
        store,
        notifications,
        sync,
        dispatcher,
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;

    // Initialize tracing (prefer RUST_LOG, fallback to FLEET_LOG_LEVEL).
    // Logs go to stderr so tables stay clean on stdout.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| config.log_level.clone().into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let console = build_console(&config)?;

    match cli.command {
        Command::Watch => run_watch(&config, &console).await,
        Command::Nodes => {
            let snapshot = refresh_once(&console).await?;
            view::print_snapshot_nodes(&snapshot);
            Ok(())
        }
        Command::Pods => {
            let snapshot = refresh_once(&console).await?;
            view::print_snapshot_pods(&snapshot);
            Ok(())
        }
        Command::AddNode { cpu_cores } => {
            finish_command(console.dispatcher.add_node(cpu_cores).await)
        }
        Command::StopNode { node } => finish_command(console.dispatcher.stop_node(&node).await),
        Command::ResumeNode { node } => finish_command(console.dispatcher.resume_node(&node).await),
        Command::LaunchPod { cpu_required } => {
            finish_command(console.dispatcher.launch_pod(cpu_required).await)
        }
    }
}

/// Refresh once for a one-shot listing; a failed refresh is a hard error for
/// these commands since there is no prior view worth showing.
async fn refresh_once(console: &Console) -> Result<Arc<fleet_console::ClusterSnapshot>> {
    console.sync.refresh().await;

    let failures = console.notifications.active();
    if let Some(failure) = failures.iter().find(|n| n.severity == Severity::Error) {
        anyhow::bail!("{}", failure.message);
    }

    Ok(console.store.current())
}

/// Print a command outcome and pick the exit code from its severity.
fn finish_command(notification: Notification) -> Result<()> {
    view::print_notification(&notification);
    if notification.severity == Severity::Error {
        std::process::exit(1);
    }
    Ok(())
}

/// Run the periodic sync loop and re-render until Ctrl-C (or once, when
/// configured).
async fn run_watch(config: &Config, console: &Console) -> Result<()> {
    if config.once {
        let snapshot = refresh_once(console).await?;
        view::print_snapshot(&snapshot);
        return Ok(());
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let sync = Arc::clone(&console.sync);
    let poll_interval = config.poll_interval;
    let sync_task = tokio::spawn(async move {
        sync.run(poll_interval, shutdown_rx).await;
    });

    let mut render_timer = tokio::time::interval(config.poll_interval);
    loop {
        tokio::select! {
            _ = render_timer.tick() => {
                // Clear screen, home cursor.
                print!("\x1b[2J\x1b[H");
                let snapshot = console.store.current();
                view::print_snapshot(&snapshot);
                println!();
                view::print_notifications(&console.notifications.active());
            }
            _ = tokio::signal::ctrl_c() => {
                break;
            }
        }
    }

    // In-flight requests are fire-and-forget; the sequence guard makes any
    // late completion harmless.
    let _ = shutdown_tx.send(true);
    let _ = sync_task.await;

    Ok(())
}
