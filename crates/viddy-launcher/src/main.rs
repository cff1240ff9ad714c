//! Viddy Launcher - command-line host for pinned shortcuts and activation.
//!
//! Launcher entries written by `pin` run `viddy-launcher activate <args>`,
//! so tapping one goes through the same resolution path as the app.

mod context;
mod output;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand, ValueEnum};
use context::{current_launcher, AppContext, ContextOptions};
use output::{emit, success};
use serde_json::json;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;
use viddy_core::{Channel, EntityKind, LifecycleEvent, SharedFile, User, Video};

#[derive(Parser, Debug)]
#[command(name = "viddy-launcher")]
#[command(about = "Pin Viddy shortcuts and route activations")]
struct Args {
    /// Data directory (defaults to the platform data dir)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Directory launcher entries are written to
    #[arg(long, global = true)]
    apps_dir: Option<PathBuf>,

    /// Tile configuration file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Translated strings (JSON object of key to string)
    #[arg(long, global = true)]
    strings: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Pin an entity
    Pin {
        #[command(subcommand)]
        target: PinTarget,
    },
    /// Unpin an entity
    Unpin {
        kind: KindArg,
        /// Entity id (omit for the record shortcut)
        #[arg(default_value = "")]
        id: String,
    },
    /// Report whether an entity is pinned
    Status {
        kind: KindArg,
        #[arg(default_value = "")]
        id: String,
    },
    /// Pin or unpin the record shortcut
    ToggleRecord,
    /// List pinned shortcuts
    List,
    /// Show the stored record behind a tile
    Details { kind: KindArg, id: String },
    /// Launch with arguments, as a tile tap does
    Activate {
        #[arg(default_value = "")]
        arguments: String,
    },
    /// Open a deep link
    Open { uri: String },
    /// Share files into the app
    Share {
        files: Vec<PathBuf>,
        /// MIME type of the shared files
        #[arg(long, default_value = "video/mp4")]
        content_type: String,
    },
    /// Remove stored records whose shortcut is gone
    Prune,
}

#[derive(Subcommand, Debug)]
enum PinTarget {
    /// The record-video shortcut
    Record,
    Video {
        id: String,
        #[arg(long, default_value = "")]
        title: String,
    },
    Channel {
        id: String,
        #[arg(long, default_value = "")]
        title: String,
    },
    User {
        id: String,
        #[arg(long)]
        username: String,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum KindArg {
    Record,
    Video,
    Channel,
    User,
}

impl From<KindArg> for EntityKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Record => EntityKind::VideoRecordShortcut,
            KindArg::Video => EntityKind::Video,
            KindArg::Channel => EntityKind::Channel,
            KindArg::User => EntityKind::User,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .init();

    let options = resolve_options(&args)?;
    info!("Data directory: {}", options.data_dir.display());

    let context = AppContext::build(&options).context("Failed to initialize")?;
    run(&context, args.command).await
}

fn resolve_options(args: &Args) -> Result<ContextOptions> {
    let data_dir = match args.data_dir {
        Some(ref path) => path.clone(),
        None => viddy_core::platform::data_dir()?,
    };
    let apps_dir = match args.apps_dir {
        Some(ref path) => path.clone(),
        None => viddy_core::platform::apps_dir()?,
    };

    Ok(ContextOptions {
        data_dir,
        apps_dir,
        config: args.config.clone(),
        strings: args.strings.clone(),
        launcher: current_launcher(),
    })
}

async fn run(context: &AppContext, command: Command) -> Result<()> {
    let pinning = &context.pinning;

    match command {
        Command::Pin { target } => {
            let pinned = match target {
                PinTarget::Record => pinning.pin_video_record().await,
                PinTarget::Video { id, title } => pinning.pin_video(&Video::new(id, title)).await,
                PinTarget::Channel { id, title } => {
                    pinning.pin_channel(&Channel::new(id, title)).await
                }
                PinTarget::User { id, username } => {
                    pinning.pin_user(&User::new(id, username)).await
                }
            };
            emit(&success(json!({ "pinned": pinned })));
        }
        Command::Unpin { kind, id } => {
            let unpinned = match kind {
                KindArg::Record => pinning.unpin_video_record().await,
                KindArg::Video => pinning.unpin_video(&id).await,
                KindArg::Channel => pinning.unpin_channel(&id).await,
                KindArg::User => pinning.unpin_user(&id).await,
            };
            emit(&success(json!({ "unpinned": unpinned })));
        }
        Command::Status { kind, id } => {
            let kind = EntityKind::from(kind);
            let pinned = pinning.is_pinned(kind, &id).await;
            emit(&success(json!({
                "kind": kind,
                "id": id,
                "tile_id": pinning.scheme().tile_id(kind, &id),
                "pinned": pinned,
            })));
        }
        Command::ToggleRecord => {
            let pinned = pinning.toggle_video_record().await;
            emit(&success(json!({ "pinned": pinned })));
        }
        Command::List => {
            let shortcuts = context.shortcuts.find_all().await;
            emit(&success(json!({ "shortcuts": shortcuts })));
        }
        Command::Details { kind, id } => {
            let payload = pinning.get_pinned_item_details(kind.into(), &id).await?;
            emit(&success(json!({ "payload": payload })));
        }
        Command::Activate { arguments } => {
            dispatch(context, LifecycleEvent::Launched { arguments }).await?;
        }
        Command::Open { uri } => {
            dispatch(context, LifecycleEvent::ProtocolActivated { uri }).await?;
        }
        Command::Share {
            files,
            content_type,
        } => {
            let files = files
                .into_iter()
                .map(|path| SharedFile::new(path, content_type.clone()))
                .collect();
            dispatch(context, LifecycleEvent::ShareTarget { files }).await?;
        }
        Command::Prune => {
            let removed = pinning.prune_orphaned_payloads().await?;
            emit(&success(json!({ "removed": removed })));
        }
    }

    Ok(())
}

/// Hand an event to the orchestrator. Notifications published without a
/// navigation are printed afterwards.
async fn dispatch(context: &AppContext, event: LifecycleEvent) -> Result<()> {
    let request = context.orchestrator.handle(event).await?;
    context.navigator.flush_notifications()?;
    if request.is_none() {
        emit(&success(json!({ "navigate": null })));
    }
    Ok(())
}
