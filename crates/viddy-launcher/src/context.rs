//! Application context: every collaborator constructed once and passed by
//! reference to the command handlers.

use crate::output::{LoggingHistory, StdoutNavigator};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;
use viddy_core::config::{AppConfig, SettingsConfig};
use viddy_core::launch::{LaunchCounter, PinnedItemSweep};
use viddy_core::platform::{settings_db_path, tiles_dir};
use viddy_core::tiles::ShortcutManager;
use viddy_core::{
    ActivationResolver, DesktopShortcutHost, LaunchOrchestrator, MessageBus, PinnedItemStore,
    PinningService, ResourceStrings, SqliteSettingsStore, TileConfig, TileScheme,
};

/// Locations and overrides resolved from the command line.
#[derive(Debug, Clone)]
pub struct ContextOptions {
    pub data_dir: PathBuf,
    pub apps_dir: PathBuf,
    /// Tile configuration file. Without one, icons resolve under the data
    /// directory.
    pub config: Option<PathBuf>,
    /// Translations overlaying the English strings.
    pub strings: Option<PathBuf>,
    /// Binary written into launcher entries.
    pub launcher: PathBuf,
}

pub struct AppContext {
    pub pinning: PinningService,
    pub shortcuts: ShortcutManager,
    pub orchestrator: LaunchOrchestrator,
    pub navigator: Arc<StdoutNavigator>,
}

impl AppContext {
    pub fn build(options: &ContextOptions) -> viddy_core::Result<Self> {
        let tile_config = match options.config {
            Some(ref path) => TileConfig::load(path)?,
            None => TileConfig::default().with_local_dir(&tiles_dir(&options.data_dir)),
        };
        let strings = match options.strings {
            Some(ref path) => ResourceStrings::from_json_file(path)?,
            None => ResourceStrings::english(),
        };
        debug!("Tile config: {:?}", tile_config);

        let settings = SqliteSettingsStore::open(settings_db_path(&options.data_dir))?;
        let store = PinnedItemStore::new(Arc::new(
            settings.container(SettingsConfig::PINNED_ITEMS_CONTAINER),
        ));
        let scheme = TileScheme::new(tile_config);
        let shortcuts = ShortcutManager::new(Arc::new(DesktopShortcutHost::new(
            &options.apps_dir,
            &options.launcher,
        )));

        let pinning = PinningService::new(
            scheme.clone(),
            store.clone(),
            shortcuts.clone(),
            Arc::new(strings),
        );

        let bus = MessageBus::default();
        let navigator = Arc::new(StdoutNavigator::new(bus.subscribe()));
        let orchestrator = LaunchOrchestrator::new(
            ActivationResolver::new(scheme, store),
            bus,
            navigator.clone(),
            Arc::new(LoggingHistory),
        )
        .with_startup_task(Arc::new(LaunchCounter::new(Arc::new(settings))))
        .with_startup_task(Arc::new(PinnedItemSweep::new(pinning.clone())));

        Ok(Self {
            pinning,
            shortcuts,
            orchestrator,
            navigator,
        })
    }
}

/// The running executable, or the launcher's name on `PATH`.
pub fn current_launcher() -> PathBuf {
    std::env::current_exe().unwrap_or_else(|_| PathBuf::from(AppConfig::LAUNCHER_BINARY))
}
