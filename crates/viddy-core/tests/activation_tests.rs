//! Integration tests for activation: pin through the service, then launch
//! through the orchestrator with the generated arguments.

use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use viddy_core::config::SettingsConfig;
use viddy_core::launch::{LaunchCounter, LaunchState, PinnedItemSweep};
use viddy_core::localisation::ResourceStrings;
use viddy_core::settings::SqliteSettingsStore;
use viddy_core::tiles::{MemoryShortcutHost, ShortcutManager};
use viddy_core::{
    ActivationResolver, Channel, DeepLink, Destination, EntityKind, LaunchOrchestrator,
    LifecycleEvent, MessageBus, NavigationRequest, Navigator, Notification, NotificationHistory,
    PinnedItemStore, PinnedPayload, PinningService, Result, TileScheme, ViddyError,
};

#[derive(Default)]
struct Recorder {
    requests: Mutex<Vec<NavigationRequest>>,
    dismissed: Mutex<Vec<String>>,
}

impl Navigator for Recorder {
    fn navigate(&self, request: &NavigationRequest) -> Result<()> {
        self.requests.lock().unwrap().push(*request);
        Ok(())
    }
}

impl NotificationHistory for Recorder {
    fn remove(&self, notification_id: &str) {
        self.dismissed.lock().unwrap().push(notification_id.to_string());
    }
}

struct App {
    _temp_dir: TempDir,
    host: Arc<MemoryShortcutHost>,
    pinning: PinningService,
    counter: Arc<LaunchCounter>,
    orchestrator: LaunchOrchestrator,
    recorder: Arc<Recorder>,
}

fn create_app() -> App {
    let temp_dir = TempDir::new().unwrap();
    let settings = SqliteSettingsStore::open(temp_dir.path().join("settings.sqlite")).unwrap();
    let store = PinnedItemStore::new(Arc::new(
        settings.container(SettingsConfig::PINNED_ITEMS_CONTAINER),
    ));
    let scheme = TileScheme::default();
    let host = Arc::new(MemoryShortcutHost::new());

    let pinning = PinningService::new(
        scheme.clone(),
        store.clone(),
        ShortcutManager::new(host.clone()),
        Arc::new(ResourceStrings::english()),
    );
    let counter = Arc::new(LaunchCounter::new(Arc::new(settings)));
    let recorder = Arc::new(Recorder::default());

    let orchestrator = LaunchOrchestrator::new(
        ActivationResolver::new(scheme, store),
        MessageBus::default(),
        recorder.clone(),
        recorder.clone(),
    )
    .with_startup_task(counter.clone())
    .with_startup_task(Arc::new(PinnedItemSweep::new(pinning.clone())));

    App {
        _temp_dir: temp_dir,
        host,
        pinning,
        counter,
        orchestrator,
        recorder,
    }
}

#[tokio::test]
async fn test_pinned_channel_tap() {
    let app = create_app();
    let channel = Channel::new("7", "X");
    assert!(app.pinning.pin_channel(&channel).await);

    let mut receiver = app.orchestrator.bus().subscribe();
    let arguments = app.pinning.scheme().activation_arguments(EntityKind::Channel, "7");
    let request = app
        .orchestrator
        .handle(LifecycleEvent::Launched { arguments })
        .await
        .unwrap()
        .unwrap();

    assert_eq!(request, NavigationRequest::new(Destination::Channel, true));
    assert_eq!(receiver.try_recv().unwrap(), Notification::PinStateChanged);
    assert_eq!(
        receiver.try_recv().unwrap(),
        Notification::EntityDetail {
            kind: EntityKind::Channel,
            payload: PinnedPayload::Channel(channel)
        }
    );
}

#[tokio::test]
async fn test_tap_after_sweep_during_host_outage_keeps_payload() {
    let app = create_app();
    let channel = Channel::new("7", "X");
    assert!(app.pinning.pin_channel(&channel).await);

    // The first launch runs the sweep while the host is down.
    app.host.set_available(false);
    app.orchestrator
        .handle(LifecycleEvent::Launched {
            arguments: String::new(),
        })
        .await
        .unwrap();
    assert_eq!(app.orchestrator.state(), LaunchState::Running);
    app.host.set_available(true);

    let mut receiver = app.orchestrator.bus().subscribe();
    let arguments = app.pinning.scheme().activation_arguments(EntityKind::Channel, "7");
    app.orchestrator
        .handle(LifecycleEvent::Launched { arguments })
        .await
        .unwrap();

    assert_eq!(receiver.try_recv().unwrap(), Notification::PinStateChanged);
    assert_eq!(
        receiver.try_recv().unwrap(),
        Notification::EntityDetail {
            kind: EntityKind::Channel,
            payload: PinnedPayload::Channel(channel)
        }
    );
}

#[tokio::test]
async fn test_startup_tasks_run_on_first_launch() {
    let app = create_app();
    assert_eq!(app.counter.count().await.unwrap(), 0);

    for _ in 0..3 {
        app.orchestrator
            .handle(LifecycleEvent::Launched {
                arguments: String::new(),
            })
            .await
            .unwrap();
    }

    assert_eq!(app.orchestrator.state(), LaunchState::Running);
    assert_eq!(app.counter.count().await.unwrap(), 1);
    assert_eq!(app.recorder.requests.lock().unwrap().len(), 3);
}

#[tokio::test]
async fn test_deep_link_round_trip() {
    let app = create_app();
    let link = DeepLink::Search {
        query: "cats".to_string(),
        include_nsfw: true,
    };
    let mut receiver = app.orchestrator.bus().subscribe();

    let request = app
        .orchestrator
        .handle(LifecycleEvent::ProtocolActivated {
            uri: format!("{}&notificationId=n1", link.to_uri("viddy")),
        })
        .await
        .unwrap()
        .unwrap();

    assert_eq!(request.destination, Destination::Search);
    assert_eq!(
        receiver.try_recv().unwrap(),
        Notification::ProtocolSearch {
            query: "cats".to_string(),
            include_nsfw: true
        }
    );
    assert_eq!(*app.recorder.dismissed.lock().unwrap(), vec!["n1".to_string()]);
}

#[tokio::test]
async fn test_malformed_arguments_land_on_main() {
    let app = create_app();
    for arguments in ["garbage tileType", "viddy://?tileType=Video", "viddy://nowhere"] {
        let request = app
            .orchestrator
            .handle(LifecycleEvent::Launched {
                arguments: arguments.to_string(),
            })
            .await
            .unwrap()
            .unwrap();
        assert_eq!(request.destination, Destination::Main, "{}", arguments);
        assert!(request.replace_stack);
    }
}

#[tokio::test]
async fn test_unrecognized_tile_type_is_reported() {
    let app = create_app();
    let err = app
        .orchestrator
        .handle(LifecycleEvent::Launched {
            arguments: "viddy://?tileType=NotAKind&id=1".to_string(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, ViddyError::UnrecognizedTileType { value } if value == "NotAKind"));
    assert!(app.recorder.requests.lock().unwrap().is_empty());
}
