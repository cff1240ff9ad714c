//! Top-level launch state machine.

use super::navigation::{NavigationRequest, Navigator};
use super::startup::StartupTask;
use crate::activation::{ActivationOutcome, ActivationResolver, Destination};
use crate::error::{Result, ViddyError};
use crate::messaging::{MessageBus, Notification, NotificationHistory};
use crate::models::SharedFile;
use std::sync::{Arc, Mutex};
use tracing::{debug, error, info};

/// Process launch state. Reaches `Running` once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchState {
    NotStarted,
    Starting,
    Running,
}

/// Process lifecycle events the host forwards.
#[derive(Debug, Clone, PartialEq)]
pub enum LifecycleEvent {
    /// Cold launch or resume. `arguments` is empty for a plain launch.
    Launched { arguments: String },
    /// The app was opened through its URI scheme.
    ProtocolActivated { uri: String },
    /// A file picker the app opened returned.
    FilesPicked { files: Vec<SharedFile> },
    /// Another app shared files into this one.
    ShareTarget { files: Vec<SharedFile> },
    VisibilityChanged { visible: bool },
}

/// Owns the startup latch and turns lifecycle events into exactly one
/// navigation, publishing any notification first.
pub struct LaunchOrchestrator {
    resolver: ActivationResolver,
    bus: MessageBus,
    navigator: Arc<dyn Navigator>,
    history: Arc<dyn NotificationHistory>,
    startup_tasks: Vec<Arc<dyn StartupTask>>,
    state: Mutex<LaunchState>,
}

impl LaunchOrchestrator {
    pub fn new(
        resolver: ActivationResolver,
        bus: MessageBus,
        navigator: Arc<dyn Navigator>,
        history: Arc<dyn NotificationHistory>,
    ) -> Self {
        Self {
            resolver,
            bus,
            navigator,
            history,
            startup_tasks: Vec::new(),
            state: Mutex::new(LaunchState::NotStarted),
        }
    }

    /// Register a task for [`ensure_started`](Self::ensure_started).
    pub fn with_startup_task(mut self, task: Arc<dyn StartupTask>) -> Self {
        self.startup_tasks.push(task);
        self
    }

    pub fn bus(&self) -> &MessageBus {
        &self.bus
    }

    pub fn state(&self) -> LaunchState {
        self.state
            .lock()
            .map(|state| *state)
            .unwrap_or(LaunchState::NotStarted)
    }

    fn set_state(&self, next: LaunchState) -> Result<()> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| ViddyError::Other("launch state lock poisoned".to_string()))?;
        *state = next;
        Ok(())
    }

    /// Run the startup tasks once. Later calls are no-ops.
    ///
    /// A failing task is logged and does not block the launch. The state
    /// only becomes `Running` after every task has been started.
    pub async fn ensure_started(&self) -> Result<()> {
        {
            let mut state = self
                .state
                .lock()
                .map_err(|_| ViddyError::Other("launch state lock poisoned".to_string()))?;
            if *state != LaunchState::NotStarted {
                return Ok(());
            }
            *state = LaunchState::Starting;
        }

        for task in &self.startup_tasks {
            match task.start().await {
                Ok(()) => debug!("Started {}", task.name()),
                Err(e) => error!("Startup task {} failed: {}", task.name(), e),
            }
        }

        self.set_state(LaunchState::Running)?;
        info!("Launch services running");
        Ok(())
    }

    /// Handle one lifecycle event. Returns the navigation performed, if any.
    ///
    /// # Errors
    /// An unrecognized tile type, a share with more than one file, or a
    /// navigator failure.
    pub async fn handle(&self, event: LifecycleEvent) -> Result<Option<NavigationRequest>> {
        match event {
            LifecycleEvent::Launched { arguments } => {
                self.ensure_started().await?;
                self.bus.publish(Notification::PinStateChanged);

                let outcome = self.resolver.resolve_launch_arguments(&arguments).await?;
                let replace_stack = !arguments.trim().is_empty();
                self.apply(outcome, replace_stack).map(Some)
            }
            LifecycleEvent::ProtocolActivated { uri } => {
                self.ensure_started().await?;
                let outcome = self.resolver.resolve_protocol_str(&uri);
                let request = NavigationRequest::new(outcome.destination, true).with_home_button();
                self.dispatch(outcome, request).map(Some)
            }
            LifecycleEvent::ShareTarget { files } => {
                self.ensure_started().await?;
                self.handle_share(files)
            }
            LifecycleEvent::FilesPicked { files } => {
                self.ensure_started().await?;
                self.handle_picked(files)
            }
            LifecycleEvent::VisibilityChanged { visible } => {
                debug!("Visibility changed: {}", visible);
                self.bus.publish(Notification::PinStateChanged);
                Ok(None)
            }
        }
    }

    fn handle_share(&self, mut files: Vec<SharedFile>) -> Result<Option<NavigationRequest>> {
        if files.len() > 1 {
            return Err(ViddyError::Validation {
                field: "files".to_string(),
                message: "can only accept one file at a time".to_string(),
            });
        }
        let Some(file) = files.pop() else {
            debug!("Share target activated without files");
            return Ok(None);
        };

        let outcome = ActivationOutcome::to(Destination::UploadVideo)
            .with_notification(Notification::VideoFile { file });
        self.apply(outcome, true).map(Some)
    }

    fn handle_picked(&self, files: Vec<SharedFile>) -> Result<Option<NavigationRequest>> {
        let Some(file) = files.into_iter().next() else {
            debug!("File picker returned nothing");
            return Ok(None);
        };

        if file.is_image() {
            self.bus.publish(Notification::ProfileImage { file });
            return Ok(None);
        }

        let outcome = ActivationOutcome::to(Destination::UploadVideo)
            .with_notification(Notification::VideoFile { file });
        self.apply(outcome, false).map(Some)
    }

    /// Dismiss, publish, then navigate. The order is part of the contract:
    /// the destination reads the notification while it loads.
    fn apply(&self, outcome: ActivationOutcome, replace_stack: bool) -> Result<NavigationRequest> {
        let request = NavigationRequest::new(outcome.destination, replace_stack);
        self.dispatch(outcome, request)
    }

    fn dispatch(
        &self,
        outcome: ActivationOutcome,
        request: NavigationRequest,
    ) -> Result<NavigationRequest> {
        if let Some(ref id) = outcome.dismiss_notification {
            self.history.remove(id);
        }
        if let Some(notification) = outcome.notification {
            self.bus.publish(notification);
        }

        self.navigator.navigate(&request)?;
        debug!("Navigated to {:?}", request.destination);
        Ok(request)
    }
}
