//! Host collaborators that report to stdout.
//!
//! Every line written to stdout is one JSON object so callers can pipe the
//! output into other tools.

use serde_json::{json, Value};
use std::sync::Mutex;
use tokio::sync::broadcast;
use tracing::{debug, info};
use viddy_core::{NavigationRequest, Navigator, Notification, NotificationHistory, ViddyError};

/// Print one JSON line.
pub fn emit(value: &Value) {
    println!("{}", value);
}

/// Wrap a command result as `{success: true, ...}`.
pub fn success(fields: Value) -> Value {
    let mut response = json!({ "success": true });
    if let (Some(response), Value::Object(fields)) = (response.as_object_mut(), fields) {
        response.extend(fields);
    }
    response
}

/// Navigator that prints each navigation, preceded by whatever was
/// published on the bus since the last one.
pub struct StdoutNavigator {
    receiver: Mutex<broadcast::Receiver<Notification>>,
}

impl StdoutNavigator {
    pub fn new(receiver: broadcast::Receiver<Notification>) -> Self {
        Self {
            receiver: Mutex::new(receiver),
        }
    }

    /// Print pending notifications. Returns how many were printed.
    pub fn flush_notifications(&self) -> viddy_core::Result<usize> {
        let mut receiver = self.receiver.lock().map_err(|_| ViddyError::Navigation {
            message: "notification receiver lock poisoned".to_string(),
        })?;

        let mut printed = 0;
        loop {
            match receiver.try_recv() {
                Ok(notification) => {
                    emit(&json!({ "notification": notification }));
                    printed += 1;
                }
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    debug!("Skipped {} notifications", skipped);
                }
                Err(_) => break,
            }
        }
        Ok(printed)
    }
}

impl Navigator for StdoutNavigator {
    fn navigate(&self, request: &NavigationRequest) -> viddy_core::Result<()> {
        self.flush_notifications()?;
        emit(&json!({ "navigate": request }));
        Ok(())
    }
}

/// Notification history for a host without a notification center.
pub struct LoggingHistory;

impl NotificationHistory for LoggingHistory {
    fn remove(&self, notification_id: &str) {
        info!("Dismissed notification {}", notification_id);
    }
}
