//! Launch handling: the startup latch, lifecycle events and navigation.

mod navigation;
mod orchestrator;
mod startup;

pub use navigation::{NavigationRequest, Navigator};
pub use orchestrator::{LaunchOrchestrator, LaunchState, LifecycleEvent};
pub use startup::{LaunchCounter, PinnedItemSweep, StartupTask};
