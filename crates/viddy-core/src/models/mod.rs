//! Domain models shared across pinning and activation.

mod entity;
mod media;

pub use entity::EntityKind;
pub use media::{Channel, SharedFile, User, Video};
