//! Activation resolution: deep links and tile arguments in, a destination
//! and an optional notification out.

mod link;
mod resolver;

pub use link::{DeepLink, NOTIFICATION_ID_KEY, NSFW_KEY, QUERY_KEY};
pub use resolver::{is_from_secondary_tile, ActivationOutcome, ActivationResolver, Destination};
