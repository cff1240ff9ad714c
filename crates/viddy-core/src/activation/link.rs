//! Host-routed deep links: `scheme://{host}?{query}`.

use crate::error::{Result, ViddyError};
use crate::tiles::TILE_ID_KEY;
use tracing::warn;
use url::Url;

/// Free-text query of a search link.
pub const QUERY_KEY: &str = "query";

/// Whether a search link includes NSFW results.
pub const NSFW_KEY: &str = "nsfw";

/// Delivered notification to clear when a link is opened from it.
pub const NOTIFICATION_ID_KEY: &str = "notificationId";

/// A recognized deep link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeepLink {
    Record,
    Search { query: String, include_nsfw: bool },
    User { id: String },
    Channel { id: String },
    Video { id: String },
}

impl DeepLink {
    pub const HOSTS: [&'static str; 5] = ["record", "search", "user", "channel", "video"];

    pub fn host(&self) -> &'static str {
        match self {
            DeepLink::Record => "record",
            DeepLink::Search { .. } => "search",
            DeepLink::User { .. } => "user",
            DeepLink::Channel { .. } => "channel",
            DeepLink::Video { .. } => "video",
        }
    }

    /// Render as a URI under `scheme`.
    pub fn to_uri(&self, scheme: &str) -> String {
        let base = format!("{}://{}", scheme, self.host());
        match self {
            DeepLink::Record => base,
            DeepLink::Search {
                query,
                include_nsfw,
            } => format!(
                "{}?{}={}&{}={}",
                base,
                QUERY_KEY,
                urlencoding::encode(query),
                NSFW_KEY,
                include_nsfw
            ),
            DeepLink::User { id } | DeepLink::Channel { id } | DeepLink::Video { id } => {
                format!("{}?{}={}", base, TILE_ID_KEY, urlencoding::encode(id))
            }
        }
    }

    /// Parse a host-routed URL.
    ///
    /// Unrecognized hosts yield `Ok(None)`. Entity links without an `id`
    /// are malformed.
    pub fn from_url(url: &Url) -> Result<Option<Self>> {
        let host = url.host_str().unwrap_or_default().to_ascii_lowercase();
        let link = match host.as_str() {
            "record" => DeepLink::Record,
            "search" => DeepLink::Search {
                query: query_value(url, QUERY_KEY).unwrap_or_default(),
                include_nsfw: query_value(url, NSFW_KEY)
                    .map(|v| parse_flag(&v))
                    .unwrap_or(false),
            },
            "user" => DeepLink::User {
                id: required_id(url)?,
            },
            "channel" => DeepLink::Channel {
                id: required_id(url)?,
            },
            "video" => DeepLink::Video {
                id: required_id(url)?,
            },
            _ => return Ok(None),
        };
        Ok(Some(link))
    }
}

/// First value of a query parameter, percent-decoded.
pub(crate) fn query_value(url: &Url, key: &str) -> Option<String> {
    url.query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

fn required_id(url: &Url) -> Result<String> {
    query_value(url, TILE_ID_KEY)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ViddyError::MalformedActivation {
            message: format!("{} is missing the {} parameter", url, TILE_ID_KEY),
        })
}

fn parse_flag(value: &str) -> bool {
    if value.eq_ignore_ascii_case("true") {
        true
    } else if value.eq_ignore_ascii_case("false") {
        false
    } else {
        warn!("Ignoring unparsable {} value {:?}", NSFW_KEY, value);
        false
    }
}
