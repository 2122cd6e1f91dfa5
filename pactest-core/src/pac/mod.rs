use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod store;

pub use store::{DEFAULT_CAPACITY, PacStore};

/// Content type engines and browsers expect for a PAC script.
pub const PAC_MIME_TYPE: &str = "application/x-ns-proxy-autoconfig";

/// Opaque identifier assigned to a PAC when it is submitted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PacUid(String);

impl PacUid {
    /// Generate a fresh, random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PacUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for PacUid {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for PacUid {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A PAC script as held in memory by the server.
///
/// Records are immutable once stored; submitting new content always produces
/// a new record with its own uid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pac {
    pub uid: PacUid,
    pub added_time: DateTime<Utc>,
    pub content: String,
}

impl Pac {
    /// Create a record for freshly submitted content.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            uid: PacUid::generate(),
            added_time: Utc::now(),
            content: content.into(),
        }
    }

    /// Projection used when listing stored PACs.
    pub fn short(&self) -> ShortPac {
        ShortPac {
            uid: self.uid.clone(),
            added_time: self.added_time,
        }
    }
}

/// A PAC without its content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortPac {
    pub uid: PacUid,
    pub added_time: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_pacs_get_distinct_uids() {
        let first = Pac::new("function FindProxyForURL(u, h) { return 'DIRECT'; }");
        let second = Pac::new(first.content.clone());

        assert_ne!(first.uid, second.uid);
        assert_eq!(first.content, second.content);
    }

    #[test]
    fn short_projection_drops_content() {
        let pac = Pac::new("function FindProxyForURL(u, h) { return 'DIRECT'; }");
        let short = pac.short();

        assert_eq!(short.uid, pac.uid);
        assert_eq!(short.added_time, pac.added_time);

        let json = serde_json::to_value(&short).unwrap();
        assert!(json.get("content").is_none());
        assert_eq!(json["uid"], pac.uid.as_str());
    }
}
