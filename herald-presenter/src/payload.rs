//! Wire payloads accepted by the publishing API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use herald_core::{Locale, RedirectRoute, RouteType, UpdateType};

/// Application name sent as `publishing_app` on every payload.
pub const PUBLISHING_APP: &str = "whitehall";

/// A route claimed by a content item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub path: String,
    #[serde(rename = "type")]
    pub route_type: RouteType,
}

impl Route {
    pub fn exact(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            route_type: RouteType::Exact,
        }
    }
}

/// Content item payload, PUT at `base_path`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentPayload {
    pub base_path: String,
    pub format: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<Locale>,
    pub publishing_app: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rendering_app: Option<String>,
    pub update_type: UpdateType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub routes: Vec<Route>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub redirects: Vec<RedirectRoute>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub details: Map<String, Value>,
}

impl ContentPayload {
    /// A bare payload with no title, routes or details.
    pub fn new(base_path: impl Into<String>, format: impl Into<String>, update_type: UpdateType) -> Self {
        Self {
            base_path: base_path.into(),
            format: format.into(),
            title: None,
            description: None,
            locale: None,
            publishing_app: PUBLISHING_APP.to_string(),
            rendering_app: None,
            update_type,
            public_updated_at: None,
            routes: Vec::new(),
            redirects: Vec::new(),
            details: Map::new(),
        }
    }

    pub(crate) fn detail(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.details.insert(key.to_string(), value.into());
        self
    }
}

/// Publish intent, PUT at `/publish-intent{base_path}` ahead of a scheduled
/// publication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishIntent {
    pub base_path: String,
    pub publish_time: DateTime<Utc>,
    pub publishing_app: String,
    pub rendering_app: String,
    pub routes: Vec<Route>,
}
