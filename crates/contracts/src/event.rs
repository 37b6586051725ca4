//! EventRecord - Dispatcher input
//!
//! Payloads are opaque to the core: only the fields needed to route and
//! describe an event are typed, everything else travels as JSON.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Tracking event submitted by the host application.
///
/// Lifecycle notifications are kept out of this union on purpose. They carry
/// borrowed UI context, are never queued, and travel on their own path through
/// [`LifecycleKind`] / [`LifecycleContext`] (`DispatcherHandle::notify_lifecycle`).
/// Every variant here is owned and may sit in the pending queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventRecord {
    Identify(IdentifyPayload),
    Group(GroupPayload),
    Track(TrackPayload),
    Alias(AliasPayload),
    Screen(ScreenPayload),
}

impl EventRecord {
    /// Short kind name used in logs and metrics
    pub fn kind(&self) -> &'static str {
        match self {
            EventRecord::Identify(_) => "identify",
            EventRecord::Group(_) => "group",
            EventRecord::Track(_) => "track",
            EventRecord::Alias(_) => "alias",
            EventRecord::Screen(_) => "screen",
        }
    }

    /// Convenience constructor for a track event without properties.
    pub fn track(user_id: impl Into<String>, event: impl Into<String>) -> Self {
        EventRecord::Track(TrackPayload {
            user_id: user_id.into(),
            event: event.into(),
            properties: Map::new(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentifyPayload {
    pub user_id: String,
    #[serde(default)]
    pub traits: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupPayload {
    pub user_id: String,
    pub group_id: String,
    #[serde(default)]
    pub traits: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackPayload {
    pub user_id: String,
    pub event: String,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AliasPayload {
    pub previous_id: String,
    pub user_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenPayload {
    pub user_id: String,
    #[serde(default)]
    pub category: Option<String>,
    pub name: String,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

/// Host UI lifecycle notification kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleKind {
    Created,
    Started,
    Resumed,
    Paused,
    Stopped,
    SaveInstanceState,
    Destroyed,
}

impl LifecycleKind {
    /// Order in which a screen normally moves through its lifecycle.
    pub const SEQUENCE: [LifecycleKind; 7] = [
        LifecycleKind::Created,
        LifecycleKind::Started,
        LifecycleKind::Resumed,
        LifecycleKind::Paused,
        LifecycleKind::SaveInstanceState,
        LifecycleKind::Stopped,
        LifecycleKind::Destroyed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LifecycleKind::Created => "created",
            LifecycleKind::Started => "started",
            LifecycleKind::Resumed => "resumed",
            LifecycleKind::Paused => "paused",
            LifecycleKind::Stopped => "stopped",
            LifecycleKind::SaveInstanceState => "save_instance_state",
            LifecycleKind::Destroyed => "destroyed",
        }
    }
}

impl fmt::Display for LifecycleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transient host context passed along with a lifecycle notification.
///
/// Borrowed for the duration of one notification only, so it can never be
/// queued.
#[derive(Debug, Clone, Copy)]
pub struct LifecycleContext<'a> {
    /// Screen / activity the notification is about
    pub component: &'a str,
    /// Saved instance state, when the host provides one
    pub state: Option<&'a Map<String, Value>>,
}

impl<'a> LifecycleContext<'a> {
    pub fn new(component: &'a str) -> Self {
        Self {
            component,
            state: None,
        }
    }

    pub fn with_state(mut self, state: &'a Map<String, Value>) -> Self {
        self.state = Some(state);
        self
    }
}
