use std::fmt;

use serde::{Deserialize, Serialize};

/// Subscription event kinds from the realtime client API.
///
/// Over a stateless transport only [`EventType::Value`] can actually be
/// served; the child-level events exist so subscription-style call sites
/// keep compiling and are handled as documented no-ops.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Value,
    ChildAdded,
    ChildChanged,
    ChildRemoved,
    ChildMoved,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Value => "value",
            Self::ChildAdded => "child_added",
            Self::ChildChanged => "child_changed",
            Self::ChildRemoved => "child_removed",
            Self::ChildMoved => "child_moved",
        }
    }

    /// `true` for the child-level change events that require a persistent
    /// push channel to deliver.
    pub fn is_child_event(&self) -> bool {
        matches!(
            self,
            Self::ChildAdded | Self::ChildChanged | Self::ChildRemoved | Self::ChildMoved
        )
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names() {
        assert_eq!(EventType::Value.as_str(), "value");
        assert_eq!(EventType::ChildAdded.as_str(), "child_added");
        assert_eq!(EventType::ChildMoved.as_str(), "child_moved");
    }

    #[test]
    fn serde_round_trip() {
        let json = serde_json::to_string(&EventType::ChildRemoved).unwrap();
        assert_eq!(json, "\"child_removed\"");
        let back: EventType = serde_json::from_str(&json).unwrap();
        assert_eq!(back, EventType::ChildRemoved);
    }

    #[test]
    fn child_event_classification() {
        assert!(!EventType::Value.is_child_event());
        assert!(EventType::ChildAdded.is_child_event());
        assert!(EventType::ChildMoved.is_child_event());
    }
}
