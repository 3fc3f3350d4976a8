//! Protocol payload types for the plugin methods

use serde::{Deserialize, Serialize};

// ============================================================================
// Metadata
// ============================================================================

/// Plugin metadata response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginMetadata {
    pub name: String,
    pub description: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default)]
    pub commands: Vec<CommandInfo>,
}

/// Command information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandInfo {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub aliases: Vec<String>,
}

// ============================================================================
// Matches
// ============================================================================

/// Parameters for the matches method
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchesParams {
    #[serde(default)]
    pub text: String,
    #[serde(default = "default_message_type")]
    pub message_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<i64>,
}

/// Result for the matches method
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchesResult {
    pub matches: bool,
}

// ============================================================================
// Handle
// ============================================================================

/// Parameters for the handle method
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandleParams {
    #[serde(default = "default_message_type")]
    pub message_type: String,
    #[serde(default)]
    pub user_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<i64>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub raw_message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub self_id: Option<i64>,
}

fn default_message_type() -> String {
    "private".to_string()
}

/// Result for the handle method
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandleResult {
    /// Whether the event was handled
    pub handled: bool,
    /// Whether to block subsequent handlers
    #[serde(default)]
    pub block: bool,
    /// Optional text reply
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply: Option<String>,
    /// Optional structured actions
    #[serde(default)]
    pub actions: Vec<Action>,
}

impl HandleResult {
    /// No action taken
    pub fn ignored() -> Self {
        Self {
            handled: false,
            block: false,
            reply: None,
            actions: Vec::new(),
        }
    }

    /// Handled with a text reply
    pub fn reply(text: impl Into<String>) -> Self {
        Self {
            handled: true,
            block: true,
            reply: Some(text.into()),
            actions: Vec::new(),
        }
    }

    /// Handled without response
    pub fn handled() -> Self {
        Self {
            handled: true,
            block: true,
            reply: None,
            actions: Vec::new(),
        }
    }
}

/// Actions that can be requested by plugins
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Action {
    /// Send a text reply
    #[serde(rename = "reply")]
    Reply { text: String },
    /// Send an image
    #[serde(rename = "image")]
    Image { url: String },
    /// Send to a specific target
    #[serde(rename = "send")]
    Send {
        target_type: String,
        target_id: i64,
        message: String,
    },
}

// ============================================================================
// Lifecycle
// ============================================================================

/// Lifecycle event parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LifecycleParams {
    #[serde(default)]
    pub event: LifecycleEvent,
}

/// Lifecycle event types
///
/// On the wire the event is either a bare string tag (`"startup"`) or a
/// single-key mapping (`{"bot_connect": {"self_id": 123}}`). Both forms fold
/// into this one enum; unrecognized tags are preserved for diagnostics
/// instead of being rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "EventWire", into = "EventWire")]
pub enum LifecycleEvent {
    Startup,
    Shutdown,
    BotConnect { self_id: i64 },
    Unknown(String),
}

impl Default for LifecycleEvent {
    fn default() -> Self {
        Self::Unknown("unknown".to_string())
    }
}

/// The two accepted wire shapes of a lifecycle event
#[derive(Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum EventWire {
    Tag(String),
    Map(serde_json::Map<String, serde_json::Value>),
}

impl From<EventWire> for LifecycleEvent {
    fn from(wire: EventWire) -> Self {
        let (tag, payload) = match wire {
            EventWire::Tag(tag) => (tag, serde_json::Value::Null),
            EventWire::Map(map) => match map.into_iter().next() {
                Some((tag, payload)) => (tag, payload),
                None => return Self::default(),
            },
        };

        match tag.as_str() {
            "startup" => Self::Startup,
            "shutdown" => Self::Shutdown,
            "bot_connect" => {
                let self_id = payload
                    .get("self_id")
                    .and_then(serde_json::Value::as_i64)
                    .unwrap_or(0);
                Self::BotConnect { self_id }
            }
            _ => Self::Unknown(tag),
        }
    }
}

impl From<LifecycleEvent> for EventWire {
    fn from(event: LifecycleEvent) -> Self {
        match event {
            LifecycleEvent::Startup => Self::Tag("startup".to_string()),
            LifecycleEvent::Shutdown => Self::Tag("shutdown".to_string()),
            LifecycleEvent::BotConnect { self_id } => {
                let mut payload = serde_json::Map::new();
                payload.insert("self_id".to_string(), self_id.into());
                let mut map = serde_json::Map::new();
                map.insert("bot_connect".to_string(), payload.into());
                Self::Map(map)
            }
            LifecycleEvent::Unknown(tag) => Self::Tag(tag),
        }
    }
}

/// Lifecycle result (acknowledgment)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LifecycleResult {
    pub ok: bool,
}

// ============================================================================
// Helpers
// ============================================================================

impl PluginMetadata {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            version: "0.1.0".to_string(),
            author: None,
            commands: Vec::new(),
        }
    }

    pub fn description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    pub fn version(mut self, ver: impl Into<String>) -> Self {
        self.version = ver.into();
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn command(mut self, command: CommandInfo) -> Self {
        self.commands.push(command);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lifecycle_bare_string_form() {
        let event: LifecycleEvent = serde_json::from_value(json!("startup")).unwrap();
        assert_eq!(event, LifecycleEvent::Startup);
    }

    #[test]
    fn test_lifecycle_map_form() {
        let event: LifecycleEvent = serde_json::from_value(json!({"startup": null})).unwrap();
        assert_eq!(event, LifecycleEvent::Startup);

        let event: LifecycleEvent =
            serde_json::from_value(json!({"bot_connect": {"self_id": 42}})).unwrap();
        assert_eq!(event, LifecycleEvent::BotConnect { self_id: 42 });
    }

    #[test]
    fn test_lifecycle_unknown_tag_preserved() {
        let event: LifecycleEvent = serde_json::from_value(json!("reload")).unwrap();
        assert_eq!(event, LifecycleEvent::Unknown("reload".to_string()));

        let event: LifecycleEvent = serde_json::from_value(json!({"reload": {}})).unwrap();
        assert_eq!(event, LifecycleEvent::Unknown("reload".to_string()));
    }

    #[test]
    fn test_lifecycle_serialized_forms() {
        assert_eq!(
            serde_json::to_value(LifecycleEvent::Shutdown).unwrap(),
            json!("shutdown")
        );
        assert_eq!(
            serde_json::to_value(LifecycleEvent::BotConnect { self_id: 7 }).unwrap(),
            json!({"bot_connect": {"self_id": 7}})
        );
    }

    #[test]
    fn test_handle_params_defaults() {
        let params: HandleParams = serde_json::from_value(json!({"text": "/ping"})).unwrap();
        assert_eq!(params.text, "/ping");
        assert_eq!(params.user_id, 0);
        assert_eq!(params.message_type, "private");
    }

    #[test]
    fn test_handle_result_reply() {
        let result = HandleResult::reply("hi");
        assert!(result.handled);
        assert!(result.block);
        assert_eq!(result.reply.as_deref(), Some("hi"));
        assert!(result.actions.is_empty());
    }
}
