use serde::{Deserialize, Serialize};

pub const INTERACTION_TYPE_PING: i64 = 1;
pub const INTERACTION_TYPE_APPLICATION_COMMAND: i64 = 2;

pub const CALLBACK_TYPE_PONG: i64 = 1;
pub const CALLBACK_TYPE_CHANNEL_MESSAGE_WITH_SOURCE: i64 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionType {
    Ping,
    ApplicationCommand,
}

impl InteractionType {
    pub fn from_raw(value: i64) -> Option<Self> {
        match value {
            INTERACTION_TYPE_PING => Some(InteractionType::Ping),
            INTERACTION_TYPE_APPLICATION_COMMAND => Some(InteractionType::ApplicationCommand),
            _ => None,
        }
    }
}

/// Inbound interaction payload. Only the fields the router reads are modelled;
/// everything else the platform sends is ignored.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InteractionRequest {
    pub r#type: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<CommandData>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CommandData {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<CommandOption>>,
}

impl CommandData {
    pub fn options(&self) -> &[CommandOption] {
        self.options.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CommandOption {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<OptionValue>,
}

impl CommandOption {
    #[cfg(test)]
    pub fn new(name: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        CommandOption {
            name: name.into(),
            value: Some(value.into()),
        }
    }

    pub fn integer(&self) -> Option<i64> {
        self.value.as_ref().and_then(OptionValue::as_integer)
    }

    pub fn text(&self) -> Option<&str> {
        match self.value {
            Some(OptionValue::Text(ref s)) => Some(s.as_str()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum OptionValue {
    Integer(i64),
    Number(f64),
    Boolean(bool),
    Text(String),
}

impl OptionValue {
    /// Integer view of the value. Strings holding a bare integer are accepted.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            OptionValue::Integer(i) => Some(*i),
            OptionValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl From<i64> for OptionValue {
    fn from(value: i64) -> Self {
        OptionValue::Integer(value)
    }
}

impl From<i32> for OptionValue {
    fn from(value: i32) -> Self {
        OptionValue::Integer(value.into())
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        OptionValue::Text(value.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        OptionValue::Text(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct InteractionResponse {
    pub r#type: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<InteractionCallbackData>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct InteractionCallbackData {
    pub content: String,
}

impl InteractionResponse {
    pub fn pong() -> Self {
        InteractionResponse {
            r#type: CALLBACK_TYPE_PONG,
            data: None,
        }
    }

    pub fn channel_message(content: impl Into<String>) -> Self {
        InteractionResponse {
            r#type: CALLBACK_TYPE_CHANNEL_MESSAGE_WITH_SOURCE,
            data: Some(InteractionCallbackData {
                content: content.into(),
            }),
        }
    }

    #[cfg(test)]
    pub fn content(&self) -> Option<&str> {
        self.data.as_ref().map(|d| d.content.as_str())
    }
}
