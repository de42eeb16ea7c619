use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Channel used for ordinary typed lines and for server text output.
pub const TEXT_CHANNEL: &str = "text";

/// Message sent to the remote session (client → server).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboundMessage {
    /// Command name the server dispatches on
    pub channel: String,
    /// Positional arguments
    pub args: Vec<Value>,
    /// Named arguments
    pub kwargs: Map<String, Value>,
}

impl OutboundMessage {
    /// A plain line of text typed by the user.
    pub fn text(line: impl Into<String>) -> Self {
        Self {
            channel: TEXT_CHANNEL.to_string(),
            args: vec![Value::String(line.into())],
            kwargs: Map::new(),
        }
    }

    /// An out-of-band command carrying only named arguments.
    pub fn directive(channel: impl Into<String>, kwargs: Map<String, Value>) -> Self {
        Self {
            channel: channel.into(),
            args: Vec::new(),
            kwargs,
        }
    }
}

/// Message received from the remote session (server → client).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InboundEvent {
    pub channel: String,
    #[serde(default)]
    pub args: Vec<Value>,
    #[serde(default)]
    pub kwargs: Map<String, Value>,
}

impl InboundEvent {
    pub fn new(channel: impl Into<String>, args: Vec<Value>, kwargs: Map<String, Value>) -> Self {
        Self {
            channel: channel.into(),
            args,
            kwargs,
        }
    }

    /// First positional argument as display text.
    ///
    /// Strings are returned as-is, other JSON values as their JSON text, and a
    /// missing argument as an empty string.
    pub fn first_arg_text(&self) -> String {
        match self.args.first() {
            Some(Value::String(text)) => text.clone(),
            Some(other) => other.to_string(),
            None => String::new(),
        }
    }
}
