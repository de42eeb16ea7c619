use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One rendered block in the message log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "data")]
pub enum DisplayBlock {
    /// Text output from the server
    Message { text: String },
    /// Inbound event on a channel nobody handles; containers kept verbatim
    Unhandled {
        channel: String,
        args: Vec<Value>,
        kwargs: Map<String, Value>,
    },
    /// Local diagnostic (malformed directive, channel failure)
    Error { message: String },
    /// Client notice (e.g. "Scrollback truncated...")
    Notice { message: String },
}

impl DisplayBlock {
    /// Text content of this block as it should appear in the log.
    pub fn text(&self) -> String {
        match self {
            Self::Message { text } => text.clone(),
            Self::Unhandled {
                channel,
                args,
                kwargs,
            } => format!(
                "Error or Unhandled event:\n{channel}, {}, {}",
                Value::Array(args.clone()),
                Value::Object(kwargs.clone())
            ),
            Self::Error { message } | Self::Notice { message } => message.clone(),
        }
    }

    /// CSS class for styling this block type
    pub const fn css_class(&self) -> &'static str {
        match self {
            Self::Message { .. } => "msg out",
            Self::Unhandled { .. } | Self::Error { .. } => "msg err",
            Self::Notice { .. } => "msg notice",
        }
    }

    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Unhandled { .. } | Self::Error { .. })
    }
}

/// A block as stored in a log, with a stable key for keyed rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub id: u64,
    pub block: DisplayBlock,
}
