use thiserror::Error;

/// Why a `##send` directive could not be turned into an outbound message.
#[derive(Debug, Error)]
pub enum DirectiveError {
    /// Nothing followed the prefix where the channel name should be.
    #[error("directive is missing a channel name")]
    MissingChannel,

    /// The argument text is not valid JSON.
    #[error("directive arguments are not valid JSON: {0}")]
    InvalidPayload(#[from] serde_json::Error),

    /// The argument text is valid JSON but not an object.
    #[error("directive arguments must be a JSON object, got {0}")]
    NotAnObject(&'static str),
}

/// Failures reported by a messaging channel implementation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChannelError {
    /// The underlying session object is missing or refused to start.
    #[error("messaging channel unavailable: {0}")]
    Unavailable(String),

    /// The channel was used after `close()`.
    #[error("messaging channel is closed")]
    Closed,
}
