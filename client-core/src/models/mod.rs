pub mod display;
pub mod message;

pub use display::{DisplayBlock, LogEntry};
pub use message::{InboundEvent, OutboundMessage, TEXT_CHANNEL};
