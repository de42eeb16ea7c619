//! Contract with the messaging channel that carries traffic to the server.
//!
//! The channel owns the transport (connect, reconnect, framing). The client
//! core only hands it messages and never waits for a reply.

#[cfg(feature = "native")]
pub mod queued;

use std::rc::Rc;
use std::sync::Arc;

use crate::error::ChannelError;
use crate::models::OutboundMessage;

#[cfg(feature = "native")]
pub use queued::{ChannelCommand, QueuedChannel};

/// Outbound half of a session's messaging channel.
pub trait MessagingChannel {
    /// Start the underlying session. Must be safe to call more than once.
    fn init(&self) -> Result<(), ChannelError>;

    /// Hand a message to the transport. Fire-and-forget: delivery failures
    /// are the channel's to report.
    fn send(&self, message: OutboundMessage);

    /// Shut the session down; called once when the host is unloading.
    fn close(&self);
}

impl<C: MessagingChannel + ?Sized> MessagingChannel for Rc<C> {
    fn init(&self) -> Result<(), ChannelError> {
        (**self).init()
    }

    fn send(&self, message: OutboundMessage) {
        (**self).send(message);
    }

    fn close(&self) {
        (**self).close();
    }
}

impl<C: MessagingChannel + ?Sized> MessagingChannel for Arc<C> {
    fn init(&self) -> Result<(), ChannelError> {
        (**self).init()
    }

    fn send(&self, message: OutboundMessage) {
        (**self).send(message);
    }

    fn close(&self) {
        (**self).close();
    }
}
