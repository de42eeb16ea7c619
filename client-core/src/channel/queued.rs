use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;

use super::MessagingChannel;
use crate::error::ChannelError;
use crate::models::OutboundMessage;

/// Instruction handed from the client core to the transport task.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelCommand {
    /// Open the session (forwarded once, however often `init` is called)
    Init,
    /// Deliver a message
    Send(OutboundMessage),
    /// Close the session
    Close,
}

/// Channel that queues commands on a tokio mpsc for a transport task to drain.
///
/// Clones share the same queue and lifecycle flags.
#[derive(Debug, Clone)]
pub struct QueuedChannel {
    tx: mpsc::UnboundedSender<ChannelCommand>,
    initialized: Arc<AtomicBool>,
    closed: Arc<AtomicBool>,
}

impl QueuedChannel {
    /// Create a channel and the receiver the transport drains.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<ChannelCommand>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let channel = Self {
            tx,
            initialized: Arc::new(AtomicBool::new(false)),
            closed: Arc::new(AtomicBool::new(false)),
        };
        (channel, rx)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn forward(&self, command: ChannelCommand) -> Result<(), ChannelError> {
        self.tx
            .send(command)
            .map_err(|_| ChannelError::Unavailable("transport receiver dropped".to_string()))
    }
}

impl MessagingChannel for QueuedChannel {
    fn init(&self) -> Result<(), ChannelError> {
        if self.is_closed() {
            return Err(ChannelError::Closed);
        }
        if self.initialized.swap(true, Ordering::SeqCst) {
            tracing::debug!("Channel already initialized");
            return Ok(());
        }
        tracing::info!("Initializing messaging channel");
        self.forward(ChannelCommand::Init).inspect_err(|_| {
            self.initialized.store(false, Ordering::SeqCst);
        })
    }

    fn send(&self, message: OutboundMessage) {
        if self.is_closed() {
            tracing::warn!("Dropping {} message: channel closed", message.channel);
            return;
        }
        let channel = message.channel.clone();
        if let Err(e) = self.forward(ChannelCommand::Send(message)) {
            tracing::error!("Failed to queue {} message: {}", channel, e);
        }
    }

    fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        tracing::info!("Closing messaging channel");
        if let Err(e) = self.forward(ChannelCommand::Close) {
            tracing::warn!("Failed to queue close: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(rx: &mut mpsc::UnboundedReceiver<ChannelCommand>) -> Vec<ChannelCommand> {
        let mut commands = Vec::new();
        while let Ok(command) = rx.try_recv() {
            commands.push(command);
        }
        commands
    }

    #[test]
    fn test_init_is_forwarded_once() {
        let (channel, mut rx) = QueuedChannel::new();

        channel.init().unwrap();
        channel.init().unwrap();
        channel.clone().init().unwrap();

        assert_eq!(drain(&mut rx), vec![ChannelCommand::Init]);
    }

    #[test]
    fn test_sends_keep_order() {
        let (channel, mut rx) = QueuedChannel::new();

        channel.send(OutboundMessage::text("look"));
        channel.send(OutboundMessage::text("north"));

        assert_eq!(
            drain(&mut rx),
            vec![
                ChannelCommand::Send(OutboundMessage::text("look")),
                ChannelCommand::Send(OutboundMessage::text("north")),
            ]
        );
    }

    #[test]
    fn test_close_once_then_drop_sends() {
        let (channel, mut rx) = QueuedChannel::new();

        channel.close();
        channel.close();
        channel.send(OutboundMessage::text("too late"));

        assert!(channel.is_closed());
        assert_eq!(drain(&mut rx), vec![ChannelCommand::Close]);
        assert_eq!(channel.init(), Err(ChannelError::Closed));
    }

    #[test]
    fn test_init_fails_without_transport() {
        let (channel, rx) = QueuedChannel::new();
        drop(rx);

        assert!(matches!(channel.init(), Err(ChannelError::Unavailable(_))));
        // Send must not panic when nobody is listening
        channel.send(OutboundMessage::text("look"));
    }
}
