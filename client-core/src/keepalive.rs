//! Idle keep-alive.
//!
//! Proxies between the client and the server drop connections that stay
//! quiet too long, so the client periodically sends the text `idle`. The
//! message skips the input history.

#[cfg(feature = "native")]
use std::time::Duration;

use crate::channel::MessagingChannel;
use crate::models::OutboundMessage;

/// Text sent on each keep-alive tick.
pub const IDLE_TEXT: &str = "idle";

pub fn keepalive_message() -> OutboundMessage {
    OutboundMessage::text(IDLE_TEXT)
}

/// Send one keep-alive message on `channel`.
pub fn send_keepalive<C: MessagingChannel + ?Sized>(channel: &C) {
    tracing::debug!("Sending idle keep-alive");
    channel.send(keepalive_message());
}

/// Send a keep-alive every `interval` until the returned task is aborted.
/// The first message goes out one full interval after spawning. Hosts pass
/// [`ClientConfig::keepalive_interval`](crate::ClientConfig::keepalive_interval).
#[cfg(feature = "native")]
pub fn spawn_keepalive<C>(channel: C, interval: Duration) -> tokio::task::JoinHandle<()>
where
    C: MessagingChannel + Send + 'static,
{
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            send_keepalive(&channel);
        }
    })
}
