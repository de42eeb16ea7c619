//! Inbound message routing and rendering.
//!
//! Every inbound event is routed by channel name to exactly one handler. A
//! channel without a handler goes to the default handler, which renders a
//! diagnostic block so protocol drift between client and server stays visible.

use std::collections::HashMap;

use crate::models::{DisplayBlock, InboundEvent, TEXT_CHANNEL};

/// Channel carrying the server prompt.
pub const PROMPT_CHANNEL: &str = "prompt";
/// Channels that are acknowledged but intentionally not rendered.
pub const SILENCED_CHANNELS: [&str; 2] = ["connection_open", "connection_close"];

/// Where inbound messages end up: a message log plus a single prompt slot.
pub trait DisplaySurface {
    /// Append a block at the end of the log.
    fn append(&mut self, block: DisplayBlock);

    /// Replace the prompt content. At most one prompt is ever visible.
    fn set_prompt(&mut self, prompt: String);

    /// Keep the log view on its newest block.
    fn scroll_to_newest(&mut self);
}

/// Handler for a registered channel.
pub type Handler<D> = fn(&mut D, &InboundEvent);

/// Dispatch table from channel name to handler, with a default route.
pub struct ChannelRouter<D> {
    routes: HashMap<String, Handler<D>>,
    default: Handler<D>,
}

impl<D: DisplaySurface> ChannelRouter<D> {
    /// Empty table; everything goes to [`render_unhandled`].
    pub fn new() -> Self {
        Self {
            routes: HashMap::new(),
            default: render_unhandled::<D>,
        }
    }

    /// Table with the standard client handlers registered.
    pub fn standard() -> Self {
        let mut router = Self::new();
        router.register_standard();
        router
    }

    /// Register the standard handlers: `text`, `prompt` and the silenced
    /// connection channels. Safe to call repeatedly.
    pub fn register_standard(&mut self) {
        self.register(TEXT_CHANNEL, render_text::<D>);
        self.register(PROMPT_CHANNEL, render_prompt::<D>);
        for channel in SILENCED_CHANNELS {
            self.register(channel, silence::<D>);
        }
    }

    /// Register `handler` for `channel`, replacing any previous handler.
    /// Returns true if a handler was replaced.
    pub fn register(&mut self, channel: impl Into<String>, handler: Handler<D>) -> bool {
        self.routes.insert(channel.into(), handler).is_some()
    }

    /// Remove the handler for `channel`; its events then go to the default.
    pub fn unregister(&mut self, channel: &str) -> bool {
        self.routes.remove(channel).is_some()
    }

    /// Deliver one event to its handler. Returns false if the default
    /// handler took it.
    pub fn route(&self, display: &mut D, event: &InboundEvent) -> bool {
        match self.routes.get(event.channel.as_str()) {
            Some(handler) => {
                handler(display, event);
                true
            }
            None => {
                (self.default)(display, event);
                false
            }
        }
    }

    pub fn is_registered(&self, channel: &str) -> bool {
        self.routes.contains_key(channel)
    }

    /// Registered channel names, sorted.
    pub fn channels(&self) -> Vec<&str> {
        let mut channels: Vec<&str> = self.routes.keys().map(String::as_str).collect();
        channels.sort_unstable();
        channels
    }
}

impl<D: DisplaySurface> Default for ChannelRouter<D> {
    fn default() -> Self {
        Self::new()
    }
}

/// `text`: append the first argument as a message block.
pub fn render_text<D: DisplaySurface>(display: &mut D, event: &InboundEvent) {
    let text = event.first_arg_text();
    tracing::trace!("text: {}", plain_text(&text));
    display.append(DisplayBlock::Message { text });
    display.scroll_to_newest();
}

/// `prompt`: replace the prompt slot with the first argument.
pub fn render_prompt<D: DisplaySurface>(display: &mut D, event: &InboundEvent) {
    display.set_prompt(event.first_arg_text());
}

/// Acknowledged channel with nothing to render.
pub fn silence<D: DisplaySurface>(_display: &mut D, event: &InboundEvent) {
    tracing::debug!("Ignoring {} event", event.channel);
}

/// Default route: dump the channel name and both argument containers.
pub fn render_unhandled<D: DisplaySurface>(display: &mut D, event: &InboundEvent) {
    tracing::warn!("Unhandled inbound channel: {}", event.channel);
    display.append(DisplayBlock::Unhandled {
        channel: event.channel.clone(),
        args: event.args.clone(),
        kwargs: event.kwargs.clone(),
    });
    display.scroll_to_newest();
}

/// Server text with ANSI escape sequences removed, for log output.
pub fn plain_text(text: &str) -> String {
    strip_ansi_escapes::strip(text.as_bytes()).map_or_else(
        |_| text.to_string(),
        |bytes| String::from_utf8_lossy(&bytes).into_owned(),
    )
}
