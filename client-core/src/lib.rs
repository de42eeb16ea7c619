//! Client-side core of the Lantern webclient.
//!
//! Keeps the input history, turns key presses into outbound messages, and
//! routes inbound server messages onto a display surface. The transport and
//! the page itself sit behind [`channel::MessagingChannel`] and
//! [`render::DisplaySurface`].

pub mod channel;
pub mod config;
pub mod error;
pub mod input;
pub mod keepalive;
#[cfg(feature = "native")]
pub mod logging;
pub mod models;
pub mod render;
pub mod session;
pub mod state;

pub use channel::MessagingChannel;
pub use config::{AutosizeConfig, ClientConfig};
pub use error::{ChannelError, DirectiveError};
pub use render::DisplaySurface;
pub use session::ClientSession;
