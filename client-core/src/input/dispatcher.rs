//! Keystroke handling for the input field.
//!
//! Key handling is split into two phases. [`InputDispatcher::handle_key`] sees
//! the raw key before the field changes and decides between submit, history
//! navigation and pass-through. Once a pass-through key has been applied the
//! host reports it with [`InputDispatcher::key_released`], and edits made
//! without a key (paste, cut) with [`InputDispatcher::settle`], so the scratch
//! slot always holds what is on screen.

use super::directive::parse_directive;
use crate::channel::MessagingChannel;
use crate::error::DirectiveError;
use crate::models::OutboundMessage;
use crate::state::InputHistory;

/// Keys the dispatcher distinguishes. Everything else is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    /// Enter/Return without modifiers
    Enter,
    /// Enter with Shift, Ctrl, Alt or Meta held
    ModifiedEnter,
    /// Up arrow
    Up,
    /// Down arrow
    Down,
    /// Any other key
    Other,
}

/// What a key press did.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyOutcome {
    /// A text line was sent and the field cleared
    Submitted,
    /// A `##send` directive was sent; the field is left as typed
    DirectiveSent,
    /// A malformed directive was rejected; field and history untouched
    Rejected,
    /// The field now shows a history entry
    Navigated,
    /// Not handled here; call `key_released` once the key has been applied
    Passthrough,
}

impl KeyOutcome {
    /// Whether the host should suppress the platform's default key action.
    pub const fn suppress_default(&self) -> bool {
        !matches!(self, Self::Passthrough)
    }
}

/// Text content of the input field plus the caret position (in chars).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputField {
    value: String,
    caret: usize,
}

impl InputField {
    /// Field with the caret at the end of `value`.
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        let caret = value.chars().count();
        Self { value, caret }
    }

    /// Field with the caret at `caret` chars, clamped to the content.
    pub fn with_caret(value: impl Into<String>, caret: usize) -> Self {
        let value = value.into();
        let caret = caret.min(value.chars().count());
        Self { value, caret }
    }

    /// Field with a caret given as a UTF-16 offset, as browsers report it.
    pub fn from_utf16_caret(value: impl Into<String>, utf16_offset: usize) -> Self {
        let value = value.into();
        let mut units = 0;
        let mut caret = 0;
        for ch in value.chars() {
            if units >= utf16_offset {
                break;
            }
            units += ch.len_utf16();
            caret += 1;
        }
        Self { value, caret }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub const fn caret(&self) -> usize {
        self.caret
    }

    pub fn caret_at_end(&self) -> bool {
        self.caret >= self.value.chars().count()
    }

    /// Replace the content and put the caret at its end.
    pub fn set(&mut self, value: &str) {
        value.clone_into(&mut self.value);
        self.caret = self.value.chars().count();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.caret = 0;
    }
}

/// Turns key presses into history moves and outbound messages.
#[derive(Debug, Clone, Default)]
pub struct InputDispatcher {
    history: InputHistory,
    /// The last key passed through and its edit is not recorded yet
    awaiting_release: bool,
}

impl InputDispatcher {
    pub const fn new(history: InputHistory) -> Self {
        Self {
            history,
            awaiting_release: false,
        }
    }

    pub const fn history(&self) -> &InputHistory {
        &self.history
    }

    /// Raw key phase. Navigation only happens with the caret at the end of
    /// the field, so arrow keys still move the caret inside multi-line input.
    pub fn handle_key<C: MessagingChannel>(
        &mut self,
        key: KeyInput,
        field: &mut InputField,
        channel: &C,
    ) -> Result<KeyOutcome, DirectiveError> {
        self.awaiting_release = false;
        let outcome = match key {
            KeyInput::Enter => self.submit(field, channel)?,
            KeyInput::Up if field.caret_at_end() => {
                field.set(self.history.back());
                KeyOutcome::Navigated
            }
            KeyInput::Down if field.caret_at_end() => {
                field.set(self.history.forward());
                KeyOutcome::Navigated
            }
            _ => KeyOutcome::Passthrough,
        };
        self.awaiting_release = outcome == KeyOutcome::Passthrough;
        Ok(outcome)
    }

    /// Send the field content, either as a directive or as a text line.
    pub fn submit<C: MessagingChannel>(
        &mut self,
        field: &mut InputField,
        channel: &C,
    ) -> Result<KeyOutcome, DirectiveError> {
        if let Some(parsed) = parse_directive(field.value()) {
            let message = parsed.inspect_err(|e| tracing::warn!("Rejected directive: {}", e))?;
            tracing::debug!("Sending directive on channel {}", message.channel);
            channel.send(message);
            return Ok(KeyOutcome::DirectiveSent);
        }

        let line = std::mem::take(&mut field.value);
        field.clear();
        self.history.add(&line);
        // The field is empty now; drop any stale draft left by a rejected add.
        self.settle("");
        tracing::debug!("Sending text line ({} chars)", line.chars().count());
        channel.send(OutboundMessage::text(line));
        Ok(KeyOutcome::Submitted)
    }

    /// Key-up after [`Self::handle_key`]. Settles on `value` only if that key
    /// passed through, so the cursor stays put after history navigation.
    /// Returns whether the field was recorded.
    pub fn key_released(&mut self, value: &str) -> bool {
        if !std::mem::take(&mut self.awaiting_release) {
            return false;
        }
        self.settle(value);
        true
    }

    /// Post-edit phase: remember what the field holds now and re-anchor the
    /// history cursor on the scratch slot.
    pub fn settle(&mut self, value: &str) {
        self.history.scratch(value);
        self.history.end();
    }
}
