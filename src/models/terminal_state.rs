use lantern_core::input::ViewportLayout;
use lantern_core::models::{DisplayBlock, LogEntry};
use lantern_core::state::Scrollback;
use lantern_core::DisplaySurface;
use leptos::prelude::*;

/// Reactive view of the message log and prompt.
///
/// The session renders into this surface; components read it through
/// `use_context()`. The log itself lives in a [`Scrollback`], and `revision`
/// is bumped on every append so readers re-run.
#[derive(Clone, Copy)]
pub struct TerminalState {
    log: StoredValue<Scrollback>,
    revision: RwSignal<u64>,
    /// Current prompt markup from the server
    pub prompt: RwSignal<String>,
    /// Space below the message window reserved for the input form, in px
    pub message_bottom: RwSignal<u32>,
    /// Bumped whenever the message window should jump to its newest block
    pub scroll_requests: RwSignal<u64>,
}

impl TerminalState {
    pub fn new(scrollback_capacity: usize) -> Self {
        Self {
            log: StoredValue::new(Scrollback::new(scrollback_capacity)),
            revision: RwSignal::new(0),
            prompt: RwSignal::new(String::new()),
            message_bottom: RwSignal::new(0),
            scroll_requests: RwSignal::new(0),
        }
    }

    /// Snapshot of the log; tracks appends when read inside a reactive scope.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.revision.track();
        self.log.with_value(Scrollback::entries)
    }

    /// Reserve `input_height` px for the input form and follow the newest block.
    pub fn relayout(&self, input_height: u32) {
        let layout = ViewportLayout::for_input_height(input_height);
        self.message_bottom.set(layout.message_bottom);
        if layout.scroll_to_newest {
            self.request_scroll();
        }
    }

    fn request_scroll(&self) {
        self.scroll_requests.update(|n| *n = n.wrapping_add(1));
    }
}

impl DisplaySurface for TerminalState {
    fn append(&mut self, block: DisplayBlock) {
        self.log.with_value(|log| log.push(block));
        self.revision.update(|n| *n = n.wrapping_add(1));
    }

    fn set_prompt(&mut self, prompt: String) {
        self.log.update_value(|log| log.set_prompt(prompt.clone()));
        self.prompt.set(prompt);
    }

    fn scroll_to_newest(&mut self) {
        self.log.update_value(DisplaySurface::scroll_to_newest);
        self.request_scroll();
    }
}

impl Default for TerminalState {
    fn default() -> Self {
        Self::new(Scrollback::DEFAULT_CAPACITY)
    }
}
