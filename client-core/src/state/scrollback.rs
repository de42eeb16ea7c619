use std::collections::VecDeque;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::models::{DisplayBlock, LogEntry};
use crate::render::DisplaySurface;

#[derive(Debug)]
struct Inner {
    entries: VecDeque<LogEntry>,
    next_id: u64,
    truncation_notice_shown: bool,
    prompt: Option<String>,
    /// Blocks scrolled up from the newest one; 0 = pinned to the bottom
    scroll_offset: usize,
}

/// Bounded message log plus the single prompt slot.
///
/// Clones share the same log, so a renderer on another thread can read
/// snapshots while the session appends.
pub struct Scrollback {
    inner: Arc<RwLock<Inner>>,
    max_capacity: usize,
}

impl Scrollback {
    /// Default capacity for the message log
    pub const DEFAULT_CAPACITY: usize = 10_000;

    /// Create a log with the specified capacity (at least 2: the truncation
    /// notice and one block).
    pub fn new(max_capacity: usize) -> Self {
        let max_capacity = max_capacity.max(2);
        Self {
            inner: Arc::new(RwLock::new(Inner {
                entries: VecDeque::with_capacity(max_capacity.min(1024)),
                next_id: 0,
                truncation_notice_shown: false,
                prompt: None,
                scroll_offset: 0,
            })),
            max_capacity,
        }
    }

    /// Add a block; evict the oldest ones if at capacity.
    ///
    /// The first eviction also inserts a truncation notice. The log never
    /// holds more than `max_capacity` entries.
    pub fn push(&self, block: DisplayBlock) {
        let mut inner = self.write();

        let notice_due = inner.entries.len() >= self.max_capacity && !inner.truncation_notice_shown;
        let needed = 1 + usize::from(notice_due);
        while inner.entries.len() + needed > self.max_capacity {
            if inner.entries.pop_front().is_none() {
                break;
            }
        }

        if notice_due {
            let notice = DisplayBlock::Notice {
                message: format!(
                    "Scrollback truncated: block limit ({}) exceeded",
                    self.max_capacity
                ),
            };
            inner.push_entry(notice);
            inner.truncation_notice_shown = true;
        }

        inner.push_entry(block);
    }

    /// All entries, oldest first (cloned)
    pub fn entries(&self) -> Vec<LogEntry> {
        self.read().entries.iter().cloned().collect()
    }

    /// Most recent entry, if any
    pub fn last(&self) -> Option<LogEntry> {
        self.read().entries.back().cloned()
    }

    pub fn len(&self) -> usize {
        self.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().entries.is_empty()
    }

    /// Clear all blocks and the truncation flag. The prompt is kept.
    pub fn clear(&self) {
        let mut inner = self.write();
        inner.entries.clear();
        inner.truncation_notice_shown = false;
        inner.scroll_offset = 0;
    }

    pub fn has_truncation_notice(&self) -> bool {
        self.read().truncation_notice_shown
    }

    /// Current prompt text, if the server has sent one
    pub fn prompt(&self) -> Option<String> {
        self.read().prompt.clone()
    }

    /// Scroll `blocks` further into the past, stopping at the oldest block.
    pub fn scroll_up(&self, blocks: usize) {
        let mut inner = self.write();
        let max_offset = inner.entries.len().saturating_sub(1);
        inner.scroll_offset = (inner.scroll_offset + blocks).min(max_offset);
    }

    pub fn scroll_offset(&self) -> usize {
        self.read().scroll_offset
    }

    pub fn is_pinned(&self) -> bool {
        self.read().scroll_offset == 0
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Inner {
    fn push_entry(&mut self, block: DisplayBlock) {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push_back(LogEntry { id, block });
    }
}

impl DisplaySurface for Scrollback {
    fn append(&mut self, block: DisplayBlock) {
        self.push(block);
    }

    fn set_prompt(&mut self, prompt: String) {
        self.write().prompt = Some(prompt);
    }

    fn scroll_to_newest(&mut self) {
        self.write().scroll_offset = 0;
    }
}

impl Default for Scrollback {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

impl Clone for Scrollback {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            max_capacity: self.max_capacity,
        }
    }
}
