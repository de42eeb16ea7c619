use std::collections::VecDeque;

/// Recall stack for submitted input lines (most recent first on recall).
///
/// The last entry is always the scratch slot: the line currently being typed
/// and not yet submitted. `cursor` counts back from the end, so `0` means the
/// scratch slot is showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputHistory {
    entries: VecDeque<String>,
    cursor: usize,
    max_capacity: usize,
}

impl InputHistory {
    /// Default capacity, counting the scratch slot
    pub const DEFAULT_CAPACITY: usize = 21;
    /// Smallest usable capacity: one stored line plus the scratch slot
    pub const MIN_CAPACITY: usize = 2;

    /// Create a history holding at most `max_capacity` entries including the
    /// scratch slot.
    pub fn new(max_capacity: usize) -> Self {
        let max_capacity = max_capacity.max(Self::MIN_CAPACITY);
        let mut entries = VecDeque::with_capacity(max_capacity);
        entries.push_back(String::new());
        Self {
            entries,
            cursor: 0,
            max_capacity,
        }
    }

    /// Record a submitted line.
    ///
    /// Empty lines and exact repeats of the previous stored line are not
    /// recorded. The cursor returns to the scratch slot either way.
    pub fn add(&mut self, line: &str) {
        if !line.is_empty() && self.latest_stored() != Some(line) {
            if self.entries.len() >= self.max_capacity {
                self.entries.pop_front();
            }
            if let Some(slot) = self.entries.back_mut() {
                *slot = line.to_string();
            }
            self.entries.push_back(String::new());
        }
        self.cursor = 0;
    }

    /// Step one entry further into the past. Stays put at the oldest entry.
    pub fn back(&mut self) -> &str {
        self.cursor = (self.cursor + 1).min(self.entries.len() - 1);
        self.current()
    }

    /// Step one entry towards the present. Stays put on the scratch slot.
    pub fn forward(&mut self) -> &str {
        self.cursor = self.cursor.saturating_sub(1);
        self.current()
    }

    /// Overwrite the scratch slot without moving the cursor.
    pub fn scratch(&mut self, text: &str) {
        if let Some(slot) = self.entries.back_mut() {
            text.clone_into(slot);
        }
    }

    /// Jump back to the scratch slot.
    pub fn end(&mut self) -> &str {
        self.cursor = 0;
        self.current()
    }

    /// Entry under the cursor.
    pub fn current(&self) -> &str {
        let index = self.entries.len() - 1 - self.cursor;
        &self.entries[index]
    }

    /// Contents of the scratch slot.
    pub fn scratch_text(&self) -> &str {
        self.entries.back().map_or("", String::as_str)
    }

    /// Submitted lines, oldest first, without the scratch slot.
    pub fn stored(&self) -> Vec<&str> {
        self.entries
            .iter()
            .take(self.entries.len() - 1)
            .map(String::as_str)
            .collect()
    }

    /// Number of entries including the scratch slot (never zero)
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing has been submitted yet
    pub fn is_empty(&self) -> bool {
        self.entries.len() == 1
    }

    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    pub const fn capacity(&self) -> usize {
        self.max_capacity
    }

    fn latest_stored(&self) -> Option<&str> {
        let len = self.entries.len();
        if len < 2 {
            return None;
        }
        self.entries.get(len - 2).map(String::as_str)
    }
}

impl Default for InputHistory {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_history_has_empty_scratch() {
        let history = InputHistory::default();
        assert_eq!(history.len(), 1);
        assert!(history.is_empty());
        assert_eq!(history.cursor(), 0);
        assert_eq!(history.scratch_text(), "");
        assert!(history.stored().is_empty());
    }

    #[test]
    fn test_add_appends_before_scratch() {
        let mut history = InputHistory::default();
        history.add("look");
        history.add("north");

        assert_eq!(history.stored(), vec!["look", "north"]);
        assert_eq!(history.scratch_text(), "");
        assert_eq!(history.len(), 3);
    }

    #[test]
    fn test_add_ignores_empty_and_repeats() {
        let mut history = InputHistory::default();
        history.add("look");
        history.add("look");
        history.add("");

        assert_eq!(history.len(), 2);
        assert_eq!(history.stored(), vec!["look"]);

        // Only adjacent repeats are collapsed
        history.add("north");
        history.add("look");
        assert_eq!(history.stored(), vec!["look", "north", "look"]);
    }

    #[test]
    fn test_add_resets_cursor_even_when_ignored() {
        let mut history = InputHistory::default();
        history.add("look");
        history.back();
        assert_eq!(history.cursor(), 1);

        history.add("look");
        assert_eq!(history.cursor(), 0);
    }

    #[test]
    fn test_capacity_three_eviction_sequence() {
        let mut history = InputHistory::new(3);

        history.add("a");
        assert_eq!(history.stored(), vec!["a"]);
        history.add("b");
        assert_eq!(history.stored(), vec!["a", "b"]);
        history.add("c");
        assert_eq!(history.stored(), vec!["b", "c"]);
        history.add("d");
        assert_eq!(history.stored(), vec!["c", "d"]);
        assert_eq!(history.len(), 3);
    }

    #[test]
    fn test_tiny_capacity_is_raised() {
        let mut history = InputHistory::new(0);
        assert_eq!(history.capacity(), 2);

        history.add("a");
        history.add("b");
        assert_eq!(history.stored(), vec!["b"]);
    }

    #[test]
    fn test_back_walks_most_recent_first_and_clamps() {
        let mut history = InputHistory::default();
        history.add("one");
        history.add("two");

        assert_eq!(history.back(), "two");
        assert_eq!(history.back(), "one");
        assert_eq!(history.back(), "one");
        assert_eq!(history.cursor(), 2);
    }

    #[test]
    fn test_forward_clamps_at_scratch() {
        let mut history = InputHistory::default();
        history.add("one");
        history.scratch("half typed");

        assert_eq!(history.forward(), "half typed");
        assert_eq!(history.cursor(), 0);

        history.back();
        assert_eq!(history.forward(), "half typed");
    }

    #[test]
    fn test_scratch_preserves_length_and_cursor() {
        let mut history = InputHistory::default();
        history.add("one");
        history.back();

        history.scratch("draft");
        assert_eq!(history.len(), 2);
        assert_eq!(history.cursor(), 1);
        assert_eq!(history.end(), "draft");
    }

    #[test]
    fn test_scratch_then_end_returns_text() {
        let mut history = InputHistory::default();
        history.scratch("say hi");
        assert_eq!(history.end(), "say hi");
    }
}
