//! Height policy for the multi-line input field.

use crate::config::AutosizeConfig;

/// Measures how tall `text` renders when wrapped at `width`.
pub trait TextMeasure {
    fn required_height(&self, text: &str, width: u32) -> u32;
}

/// Fixed-cell measurement: every char is `char_width` wide, every line
/// `line_height` tall, plus vertical `padding`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonospaceMeasure {
    pub char_width: u32,
    pub line_height: u32,
    pub padding: u32,
}

impl TextMeasure for MonospaceMeasure {
    fn required_height(&self, text: &str, width: u32) -> u32 {
        let columns = (width / self.char_width.max(1)).max(1) as usize;
        let rows: usize = text
            .split('\n')
            .map(|line| line.chars().count().div_ceil(columns).max(1))
            .sum();
        let rows = u32::try_from(rows).unwrap_or(u32::MAX);
        rows.saturating_mul(self.line_height)
            .saturating_add(self.padding)
    }
}

/// Field dimensions as rendered right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMetrics {
    /// Height the content needs (`scrollHeight`)
    pub scroll_height: u32,
    /// Height currently rendered (`clientHeight`)
    pub client_height: u32,
    /// Width available to text (`clientWidth`)
    pub client_width: u32,
}

/// Grows the input field with its content and shrinks it back when text is
/// removed, within the configured bounds.
#[derive(Debug, Clone)]
pub struct InputAutosize {
    bounds: AutosizeConfig,
    prev_text_len: usize,
}

impl InputAutosize {
    pub fn new(bounds: AutosizeConfig) -> Self {
        let max_height = bounds.max_height.max(bounds.min_height);
        Self {
            bounds: AutosizeConfig {
                min_height: bounds.min_height,
                max_height,
            },
            prev_text_len: 0,
        }
    }

    /// Decide the field's new height after its content changed.
    ///
    /// Overflowing content grows the field to its scroll height. Shorter text
    /// than last time is re-measured with `measure` to find a smaller height.
    /// Returns the new height only when it differs from the rendered one.
    pub fn adjust(
        &mut self,
        text: &str,
        metrics: FieldMetrics,
        measure: &impl TextMeasure,
    ) -> Option<u32> {
        let text_len = text.chars().count();

        let wanted = if metrics.scroll_height > metrics.client_height {
            Some(metrics.scroll_height)
        } else if text_len < self.prev_text_len {
            Some(measure.required_height(text, metrics.client_width))
        } else {
            None
        };
        self.prev_text_len = text_len;

        let height = wanted?.clamp(self.bounds.min_height, self.bounds.max_height);
        (height != metrics.client_height).then_some(height)
    }

    pub const fn bounds(&self) -> AutosizeConfig {
        self.bounds
    }
}

impl Default for InputAutosize {
    fn default() -> Self {
        Self::new(AutosizeConfig::default())
    }
}

/// Placement of the message viewport after the input region changed size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportLayout {
    /// Space kept free below the messages for the input region
    pub message_bottom: u32,
    /// Whether to jump the message log to its newest block
    pub scroll_to_newest: bool,
}

impl ViewportLayout {
    /// Layout for an input region `input_region_height` tall. The log is
    /// always pinned to its newest content after a resize.
    pub const fn for_input_height(input_region_height: u32) -> Self {
        Self {
            message_bottom: input_region_height,
            scroll_to_newest: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MEASURE: MonospaceMeasure = MonospaceMeasure {
        char_width: 10,
        line_height: 20,
        padding: 10,
    };

    fn metrics(scroll_height: u32, client_height: u32) -> FieldMetrics {
        FieldMetrics {
            scroll_height,
            client_height,
            client_width: 200,
        }
    }

    #[test]
    fn test_monospace_wraps_lines() {
        // 20 columns per line
        assert_eq!(MEASURE.required_height("", 200), 30);
        assert_eq!(MEASURE.required_height(&"x".repeat(20), 200), 30);
        assert_eq!(MEASURE.required_height(&"x".repeat(21), 200), 50);
        assert_eq!(MEASURE.required_height("a\nb\nc", 200), 70);
    }

    #[test]
    fn test_grows_on_overflow() {
        let mut autosize = InputAutosize::default();
        assert_eq!(autosize.adjust("long text", metrics(120, 50), &MEASURE), Some(120));
    }

    #[test]
    fn test_growth_is_capped() {
        let mut autosize = InputAutosize::default();
        assert_eq!(autosize.adjust("huge paste", metrics(900, 50), &MEASURE), Some(300));
        // Already at the cap: nothing to do
        assert_eq!(autosize.adjust("huge paste!", metrics(920, 300), &MEASURE), None);
    }

    #[test]
    fn test_shrinks_when_text_removed() {
        let mut autosize = InputAutosize::default();
        let long = "x".repeat(100);
        assert_eq!(autosize.adjust(&long, metrics(110, 50), &MEASURE), Some(110));

        // 30 chars → 2 rows → 50px
        let short = "x".repeat(30);
        assert_eq!(autosize.adjust(&short, metrics(110, 110), &MEASURE), Some(50));
    }

    #[test]
    fn test_never_below_minimum() {
        let mut autosize = InputAutosize::default();
        autosize.adjust("abc", metrics(60, 60), &MEASURE);

        // Measured 30px, clamped to 50
        assert_eq!(autosize.adjust("", metrics(60, 60), &MEASURE), Some(50));
    }

    #[test]
    fn test_no_change_when_content_fits() {
        let mut autosize = InputAutosize::default();
        assert_eq!(autosize.adjust("look", metrics(50, 50), &MEASURE), None);
        assert_eq!(autosize.adjust("look north", metrics(50, 50), &MEASURE), None);
    }

    #[test]
    fn test_inverted_bounds_are_repaired() {
        let autosize = InputAutosize::new(AutosizeConfig {
            min_height: 80,
            max_height: 40,
        });
        assert_eq!(autosize.bounds().max_height, 80);
    }

    #[test]
    fn test_layout_pins_log() {
        let layout = ViewportLayout::for_input_height(74);
        assert_eq!(layout.message_bottom, 74);
        assert!(layout.scroll_to_newest);
    }
}
