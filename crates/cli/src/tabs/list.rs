//! Cursor, scrolling and filtering over a list of output lines.

use std::ops::Range;

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use ptui_core::router::Line;

/// Direction to move the cursor in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CycleDirection {
    Up,
    Down,
}

/// View state of a filterable list.
///
/// The cursor and the scroll offset are positions in the *visible* lines,
/// i.e. after filtering.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct ListView {
    cursor: usize,
    offset: usize,
    filter_text: String,
    is_filtering: bool,
}

impl ListView {
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[must_use]
    pub fn filter_text(&self) -> &str {
        &self.filter_text
    }

    /// Whether typed characters currently edit the filter.
    #[must_use]
    pub fn is_filtering(&self) -> bool {
        self.is_filtering
    }

    pub fn start_filtering(&mut self) {
        self.is_filtering = true;
    }

    pub fn stop_filtering(&mut self) {
        self.is_filtering = false;
    }

    pub fn clear_filter(&mut self) {
        self.filter_text.clear();
        self.reset();
    }

    pub fn push_filter(&mut self, character: char) {
        self.filter_text.push(character);
        self.reset();
    }

    /// Removes the last filter character; `false` if the filter was empty.
    pub fn pop_filter(&mut self) -> bool {
        let popped = self.filter_text.pop().is_some();
        if popped {
            self.reset();
        }
        popped
    }

    pub fn reset(&mut self) {
        self.cursor = 0;
        self.offset = 0;
    }

    /// Indexes into `lines` of the lines matching the filter.
    #[must_use]
    pub fn visible(&self, lines: &[Line]) -> Vec<usize> {
        if self.filter_text.is_empty() {
            return (0..lines.len()).collect();
        }

        let matcher = SkimMatcherV2::default();
        lines
            .iter()
            .enumerate()
            .filter(|(_, line)| matcher.fuzzy_match(&line.text, &self.filter_text).is_some())
            .map(|(index, _)| index)
            .collect()
    }

    /// The package name under the cursor. Error lines are never selectable.
    #[must_use]
    pub fn selected<'a>(&self, lines: &'a [Line]) -> Option<&'a str> {
        let visible = self.visible(lines);
        let line = lines.get(*visible.get(self.cursor)?)?;

        let name = line.text.trim();
        (!line.is_error && !name.is_empty()).then_some(name)
    }

    /// Moves the cursor without wrapping. Returns whether it moved.
    pub fn move_cursor(&mut self, direction: CycleDirection, visible_count: usize, height: usize) -> bool {
        let previous = self.cursor;

        match direction {
            CycleDirection::Up => self.cursor = self.cursor.saturating_sub(1),
            CycleDirection::Down => {
                if self.cursor + 1 < visible_count {
                    self.cursor += 1;
                }
            }
        }

        self.scroll_into_view(height);
        self.cursor != previous
    }

    /// Keeps the cursor inside the visible lines after they changed.
    pub fn clamp(&mut self, visible_count: usize, height: usize) {
        if self.cursor >= visible_count {
            self.cursor = visible_count.saturating_sub(1);
        }
        self.offset = self.offset.min(visible_count.saturating_sub(height.max(1)));
        self.scroll_into_view(height);
    }

    pub fn scroll_into_view(&mut self, height: usize) {
        let height = height.max(1);

        if self.cursor < self.offset {
            self.offset = self.cursor;
        } else if self.cursor >= self.offset + height {
            self.offset = self.cursor + 1 - height;
        }
    }

    /// Positions of the visible lines that fit in `height` rows.
    #[must_use]
    pub fn window(&self, visible_count: usize, height: usize) -> Range<usize> {
        let height = height.max(1);
        let mut start = self.offset.min(visible_count);

        // Rendering may happen before a clamp catches up with new content.
        if self.cursor >= start + height {
            start = self.cursor + 1 - height;
        }

        start.min(visible_count)..(start + height).min(visible_count)
    }
}
