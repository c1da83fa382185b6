//! Auto-scrolling window over a list of choices
//!
//! The window always keeps one line for the prompt itself, so at most
//! `max_height - 1` choices are visible at a time.

/// Pointer position and first visible row of a choice list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollWindow {
    /// Current (pointed-at) choice
    pub index: usize,
    /// First visible choice
    pub display_index: usize,
    /// Total rows available to the prompt, including the prompt line
    pub max_height: usize,
}

impl ScrollWindow {
    pub fn new(max_height: usize) -> Self {
        Self {
            index: 0,
            display_index: 0,
            max_height: max_height.max(2),
        }
    }

    /// Back to the first choice
    pub fn reset(&mut self) {
        self.index = 0;
        self.display_index = 0;
    }

    /// Number of choice rows that fit in the window
    pub fn visible_rows(&self) -> usize {
        self.max_height - 1
    }

    /// Index range of the visible choices
    pub fn visible_range(&self, len: usize) -> std::ops::Range<usize> {
        let start = self.display_index.min(len);
        let end = (self.display_index + self.visible_rows()).min(len);
        start..end
    }

    /// Move the pointer to `index` and scroll the window by at most one row,
    /// jumping to either end when the pointer wraps around
    pub fn jump_to(&mut self, index: usize, len: usize) {
        self.index = index;
        let end_index = self.display_index + self.max_height - 2;
        if self.index == self.display_index && self.display_index > 0 {
            self.display_index -= 1;
        } else if len > 0 && self.index == len - 1 {
            self.display_index = (len + 1).saturating_sub(self.max_height);
        } else if self.index == end_index && len > 0 && end_index < len - 1 {
            self.display_index += 1;
        } else if self.index == 0 {
            self.display_index = 0;
        }
    }

    /// Place the pointer at `index` with the window scrolled so that it sits
    /// on the last visible row, or as low as the list allows
    pub fn show(&mut self, index: usize, len: usize) {
        let rows = self.visible_rows();
        self.index = index;
        self.display_index = index
            .saturating_sub(rows - 1)
            .min(len.saturating_sub(rows));
    }

    pub fn up(&mut self, len: usize) {
        if len > 0 {
            self.jump_to((self.index + len - 1) % len, len);
        }
    }

    pub fn down(&mut self, len: usize) {
        if len > 0 {
            self.jump_to((self.index + 1) % len, len);
        }
    }

    /// Choice index shown on viewport row `row` (row 0 is the prompt line)
    pub fn index_at_row(&self, row: u16, len: usize) -> Option<usize> {
        if row == 0 {
            return None;
        }
        let index = self.display_index + row as usize - 1;
        self.visible_range(len).contains(&index).then_some(index)
    }
}
