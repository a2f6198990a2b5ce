//! Flashcard browsing state.

/// Position and flip state over a section's words.
///
/// Navigation wraps around in both directions and always shows the front
/// of the next card.
#[derive(Debug, Clone, Default)]
pub struct FlashcardDeck {
    len: usize,
    current_index: usize,
    flipped: bool,
}

impl FlashcardDeck {
    pub fn new(len: usize) -> Self {
        Self {
            len,
            current_index: 0,
            flipped: false,
        }
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Turn the card over.
    pub fn flip(&mut self) {
        if !self.is_empty() {
            self.flipped = !self.flipped;
        }
    }

    pub fn next(&mut self) {
        if self.is_empty() {
            return;
        }
        self.flipped = false;
        self.current_index = (self.current_index + 1) % self.len;
    }

    pub fn previous(&mut self) {
        if self.is_empty() {
            return;
        }
        self.flipped = false;
        self.current_index = (self.current_index + self.len - 1) % self.len;
    }

    /// 1-based position and total, for display.
    pub fn progress(&self) -> (usize, usize) {
        if self.is_empty() {
            (0, 0)
        } else {
            (self.current_index + 1, self.len)
        }
    }
}
