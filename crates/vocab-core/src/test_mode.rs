//! Free-text recall test.
//!
//! Prompts are answered in order and cannot be revisited. Grading trims
//! surrounding whitespace and compares the Unicode lowercase forms.

use crate::models::Word;
use crate::rating::{percentage, Rating};
use crate::shuffle::shuffled;
use rand::Rng;

/// Grade a typed answer against the expected translation.
///
/// Both sides are trimmed and lowercased with [`str::to_lowercase`]. This is
/// a lowercase mapping, not full case folding: `ß` does not match `ss`.
pub fn grade(expected: &str, raw: &str) -> bool {
    let answer = raw.trim();
    if answer.is_empty() {
        return false;
    }
    answer.to_lowercase() == expected.trim().to_lowercase()
}

/// One prompt of a test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestItem {
    pub prompt: String,
    pub expected_answer: String,
    /// Literal text as typed, set once submitted.
    pub submitted_answer: Option<String>,
    pub correct: bool,
}

impl TestItem {
    fn from_word(word: Word) -> Self {
        Self {
            prompt: word.original,
            expected_answer: word.translation,
            submitted_answer: None,
            correct: false,
        }
    }
}

/// An item answered incorrectly, kept for review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mistake {
    pub prompt: String,
    pub expected_answer: String,
    /// `None` means nothing was entered.
    pub submitted: Option<String>,
}

impl Mistake {
    pub fn submitted_display(&self) -> &str {
        self.submitted.as_deref().unwrap_or("(no answer)")
    }
}

/// Final result of a test.
#[derive(Debug, Clone, PartialEq)]
pub struct TestReport {
    pub correct: usize,
    pub total: usize,
    pub percentage: f64,
    pub rating: Rating,
    /// Incorrect items in the order they were asked.
    pub mistakes: Vec<Mistake>,
}

/// A test in progress.
#[derive(Debug, Clone)]
pub struct TestSession {
    items: Vec<TestItem>,
    current_index: usize,
}

impl TestSession {
    /// One item per word in random order. A single word is a valid test.
    pub fn new<R: Rng + ?Sized>(words: &[Word], rng: &mut R) -> Self {
        let items = shuffled(words, rng).into_iter().map(TestItem::from_word).collect();
        Self {
            items,
            current_index: 0,
        }
    }

    pub fn items(&self) -> &[TestItem] {
        &self.items
    }

    pub fn current(&self) -> Option<&TestItem> {
        self.items.get(self.current_index)
    }

    /// 0-based index of the current prompt.
    pub fn position(&self) -> usize {
        self.current_index
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Grade the current prompt and move on.
    ///
    /// Returns `None` once every prompt has been submitted.
    pub fn submit(&mut self, raw: &str) -> Option<bool> {
        let item = self.items.get_mut(self.current_index)?;
        item.correct = grade(&item.expected_answer, raw);
        item.submitted_answer = Some(raw.to_string());
        self.current_index += 1;
        Some(item.correct)
    }

    pub fn is_finished(&self) -> bool {
        self.current_index >= self.items.len()
    }

    /// Summarize a completed test; `None` while prompts remain.
    pub fn finish(&self) -> Option<TestReport> {
        if !self.is_finished() {
            return None;
        }

        let mistakes: Vec<Mistake> = self
            .items
            .iter()
            .filter(|item| !item.correct)
            .map(|item| Mistake {
                prompt: item.prompt.clone(),
                expected_answer: item.expected_answer.clone(),
                submitted: item
                    .submitted_answer
                    .clone()
                    .filter(|s| !s.trim().is_empty()),
            })
            .collect();

        let total = self.items.len();
        let correct = total - mistakes.len();
        let percentage = percentage(correct, total);

        Some(TestReport {
            correct,
            total,
            percentage,
            rating: Rating::from_percentage(percentage),
            mistakes,
        })
    }
}
