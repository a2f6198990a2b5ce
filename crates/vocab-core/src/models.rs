//! Data models for the vocabulary trainer.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifiers.
pub type SectionId = Uuid;
pub type WordId = Uuid;

/// A word pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    /// Unique identifier, never changed after creation.
    pub id: WordId,
    /// Text in the source language.
    pub original: String,
    /// Text in the target language.
    pub translation: String,
}

impl Word {
    /// Create a new word with a fresh id.
    pub fn new(original: impl Into<String>, translation: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            original: original.into(),
            translation: translation.into(),
        }
    }
}

/// A named, ordered collection of words.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Unique identifier.
    pub id: SectionId,
    /// Section name.
    pub name: String,
    /// Words in insertion order.
    #[serde(default)]
    pub words: Vec<Word>,
}

impl Section {
    /// Create an empty section.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            words: Vec::new(),
        }
    }

    /// Add a word.
    pub fn with_word(mut self, original: impl Into<String>, translation: impl Into<String>) -> Self {
        self.words.push(Word::new(original, translation));
        self
    }

    pub fn word(&self, id: WordId) -> Option<&Word> {
        self.words.iter().find(|w| w.id == id)
    }

    pub fn word_mut(&mut self, id: WordId) -> Option<&mut Word> {
        self.words.iter_mut().find(|w| w.id == id)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Color scheme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// The other theme.
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Get display name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Light => "Light",
            Self::Dark => "Dark",
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Light => write!(f, "light"),
            Self::Dark => write!(f, "dark"),
        }
    }
}

/// Everything the application keeps between user actions.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub sections: Vec<Section>,
    /// Always references an entry of `sections` when set.
    pub active_section_id: Option<SectionId>,
    pub theme: Theme,
}

impl AppState {
    pub fn section(&self, id: SectionId) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    pub fn section_mut(&mut self, id: SectionId) -> Option<&mut Section> {
        self.sections.iter_mut().find(|s| s.id == id)
    }

    pub fn active_section(&self) -> Option<&Section> {
        self.active_section_id.and_then(|id| self.section(id))
    }
}
