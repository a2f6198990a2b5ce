//! # vocab-core
//!
//! Study logic for the vocabulary trainer, independent of any UI.
//!
//! ## Features
//!
//! - Sections of word pairs with stable identifiers
//! - Plain-text share format (encode/decode with per-line warnings)
//! - Multiple-choice quiz and free-text test engines with seedable ordering
//! - Pluggable key-value storage behind a write-through store

pub mod codec;
pub mod flashcards;
pub mod models;
pub mod quiz;
pub mod rating;
pub mod shuffle;
pub mod storage;
pub mod store;
pub mod test_mode;

pub use codec::{decode, encode, CodecError, DecodedSection, LineWarning};
pub use flashcards::FlashcardDeck;
pub use models::{AppState, Section, SectionId, Theme, Word, WordId};
pub use quiz::{QuizQuestion, QuizSession, QuizSummary};
pub use rating::Rating;
pub use storage::{FileStorage, MemoryStorage, StorageAdapter, StorageError};
pub use store::{ImportOutcome, Store};
pub use test_mode::{Mistake, TestItem, TestReport, TestSession};
