//! Section and word store with write-through persistence.
//!
//! The in-memory state is authoritative. Every successful mutation writes
//! the whole section list to storage; a failed write is logged and kept in
//! [`Store::last_persist_error`] but never undoes the mutation.

use crate::codec::{self, CodecError, LineWarning};
use crate::models::{AppState, Section, SectionId, Theme, Word, WordId};
use crate::storage::{StorageAdapter, SECTIONS_KEY, THEME_KEY};

/// Outcome of a successful import.
#[derive(Debug, Clone)]
pub struct ImportOutcome {
    pub section_id: SectionId,
    pub name: String,
    pub word_count: usize,
    /// Word lines that were dropped.
    pub warnings: Vec<LineWarning>,
}

impl ImportOutcome {
    /// Message for the user.
    pub fn notice(&self) -> String {
        let mut msg = format!(
            "Section \"{}\" imported ({} words)",
            self.name, self.word_count
        );
        if !self.warnings.is_empty() {
            msg.push_str(&format!(", {} invalid lines skipped", self.warnings.len()));
        }
        msg
    }
}

pub struct Store {
    storage: Box<dyn StorageAdapter>,
    state: AppState,
    last_persist_error: Option<String>,
}

impl Store {
    /// Load state from storage, falling back to defaults on any failure.
    pub fn open(storage: Box<dyn StorageAdapter>) -> Self {
        let sections = load_json::<Vec<Section>>(storage.as_ref(), SECTIONS_KEY).unwrap_or_default();
        let theme = load_json::<Theme>(storage.as_ref(), THEME_KEY).unwrap_or_default();

        tracing::debug!(
            backend = storage.name(),
            sections = sections.len(),
            %theme,
            "store opened"
        );

        Self {
            storage,
            state: AppState {
                sections,
                active_section_id: None,
                theme,
            },
            last_persist_error: None,
        }
    }

    pub fn sections(&self) -> &[Section] {
        &self.state.sections
    }

    pub fn section(&self, id: SectionId) -> Option<&Section> {
        self.state.section(id)
    }

    pub fn active_section_id(&self) -> Option<SectionId> {
        self.state.active_section_id
    }

    pub fn active_section(&self) -> Option<&Section> {
        self.state.active_section()
    }

    pub fn theme(&self) -> Theme {
        self.state.theme
    }

    pub fn storage_name(&self) -> &str {
        self.storage.name()
    }

    /// Most recent persistence failure, if any.
    pub fn last_persist_error(&self) -> Option<&str> {
        self.last_persist_error.as_deref()
    }

    // Section operations

    /// Append an empty section and make it active.
    pub fn add_section(&mut self, name: &str) -> Option<SectionId> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        let section = Section::new(name);
        let id = section.id;
        tracing::debug!(%id, name, "section added");
        self.state.sections.push(section);
        self.state.active_section_id = Some(id);
        self.persist_sections();
        Some(id)
    }

    /// Remove a section and its words. Callers confirm with the user first.
    pub fn delete_section(&mut self, id: SectionId) -> bool {
        let before = self.state.sections.len();
        self.state.sections.retain(|s| s.id != id);
        if self.state.sections.len() == before {
            return false;
        }
        if self.state.active_section_id == Some(id) {
            self.state.active_section_id = None;
        }
        tracing::debug!(%id, "section deleted");
        self.persist_sections();
        true
    }

    pub fn select_section(&mut self, id: SectionId) -> bool {
        if self.state.section(id).is_none() {
            return false;
        }
        self.state.active_section_id = Some(id);
        true
    }

    pub fn clear_selection(&mut self) {
        self.state.active_section_id = None;
    }

    // Word operations

    pub fn add_word(&mut self, section_id: SectionId, original: &str, translation: &str) -> Option<WordId> {
        let (original, translation) = (original.trim(), translation.trim());
        if original.is_empty() || translation.is_empty() {
            return None;
        }
        let section = self.state.section_mut(section_id)?;
        let word = Word::new(original, translation);
        let id = word.id;
        section.words.push(word);
        tracing::debug!(section = %section_id, word = %id, "word added");
        self.persist_sections();
        Some(id)
    }

    /// Replace a word's text in place; its id is kept.
    pub fn edit_word(
        &mut self,
        section_id: SectionId,
        word_id: WordId,
        original: &str,
        translation: &str,
    ) -> bool {
        let (original, translation) = (original.trim(), translation.trim());
        if original.is_empty() || translation.is_empty() {
            return false;
        }
        let Some(word) = self
            .state
            .section_mut(section_id)
            .and_then(|s| s.word_mut(word_id))
        else {
            return false;
        };
        word.original = original.to_string();
        word.translation = translation.to_string();
        tracing::debug!(section = %section_id, word = %word_id, "word edited");
        self.persist_sections();
        true
    }

    pub fn delete_word(&mut self, section_id: SectionId, word_id: WordId) -> bool {
        let Some(section) = self.state.section_mut(section_id) else {
            return false;
        };
        let before = section.words.len();
        section.words.retain(|w| w.id != word_id);
        if section.words.len() == before {
            return false;
        }
        tracing::debug!(section = %section_id, word = %word_id, "word deleted");
        self.persist_sections();
        true
    }

    // Share / import

    /// Decode shared text into a new active section.
    pub fn import_section(&mut self, text: &str) -> Result<ImportOutcome, CodecError> {
        let decoded = codec::decode(text).inspect_err(|e| {
            tracing::warn!("import failed: {}", e);
        })?;

        let section = decoded.section;
        let outcome = ImportOutcome {
            section_id: section.id,
            name: section.name.clone(),
            word_count: section.words.len(),
            warnings: decoded.warnings,
        };

        tracing::info!(
            name = %outcome.name,
            words = outcome.word_count,
            skipped = outcome.warnings.len(),
            "section imported"
        );

        self.state.sections.push(section);
        self.state.active_section_id = Some(outcome.section_id);
        self.persist_sections();
        Ok(outcome)
    }

    /// Share text for a section.
    pub fn export_section(&self, id: SectionId) -> Option<String> {
        self.state.section(id).map(codec::encode)
    }

    // Theme

    pub fn set_theme(&mut self, theme: Theme) {
        self.state.theme = theme;
        self.persist_theme();
    }

    pub fn toggle_theme(&mut self) -> Theme {
        let theme = self.state.theme.toggled();
        self.set_theme(theme);
        theme
    }

    // Persistence

    fn persist_sections(&mut self) {
        match serde_json::to_string(&self.state.sections) {
            Ok(json) => self.write(SECTIONS_KEY, &json),
            Err(e) => self.record_failure(SECTIONS_KEY, e.to_string()),
        }
    }

    fn persist_theme(&mut self) {
        match serde_json::to_string(&self.state.theme) {
            Ok(json) => self.write(THEME_KEY, &json),
            Err(e) => self.record_failure(THEME_KEY, e.to_string()),
        }
    }

    fn write(&mut self, key: &str, value: &str) {
        match self.storage.save(key, value) {
            Ok(()) => self.last_persist_error = None,
            Err(e) => self.record_failure(key, e.to_string()),
        }
    }

    fn record_failure(&mut self, key: &str, message: String) {
        tracing::error!(key, backend = self.storage.name(), "failed to persist: {}", message);
        self.last_persist_error = Some(message);
    }
}

fn load_json<T: serde::de::DeserializeOwned>(storage: &dyn StorageAdapter, key: &str) -> Option<T> {
    let raw = match storage.load(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            tracing::error!(key, "failed to load: {}", e);
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::error!(key, "stored value is not valid JSON: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileStorage, MemoryStorage};

    fn store() -> Store {
        Store::open(Box::new(MemoryStorage::new()))
    }

    const SHARED: &str = "[VocabTrainer Section]\nName: Lesson 1\n---\nhello | hallo\nworld | welt";

    #[test]
    fn test_add_section_activates() {
        let mut store = store();
        let id = store.add_section("  Lesson 1 ").unwrap();
        assert_eq!(store.active_section_id(), Some(id));
        assert_eq!(store.sections()[0].name, "Lesson 1");
        assert!(store.sections()[0].is_empty());
    }

    #[test]
    fn test_blank_inputs_are_ignored() {
        let mut store = store();
        assert!(store.add_section("   ").is_none());
        assert!(store.sections().is_empty());

        let id = store.add_section("L").unwrap();
        assert!(store.add_word(id, "  ", "x").is_none());
        assert!(store.add_word(id, "x", "\t").is_none());
        assert_eq!(store.section(id).unwrap().len(), 0);
    }

    #[test]
    fn test_delete_active_section_clears_selection() {
        let mut store = store();
        let a = store.add_section("A").unwrap();
        let b = store.add_section("B").unwrap();
        assert_eq!(store.active_section_id(), Some(b));

        assert!(store.delete_section(b));
        assert_eq!(store.active_section_id(), None);
        assert_eq!(store.sections().len(), 1);
        assert_eq!(store.sections()[0].id, a);
    }

    #[test]
    fn test_delete_other_section_keeps_selection() {
        let mut store = store();
        let a = store.add_section("A").unwrap();
        let b = store.add_section("B").unwrap();
        assert!(store.delete_section(a));
        assert_eq!(store.active_section_id(), Some(b));
        assert!(!store.delete_section(a));
    }

    #[test]
    fn test_word_lifecycle() {
        let mut store = store();
        let s = store.add_section("S").unwrap();
        let w = store.add_word(s, " hello ", " hallo ").unwrap();
        assert_eq!(store.section(s).unwrap().words[0].original, "hello");

        assert!(store.edit_word(s, w, "hi", "servus"));
        let word = store.section(s).unwrap().word(w).unwrap();
        assert_eq!((word.original.as_str(), word.translation.as_str()), ("hi", "servus"));
        assert_eq!(word.id, w);

        assert!(!store.edit_word(s, WordId::new_v4(), "x", "y"));
        assert!(!store.edit_word(s, w, "", "y"));

        assert!(store.delete_word(s, w));
        assert!(!store.delete_word(s, w));
        assert!(store.section(s).unwrap().is_empty());
    }

    #[test]
    fn test_import_activates_section() {
        let mut store = store();
        store.add_section("Existing").unwrap();
        let outcome = store.import_section(SHARED).unwrap();
        assert_eq!(outcome.name, "Lesson 1");
        assert_eq!(outcome.word_count, 2);
        assert_eq!(store.active_section_id(), Some(outcome.section_id));
        assert_eq!(store.sections().len(), 2);
        assert!(outcome.notice().contains("Lesson 1"));
    }

    #[test]
    fn test_failed_import_changes_nothing() {
        let mut store = store();
        let a = store.add_section("A").unwrap();
        let err = store.import_section("Name: X\n---\na | b").unwrap_err();
        assert_eq!(err, CodecError::MissingHeader);
        assert_eq!(store.sections().len(), 1);
        assert_eq!(store.active_section_id(), Some(a));
    }

    #[test]
    fn test_import_with_bad_line() {
        let mut store = store();
        let outcome = store
            .import_section("[VocabTrainer Section]\nName: X\n---\na | b\noops\nc | d")
            .unwrap();
        assert_eq!(outcome.word_count, 2);
        assert_eq!(outcome.warnings.len(), 1);
        assert!(outcome.notice().contains("1 invalid lines skipped"));
    }

    #[test]
    fn test_export_matches_codec() {
        let mut store = store();
        let outcome = store.import_section(SHARED).unwrap();
        assert_eq!(store.export_section(outcome.section_id).as_deref(), Some(SHARED));
        assert!(store.export_section(SectionId::new_v4()).is_none());
    }

    #[test]
    fn test_persists_and_reloads() {
        let tmp = tempfile::tempdir().unwrap();
        {
            let mut store = Store::open(Box::new(FileStorage::new(tmp.path())));
            let s = store.add_section("Saved").unwrap();
            store.add_word(s, "a", "b").unwrap();
            store.set_theme(Theme::Dark);
        }
        let store = Store::open(Box::new(FileStorage::new(tmp.path())));
        assert_eq!(store.sections().len(), 1);
        assert_eq!(store.sections()[0].words[0].translation, "b");
        assert_eq!(store.theme(), Theme::Dark);
        assert_eq!(store.active_section_id(), None);
    }

    #[test]
    fn test_persist_failure_keeps_memory_state() {
        let mut store = Store::open(Box::new(MemoryStorage::failing()));
        let id = store.add_section("Volatile").unwrap();
        assert!(store.last_persist_error().is_some());
        assert_eq!(store.section(id).unwrap().name, "Volatile");
        assert_eq!(store.toggle_theme(), Theme::Dark);
    }

    #[test]
    fn test_corrupt_storage_falls_back_to_defaults() {
        let storage = MemoryStorage::new()
            .with_entry(SECTIONS_KEY, "{not json")
            .with_entry(THEME_KEY, "\"purple\"");
        let store = Store::open(Box::new(storage));
        assert!(store.sections().is_empty());
        assert_eq!(store.theme(), Theme::Light);
    }

    #[test]
    fn test_select_section() {
        let mut store = store();
        let a = store.add_section("A").unwrap();
        store.add_section("B").unwrap();
        assert!(store.select_section(a));
        assert_eq!(store.active_section().unwrap().name, "A");
        assert!(!store.select_section(SectionId::new_v4()));
        store.clear_selection();
        assert!(store.active_section().is_none());
    }
}
