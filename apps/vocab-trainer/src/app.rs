//! Application state and logic.

use crate::config::{Config, StorageBackend};
use crate::db::SqliteStorage;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::path::{Path, PathBuf};
use vocab_core::shuffle::session_rng;
use vocab_core::storage::{FileStorage, MemoryStorage, StorageAdapter};
use vocab_core::{
    FlashcardDeck, QuizSession, Section, SectionId, Store, TestReport, TestSession, WordId,
};

pub struct App {
    pub store: Store,
    pub config: Config,
    pub focus: Focus,
    pub mode: Mode,
    /// Cursor in the section list.
    pub selected_section: usize,
    /// Cursor in the active section's word list.
    pub selected_word: usize,
    /// Word list shows `...` in place of every original.
    pub hide_originals: bool,
    pub hide_translations: bool,
    pub flashcards: FlashcardDeck,
    pub quiz: Option<QuizSession>,
    pub test: Option<TestSession>,
    pub test_report: Option<TestReport>,
    pub answer_buffer: String,
    pub dialog: Option<Dialog>,
    pub message: Option<String>,
    pub show_help: bool,
    last_active: Option<SectionId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Sections,
    Words,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    List,
    Flashcards,
    Quiz,
    Test,
}

impl Mode {
    pub fn name(&self) -> &'static str {
        match self {
            Self::List => "List",
            Self::Flashcards => "Flashcards",
            Self::Quiz => "Quiz",
            Self::Test => "Test",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordField {
    Original,
    Translation,
}

/// Text inputs of the add/edit word dialogs.
#[derive(Debug, Clone)]
pub struct WordFields {
    pub original: String,
    pub translation: String,
    pub active: WordField,
}

impl WordFields {
    fn new(original: &str, translation: &str) -> Self {
        Self {
            original: original.to_string(),
            translation: translation.to_string(),
            active: WordField::Original,
        }
    }

    fn active_mut(&mut self) -> &mut String {
        match self.active {
            WordField::Original => &mut self.original,
            WordField::Translation => &mut self.translation,
        }
    }

    fn switch(&mut self) {
        self.active = match self.active {
            WordField::Original => WordField::Translation,
            WordField::Translation => WordField::Original,
        };
    }
}

#[derive(Debug, Clone)]
pub enum Dialog {
    AddSection { name: String },
    AddWord { section_id: SectionId, fields: WordFields },
    EditWord { section_id: SectionId, word_id: WordId, fields: WordFields },
    Import { text: String },
    Share { name: String, text: String },
    ConfirmDelete { section_id: SectionId, name: String },
}

impl App {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let storage = open_storage(&config)?;
        Ok(Self::with_store(Store::open(storage), config))
    }

    pub fn with_store(store: Store, config: Config) -> Self {
        Self {
            store,
            config,
            focus: Focus::Sections,
            mode: Mode::List,
            selected_section: 0,
            selected_word: 0,
            hide_originals: false,
            hide_translations: false,
            flashcards: FlashcardDeck::default(),
            quiz: None,
            test: None,
            test_report: None,
            answer_buffer: String::new(),
            dialog: None,
            message: None,
            show_help: false,
            last_active: None,
        }
    }

    pub fn can_quit(&self) -> bool {
        self.dialog.is_none() && !self.show_help && self.mode == Mode::List
    }

    pub fn active_section(&self) -> Option<&Section> {
        self.store.active_section()
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        self.message = None;

        if self.show_help {
            self.show_help = false;
            return;
        }

        if self.dialog.is_some() {
            self.handle_dialog_key(key);
        } else {
            match self.mode {
                Mode::List => self.handle_list_key(key),
                Mode::Flashcards => self.handle_flashcard_key(key),
                Mode::Quiz => self.handle_quiz_key(key),
                Mode::Test => self.handle_test_key(key),
            }
        }

        self.sync_active_section();
    }

    /// Bracketed paste; only the import dialog takes multi-line text.
    pub fn handle_paste(&mut self, text: &str) {
        match &mut self.dialog {
            Some(Dialog::Import { text: buffer }) => buffer.push_str(&text.replace("\r\n", "\n")),
            Some(Dialog::AddSection { name }) => name.push_str(text.lines().next().unwrap_or("")),
            Some(Dialog::AddWord { fields, .. }) | Some(Dialog::EditWord { fields, .. }) => {
                fields.active_mut().push_str(text.lines().next().unwrap_or(""))
            }
            _ => {
                if self.mode == Mode::Test && self.test_report.is_none() {
                    self.answer_buffer.push_str(text.lines().next().unwrap_or(""));
                }
            }
        }
    }

    /// Drop per-section study state whenever a different section becomes active.
    fn sync_active_section(&mut self) {
        let active = self.store.active_section_id();
        if active == self.last_active {
            return;
        }
        self.last_active = active;
        self.reset_study_state();
        if let Some(id) = active {
            if let Some(idx) = self.store.sections().iter().position(|s| s.id == id) {
                self.selected_section = idx;
            }
        }
        self.clamp_section_cursor();
    }

    fn clamp_section_cursor(&mut self) {
        let count = self.store.sections().len();
        if self.selected_section >= count {
            self.selected_section = count.saturating_sub(1);
        }
    }

    fn reset_study_state(&mut self) {
        self.mode = Mode::List;
        self.selected_word = 0;
        self.hide_originals = false;
        self.hide_translations = false;
        self.flashcards = FlashcardDeck::default();
        self.quiz = None;
        self.test = None;
        self.test_report = None;
        self.answer_buffer.clear();
    }

    fn handle_list_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Tab => {
                self.focus = match self.focus {
                    Focus::Sections if self.active_section().is_some() => Focus::Words,
                    _ => Focus::Sections,
                };
                return;
            }
            KeyCode::Char('2') => return self.start_flashcards(),
            KeyCode::Char('3') => return self.start_quiz(),
            KeyCode::Char('4') => return self.start_test(),
            KeyCode::Char('i') => {
                self.dialog = Some(Dialog::Import { text: String::new() });
                return;
            }
            KeyCode::Char('t') => {
                let theme = self.store.toggle_theme();
                self.message = Some(format!("{} theme", theme.name()));
                return;
            }
            KeyCode::Char('?') => {
                self.show_help = true;
                return;
            }
            _ => {}
        }

        match self.focus {
            Focus::Sections => self.handle_sections_key(key),
            Focus::Words => self.handle_words_key(key),
        }
    }

    fn handle_sections_key(&mut self, key: KeyEvent) {
        let count = self.store.sections().len();
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                if count > 0 {
                    self.selected_section = (self.selected_section + 1).min(count - 1);
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.selected_section = self.selected_section.saturating_sub(1);
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(id) = self.cursor_section_id() {
                    self.store.select_section(id);
                    self.focus = Focus::Words;
                }
            }
            KeyCode::Char('a') => {
                self.dialog = Some(Dialog::AddSection { name: String::new() });
            }
            KeyCode::Char('d') => {
                if let Some(section) = self.store.sections().get(self.selected_section) {
                    self.dialog = Some(Dialog::ConfirmDelete {
                        section_id: section.id,
                        name: section.name.clone(),
                    });
                }
            }
            KeyCode::Char('s') => {
                if let Some(id) = self.cursor_section_id() {
                    self.open_share(id);
                }
            }
            _ => {}
        }
    }

    fn handle_words_key(&mut self, key: KeyEvent) {
        let Some(section) = self.active_section() else {
            self.focus = Focus::Sections;
            return;
        };
        let section_id = section.id;
        let count = section.len();
        let cursor_word = section
            .words
            .get(self.selected_word)
            .map(|w| (w.id, w.original.clone(), w.translation.clone()));

        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                if count > 0 {
                    self.selected_word = (self.selected_word + 1).min(count - 1);
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.selected_word = self.selected_word.saturating_sub(1);
            }
            KeyCode::Char('a') => {
                self.dialog = Some(Dialog::AddWord {
                    section_id,
                    fields: WordFields::new("", ""),
                });
            }
            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some((word_id, original, translation)) = cursor_word {
                    self.dialog = Some(Dialog::EditWord {
                        section_id,
                        word_id,
                        fields: WordFields::new(&original, &translation),
                    });
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some((word_id, original, _)) = cursor_word {
                    if self.store.delete_word(section_id, word_id) {
                        self.message = Some(format!("Deleted \"{}\"", original));
                        self.selected_word = self.selected_word.min(count.saturating_sub(2));
                    }
                }
            }
            KeyCode::Char('o') => self.hide_originals = !self.hide_originals,
            KeyCode::Char('r') => self.hide_translations = !self.hide_translations,
            KeyCode::Char('s') => self.open_share(section_id),
            KeyCode::Esc => self.focus = Focus::Sections,
            _ => {}
        }
    }

    fn cursor_section_id(&self) -> Option<SectionId> {
        self.store.sections().get(self.selected_section).map(|s| s.id)
    }

    fn open_share(&mut self, id: SectionId) {
        let Some(section) = self.store.section(id) else { return };
        let name = section.name.clone();
        if let Some(text) = self.store.export_section(id) {
            self.dialog = Some(Dialog::Share { name, text });
        }
    }

    // Study modes

    fn start_flashcards(&mut self) {
        let Some(section) = self.active_section() else {
            self.message = Some("Select a section first".to_string());
            return;
        };
        if section.is_empty() {
            self.message = Some("Add words to use flashcards".to_string());
            return;
        }
        self.flashcards = FlashcardDeck::new(section.len());
        self.mode = Mode::Flashcards;
    }

    fn start_quiz(&mut self) {
        let Some(section) = self.active_section() else {
            self.message = Some("Select a section first".to_string());
            return;
        };
        let mut rng = session_rng(self.config.study.shuffle_seed);
        match QuizSession::new(&section.words, &mut rng) {
            Some(quiz) => {
                tracing::debug!(questions = quiz.len(), "quiz started");
                self.quiz = Some(quiz);
                self.mode = Mode::Quiz;
            }
            None => {
                self.message = Some("Add at least 4 words to start the quiz".to_string());
            }
        }
    }

    fn start_test(&mut self) {
        let Some(section) = self.active_section() else {
            self.message = Some("Select a section first".to_string());
            return;
        };
        if section.is_empty() {
            self.message = Some("Add words to start a test".to_string());
            return;
        }
        let mut rng = session_rng(self.config.study.shuffle_seed);
        let test = TestSession::new(&section.words, &mut rng);
        tracing::debug!(items = test.len(), "test started");
        self.test = Some(test);
        self.test_report = None;
        self.answer_buffer.clear();
        self.mode = Mode::Test;
    }

    fn back_to_list(&mut self) {
        self.mode = Mode::List;
        self.quiz = None;
        self.test = None;
        self.test_report = None;
        self.answer_buffer.clear();
    }

    fn handle_flashcard_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(' ') | KeyCode::Enter => self.flashcards.flip(),
            KeyCode::Char('l') | KeyCode::Char('n') | KeyCode::Right => self.flashcards.next(),
            KeyCode::Char('h') | KeyCode::Char('p') | KeyCode::Left => self.flashcards.previous(),
            KeyCode::Char('q') | KeyCode::Esc => self.back_to_list(),
            _ => {}
        }
    }

    fn handle_quiz_key(&mut self, key: KeyEvent) {
        let Some(quiz) = &mut self.quiz else {
            self.mode = Mode::List;
            return;
        };

        if quiz.is_finished() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char('q')) {
                self.back_to_list();
            }
            return;
        }

        match key.code {
            KeyCode::Esc => self.back_to_list(),
            KeyCode::Enter | KeyCode::Char(' ') => {
                quiz.advance();
            }
            KeyCode::Char(c @ '1'..='4') => {
                let index = c as usize - '1' as usize;
                quiz.answer_option(index);
            }
            _ => {}
        }
    }

    fn handle_test_key(&mut self, key: KeyEvent) {
        if self.test_report.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.back_to_list();
            }
            return;
        }

        let Some(test) = &mut self.test else {
            self.mode = Mode::List;
            return;
        };

        match key.code {
            KeyCode::Esc => self.back_to_list(),
            KeyCode::Enter => {
                test.submit(&self.answer_buffer);
                self.answer_buffer.clear();
                if let Some(report) = test.finish() {
                    tracing::debug!(correct = report.correct, total = report.total, "test finished");
                    self.test_report = Some(report);
                }
            }
            KeyCode::Backspace => {
                self.answer_buffer.pop();
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.answer_buffer.push(c)
            }
            _ => {}
        }
    }

    // Dialogs

    fn handle_dialog_key(&mut self, key: KeyEvent) {
        let Some(dialog) = self.dialog.take() else { return };
        self.dialog = self.dialog_key(dialog, key);
    }

    /// Returns the dialog to keep open, or `None` to close it.
    fn dialog_key(&mut self, dialog: Dialog, key: KeyEvent) -> Option<Dialog> {
        if key.code == KeyCode::Esc {
            return None;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match dialog {
            Dialog::AddSection { mut name } => match key.code {
                KeyCode::Enter => {
                    self.store.add_section(&name);
                    None
                }
                _ => {
                    edit_line(&mut name, key);
                    Some(Dialog::AddSection { name })
                }
            },
            Dialog::AddWord { section_id, mut fields } => match key.code {
                KeyCode::Tab | KeyCode::BackTab => {
                    fields.switch();
                    Some(Dialog::AddWord { section_id, fields })
                }
                KeyCode::Enter if fields.active == WordField::Original => {
                    fields.switch();
                    Some(Dialog::AddWord { section_id, fields })
                }
                KeyCode::Enter => {
                    if self
                        .store
                        .add_word(section_id, &fields.original, &fields.translation)
                        .is_some()
                    {
                        self.message = Some(format!("Added \"{}\"", fields.original.trim()));
                    }
                    None
                }
                _ => {
                    edit_line(fields.active_mut(), key);
                    Some(Dialog::AddWord { section_id, fields })
                }
            },
            Dialog::EditWord { section_id, word_id, mut fields } => match key.code {
                KeyCode::Tab | KeyCode::BackTab => {
                    fields.switch();
                    Some(Dialog::EditWord { section_id, word_id, fields })
                }
                KeyCode::Enter => {
                    self.store
                        .edit_word(section_id, word_id, &fields.original, &fields.translation);
                    None
                }
                _ => {
                    edit_line(fields.active_mut(), key);
                    Some(Dialog::EditWord { section_id, word_id, fields })
                }
            },
            Dialog::Import { mut text } => match key.code {
                KeyCode::Char('s') if ctrl => {
                    self.submit_import(&text);
                    None
                }
                KeyCode::Enter => {
                    text.push('\n');
                    Some(Dialog::Import { text })
                }
                KeyCode::Backspace => {
                    text.pop();
                    Some(Dialog::Import { text })
                }
                KeyCode::Char(c) if !ctrl => {
                    text.push(c);
                    Some(Dialog::Import { text })
                }
                _ => Some(Dialog::Import { text }),
            },
            Dialog::Share { name, text } => match key.code {
                KeyCode::Char('w') => {
                    self.write_share(&name, &text);
                    None
                }
                KeyCode::Enter | KeyCode::Char('q') => None,
                _ => Some(Dialog::Share { name, text }),
            },
            Dialog::ConfirmDelete { section_id, name } => match key.code {
                KeyCode::Char('y') | KeyCode::Enter => {
                    if self.store.delete_section(section_id) {
                        self.message = Some(format!("Deleted section \"{}\"", name));
                        self.clamp_section_cursor();
                    }
                    None
                }
                KeyCode::Char('n') => None,
                _ => Some(Dialog::ConfirmDelete { section_id, name }),
            },
        }
    }

    fn submit_import(&mut self, input: &str) {
        let text = match import_source(input) {
            Ok(text) => text,
            Err(e) => {
                self.message = Some(format!("Import failed: {}", e));
                return;
            }
        };
        self.message = Some(match self.store.import_section(&text) {
            Ok(outcome) => outcome.notice(),
            Err(e) => format!("Import failed: {}", e),
        });
    }

    fn write_share(&mut self, name: &str, text: &str) {
        let dir = self.config.export_dir();
        self.message = Some(match write_export(&dir, name, text) {
            Ok(path) => format!("Saved to {}", path.display()),
            Err(e) => {
                tracing::error!("export failed: {}", e);
                format!("Export failed: {}", e)
            }
        });
    }
}

fn open_storage(config: &Config) -> anyhow::Result<Box<dyn StorageAdapter>> {
    let storage: Box<dyn StorageAdapter> = match config.storage.backend {
        StorageBackend::Sqlite => Box::new(SqliteStorage::open(&config.db_path())?),
        StorageBackend::File => Box::new(FileStorage::new(config.data_dir())),
        StorageBackend::Memory => Box::new(MemoryStorage::new()),
    };
    tracing::info!(backend = storage.name(), "storage opened");
    Ok(storage)
}

fn edit_line(buffer: &mut String, key: KeyEvent) {
    match key.code {
        KeyCode::Backspace => {
            buffer.pop();
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => buffer.push(c),
        _ => {}
    }
}

/// A single line naming an existing file imports that file.
fn import_source(input: &str) -> std::io::Result<String> {
    let trimmed = input.trim();
    if !trimmed.contains('\n') {
        let path = Path::new(trimmed);
        if path.is_file() {
            return std::fs::read_to_string(path);
        }
    }
    Ok(input.to_string())
}

fn write_export(dir: &Path, name: &str, text: &str) -> std::io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!("{}.txt", file_stem(name)));
    std::fs::write(&path, text)?;
    Ok(path)
}

fn file_stem(name: &str) -> String {
    let stem: String = name
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' { c } else { '_' })
        .collect();
    if stem.is_empty() {
        "section".to_string()
    } else {
        stem
    }
}
