//! UI rendering for the vocabulary trainer.

use crate::app::{App, Dialog, Focus, Mode, WordField, WordFields};
use crate::theme::Palette;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, Paragraph, Wrap},
    Frame,
};
use vocab_core::{QuizSession, Rating, Section};

/// Placeholder for a hidden word list cell.
const HIDDEN: &str = "...";

pub fn draw(f: &mut Frame, app: &mut App) {
    let palette = Palette::for_theme(app.store.theme());
    f.render_widget(Block::default().style(palette.base()), f.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(3)])
        .split(f.area());

    draw_header(f, app, &palette, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(chunks[1]);

    draw_sections(f, app, &palette, body[0]);
    match app.mode {
        Mode::List => draw_word_list(f, app, &palette, body[1]),
        Mode::Flashcards => draw_flashcards(f, app, &palette, body[1]),
        Mode::Quiz => draw_quiz(f, app, &palette, body[1]),
        Mode::Test => draw_test(f, app, &palette, body[1]),
    }

    draw_footer(f, app, &palette, chunks[2]);

    if let Some(dialog) = &app.dialog {
        draw_dialog(f, dialog, &palette);
    }

    if app.show_help {
        draw_help(f, &palette);
    }

    if let Some(msg) = &app.message {
        draw_message(f, msg, &palette);
    }
}

fn draw_header(f: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let spans = vec![
        Span::styled("Vocab Trainer", palette.title()),
        Span::raw("  "),
        Span::styled(format!("[{}]", app.mode.name()), palette.dim()),
        Span::raw("  "),
        Span::styled(format!("{} theme", app.store.theme().name()), palette.dim()),
        Span::raw("  "),
        Span::styled(format!("{} storage", app.store.storage_name()), palette.dim()),
    ];
    let header = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, area);
}

fn draw_sections(f: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let border_style = if app.focus == Focus::Sections && app.mode == Mode::List {
        Style::default().fg(palette.accent)
    } else {
        palette.dim()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(" Sections ");

    if app.store.sections().is_empty() {
        let msg = Paragraph::new("No sections yet.\nPress 'a' to create one\nor 'i' to import.")
            .alignment(Alignment::Center)
            .style(palette.dim())
            .block(block);
        f.render_widget(msg, area);
        return;
    }

    let active = app.store.active_section_id();
    let items: Vec<ListItem> = app
        .store
        .sections()
        .iter()
        .enumerate()
        .map(|(i, section)| {
            let marker = if Some(section.id) == active { "● " } else { "  " };
            let mut spans = vec![
                Span::styled(marker, Style::default().fg(palette.accent)),
                Span::raw(section.name.as_str()),
            ];
            if app.config.display.show_word_counts {
                spans.push(Span::styled(format!(" ({})", section.len()), palette.dim()));
            }
            let style = if i == app.selected_section {
                palette.selected()
            } else {
                Style::default()
            };
            ListItem::new(Line::from(spans)).style(style)
        })
        .collect();

    f.render_widget(List::new(items).block(block), area);
}

fn section_block<'a>(section: &Section, app: &App, palette: &Palette) -> Block<'a> {
    let focused = app.focus == Focus::Words || app.mode != Mode::List;
    Block::default()
        .borders(Borders::ALL)
        .border_style(if focused { Style::default().fg(palette.accent) } else { palette.dim() })
        .title(format!(" {} - {} ", section.name, app.mode.name()))
}

fn draw_word_list(f: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let Some(section) = app.active_section() else {
        let msg = Paragraph::new("Select a section with Enter, or create one with 'a'.")
            .alignment(Alignment::Center)
            .style(palette.dim())
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(msg, area);
        return;
    };

    let block = section_block(section, app, palette);
    if section.is_empty() {
        let msg = Paragraph::new("No words yet. Press Tab, then 'a' to add one.")
            .alignment(Alignment::Center)
            .style(palette.dim())
            .block(block);
        f.render_widget(msg, area);
        return;
    }

    let items: Vec<ListItem> = section
        .words
        .iter()
        .enumerate()
        .map(|(i, word)| {
            let original = if app.hide_originals { HIDDEN } else { word.original.as_str() };
            let translation = if app.hide_translations { HIDDEN } else { word.translation.as_str() };
            let spans = vec![
                Span::styled(original, Style::default().add_modifier(Modifier::BOLD)),
                Span::styled("  →  ", palette.dim()),
                Span::raw(translation),
            ];
            let style = if app.focus == Focus::Words && i == app.selected_word {
                palette.selected()
            } else {
                Style::default()
            };
            ListItem::new(Line::from(spans)).style(style)
        })
        .collect();

    f.render_widget(List::new(items).block(block), area);
}

fn draw_flashcards(f: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let Some(section) = app.active_section() else { return };
    let Some(word) = section.words.get(app.flashcards.current_index()) else { return };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    let (text, title, style) = if app.flashcards.is_flipped() {
        (word.translation.as_str(), " Back ", palette.good())
    } else {
        (word.original.as_str(), " Front ", Style::default().add_modifier(Modifier::BOLD))
    };

    let card = Paragraph::new(vec![Line::raw(""), Line::styled(text, style)])
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(section_block(section, app, palette).title_bottom(title));
    f.render_widget(card, chunks[0]);

    let (pos, total) = app.flashcards.progress();
    let progress = Paragraph::new(format!("{} / {}", pos, total))
        .alignment(Alignment::Center)
        .style(palette.dim());
    f.render_widget(progress, chunks[1]);
}

fn draw_quiz(f: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let (Some(section), Some(quiz)) = (app.active_section(), app.quiz.as_ref()) else { return };
    let block = section_block(section, app, palette);

    if quiz.is_finished() {
        let summary = quiz.summary();
        draw_results(
            f,
            palette,
            area,
            block,
            summary.rating,
            summary.percentage,
            format!("Your score: {} of {}", summary.score, summary.total),
            Vec::new(),
        );
        return;
    }

    let Some(question) = quiz.current() else { return };
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Progress
            Constraint::Length(3), // Prompt
            Constraint::Min(0),    // Options
            Constraint::Length(1), // Feedback
        ])
        .split(inner);

    let progress = format!(
        "Question {} of {}   Score: {}",
        quiz.position() + 1,
        quiz.len(),
        quiz.score()
    );
    f.render_widget(Paragraph::new(progress).style(palette.dim()), chunks[0]);

    let prompt = Paragraph::new(question.prompt.as_str())
        .alignment(Alignment::Center)
        .style(palette.title())
        .block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(prompt, chunks[1]);

    let items: Vec<ListItem> = question
        .options
        .iter()
        .enumerate()
        .map(|(i, option)| {
            let style = option_style(quiz, option, palette);
            ListItem::new(Line::from(vec![
                Span::styled(format!("[{}] ", i + 1), Style::default().fg(palette.accent)),
                Span::styled(option.as_str(), style),
            ]))
        })
        .collect();
    f.render_widget(List::new(items), chunks[2]);

    let feedback = match quiz.selected() {
        Some(choice) if question.is_correct(choice) => {
            Line::styled("Correct!  Enter: next question", palette.good())
        }
        Some(_) => Line::styled(
            format!("Wrong, it is \"{}\".  Enter: next question", question.correct_answer),
            palette.bad(),
        ),
        None => Line::styled("Press 1-4 to answer", palette.dim()),
    };
    f.render_widget(Paragraph::new(feedback), chunks[3]);
}

fn option_style(quiz: &QuizSession, option: &str, palette: &Palette) -> Style {
    let (Some(selected), Some(question)) = (quiz.selected(), quiz.current()) else {
        return Style::default();
    };
    if question.is_correct(option) {
        palette.good()
    } else if option == selected {
        palette.bad().add_modifier(Modifier::CROSSED_OUT)
    } else {
        palette.dim()
    }
}

fn draw_test(f: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    let Some(section) = app.active_section() else { return };
    let block = section_block(section, app, palette);

    if let Some(report) = &app.test_report {
        let mut lines = Vec::new();
        if !report.mistakes.is_empty() {
            lines.push(Line::styled("Your mistakes:", palette.title()));
        }
        for mistake in &report.mistakes {
            lines.push(Line::styled(mistake.prompt.clone(), Style::default().add_modifier(Modifier::BOLD)));
            lines.push(Line::from(vec![
                Span::styled("  Your answer: ", palette.dim()),
                Span::styled(mistake.submitted_display().to_string(), palette.bad()),
            ]));
            lines.push(Line::from(vec![
                Span::styled("  Correct:     ", palette.dim()),
                Span::styled(mistake.expected_answer.clone(), palette.good()),
            ]));
        }
        draw_results(
            f,
            palette,
            area,
            block,
            report.rating,
            report.percentage,
            format!("You answered {} of {} correctly", report.correct, report.total),
            lines,
        );
        return;
    }

    let Some(test) = &app.test else { return };
    let Some(item) = test.current() else { return };
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(inner);

    let progress = format!("Question {} of {}", test.position() + 1, test.len());
    f.render_widget(Paragraph::new(progress).style(palette.dim()), chunks[0]);

    let prompt = Paragraph::new(item.prompt.as_str())
        .alignment(Alignment::Center)
        .style(palette.title());
    f.render_widget(prompt, chunks[1]);

    let input = Paragraph::new(app.answer_buffer.as_str())
        .style(Style::default().fg(palette.warning))
        .block(Block::default().borders(Borders::ALL).title(" Translation "));
    f.render_widget(input, chunks[2]);
    f.set_cursor_position((text_cursor_x(chunks[2], &app.answer_buffer), chunks[2].y + 1));
}

#[allow(clippy::too_many_arguments)]
fn draw_results(
    f: &mut Frame,
    palette: &Palette,
    area: Rect,
    block: Block,
    rating: Rating,
    percentage: f64,
    score_line: String,
    details: Vec<Line>,
) {
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(inner);

    let rating_style = match rating {
        Rating::Perfect | Rating::Outstanding | Rating::VeryGood => palette.good(),
        Rating::WellDone => palette.title(),
        Rating::RoomToImprove | Rating::KeepPracticing => palette.bad(),
    };
    f.render_widget(
        Paragraph::new(rating.label()).alignment(Alignment::Center).style(rating_style),
        chunks[0],
    );

    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL))
        .gauge_style(Style::default().fg(palette.accent).bg(palette.selection_bg))
        .ratio((percentage / 100.0).clamp(0.0, 1.0))
        .label(format!("{:.0}%", percentage));
    f.render_widget(gauge, chunks[1]);

    f.render_widget(Paragraph::new(score_line).alignment(Alignment::Center), chunks[2]);
    f.render_widget(Paragraph::new(details).wrap(Wrap { trim: false }), chunks[3]);
    f.render_widget(
        Paragraph::new("Enter: back to section").alignment(Alignment::Center).style(palette.dim()),
        chunks[4],
    );
}

fn draw_footer(f: &mut Frame, app: &App, palette: &Palette, area: Rect) {
    if let Some(err) = app.store.last_persist_error() {
        let warning = Paragraph::new(format!("Not saved: {}", err))
            .style(Style::default().fg(palette.warning))
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(warning, area);
        return;
    }

    let hints = match (app.mode, app.focus) {
        (Mode::List, Focus::Sections) => {
            "j/k:Navigate  Enter:Open  a:Add  d:Delete  s:Share  i:Import  2/3/4:Cards/Quiz/Test  t:Theme  ?:Help  q:Quit"
        }
        (Mode::List, Focus::Words) => {
            "j/k:Navigate  a:Add word  e:Edit  d:Delete  o/r:Hide originals/translations  s:Share  Tab:Sections  2/3/4:Study"
        }
        (Mode::Flashcards, _) => "Space:Flip  h/l:Previous/Next  Esc:Back",
        (Mode::Quiz, _) => "1-4:Answer  Enter:Next  Esc:Quit quiz",
        (Mode::Test, _) => "Type the translation  Enter:Submit  Esc:Quit test",
    };
    let footer = Paragraph::new(hints)
        .style(palette.dim())
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(footer, area);
}

fn draw_dialog(f: &mut Frame, dialog: &Dialog, palette: &Palette) {
    match dialog {
        Dialog::AddSection { name } => draw_input(f, "New section name", name, palette),
        Dialog::AddWord { fields, .. } => draw_word_fields(f, "Add word", fields, palette),
        Dialog::EditWord { fields, .. } => draw_word_fields(f, "Edit word", fields, palette),
        Dialog::Import { text } => draw_text_area(
            f,
            " Import section ",
            text,
            "Paste shared text or a file path  Ctrl+S:Import  Esc:Cancel",
            palette,
            true,
        ),
        Dialog::Share { name, text } => draw_text_area(
            f,
            &format!(" Share \"{}\" ", name),
            text,
            "w:Save to file  Enter/Esc:Close",
            palette,
            false,
        ),
        Dialog::ConfirmDelete { name, .. } => {
            let area = centered_rect(50, 20, f.area());
            f.render_widget(Clear, area);
            let text = format!(
                "Delete section \"{}\" and all of its words?\n\ny:Delete  n/Esc:Cancel",
                name
            );
            let popup = Paragraph::new(text)
                .alignment(Alignment::Center)
                .style(palette.base())
                .wrap(Wrap { trim: true })
                .block(Block::default().borders(Borders::ALL).border_style(palette.bad()).title(" Confirm "));
            f.render_widget(popup, area);
        }
    }
}

fn draw_input(f: &mut Frame, title: &str, value: &str, palette: &Palette) {
    let area = centered_rect(50, 15, f.area());
    let area = Rect { height: area.height.min(3), ..area };
    f.render_widget(Clear, area);

    let input = Paragraph::new(value)
        .style(Style::default().fg(palette.warning).bg(palette.bg))
        .block(Block::default().borders(Borders::ALL).title(format!(" {} ", title)));
    f.render_widget(input, area);

    f.set_cursor_position((text_cursor_x(area, value), area.y + 1));
}

fn draw_word_fields(f: &mut Frame, title: &str, fields: &WordFields, palette: &Palette) {
    let area = centered_rect(50, 30, f.area());
    f.render_widget(Clear, area);

    let outer = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", title))
        .title_bottom(" Tab:Switch field  Enter:Save  Esc:Cancel ")
        .style(palette.base());
    let inner = outer.inner(area);
    f.render_widget(outer, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(3), Constraint::Min(0)])
        .split(inner);

    for (row, label, value, field) in [
        (rows[0], "Original", &fields.original, WordField::Original),
        (rows[1], "Translation", &fields.translation, WordField::Translation),
    ] {
        let active = fields.active == field;
        let border = if active { Style::default().fg(palette.accent) } else { palette.dim() };
        let input = Paragraph::new(value.as_str())
            .style(Style::default().fg(palette.warning))
            .block(Block::default().borders(Borders::ALL).border_style(border).title(format!(" {} ", label)));
        f.render_widget(input, row);
        if active {
            f.set_cursor_position((text_cursor_x(row, value), row.y + 1));
        }
    }
}

fn draw_text_area(f: &mut Frame, title: &str, text: &str, hint: &str, palette: &Palette, editable: bool) {
    let area = centered_rect(70, 70, f.area());
    f.render_widget(Clear, area);

    let body = Paragraph::new(text)
        .style(palette.base())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title.to_string())
                .title_bottom(format!(" {} ", hint)),
        );
    f.render_widget(body, area);

    if editable {
        let last = text.split('\n').last().unwrap_or("");
        let line_count = u16::try_from(text.split('\n').count().max(1)).unwrap_or(u16::MAX);
        let y = area
            .y
            .saturating_add(line_count)
            .min(area.y.saturating_add(area.height.saturating_sub(2)));
        f.set_cursor_position((text_cursor_x(area, last), y));
    }
}

fn draw_help(f: &mut Frame, palette: &Palette) {
    let area = centered_rect(60, 80, f.area());
    f.render_widget(Clear, area);

    let help = r#"
Vocab Trainer Keybindings

Sections:
  j/k, Up/Down    Navigate sections
  Enter, Space    Open section
  a               Add section
  d               Delete section
  s               Share section as text
  i               Import section
  Tab             Switch to word list

Words:
  a               Add word
  e, Enter        Edit word
  d, Delete       Delete word
  o               Hide/show all originals
  r               Hide/show all translations

Study:
  2               Flashcards (Space flip, h/l navigate)
  3               Quiz (needs 4 words, 1-4 answer)
  4               Test (type answers, Enter submit)

General:
  t               Toggle light/dark theme
  ?               Show this help
  q               Quit

Press any key to close
"#;

    let popup = Paragraph::new(help)
        .style(palette.base())
        .block(Block::default().borders(Borders::ALL).title(" Help "))
        .wrap(Wrap { trim: false });
    f.render_widget(popup, area);
}

fn draw_message(f: &mut Frame, msg: &str, palette: &Palette) {
    let area = Rect::new(
        f.area().x + 2,
        f.area().height.saturating_sub(5),
        f.area().width.saturating_sub(4),
        3,
    );
    f.render_widget(Clear, area);

    let message = Paragraph::new(msg)
        .style(Style::default().fg(palette.accent).bg(palette.bg))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(message, area);
}

/// Column just after `text` inside a bordered box, clamped to the box.
fn text_cursor_x(area: Rect, text: &str) -> u16 {
    let len = u16::try_from(text.chars().count()).unwrap_or(u16::MAX);
    let right = area.x.saturating_add(area.width.saturating_sub(2));
    area.x.saturating_add(1).saturating_add(len).min(right)
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
