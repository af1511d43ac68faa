use std::path::PathBuf;

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use log::{error, warn};
use ratatui::layout::Rect;
use tui_textarea::{CursorMove, Input, Key, TextArea};

use crate::calendar::MonthKey;
use crate::export;
use crate::grid::{GridEvent, GridPatch};
use crate::session::Session;
use crate::state::HABIT_COUNT;
use crate::store::KvStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Browse,
    /// Editing the name of a habit row; every keystroke is persisted.
    Rename { row: usize },
    MonthInput,
}

pub struct App {
    pub session: Session<Box<dyn KvStore>>,
    pub mode: Mode,
    pub cursor_row: usize,
    pub cursor_day: u32,
    pub textarea: TextArea<'static>,
    pub month_input: String,
    pub status: Option<String>,
    pub export_dir: PathBuf,

    // UI areas for mouse support
    pub mark_cells: Vec<((usize, u32), Rect)>,
    pub name_cells: Vec<(usize, Rect)>,
    pub prev_month_btn: Rect,
    pub next_month_btn: Rect,
    pub month_field: Rect,
    pub go_btn: Rect,
    pub export_btn: Rect,
}

impl App {
    pub fn new(store: Box<dyn KvStore>, month: MonthKey, export_dir: PathBuf) -> Self {
        let mut app = Self {
            session: Session::new(store, month),
            mode: Mode::Browse,
            cursor_row: 0,
            cursor_day: 1,
            textarea: TextArea::new(vec![String::new()]),
            month_input: month.to_string(),
            status: None,
            export_dir,
            mark_cells: Vec::new(),
            name_cells: Vec::new(),
            prev_month_btn: Rect::default(),
            next_month_btn: Rect::default(),
            month_field: Rect::default(),
            go_btn: Rect::default(),
            export_btn: Rect::default(),
        };
        let rendered = app.session.render();
        app.report(rendered);
        app
    }

    pub fn is_editing(&self) -> bool {
        !matches!(self.mode, Mode::Browse)
    }

    pub fn editor_text(&self) -> String {
        self.textarea.lines().join(" ")
    }

    fn report<T>(&mut self, result: Result<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                error!("event=persist module=app status=error error={err:#}");
                self.status = Some(format!("Save failed: {err:#}"));
                None
            }
        }
    }

    pub fn open_month(&mut self, month: MonthKey) {
        self.mode = Mode::Browse;
        self.status = None;
        self.month_input = month.to_string();
        let rendered = self.session.select_month(month);
        self.report(rendered);
        self.clamp_cursor();
    }

    pub fn submit_month_input(&mut self) {
        match self.month_input.parse::<MonthKey>() {
            Ok(month) => self.open_month(month),
            Err(err) => {
                warn!("event=month_select module=app status=rejected input={}", self.month_input);
                self.mode = Mode::Browse;
                self.status = Some(format!("Invalid month: {err}"));
                self.month_input = self.session.month().to_string();
            }
        }
    }

    pub fn toggle(&mut self, row: usize, day: u32) {
        let applied = self.session.apply(GridEvent::Toggle { row, day });
        if let Some(GridPatch::Mark { .. }) = self.report(applied) {
            self.cursor_row = row;
            self.cursor_day = day;
        }
    }

    pub fn start_rename(&mut self, row: usize) {
        if row >= HABIT_COUNT {
            return;
        }
        let name = self.session.state().habits[row].clone();
        self.textarea = TextArea::new(vec![name]);
        self.textarea.move_cursor(CursorMove::End);
        self.cursor_row = row;
        self.mode = Mode::Rename { row };
    }

    fn push_rename(&mut self, row: usize) {
        let text = self.editor_text();
        let applied = self.session.apply(GridEvent::Rename { row, text });
        self.report(applied);
    }

    pub fn export_charts(&mut self) {
        match export::write_charts(&self.session, &self.export_dir) {
            Ok(files) => {
                self.status = Some(format!(
                    "Exported {} chart(s) to {}",
                    files.len(),
                    self.export_dir.display()
                ));
            }
            Err(err) => {
                error!("event=chart_export module=app status=error error={err:#}");
                self.status = Some(format!("Export failed: {err:#}"));
            }
        }
    }

    fn clamp_cursor(&mut self) {
        let last = self.session.days_in_month().max(1);
        self.cursor_day = self.cursor_day.clamp(1, last);
        self.cursor_row = self.cursor_row.min(HABIT_COUNT - 1);
    }

    fn move_cursor(&mut self, rows: isize, days: i64) {
        let row = self.cursor_row as isize + rows;
        self.cursor_row = row.clamp(0, HABIT_COUNT as isize - 1) as usize;
        let day = self.cursor_day as i64 + days;
        self.cursor_day = day.clamp(1, self.session.days_in_month().max(1) as i64) as u32;
    }
}

/// Handles one key press. Returns `true` when the app should quit.
pub fn handle_key(app: &mut App, key: KeyEvent) -> Result<bool> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Ok(true);
    }

    match app.mode {
        Mode::Rename { row } => {
            handle_rename_key(app, row, key);
            return Ok(false);
        }
        Mode::MonthInput => {
            match key.code {
                KeyCode::Esc => {
                    app.mode = Mode::Browse;
                    app.month_input = app.session.month().to_string();
                }
                KeyCode::Enter => app.submit_month_input(),
                KeyCode::Backspace => {
                    app.month_input.pop();
                }
                KeyCode::Char(c) if c.is_ascii_digit() || c == '-' => {
                    if app.month_input.len() < 8 {
                        app.month_input.push(c);
                    }
                }
                _ => {}
            }
            return Ok(false);
        }
        Mode::Browse => {}
    }

    match key.code {
        KeyCode::Char('q') => return Ok(true),
        KeyCode::Left => app.move_cursor(0, -1),
        KeyCode::Right => app.move_cursor(0, 1),
        KeyCode::Up => app.move_cursor(-1, 0),
        KeyCode::Down => app.move_cursor(1, 0),
        KeyCode::Home => app.cursor_day = 1,
        KeyCode::End => app.cursor_day = app.session.days_in_month(),
        KeyCode::Char(' ') => app.toggle(app.cursor_row, app.cursor_day),
        KeyCode::Enter | KeyCode::Char('e') => app.start_rename(app.cursor_row),
        KeyCode::Char('[') => app.open_month(app.session.month().pred()),
        KeyCode::Char(']') => app.open_month(app.session.month().succ()),
        KeyCode::Char('t') => app.open_month(MonthKey::current()),
        KeyCode::Char('m') => {
            app.month_input.clear();
            app.mode = Mode::MonthInput;
        }
        KeyCode::Char('x') => app.export_charts(),
        KeyCode::Esc => app.status = None,
        _ => {}
    }
    Ok(false)
}

fn handle_rename_key(app: &mut App, row: usize, key: KeyEvent) {
    if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
        app.mode = Mode::Browse;
        return;
    }

    // Forward editing keys to the textarea; the name stays a single line.
    let input = Input {
        key: match key.code {
            KeyCode::Char(c) => Key::Char(c),
            KeyCode::Backspace => Key::Backspace,
            KeyCode::Delete => Key::Delete,
            KeyCode::Left => Key::Left,
            KeyCode::Right => Key::Right,
            KeyCode::Home => Key::Home,
            KeyCode::End => Key::End,
            _ => Key::Null,
        },
        ctrl: key.modifiers.contains(KeyModifiers::CONTROL),
        alt: key.modifiers.contains(KeyModifiers::ALT),
    };
    // Ctrl+M and Ctrl+J insert a line break; names are single-line.
    let line_break = input.ctrl && matches!(input.key, Key::Char('m' | 'j'));
    if line_break || matches!(input.key, Key::Null) {
        return;
    }
    let before = app.editor_text();
    app.textarea.input(input);
    if app.editor_text() != before {
        app.push_rename(row);
    }
}

fn inside_rect(mouse: MouseEvent, rect: Rect) -> bool {
    mouse.row >= rect.y
        && mouse.row < rect.y + rect.height
        && mouse.column >= rect.x
        && mouse.column < rect.x + rect.width
}

pub fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    if !matches!(mouse.kind, MouseEventKind::Down(MouseButton::Left)) {
        return;
    }

    if inside_rect(mouse, app.month_field) {
        app.month_input.clear();
        app.mode = Mode::MonthInput;
        return;
    }
    if inside_rect(mouse, app.go_btn) {
        app.submit_month_input();
        return;
    }

    // Any other click ends text entry first.
    if app.is_editing() {
        if matches!(app.mode, Mode::MonthInput) {
            app.month_input = app.session.month().to_string();
        }
        app.mode = Mode::Browse;
    }

    if inside_rect(mouse, app.prev_month_btn) {
        app.open_month(app.session.month().pred());
        return;
    }
    if inside_rect(mouse, app.next_month_btn) {
        app.open_month(app.session.month().succ());
        return;
    }
    if inside_rect(mouse, app.export_btn) {
        app.export_charts();
        return;
    }

    let mark_hit = app
        .mark_cells
        .iter()
        .find(|(_, rect)| inside_rect(mouse, *rect))
        .map(|&(cell, _)| cell);
    if let Some((row, day)) = mark_hit {
        app.toggle(row, day);
        return;
    }
    let name_hit = app
        .name_cells
        .iter()
        .find(|(_, rect)| inside_rect(mouse, *rect))
        .map(|&(row, _)| row);
    if let Some(row) = name_hit {
        app.start_rename(row);
    }
}
