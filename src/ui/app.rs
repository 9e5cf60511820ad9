use std::cmp::min;
use std::mem;

use anyhow::{Error, Result};
use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

use crate::db::SqliteStore;
use crate::models::Movie;
use crate::view::{CatalogView, ViewStatus};

use super::forms::{ConfirmMovieDelete, MovieField, MovieForm};
use super::helpers::{centered_rect, movie_card_lines, surface_error};
use super::screens::{move_in_grid, FilterPicker, PickerOutcome};

/// Cards per row in the movie grid.
const GRID_COLUMNS: usize = 2;
/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Height of one movie card including its border.
const CARD_HEIGHT: u16 = 6;

/// Modal state on top of the movie list.
enum Mode {
    Normal,
    Searching(SearchState),
    PickingFilter(FilterPicker),
    AddingMovie(MovieForm),
    EditingMovie { id: i64, form: MovieForm },
    ConfirmDelete(ConfirmMovieDelete),
}

/// State for an active inline search.
struct SearchState {
    query: String,
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Terminal front-end state. All catalog reads and writes go through the
/// view controller; the app only tracks selection and modal input.
pub struct App {
    view: CatalogView<SqliteStore>,
    selected: usize,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    /// Wrap a view and perform the first load.
    pub fn new(view: CatalogView<SqliteStore>) -> Self {
        let mut app = Self {
            view,
            selected: 0,
            mode: Mode::Normal,
            status: None,
        };
        app.resume();
        app
    }

    /// Returns `true` once the user asked to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit),
            Mode::Searching(state) => self.handle_search(code, state),
            Mode::PickingFilter(picker) => self.handle_filter_picker(code, picker),
            Mode::AddingMovie(form) => self.handle_movie_form(code, None, form),
            Mode::EditingMovie { id, form } => self.handle_movie_form(code, Some(id), form),
            Mode::ConfirmDelete(confirm) => self.handle_confirm_delete(code, confirm),
        };

        Ok(exit)
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Mode {
        match code {
            KeyCode::Char('q') => *exit = true,
            KeyCode::Esc => {
                if self.view.filter_state().search_text.is_empty() {
                    *exit = true;
                } else {
                    self.view.set_search_text("");
                    self.clamp_selection();
                }
            }
            KeyCode::Left => self.move_selection(-1),
            KeyCode::Right => self.move_selection(1),
            KeyCode::Up => self.move_selection(-(GRID_COLUMNS as isize)),
            KeyCode::Down => self.move_selection(GRID_COLUMNS as isize),
            KeyCode::Char('/') => {
                self.clear_status();
                return Mode::Searching(SearchState {
                    query: self.view.filter_state().search_text.clone(),
                });
            }
            KeyCode::Char('f') | KeyCode::Char('F') => {
                self.clear_status();
                return Mode::PickingFilter(FilterPicker::new(
                    self.view.filter_state().filter.as_ref(),
                ));
            }
            KeyCode::Char('c') | KeyCode::Char('C') => {
                self.view.set_search_text("");
                match self.view.clear_filter() {
                    Ok(()) => self.set_status("Showing all movies.", StatusKind::Info),
                    Err(err) => self.report(err.into()),
                }
                self.clamp_selection();
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.clear_status();
                self.resume();
            }
            KeyCode::Char('+') | KeyCode::Char('a') => {
                self.clear_status();
                return Mode::AddingMovie(MovieForm::default());
            }
            KeyCode::Char('e') | KeyCode::Char('E') | KeyCode::Enter => {
                if let Some(movie) = self.current_movie().cloned() {
                    self.clear_status();
                    let form = MovieForm::from_movie(&movie, self.view.config());
                    return Mode::EditingMovie { id: movie.id, form };
                }
                self.set_status("No movie selected to edit.", StatusKind::Error);
            }
            KeyCode::Char('-') | KeyCode::Delete => {
                if let Some(movie) = self.current_movie().cloned() {
                    self.clear_status();
                    return Mode::ConfirmDelete(ConfirmMovieDelete { movie });
                }
                self.set_status("No movie selected to delete.", StatusKind::Error);
            }
            _ => {}
        }
        Mode::Normal
    }

    fn handle_search(&mut self, code: KeyCode, mut state: SearchState) -> Mode {
        match code {
            KeyCode::Esc => {
                self.view.set_search_text("");
                self.clamp_selection();
                return Mode::Normal;
            }
            KeyCode::Enter => return Mode::Normal,
            KeyCode::Up => self.move_selection(-(GRID_COLUMNS as isize)),
            KeyCode::Down => self.move_selection(GRID_COLUMNS as isize),
            KeyCode::Backspace => {
                state.query.pop();
                self.view.set_search_text(state.query.clone());
                self.selected = 0;
            }
            KeyCode::Char(ch) if !ch.is_control() => {
                state.query.push(ch);
                self.view.set_search_text(state.query.clone());
                self.selected = 0;
            }
            _ => {}
        }
        Mode::Searching(state)
    }

    fn handle_filter_picker(&mut self, code: KeyCode, mut picker: FilterPicker) -> Mode {
        match code {
            KeyCode::Esc => match picker.back() {
                Some(previous) => return Mode::PickingFilter(previous),
                None => return Mode::Normal,
            },
            KeyCode::Up => picker.move_selection(-1, self.view.config()),
            KeyCode::Down => picker.move_selection(1, self.view.config()),
            KeyCode::Enter => match picker.confirm(self.view.config()) {
                PickerOutcome::Continue(next) => return Mode::PickingFilter(next),
                PickerOutcome::Apply(filter) => {
                    let message = match &filter {
                        Some(active) => format!("Filtering by {active}."),
                        None => "Filter cleared.".to_string(),
                    };
                    match self.view.set_filter(filter) {
                        Ok(()) => self.set_status(message, StatusKind::Info),
                        Err(err) => self.report(err.into()),
                    }
                    self.selected = 0;
                    return Mode::Normal;
                }
            },
            _ => {}
        }
        Mode::PickingFilter(picker)
    }

    fn handle_movie_form(&mut self, code: KeyCode, id: Option<i64>, mut form: MovieForm) -> Mode {
        let mut keep_open = true;
        match code {
            KeyCode::Esc => {
                self.set_status(
                    if id.is_some() {
                        "Edit cancelled."
                    } else {
                        "Add cancelled."
                    },
                    StatusKind::Info,
                );
                keep_open = false;
            }
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.previous_field(),
            KeyCode::Left => {
                form.cycle_choice(self.view.config(), false);
            }
            KeyCode::Right => {
                form.cycle_choice(self.view.config(), true);
            }
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match self.save_movie(id, &form) {
                Ok(message) => {
                    self.report_write(message);
                    keep_open = false;
                }
                Err(err) => {
                    let message = surface_error(&err);
                    form.error = Some(message.clone());
                    self.set_status(message, StatusKind::Error);
                }
            },
            KeyCode::Char(' ') if matches!(form.active, MovieField::Genre | MovieField::Priority) => {
                form.cycle_choice(self.view.config(), true);
            }
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }

        if keep_open {
            match id {
                Some(id) => Mode::EditingMovie { id, form },
                None => Mode::AddingMovie(form),
            }
        } else {
            self.resume();
            Mode::Normal
        }
    }

    fn handle_confirm_delete(&mut self, code: KeyCode, confirm: ConfirmMovieDelete) -> Mode {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status("Deletion cancelled.", StatusKind::Info);
                self.resume();
                Mode::Normal
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                match self.view.delete(confirm.movie.id) {
                    Ok(true) => {
                        self.report_write(format!("Deleted '{}'.", confirm.movie.title));
                    }
                    Ok(false) => {
                        self.set_status("Movie was already deleted.", StatusKind::Error);
                    }
                    Err(err) => {
                        self.report(err.into());
                        return Mode::ConfirmDelete(confirm);
                    }
                }
                self.clamp_selection();
                Mode::Normal
            }
            _ => Mode::ConfirmDelete(confirm),
        }
    }

    fn save_movie(&mut self, id: Option<i64>, form: &MovieForm) -> Result<String> {
        let draft = form.parse_inputs(self.view.config())?;
        let title = draft.title.clone();
        match id {
            None => {
                let new_id = self.view.add(draft)?;
                self.focus(new_id);
                Ok(format!("Saved '{title}'."))
            }
            Some(id) => {
                if self.view.update(id, draft)? {
                    self.focus(id);
                    Ok(format!("Updated '{title}'."))
                } else {
                    Ok("Movie no longer exists; nothing updated.".to_string())
                }
            }
        }
    }

    /// Screen-resume hook: re-read the store under the current filter.
    fn resume(&mut self) {
        if let Err(err) = self.view.on_screen_active() {
            self.report(err.into());
        }
        self.clamp_selection();
    }

    /// The write went through; flag it if the list could not be re-read.
    fn report_write(&mut self, message: String) {
        match self.view.status().clone() {
            ViewStatus::Failed(reason) => {
                let text = format!("{message} The list could not be refreshed: {reason}");
                self.set_status(text, StatusKind::Error);
            }
            _ => self.set_status(message, StatusKind::Info),
        }
    }

    fn report(&mut self, err: Error) {
        let message = surface_error(&err);
        self.set_status(message, StatusKind::Error);
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        self.draw_catalog(frame, content_area);

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }

        match &self.mode {
            Mode::Searching(state) => self.draw_search_bar(frame, area, state),
            Mode::PickingFilter(picker) => self.draw_filter_picker(frame, area, picker),
            Mode::AddingMovie(form) => self.draw_movie_form(frame, area, "Add Movie", form),
            Mode::EditingMovie { form, .. } => {
                self.draw_movie_form(frame, area, "Edit Movie", form)
            }
            Mode::ConfirmDelete(confirm) => self.draw_confirm_delete(frame, area, confirm),
            Mode::Normal => {}
        }
    }

    fn draw_catalog(&self, frame: &mut Frame, area: Rect) {
        let state = self.view.filter_state();
        let mut summary = vec![Span::styled(
            format!("Movies ({})", self.view.movies().len()),
            Style::default().add_modifier(Modifier::BOLD),
        )];
        if let Some(active) = &state.filter {
            summary.push(Span::styled(
                format!("   {active}"),
                Style::default().fg(Color::Magenta),
            ));
        }
        if !state.search_text.is_empty() {
            summary.push(Span::styled(
                format!("   Search: \"{}\"", state.search_text),
                Style::default().fg(Color::Cyan),
            ));
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .title(Line::from(summary));
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let movies = self.view.movies();
        if movies.is_empty() {
            let (text, style) = match self.view.status() {
                ViewStatus::Failed(reason) => (
                    format!("Could not load movies: {reason}"),
                    Style::default().fg(Color::Red),
                ),
                _ if state.is_narrowed() => (
                    "No movies match the current search or filter.".to_string(),
                    Style::default().fg(Color::Gray),
                ),
                _ => (
                    "No movies yet. Press '+' to add one.".to_string(),
                    Style::default().fg(Color::Gray),
                ),
            };
            let message = Paragraph::new(text)
                .style(style)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true });
            frame.render_widget(message, inner);
            return;
        }

        self.render_movie_cards(frame, inner);
    }

    fn render_movie_cards(&self, frame: &mut Frame, area: Rect) {
        let movies = self.view.movies();
        if area.height == 0 {
            return;
        }

        let visible_rows = ((area.height / CARD_HEIGHT) as usize).max(1);
        let total_rows = movies.len().div_ceil(GRID_COLUMNS);
        let selected_row = self.selected / GRID_COLUMNS;
        let mut first_row = if selected_row >= visible_rows {
            selected_row + 1 - visible_rows
        } else {
            0
        };
        if first_row + visible_rows > total_rows {
            first_row = total_rows.saturating_sub(visible_rows);
        }
        let last_row = min(first_row + visible_rows, total_rows);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(
                (first_row..last_row)
                    .map(|_| Constraint::Length(CARD_HEIGHT))
                    .collect::<Vec<_>>(),
            )
            .split(area);

        for (row_offset, row_area) in rows.iter().enumerate() {
            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)])
                .split(*row_area);

            for (column, cell) in columns.iter().enumerate() {
                let index = (first_row + row_offset) * GRID_COLUMNS + column;
                let Some(movie) = movies.get(index) else {
                    break;
                };
                let selected = index == self.selected;
                let mut block = Block::default().borders(Borders::ALL);
                if selected {
                    block = block.style(Style::default().fg(Color::Yellow));
                }
                let card = Paragraph::new(movie_card_lines(movie, selected))
                    .block(block)
                    .wrap(Wrap { trim: true });
                frame.render_widget(card, *cell);
            }
        }
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let paragraph = Paragraph::new(vec![status_line, self.footer_instructions()])
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let hints: &[(&str, &str)] = match &self.mode {
            Mode::Normal => &[
                ("[←↑↓→]", " Move   "),
                ("[/]", " Search   "),
                ("[F]", " Filter   "),
                ("[C]", " Clear   "),
                ("[+]", " Add   "),
                ("[E]", " Edit   "),
                ("[-]", " Delete   "),
                ("[Q]", " Quit"),
            ],
            Mode::Searching(_) => &[
                ("[Type]", " Search titles   "),
                ("[Enter]", " Keep   "),
                ("[Esc]", " Clear"),
            ],
            Mode::PickingFilter(_) => &[
                ("[↑↓]", " Navigate   "),
                ("[Enter]", " Select   "),
                ("[Esc]", " Back"),
            ],
            Mode::AddingMovie(_) | Mode::EditingMovie { .. } => &[
                ("[Tab]", " Next field   "),
                ("[←→]", " Change choice   "),
                ("[Enter]", " Save   "),
                ("[Esc]", " Cancel"),
            ],
            Mode::ConfirmDelete(_) => &[("[Y]", " Delete   "), ("[N]", " Keep")],
        };

        Line::from(
            hints
                .iter()
                .flat_map(|(key, label)| {
                    [
                        Span::styled(key.to_string(), key_style),
                        Span::raw(label.to_string()),
                    ]
                })
                .collect::<Vec<_>>(),
        )
    }

    fn draw_search_bar(&self, frame: &mut Frame, area: Rect, state: &SearchState) {
        let height = 3u16.min(area.height);
        let popup_area = Rect {
            x: area.x,
            y: area.y,
            width: area.width,
            height,
        };
        frame.render_widget(Clear, popup_area);

        let block = Block::default().borders(Borders::ALL).title("Search");
        let paragraph = Paragraph::new(Span::raw(format!("Search: {}", state.query)))
            .block(block.clone())
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup_area);

        let inner = block.inner(popup_area);
        let cursor_x = inner.x + "Search: ".len() as u16 + state.query.chars().count() as u16;
        frame.set_cursor_position((cursor_x, inner.y));
    }

    fn draw_filter_picker(&self, frame: &mut Frame, area: Rect, picker: &FilterPicker) {
        let popup_area = centered_rect(40, 50, area);
        frame.render_widget(Clear, popup_area);

        let items: Vec<ListItem> = picker
            .options(self.view.config())
            .into_iter()
            .map(ListItem::new)
            .collect();
        let list = List::new(items)
            .block(Block::default().title(picker.title()).borders(Borders::ALL))
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");

        let mut list_state = ListState::default();
        list_state.select(Some(picker.selected()));
        frame.render_stateful_widget(list, popup_area, &mut list_state);
    }

    fn draw_movie_form(&self, frame: &mut Frame, area: Rect, title: &str, form: &MovieForm) {
        let popup_area = centered_rect(70, 50, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title(title).borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let config = self.view.config();
        let mut lines: Vec<Line> = MovieField::ORDER
            .iter()
            .map(|field| form.build_line(*field, config))
            .collect();
        lines.push(Line::from(""));

        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to save • Tab to switch • Esc to cancel",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines);
        frame.render_widget(paragraph, inner);

        if let Some(offset) = form.cursor_offset() {
            let row = MovieField::ORDER
                .iter()
                .position(|field| *field == form.active)
                .unwrap_or(0) as u16;
            frame.set_cursor_position((inner.x + offset, inner.y + row));
        }
    }

    fn draw_confirm_delete(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmMovieDelete) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Delete Movie").borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from(format!(
                "Delete '{}' permanently?",
                confirm.movie.display_title()
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Press Y to confirm or N / Esc to cancel.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    fn current_movie(&self) -> Option<&Movie> {
        self.view.movies().get(self.selected)
    }

    fn move_selection(&mut self, offset: isize) {
        self.selected = move_in_grid(
            self.selected,
            self.view.movies().len(),
            GRID_COLUMNS,
            offset,
        );
    }

    fn focus(&mut self, id: i64) {
        if let Some(idx) = self.view.movies().iter().position(|movie| movie.id == id) {
            self.selected = idx;
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.view.movies().len();
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }
}
