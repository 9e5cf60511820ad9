use anyhow::Result;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::config::CatalogConfig;
use crate::models::{Movie, MovieDraft};

use super::images::load_image;

/// Typed into the image field to drop the stored poster.
pub(crate) const REMOVE_IMAGE: &str = "-";

/// Fields of the movie form, in tab order.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub(crate) enum MovieField {
    #[default]
    Title,
    Genre,
    Priority,
    Year,
    Description,
    Image,
}

impl MovieField {
    pub(crate) const ORDER: [MovieField; 6] = [
        MovieField::Title,
        MovieField::Genre,
        MovieField::Priority,
        MovieField::Year,
        MovieField::Description,
        MovieField::Image,
    ];

    pub(crate) fn label(self) -> &'static str {
        match self {
            MovieField::Title => "Title",
            MovieField::Genre => "Genre",
            MovieField::Priority => "Priority",
            MovieField::Year => "Year",
            MovieField::Description => "Description",
            MovieField::Image => "Image file",
        }
    }

    fn position(self) -> usize {
        Self::ORDER
            .iter()
            .position(|field| *field == self)
            .unwrap_or(0)
    }
}

/// Form state for adding or editing a movie. Genre and priority are indices
/// into the configured sets so the form can only ever hold a valid choice.
#[derive(Default, Clone, Debug)]
pub(crate) struct MovieForm {
    pub(crate) title: String,
    pub(crate) genre: usize,
    pub(crate) priority: usize,
    pub(crate) year: String,
    pub(crate) description: String,
    pub(crate) image_path: String,
    /// Poster already stored for the movie being edited.
    pub(crate) existing_image: Option<Vec<u8>>,
    pub(crate) active: MovieField,
    pub(crate) error: Option<String>,
}

impl MovieForm {
    /// Populate the form from an existing movie when entering edit mode.
    pub(crate) fn from_movie(movie: &Movie, config: &CatalogConfig) -> Self {
        Self {
            title: movie.title.clone(),
            genre: index_of(&config.genres, &movie.genre),
            priority: index_of(&config.priorities, &movie.priority),
            year: movie.release_year.clone().unwrap_or_default(),
            description: movie.description.clone(),
            image_path: String::new(),
            existing_image: movie.image.clone(),
            active: MovieField::Title,
            error: None,
        }
    }

    pub(crate) fn next_field(&mut self) {
        let next = (self.active.position() + 1) % MovieField::ORDER.len();
        self.active = MovieField::ORDER[next];
    }

    pub(crate) fn previous_field(&mut self) {
        let len = MovieField::ORDER.len();
        let previous = (self.active.position() + len - 1) % len;
        self.active = MovieField::ORDER[previous];
    }

    /// Step through the genre or priority choices. Returns `false` when the
    /// active field is free text.
    pub(crate) fn cycle_choice(&mut self, config: &CatalogConfig, forward: bool) -> bool {
        let (index, len) = match self.active {
            MovieField::Genre => (&mut self.genre, config.genres.len()),
            MovieField::Priority => (&mut self.priority, config.priorities.len()),
            _ => return false,
        };
        if len == 0 {
            return false;
        }
        *index = if forward {
            (*index + 1) % len
        } else {
            (*index + len - 1) % len
        };
        true
    }

    /// Insert a character into the active text field.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        match self.active {
            MovieField::Title => self.title.push(ch),
            MovieField::Year => {
                if !ch.is_ascii_digit() {
                    return false;
                }
                self.year.push(ch);
            }
            MovieField::Description => self.description.push(ch),
            MovieField::Image => self.image_path.push(ch),
            MovieField::Genre | MovieField::Priority => return false,
        }
        true
    }

    /// Remove the last character from the active text field.
    pub(crate) fn backspace(&mut self) {
        match self.active {
            MovieField::Title => {
                self.title.pop();
            }
            MovieField::Year => {
                self.year.pop();
            }
            MovieField::Description => {
                self.description.pop();
            }
            MovieField::Image => {
                self.image_path.pop();
            }
            MovieField::Genre | MovieField::Priority => {}
        }
    }

    /// Turn the inputs into a draft. Reading the image file happens here;
    /// record invariants are checked by the view controller.
    pub(crate) fn parse_inputs(&self, config: &CatalogConfig) -> Result<MovieDraft> {
        let year = self.year.trim();
        let path = self.image_path.trim();
        let image = match path {
            "" => self.existing_image.clone(),
            REMOVE_IMAGE => None,
            _ => Some(load_image(path)?),
        };

        Ok(MovieDraft {
            title: self.title.trim().to_string(),
            genre: config.genres.get(self.genre).cloned().unwrap_or_default(),
            priority: config
                .priorities
                .get(self.priority)
                .cloned()
                .unwrap_or_default(),
            release_year: (!year.is_empty()).then(|| year.to_string()),
            description: self.description.trim().to_string(),
            image,
        })
    }

    /// Render a single line for the form widget.
    pub(crate) fn build_line(&self, field: MovieField, config: &CatalogConfig) -> Line<'static> {
        let is_active = self.active == field;
        let (value, placeholder) = match field {
            MovieField::Title => (self.title.clone(), "<required>"),
            MovieField::Genre => (choice(&config.genres, self.genre), ""),
            MovieField::Priority => (choice(&config.priorities, self.priority), ""),
            MovieField::Year => (self.year.clone(), "<optional, yyyy>"),
            MovieField::Description => (self.description.clone(), "<optional>"),
            MovieField::Image => (self.image_path.clone(), self.image_placeholder()),
        };

        let display = match field {
            MovieField::Genre | MovieField::Priority => format!("< {value} >"),
            _ if value.is_empty() => placeholder.to_string(),
            _ => value.clone(),
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if value.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::raw(format!("{}: ", field.label())),
            Span::styled(display, style),
        ])
    }

    /// Cursor column offset for the active field, or `None` for choices.
    pub(crate) fn cursor_offset(&self) -> Option<u16> {
        let len = match self.active {
            MovieField::Title => self.title.chars().count(),
            MovieField::Year => self.year.chars().count(),
            MovieField::Description => self.description.chars().count(),
            MovieField::Image => self.image_path.chars().count(),
            MovieField::Genre | MovieField::Priority => return None,
        };
        Some((self.active.label().len() + 2 + len) as u16)
    }

    fn image_placeholder(&self) -> &'static str {
        if self.existing_image.is_some() {
            "<keep current poster, '-' to remove>"
        } else {
            "<optional path>"
        }
    }
}

fn index_of(options: &[String], value: &str) -> usize {
    options
        .iter()
        .position(|option| option == value)
        .unwrap_or(0)
}

fn choice(options: &[String], index: usize) -> String {
    options.get(index).cloned().unwrap_or_default()
}

/// State for confirming permanent deletion.
#[derive(Debug)]
pub(crate) struct ConfirmMovieDelete {
    pub(crate) movie: Movie,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn stored_movie() -> Movie {
        Movie {
            id: 7,
            title: "Heat".to_string(),
            genre: "Thriller".to_string(),
            priority: "Low".to_string(),
            release_year: Some("1995".to_string()),
            description: "LA crime".to_string(),
            image: Some(vec![1, 2, 3]),
        }
    }

    #[test]
    fn editing_round_trips_existing_fields() {
        let config = CatalogConfig::default();
        let form = MovieForm::from_movie(&stored_movie(), &config);
        let draft = form.parse_inputs(&config).unwrap();
        assert_eq!(draft, stored_movie().to_draft());
    }

    #[test]
    fn dash_removes_the_poster() {
        let config = CatalogConfig::default();
        let mut form = MovieForm::from_movie(&stored_movie(), &config);
        form.image_path = REMOVE_IMAGE.to_string();
        assert_eq!(form.parse_inputs(&config).unwrap().image, None);
    }

    #[test]
    fn image_path_is_read_into_bytes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("poster.png");
        fs::write(&path, [9u8, 8, 7]).unwrap();

        let config = CatalogConfig::default();
        let mut form = MovieForm::default();
        form.title = "Up".to_string();
        form.image_path = path.display().to_string();
        assert_eq!(form.parse_inputs(&config).unwrap().image, Some(vec![9, 8, 7]));
    }

    #[test]
    fn blank_year_becomes_none() {
        let config = CatalogConfig::default();
        let mut form = MovieForm::default();
        form.title = "Up".to_string();
        form.year = "  ".to_string();
        let draft = form.parse_inputs(&config).unwrap();
        assert_eq!(draft.release_year, None);
        assert_eq!(draft.genre, config.genres[0]);
        assert_eq!(draft.priority, config.priorities[0]);
    }

    #[test]
    fn choices_wrap_around() {
        let config = CatalogConfig::default();
        let mut form = MovieForm::default();
        form.active = MovieField::Priority;
        assert!(form.cycle_choice(&config, false));
        assert_eq!(form.priority, config.priorities.len() - 1);
        assert!(form.cycle_choice(&config, true));
        assert_eq!(form.priority, 0);

        form.active = MovieField::Title;
        assert!(!form.cycle_choice(&config, true));
    }

    #[test]
    fn year_field_only_accepts_digits() {
        let mut form = MovieForm::default();
        form.active = MovieField::Year;
        assert!(form.push_char('1'));
        assert!(!form.push_char('x'));
        assert_eq!(form.year, "1");
    }

    #[test]
    fn tab_order_wraps() {
        let mut form = MovieForm::default();
        form.previous_field();
        assert_eq!(form.active, MovieField::Image);
        form.next_field();
        assert_eq!(form.active, MovieField::Title);
    }
}
