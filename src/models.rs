//! Domain models that mirror the `movies` table and get passed between the
//! store, the view controller and the TUI. They stay plain data holders; the
//! only behavior here is validation of user input and the poster summary the
//! display layer renders.

use std::fmt;

use thiserror::Error;

use crate::config::CatalogConfig;

/// Length of a valid release year. Anything else is rejected before it can
/// reach the store.
const RELEASE_YEAR_DIGITS: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
/// A persisted catalog entry.
pub struct Movie {
    /// Surrogate key assigned by the store. Never reused after a delete.
    pub id: i64,
    pub title: String,
    pub genre: String,
    pub priority: String,
    /// `None` or exactly four ASCII digits.
    pub release_year: Option<String>,
    pub description: String,
    /// Opaque image bytes. The store never decodes them.
    pub image: Option<Vec<u8>>,
}

impl Movie {
    /// Attach a store-assigned id to a draft.
    pub fn from_draft(id: i64, draft: MovieDraft) -> Self {
        Self {
            id,
            title: draft.title,
            genre: draft.genre,
            priority: draft.priority,
            release_year: draft.release_year,
            description: draft.description,
            image: draft.image,
        }
    }

    /// Every field except the id, e.g. to seed an edit form.
    pub fn to_draft(&self) -> MovieDraft {
        MovieDraft {
            title: self.title.clone(),
            genre: self.genre.clone(),
            priority: self.priority.clone(),
            release_year: self.release_year.clone(),
            description: self.description.clone(),
            image: self.image.clone(),
        }
    }

    /// Summary of the embedded image used by list cards.
    pub fn poster(&self) -> Poster {
        match &self.image {
            Some(bytes) if !bytes.is_empty() => Poster::Embedded { bytes: bytes.len() },
            _ => Poster::Placeholder,
        }
    }

    /// `Title (1999)` when a year is known, otherwise just the title.
    pub fn display_title(&self) -> String {
        match &self.release_year {
            Some(year) => format!("{} ({})", self.title, year),
            None => self.title.clone(),
        }
    }
}

impl fmt::Display for Movie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_title())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// The user-editable fields of a movie. `create` takes a draft, so a caller
/// can never smuggle its own id into an insert.
pub struct MovieDraft {
    pub title: String,
    pub genre: String,
    pub priority: String,
    pub release_year: Option<String>,
    pub description: String,
    pub image: Option<Vec<u8>>,
}

impl MovieDraft {
    /// Check the record invariants against the configured genre and priority
    /// sets. The store trusts that this ran before anything was written.
    pub fn validate(&self, config: &CatalogConfig) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::BlankTitle);
        }
        if let Some(year) = &self.release_year {
            if !is_release_year(year) {
                return Err(ValidationError::InvalidReleaseYear(year.clone()));
            }
        }
        if !config.genres.iter().any(|genre| genre == &self.genre) {
            return Err(ValidationError::UnknownGenre(self.genre.clone()));
        }
        if !config.priorities.iter().any(|priority| priority == &self.priority) {
            return Err(ValidationError::UnknownPriority(self.priority.clone()));
        }
        Ok(())
    }
}

/// Whether `value` is exactly four ASCII digits.
pub fn is_release_year(value: &str) -> bool {
    value.len() == RELEASE_YEAR_DIGITS && value.chars().all(|ch| ch.is_ascii_digit())
}

/// What a card shows in place of the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Poster {
    /// No image stored; rendered as a fixed placeholder rather than an error.
    Placeholder,
    Embedded { bytes: usize },
}

impl fmt::Display for Poster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Poster::Placeholder => write!(f, "[no poster]"),
            Poster::Embedded { bytes } if *bytes < 1024 => write!(f, "[poster {bytes} B]"),
            Poster::Embedded { bytes } => {
                write!(f, "[poster {:.1} KiB]", *bytes as f64 / 1024.0)
            }
        }
    }
}

/// Input rejected before it reaches the store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Title is required.")]
    BlankTitle,
    #[error("Release year '{0}' must be four digits (yyyy).")]
    InvalidReleaseYear(String),
    #[error("Unknown genre '{0}'.")]
    UnknownGenre(String),
    #[error("Unknown priority '{0}'.")]
    UnknownPriority(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> MovieDraft {
        MovieDraft {
            title: "Alien".to_string(),
            genre: "Horror".to_string(),
            priority: "High".to_string(),
            release_year: Some("1979".to_string()),
            description: String::new(),
            image: None,
        }
    }

    #[test]
    fn valid_draft_passes() {
        assert_eq!(draft().validate(&CatalogConfig::default()), Ok(()));
    }

    #[test]
    fn blank_title_is_rejected() {
        let mut movie = draft();
        movie.title = "   ".to_string();
        assert_eq!(
            movie.validate(&CatalogConfig::default()),
            Err(ValidationError::BlankTitle)
        );
    }

    #[test]
    fn release_year_must_be_four_digits() {
        assert!(is_release_year("2001"));
        assert!(!is_release_year("201"));
        assert!(!is_release_year("20011"));
        assert!(!is_release_year("20a1"));
        assert!(!is_release_year("２００１"));

        let mut movie = draft();
        movie.release_year = Some("79".to_string());
        assert_eq!(
            movie.validate(&CatalogConfig::default()),
            Err(ValidationError::InvalidReleaseYear("79".to_string()))
        );
    }

    #[test]
    fn genre_and_priority_come_from_config() {
        let mut movie = draft();
        movie.genre = "Western".to_string();
        assert_eq!(
            movie.validate(&CatalogConfig::default()),
            Err(ValidationError::UnknownGenre("Western".to_string()))
        );

        let mut movie = draft();
        movie.priority = "Urgent".to_string();
        assert_eq!(
            movie.validate(&CatalogConfig::default()),
            Err(ValidationError::UnknownPriority("Urgent".to_string()))
        );
    }

    #[test]
    fn missing_image_renders_placeholder() {
        let movie = Movie::from_draft(1, draft());
        assert_eq!(movie.poster(), Poster::Placeholder);
        assert_eq!(movie.poster().to_string(), "[no poster]");

        let mut with_image = movie.clone();
        with_image.image = Some(vec![0; 2048]);
        assert_eq!(with_image.poster(), Poster::Embedded { bytes: 2048 });
        assert_eq!(with_image.poster().to_string(), "[poster 2.0 KiB]");
    }
}
