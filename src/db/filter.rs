//! Composition of the optional `WHERE` predicates used by catalog queries.
//!
//! Clauses and their bound values are pushed together so placeholder numbers
//! always line up with the parameter list. Values never end up inside the SQL
//! text.

use rusqlite::types::Value;

/// Optional predicates for a catalog read. Empty strings count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MovieQuery {
    /// Case-insensitive substring of the title.
    pub search_text: Option<String>,
    /// Exact genre match.
    pub genre: Option<String>,
    /// Exact priority match.
    pub priority: Option<String>,
}

impl MovieQuery {
    /// Every movie, no predicates.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_search_text(mut self, text: impl Into<String>) -> Self {
        self.search_text = Some(text.into());
        self
    }

    pub fn with_genre(mut self, genre: impl Into<String>) -> Self {
        self.genre = Some(genre.into());
        self
    }

    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    /// Build the `WHERE` fragment and parameters for this query.
    pub(crate) fn to_builder(&self) -> QueryBuilder {
        let mut builder = QueryBuilder::default();
        if let Some(text) = non_empty(&self.search_text) {
            builder.push("instr(fold_case(title), fold_case(?{})) > 0", text);
        }
        if let Some(genre) = non_empty(&self.genre) {
            builder.push("genre = ?{}", genre);
        }
        if let Some(priority) = non_empty(&self.priority) {
            builder.push("priority = ?{}", priority);
        }
        builder
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|text| !text.is_empty())
}

/// Accumulates AND-combined clauses with numbered placeholders.
#[derive(Debug, Default)]
pub(crate) struct QueryBuilder {
    clauses: Vec<String>,
    params: Vec<Value>,
}

impl QueryBuilder {
    /// Add a clause whose single `?{}` marker receives the next placeholder
    /// number, binding `value` to it.
    pub(crate) fn push(&mut self, template: &str, value: &str) {
        self.params.push(Value::Text(value.to_string()));
        let index = self.params.len();
        self.clauses
            .push(template.replacen("?{}", &format!("?{index}"), 1));
    }

    /// ` WHERE a AND b`, or an empty string when nothing was pushed.
    pub(crate) fn where_clause(&self) -> String {
        if self.clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.clauses.join(" AND "))
        }
    }

    pub(crate) fn params(&self) -> &[Value] {
        &self.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_has_no_where_clause() {
        let builder = MovieQuery::all().to_builder();
        assert_eq!(builder.where_clause(), "");
        assert!(builder.params().is_empty());
    }

    #[test]
    fn placeholders_follow_bound_values() {
        let builder = MovieQuery::all()
            .with_search_text("war")
            .with_genre("Drama")
            .with_priority("High")
            .to_builder();
        assert_eq!(
            builder.where_clause(),
            " WHERE instr(fold_case(title), fold_case(?1)) > 0 AND genre = ?2 AND priority = ?3"
        );
        assert_eq!(
            builder.params(),
            &[
                Value::Text("war".to_string()),
                Value::Text("Drama".to_string()),
                Value::Text("High".to_string()),
            ]
        );
    }

    #[test]
    fn skipped_predicates_do_not_leave_gaps() {
        let builder = MovieQuery::all().with_priority("Low").to_builder();
        assert_eq!(builder.where_clause(), " WHERE priority = ?1");
        assert_eq!(builder.params(), &[Value::Text("Low".to_string())]);
    }

    #[test]
    fn empty_strings_count_as_absent() {
        let builder = MovieQuery::all()
            .with_search_text("")
            .with_genre("Comedy")
            .to_builder();
        assert_eq!(builder.where_clause(), " WHERE genre = ?1");
    }

    #[test]
    fn values_are_never_interpolated() {
        let builder = MovieQuery::all()
            .with_genre("Drama' OR '1'='1")
            .to_builder();
        assert!(!builder.where_clause().contains("OR"));
        assert_eq!(builder.params().len(), 1);
    }
}
