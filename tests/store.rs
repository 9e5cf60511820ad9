use movie_catalog::db::{open_database, schema_version, SCHEMA_VERSION};
use movie_catalog::*;
use tempfile::TempDir;

fn draft(title: &str, genre: &str, priority: &str) -> MovieDraft {
    MovieDraft {
        title: title.to_string(),
        genre: genre.to_string(),
        priority: priority.to_string(),
        release_year: None,
        description: String::new(),
        image: None,
    }
}

fn titles(movies: &[Movie]) -> Vec<&str> {
    movies.iter().map(|movie| movie.title.as_str()).collect()
}

#[test]
fn create_then_get_returns_every_field() {
    let store = SqliteStore::open_in_memory().unwrap();
    let original = MovieDraft {
        title: "Blade Runner".to_string(),
        genre: "Science Fiction".to_string(),
        priority: "High".to_string(),
        release_year: Some("1982".to_string()),
        description: "Replicants in the rain.".to_string(),
        image: Some((0..=255u8).collect()),
    };

    let id = store.create(&original).unwrap();
    let stored = store.get_by_id(id).unwrap().expect("movie should exist");

    assert_eq!(stored.id, id);
    assert_eq!(stored.to_draft(), original);
}

#[test]
fn absent_optional_fields_stay_absent() {
    let store = SqliteStore::open_in_memory().unwrap();
    let id = store.create(&draft("Untitled", "Drama", "Low")).unwrap();
    let stored = store.get_by_id(id).unwrap().unwrap();
    assert_eq!(stored.release_year, None);
    assert_eq!(stored.image, None);
    assert_eq!(stored.poster(), Poster::Placeholder);
}

#[test]
fn ids_are_assigned_increasing_and_never_reused() {
    let store = SqliteStore::open_in_memory().unwrap();
    let first = store.create(&draft("One", "Drama", "Low")).unwrap();
    let second = store.create(&draft("Two", "Drama", "Low")).unwrap();
    assert!(second > first);

    assert!(store.delete(second).unwrap());
    let third = store.create(&draft("Three", "Drama", "Low")).unwrap();
    assert!(third > second);
}

#[test]
fn get_missing_id_is_none() {
    let store = SqliteStore::open_in_memory().unwrap();
    assert_eq!(store.get_by_id(42).unwrap(), None);
}

#[test]
fn update_replaces_fields_and_keeps_id() {
    let store = SqliteStore::open_in_memory().unwrap();
    let id = store.create(&draft("Old", "Comedy", "Low")).unwrap();

    let mut movie = store.get_by_id(id).unwrap().unwrap();
    movie.title = "New".to_string();
    movie.release_year = Some("2020".to_string());
    movie.image = Some(vec![1, 2, 3]);
    assert!(store.update(&movie).unwrap());

    let stored = store.get_by_id(id).unwrap().unwrap();
    assert_eq!(stored.id, id);
    assert_eq!(stored.title, "New");
    assert_eq!(stored, movie);
}

#[test]
fn update_can_clear_the_image() {
    let store = SqliteStore::open_in_memory().unwrap();
    let mut with_image = draft("Poster", "Drama", "Low");
    with_image.image = Some(vec![7; 16]);
    let id = store.create(&with_image).unwrap();

    let mut movie = store.get_by_id(id).unwrap().unwrap();
    movie.image = None;
    assert!(store.update(&movie).unwrap());
    assert_eq!(store.get_by_id(id).unwrap().unwrap().image, None);
}

#[test]
fn update_missing_id_reports_not_found() {
    let store = SqliteStore::open_in_memory().unwrap();
    store.create(&draft("Kept", "Drama", "Low")).unwrap();

    let ghost = Movie::from_draft(999, draft("Ghost", "Drama", "Low"));
    assert!(!store.update(&ghost).unwrap());
    assert_eq!(store.count().unwrap(), 1);
    assert_eq!(store.get_by_id(999).unwrap(), None);
}

#[test]
fn delete_is_idempotent() {
    let store = SqliteStore::open_in_memory().unwrap();
    let keep = store.create(&draft("Keep", "Drama", "Low")).unwrap();
    let gone = store.create(&draft("Gone", "Drama", "Low")).unwrap();

    assert!(store.delete(gone).unwrap());
    assert!(!store.delete(gone).unwrap());
    assert!(!store.delete(12345).unwrap());

    let remaining = store.query(&MovieQuery::all()).unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, keep);
}

#[test]
fn unfiltered_query_returns_everything_in_stable_order() {
    let store = SqliteStore::open_in_memory().unwrap();
    for title in ["C", "A", "B"] {
        store.create(&draft(title, "Drama", "Low")).unwrap();
    }

    let first = store.query(&MovieQuery::all()).unwrap();
    let second = store.query(&MovieQuery::all()).unwrap();
    assert_eq!(titles(&first), vec!["C", "A", "B"]);
    assert_eq!(first, second);
}

#[test]
fn genre_filter_is_exact_and_keeps_insertion_order() {
    let store = SqliteStore::open_in_memory().unwrap();
    let a = store.create(&draft("First", "Comedy", "Low")).unwrap();
    store.create(&draft("Second", "Drama", "Low")).unwrap();
    let c = store.create(&draft("Third", "Comedy", "High")).unwrap();
    store.create(&draft("Fourth", "Dark Comedy", "High")).unwrap();
    store.create(&draft("Fifth", "comedy", "High")).unwrap();

    let comedies = store
        .query(&MovieQuery::all().with_genre("Comedy"))
        .unwrap();
    let ids: Vec<i64> = comedies.iter().map(|movie| movie.id).collect();
    assert_eq!(ids, vec![a, c]);
}

#[test]
fn title_search_is_case_insensitive_substring() {
    let store = SqliteStore::open_in_memory().unwrap();
    for title in ["Warfare", "The War", "war games", "Peace"] {
        store.create(&draft(title, "Drama", "Low")).unwrap();
    }

    let found = store
        .query(&MovieQuery::all().with_search_text("War"))
        .unwrap();
    assert_eq!(titles(&found), vec!["Warfare", "The War", "war games"]);
}

#[test]
fn title_search_folds_non_ascii_case() {
    let store = SqliteStore::open_in_memory().unwrap();
    store.create(&draft("ÉLITE", "Drama", "Low")).unwrap();
    store.create(&draft("Amélie", "Romance", "Low")).unwrap();

    let found = store
        .query(&MovieQuery::all().with_search_text("éli"))
        .unwrap();
    assert_eq!(titles(&found), vec!["ÉLITE", "Amélie"]);
}

#[test]
fn wildcard_characters_in_search_are_literal() {
    let store = SqliteStore::open_in_memory().unwrap();
    store.create(&draft("100% Wolf", "Animation", "Low")).unwrap();
    store.create(&draft("Wolfwalkers", "Animation", "Low")).unwrap();
    store.create(&draft("my_movie", "Drama", "Low")).unwrap();
    store.create(&draft("myxmovie", "Drama", "Low")).unwrap();

    let percent = store
        .query(&MovieQuery::all().with_search_text("%"))
        .unwrap();
    assert_eq!(titles(&percent), vec!["100% Wolf"]);

    let underscore = store
        .query(&MovieQuery::all().with_search_text("y_m"))
        .unwrap();
    assert_eq!(titles(&underscore), vec!["my_movie"]);
}

#[test]
fn predicates_combine_with_and() {
    let store = SqliteStore::open_in_memory().unwrap();
    store.create(&draft("War Horse", "Drama", "High")).unwrap();
    store.create(&draft("War Dogs", "Comedy", "High")).unwrap();
    store.create(&draft("War Room", "Drama", "Low")).unwrap();
    store.create(&draft("Peace", "Drama", "High")).unwrap();

    let found = store
        .query(
            &MovieQuery::all()
                .with_search_text("war")
                .with_genre("Drama")
                .with_priority("High"),
        )
        .unwrap();
    assert_eq!(titles(&found), vec!["War Horse"]);

    let by_priority = store
        .query(&MovieQuery::all().with_priority("High"))
        .unwrap();
    assert_eq!(titles(&by_priority), vec!["War Horse", "War Dogs", "Peace"]);
}

#[test]
fn injection_attempt_is_treated_as_a_value() {
    let store = SqliteStore::open_in_memory().unwrap();
    store.create(&draft("Safe", "Drama", "Low")).unwrap();

    let found = store
        .query(&MovieQuery::all().with_genre("Drama' OR '1'='1"))
        .unwrap();
    assert!(found.is_empty());
    assert_eq!(store.count().unwrap(), 1);
}

#[test]
fn data_persists_across_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("movies.sqlite");

    let id = {
        let store = SqliteStore::open(&path).unwrap();
        store.create(&draft("Persisted", "Drama", "Low")).unwrap()
    };

    let store = SqliteStore::open(&path).unwrap();
    let movie = store.get_by_id(id).unwrap().unwrap();
    assert_eq!(movie.title, "Persisted");
}

#[test]
fn fresh_database_gets_current_schema_version() {
    let dir = TempDir::new().unwrap();
    let conn = open_database(&dir.path().join("movies.sqlite")).unwrap();
    assert_eq!(schema_version(&conn).unwrap(), SCHEMA_VERSION);
}

#[test]
fn older_schema_is_dropped_and_recreated() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("movies.sqlite");

    {
        let store = SqliteStore::open(&path).unwrap();
        store.create(&draft("Doomed", "Drama", "Low")).unwrap();
    }
    {
        let conn = rusqlite::Connection::open(&path).unwrap();
        conn.pragma_update(None, "user_version", SCHEMA_VERSION - 1)
            .unwrap();
    }

    let store = SqliteStore::open(&path).unwrap();
    assert_eq!(store.count().unwrap(), 0);
    let id = store.create(&draft("Fresh", "Drama", "Low")).unwrap();
    assert!(store.get_by_id(id).unwrap().is_some());
}

#[test]
fn newer_schema_is_refused() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("movies.sqlite");
    {
        let conn = rusqlite::Connection::open(&path).unwrap();
        conn.pragma_update(None, "user_version", SCHEMA_VERSION + 1)
            .unwrap();
    }

    match SqliteStore::open(&path) {
        Err(StoreError::VersionMismatch { expected, found }) => {
            assert_eq!(expected, SCHEMA_VERSION);
            assert_eq!(found, SCHEMA_VERSION + 1);
        }
        other => panic!("expected version mismatch, got {other:?}"),
    }
}
