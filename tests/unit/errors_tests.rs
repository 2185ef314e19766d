/*!
 * Tests for error types and conversions
 */

use course_loader::errors::{ContentError, QueryError};

#[test]
fn test_queryError_schemaAbsent_shouldDisplayDetail() {
    let error = QueryError::SchemaAbsent {
        detail: "no such table: clips".to_string(),
    };
    let display = format!("{}", error);
    assert!(display.contains("Schema element absent"));
    assert!(display.contains("clips"));
    assert!(error.is_schema_absent());
}

#[test]
fn test_queryError_fromSqlite_shouldClassifyMissingTable() {
    let conn = rusqlite::Connection::open_in_memory().unwrap();
    let sqlite_error = conn.prepare("SELECT * FROM examples").unwrap_err();

    let error = QueryError::from_sqlite(&sqlite_error);
    assert!(error.is_schema_absent());
}

#[test]
fn test_queryError_fromSqlite_shouldClassifySyntaxErrorAsFailure() {
    let conn = rusqlite::Connection::open_in_memory().unwrap();
    let sqlite_error = conn.prepare("SELEC 1").unwrap_err();

    let error = QueryError::from_sqlite(&sqlite_error);
    assert!(matches!(error, QueryError::Failure(_)));
}

#[test]
fn test_contentError_notFound_shouldBeUserVisible() {
    let error = ContentError::NotFound { word_id: 42 };
    assert!(error.is_not_found());
    assert_eq!(format!("{}", error), "Word not found: 42");
}

#[test]
fn test_contentError_fromQueryError_shouldWrapAsLoadFailure() {
    let error: ContentError = QueryError::Failure("disk I/O error".to_string()).into();
    assert!(!error.is_not_found());
    let display = format!("{}", error);
    assert!(display.contains("Failed to load course content"));
    assert!(display.contains("disk I/O error"));
}
