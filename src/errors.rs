/*!
 * Error types for the course-loader library.
 *
 * Query-level failures are classified so optional loading steps can degrade
 * quietly, while the few mandatory lookups surface a `ContentError` to the caller.
 */

use thiserror::Error;

/// Errors returned by a `QueryExecutor`
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// A table or column the query relies on does not exist
    #[error("Schema element absent: {detail}")]
    SchemaAbsent {
        /// Message reported by the database
        detail: String,
    },

    /// Any other failure
    #[error("Query failed: {0}")]
    Failure(String),
}

impl QueryError {
    /// Classify a rusqlite error into the schema-absent or generic bucket
    pub fn from_sqlite(error: &rusqlite::Error) -> Self {
        let message = error.to_string();
        if is_schema_message(&message) {
            Self::SchemaAbsent { detail: message }
        } else {
            Self::Failure(message)
        }
    }

    /// Whether the failure means a table or column is missing
    pub fn is_schema_absent(&self) -> bool {
        matches!(self, Self::SchemaAbsent { .. })
    }
}

impl From<anyhow::Error> for QueryError {
    fn from(error: anyhow::Error) -> Self {
        match error.downcast_ref::<rusqlite::Error>() {
            Some(sqlite_error) => Self::from_sqlite(sqlite_error),
            None => Self::Failure(error.to_string()),
        }
    }
}

fn is_schema_message(message: &str) -> bool {
    let lower = message.to_lowercase();
    lower.contains("no such table") || lower.contains("no such column")
}

/// Errors surfaced to the UI layer when loading course content
#[derive(Error, Debug)]
pub enum ContentError {
    /// The requested word does not exist
    #[error("Word not found: {word_id}")]
    NotFound {
        /// Identifier that was looked up
        word_id: i64,
    },

    /// A mandatory query failed for a reason other than a missing row
    #[error("Failed to load course content: {0}")]
    LoadFailure(#[from] QueryError),
}

impl ContentError {
    /// Whether this error is the user-visible "word not found" condition
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
