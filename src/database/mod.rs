/*!
 * Database module for read access to course content.
 *
 * This module provides:
 * - SQLite connection handling with async-safe access
 * - The `QueryExecutor` seam and name-keyed `Row` values
 * - Schema inspection and layout detection
 */

pub mod connection;
pub mod query;
pub mod schema;

// Re-export main types
pub use connection::DatabaseConnection;
pub use query::{QueryExecutor, Row};
pub use schema::{SchemaLayout, SchemaReport};
