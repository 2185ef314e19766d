/*!
 * # course-loader
 *
 * Content-loading layer for a language-learning course application.
 *
 * Reads an embedded SQLite course database and produces the values a UI
 * layer renders: a module-grouped navigation tree and per-word view models.
 *
 * ## Features
 *
 * - Works with both the legacy layout (`words.module_id`) and the
 *   normalized layout (`word_modules` assignment table)
 * - Degrades gracefully when optional tables (`examples`,
 *   `conversation_lines`, `clips`, `modules`, `*_translations`) are absent
 * - Per-language translation lookup with fallback to stored text
 * - ISO 639-1 and ISO 639-2 language code support
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `database`: Connection handling, row access and schema inspection
 * - `content`: Module extraction, navigation trees, translation lookup
 *   and word detail assembly
 * - `course_service`: Service object tying the pieces together
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the library
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]

// Public modules
pub mod app_config;
pub mod content;
pub mod course_service;
pub mod database;
pub mod errors;
pub mod language_utils;

// Re-export main types for easier usage
pub use app_config::Config;
pub use content::{Module, ModuleId, NavigationTree, WordViewModel};
pub use course_service::{CourseCatalog, CourseService};
pub use database::{DatabaseConnection, QueryExecutor, Row, SchemaLayout, SchemaReport};
pub use errors::{ContentError, QueryError};
