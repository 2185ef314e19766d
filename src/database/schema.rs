/*!
 * Schema inspection and layout detection.
 *
 * Course databases exist in two relational layouts: the legacy one keeps a
 * denormalized `module_id` column on `words`, the normalized one joins `words`
 * and `modules` through the `word_modules` assignment table. The catalog is
 * inspected once per load and a `SchemaLayout` strategy is picked from the
 * report; query paths never re-check table existence on their own.
 */

use log::{debug, warn};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::query::QueryExecutor;

/// Table holding the base vocabulary rows
pub const WORDS_TABLE: &str = "words";

/// Optional module catalog
pub const MODULES_TABLE: &str = "modules";

/// Optional many-to-many assignment between words and modules
pub const ASSIGNMENT_TABLE: &str = "word_modules";

/// Denormalized module reference on `words`
pub const LEGACY_MODULE_COLUMN: &str = "module_id";

/// Column alias carrying the assigned module in normalized word rows
pub const ASSIGNED_MODULE_COLUMN: &str = "assigned_module_id";

const CATALOG_QUERY: &str = r#"
    SELECT m.name AS table_name, p.name AS column_name
    FROM sqlite_master AS m, pragma_table_info(m.name) AS p
    WHERE m.type = 'table' AND m.name NOT LIKE 'sqlite_%'
    ORDER BY m.name, p.cid
"#;

/// What the table catalog says about optional tables and columns
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaReport {
    /// Every user table in the database
    pub tables: BTreeSet<String>,
    /// Column names per table
    pub columns: BTreeMap<String, BTreeSet<String>>,
    /// Whether the `modules` catalog exists
    pub has_modules_table: bool,
    /// Whether the `word_modules` assignment table exists
    pub has_assignment_table: bool,
}

impl SchemaReport {
    /// Build a report from `(table, column)` pairs
    pub fn from_columns<I, T, C>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (T, C)>,
        T: Into<String>,
        C: Into<String>,
    {
        let mut columns: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for (table, column) in pairs {
            columns.entry(table.into()).or_default().insert(column.into());
        }

        let tables: BTreeSet<String> = columns.keys().cloned().collect();

        Self {
            has_modules_table: tables.contains(MODULES_TABLE),
            has_assignment_table: tables.contains(ASSIGNMENT_TABLE),
            tables,
            columns,
        }
    }

    /// Whether a table exists
    pub fn has_table(&self, table: &str) -> bool {
        self.tables.contains(table)
    }

    /// Whether a table exists and carries the column
    pub fn has_column(&self, table: &str, column: &str) -> bool {
        self.columns
            .get(table)
            .is_some_and(|columns| columns.contains(column))
    }
}

/// Inspect the table catalog with a single query
///
/// Never fails: a catalog query error yields the empty report, which steers
/// every downstream component onto the most conservative path.
pub async fn inspect(executor: &dyn QueryExecutor) -> SchemaReport {
    match executor.query(CATALOG_QUERY, Vec::new()).await {
        Ok(rows) => {
            let report = SchemaReport::from_columns(rows.iter().filter_map(|row| {
                Some((row.get_text("table_name")?, row.get_text("column_name")?))
            }));
            debug!("Schema catalog lists {} tables", report.tables.len());
            report
        }
        Err(e) => {
            warn!("Schema inspection failed, assuming an empty catalog: {}", e);
            SchemaReport::default()
        }
    }
}

/// Word-row query strategy selected from a `SchemaReport`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaLayout {
    /// `words` joined with `modules` through `word_modules`
    Normalized,
    /// `words.module_id` references a module directly
    Denormalized,
    /// No module information at all; every word is ungrouped
    Flat,
}

impl SchemaLayout {
    /// Pick the strategy for a database
    pub fn detect(report: &SchemaReport) -> Self {
        if report.has_assignment_table {
            Self::Normalized
        } else if report.has_column(WORDS_TABLE, LEGACY_MODULE_COLUMN) {
            Self::Denormalized
        } else {
            Self::Flat
        }
    }

    /// Strategy version, bumped whenever a layout's queries change shape
    pub fn version(&self) -> u32 {
        match self {
            Self::Normalized => 2,
            Self::Denormalized => 1,
            Self::Flat => 1,
        }
    }

    /// SQL returning one row per (word, module) association, ordered by
    /// module, then term, then id, with unassigned words last
    pub fn word_rows_sql(&self) -> &'static str {
        match self {
            Self::Normalized => {
                r#"
                SELECT w.*, wm.module_id AS assigned_module_id
                FROM words AS w
                LEFT JOIN word_modules AS wm ON wm.word_id = w.id
                ORDER BY wm.module_id IS NULL, wm.module_id, w.term COLLATE NOCASE, w.id
                "#
            }
            Self::Denormalized => {
                r#"
                SELECT *
                FROM words
                ORDER BY module_id IS NULL OR module_id = 0 OR module_id = '',
                         module_id, term COLLATE NOCASE, id
                "#
            }
            Self::Flat => "SELECT * FROM words ORDER BY term COLLATE NOCASE, id",
        }
    }

    /// Column carrying the module reference in rows from `word_rows_sql`
    pub fn module_key_column(&self) -> Option<&'static str> {
        match self {
            Self::Normalized => Some(ASSIGNED_MODULE_COLUMN),
            Self::Denormalized => Some(LEGACY_MODULE_COLUMN),
            Self::Flat => None,
        }
    }

    /// Whether the tree follows the module catalog order
    pub fn uses_catalog_order(&self) -> bool {
        matches!(self, Self::Normalized)
    }
}

impl fmt::Display for SchemaLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SchemaLayout::Normalized => "normalized",
            SchemaLayout::Denormalized => "legacy-denormalized",
            SchemaLayout::Flat => "flat",
        };
        write!(f, "{}-v{}", name, self.version())
    }
}
