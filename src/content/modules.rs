/*!
 * Module extraction.
 *
 * The canonical module list comes from the `modules` table when it exists.
 * Otherwise modules are synthesized from the word rows themselves, using any
 * `module_name` / `module_description` columns a legacy row carries. Either
 * way, every module a word refers to ends up in the list exactly once.
 */

use log::{debug, warn};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use super::models::{Module, ModuleId, placeholder_name, synthesized_description};
use crate::database::schema::MODULES_TABLE;
use crate::database::{QueryExecutor, Row, SchemaReport};

/// Denormalized module name column on legacy word rows
const MODULE_NAME_COLUMN: &str = "module_name";

/// Denormalized module description column on legacy word rows
const MODULE_DESCRIPTION_COLUMN: &str = "module_description";

/// Produces the canonical, duplicate-free list of modules
#[derive(Clone)]
pub struct ModuleExtractor {
    executor: Arc<dyn QueryExecutor>,
}

impl ModuleExtractor {
    /// Create an extractor reading through the given executor
    pub fn new(executor: Arc<dyn QueryExecutor>) -> Self {
        Self { executor }
    }

    /// Extract modules for a load
    ///
    /// `key_column` names the column of `word_rows` that carries the module
    /// reference (`None` when the layout has no module information).
    pub async fn extract(
        &self,
        schema: &SchemaReport,
        word_rows: &[Row],
        key_column: Option<&str>,
    ) -> Vec<Module> {
        let derived = key_column
            .map(|column| derive_from_rows(word_rows, column))
            .unwrap_or_default();

        if !schema.has_modules_table {
            debug!("No modules table, derived {} modules from word rows", derived.len());
            return derived;
        }

        match self
            .executor
            .query(&format!("SELECT * FROM {} ORDER BY rowid", MODULES_TABLE), Vec::new())
            .await
        {
            Ok(rows) => {
                let catalog = catalog_from_rows(&rows);
                debug!("Loaded {} modules from catalog", catalog.len());
                merge_missing(catalog, derived)
            }
            Err(e) => {
                warn!("Module catalog unreadable, deriving from word rows: {}", e);
                derived
            }
        }
    }
}

/// Synthesize modules from word rows in first-occurrence order
///
/// Rows whose `key_column` is NULL, zero or blank carry no module.
pub fn derive_from_rows(rows: &[Row], key_column: &str) -> Vec<Module> {
    let mut counts: HashMap<ModuleId, usize> = HashMap::new();
    for id in rows.iter().filter_map(|row| ModuleId::from_row(row, key_column)) {
        *counts.entry(id).or_default() += 1;
    }

    let mut seen = HashSet::new();
    let mut modules = Vec::new();

    for row in rows {
        let Some(id) = ModuleId::from_row(row, key_column) else {
            continue;
        };
        if !seen.insert(id.clone()) {
            continue;
        }

        let name = row
            .get_non_empty_text(MODULE_NAME_COLUMN)
            .unwrap_or_else(|| placeholder_name(&id));
        let description = row
            .get_non_empty_text(MODULE_DESCRIPTION_COLUMN)
            .unwrap_or_else(|| synthesized_description(counts.get(&id).copied().unwrap_or(1)));

        modules.push(Module::new(id, name, description));
    }

    modules
}

/// Read catalog rows, skipping rows without an id and repeated ids
fn catalog_from_rows(rows: &[Row]) -> Vec<Module> {
    let mut seen = HashSet::new();

    rows.iter()
        .filter_map(|row| {
            let id = ModuleId::from_row(row, "id")?;
            if !seen.insert(id.clone()) {
                return None;
            }
            let name = row
                .get_non_empty_text("name")
                .unwrap_or_else(|| placeholder_name(&id));
            Some(Module::new(
                id,
                name,
                row.get_text("description").unwrap_or_default(),
            ))
        })
        .collect()
}

/// Append derived modules whose ids the catalog lacks
fn merge_missing(mut catalog: Vec<Module>, derived: Vec<Module>) -> Vec<Module> {
    let known: HashSet<ModuleId> = catalog.iter().map(|m| m.id.clone()).collect();
    let missing: Vec<Module> = derived.into_iter().filter(|m| !known.contains(&m.id)).collect();

    if !missing.is_empty() {
        debug!("Synthesized {} modules missing from the catalog", missing.len());
    }

    catalog.extend(missing);
    catalog
}
