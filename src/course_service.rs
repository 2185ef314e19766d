use log::{info, warn};
use serde::Serialize;
use std::sync::Arc;

use crate::app_config::Config;
use crate::content::{
    AssignedWord, GroupOrder, Module, ModuleExtractor, NavigationTree, NavigationTreeBuilder,
    WordDetailAssembler, WordViewModel,
};
use crate::database::{QueryExecutor, Row, SchemaLayout, SchemaReport, schema};
use crate::errors::{ContentError, QueryError};

// @module: Course content service handed to the UI layer

/// Everything the browsing UI needs after a load
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseCatalog {
    /// Strategy used to read word rows
    pub layout: SchemaLayout,
    /// Canonical module list
    pub modules: Vec<Module>,
    /// Module-grouped navigation
    pub tree: NavigationTree,
}

/// Course content service
///
/// Holds the query executor and configuration; the UI keeps one instance
/// and calls `load_navigation` once per session load and `word_details`
/// on every selection.
#[derive(Clone)]
pub struct CourseService {
    executor: Arc<dyn QueryExecutor>,
    config: Config,
    assembler: WordDetailAssembler,
}

impl CourseService {
    /// Create a service over an executor
    pub fn new(executor: Arc<dyn QueryExecutor>, config: Config) -> Self {
        let assembler = WordDetailAssembler::new(executor.clone());
        Self {
            executor,
            config,
            assembler,
        }
    }

    /// Active configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Inspect the database catalog
    pub async fn inspect_schema(&self) -> SchemaReport {
        schema::inspect(self.executor.as_ref()).await
    }

    /// Load modules and the navigation tree
    ///
    /// Fails only when no word query strategy can read the `words` table.
    pub async fn load_navigation(&self) -> Result<CourseCatalog, ContentError> {
        let report = self.inspect_schema().await;
        let (layout, rows) = self.load_word_rows(SchemaLayout::detect(&report)).await?;

        let key_column = layout.module_key_column();
        let modules = ModuleExtractor::new(self.executor.clone())
            .extract(&report, &rows, key_column)
            .await;

        let words: Vec<AssignedWord> = rows
            .iter()
            .filter_map(|row| AssignedWord::from_row(row, key_column))
            .collect();

        let order = if layout.uses_catalog_order() {
            GroupOrder::Catalog {
                include_empty: self.config.navigation.show_empty_modules,
            }
        } else {
            GroupOrder::FirstSeen
        };
        let tree = NavigationTreeBuilder::new(order).build(&words, &modules);

        info!(
            "Loaded {} modules and {} word placements using the {} layout",
            modules.len(),
            tree.word_count(),
            layout
        );

        Ok(CourseCatalog {
            layout,
            modules,
            tree,
        })
    }

    /// Assemble the view model of a word in the configured language
    pub async fn word_details(&self, word_id: i64) -> Result<WordViewModel, ContentError> {
        self.word_details_in(word_id, &self.config.target_language).await
    }

    /// Assemble the view model of a word in a specific language
    pub async fn word_details_in(
        &self,
        word_id: i64,
        language: &str,
    ) -> Result<WordViewModel, ContentError> {
        self.assembler.assemble(word_id, language).await
    }

    /// Run the layout's word query, falling back to the flat layout
    async fn load_word_rows(
        &self,
        layout: SchemaLayout,
    ) -> Result<(SchemaLayout, Vec<Row>), ContentError> {
        match self.query_words(layout).await {
            Ok(rows) => Ok((layout, rows)),
            Err(e) if layout != SchemaLayout::Flat => {
                warn!("Word query for the {} layout failed, using flat layout: {}", layout, e);
                let rows = self.query_words(SchemaLayout::Flat).await?;
                Ok((SchemaLayout::Flat, rows))
            }
            Err(e) => Err(ContentError::LoadFailure(e)),
        }
    }

    async fn query_words(&self, layout: SchemaLayout) -> Result<Vec<Row>, QueryError> {
        self.executor.query(layout.word_rows_sql(), Vec::new()).await
    }
}
