/*!
 * Per-language translation lookup.
 *
 * Each translatable entity kind has its own `*_translations` table keyed by
 * the entity id and a language code. Translation is always optional: lookup
 * failures (missing table, malformed query) resolve to `None`.
 */

use futures::future::join_all;
use log::debug;
use rusqlite::types::Value;
use std::sync::Arc;

use super::models::EntityKind;
use crate::database::QueryExecutor;
use crate::errors::QueryError;
use crate::language_utils;

/// Resolves localized text for an entity and language
#[derive(Clone)]
pub struct TranslationResolver {
    executor: Arc<dyn QueryExecutor>,
}

impl TranslationResolver {
    /// Create a resolver reading through the given executor
    pub fn new(executor: Arc<dyn QueryExecutor>) -> Self {
        Self { executor }
    }

    /// Resolve one translation, or `None` when unavailable
    ///
    /// Duplicate rows for the same key resolve to the lowest rowid.
    pub async fn resolve(&self, kind: EntityKind, entity_id: i64, language: &str) -> Option<String> {
        match self.lookup(kind, entity_id, language).await {
            Ok(text) => {
                if text.is_none() {
                    debug!("No {} translation for {} #{}", language, kind, entity_id);
                }
                text
            }
            Err(e) => {
                debug!("Translation unavailable for {} #{}: {}", kind, entity_id, e);
                None
            }
        }
    }

    /// Resolve translations for several entities of one kind
    ///
    /// Every lookup is issued before any is awaited; results come back in
    /// the order of `entity_ids` regardless of completion order.
    pub async fn resolve_many(
        &self,
        kind: EntityKind,
        entity_ids: &[i64],
        language: &str,
    ) -> Vec<Option<String>> {
        join_all(
            entity_ids
                .iter()
                .map(|id| self.resolve(kind, *id, language)),
        )
        .await
    }

    async fn lookup(
        &self,
        kind: EntityKind,
        entity_id: i64,
        language: &str,
    ) -> Result<Option<String>, QueryError> {
        let sql = format!(
            "SELECT translation FROM {} WHERE {} = ?1 AND language_code = ?2 COLLATE NOCASE \
             ORDER BY rowid LIMIT 1",
            kind.translation_table(),
            kind.foreign_key()
        );
        let params = vec![
            Value::Integer(entity_id),
            Value::Text(language_utils::storage_language_code(language)),
        ];

        let rows = self.executor.query(&sql, params).await?;
        Ok(rows
            .first()
            .and_then(|row| row.get_non_empty_text("translation")))
    }
}
