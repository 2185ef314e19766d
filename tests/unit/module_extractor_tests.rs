/*!
 * Tests for module extraction
 */

use std::collections::HashSet;
use std::sync::Arc;

use course_loader::content::models::{Module, ModuleId};
use course_loader::content::modules::derive_from_rows;
use course_loader::content::ModuleExtractor;
use course_loader::database::schema::{self, SchemaReport};
use course_loader::{QueryExecutor, Row};
use rusqlite::types::Value;

use crate::common::{self, LEGACY_COURSE, NORMALIZED_COURSE};
use crate::common::mock_executors::{FailingExecutor, ScriptedExecutor};

async fn legacy_rows(db: &dyn QueryExecutor) -> Vec<Row> {
    db.query("SELECT * FROM words ORDER BY id", Vec::new()).await.unwrap()
}

/// The documented legacy scenario: one word row, no modules table
#[tokio::test]
async fn test_extract_withSingleLegacyRow_shouldSynthesizeNamedModule() {
    let db = common::create_shared_db(
        "CREATE TABLE words (id INTEGER PRIMARY KEY, term TEXT, module_id INTEGER, module_name TEXT);
         INSERT INTO words VALUES (1, 'casa', 5, 'Greetings');",
    );
    let report = schema::inspect(db.as_ref()).await;
    let rows = legacy_rows(db.as_ref()).await;

    let modules = ModuleExtractor::new(db.clone())
        .extract(&report, &rows, Some("module_id"))
        .await;

    assert_eq!(modules, vec![Module::new(5, "Greetings", "Module containing 1 words")]);
}

/// Falsy ids never produce modules, placeholders fill missing names
#[tokio::test]
async fn test_extract_withLegacyCourse_shouldSkipFalsyIdsAndUsePlaceholders() {
    let db = common::create_shared_db(LEGACY_COURSE);
    let report = schema::inspect(db.as_ref()).await;
    let rows = legacy_rows(db.as_ref()).await;

    let modules = ModuleExtractor::new(db.clone())
        .extract(&report, &rows, Some("module_id"))
        .await;

    assert_eq!(
        modules,
        vec![
            Module::new(5, "Greetings", "Module containing 2 words"),
            Module::new(2, "Module 2", "Module containing 1 words"),
        ]
    );
}

/// Text module codes are modules like any other
#[tokio::test]
async fn test_extract_withTextModuleIds_shouldSynthesizeModules() {
    let db = common::create_shared_db(
        "CREATE TABLE words (id INTEGER PRIMARY KEY, term TEXT, module_id TEXT, module_name TEXT);
         INSERT INTO words VALUES (1, 'casa', 'A1', 'Greetings'), (2, 'hola', 'B2', NULL);",
    );
    let report = schema::inspect(db.as_ref()).await;
    let rows = legacy_rows(db.as_ref()).await;

    let modules = ModuleExtractor::new(db.clone())
        .extract(&report, &rows, Some("module_id"))
        .await;

    assert_eq!(
        modules,
        vec![
            Module::new("A1", "Greetings", "Module containing 1 words"),
            Module::new("B2", "Module B2", "Module containing 1 words"),
        ]
    );
}

/// Catalog rows keep storage order, and referenced ids the catalog lacks
/// are appended instead of dropped
#[tokio::test]
async fn test_extract_withCatalog_shouldKeepStorageOrderAndAddMissing() {
    let db = common::create_shared_db(NORMALIZED_COURSE);
    let report = schema::inspect(db.as_ref()).await;
    let rows = db
        .query(
            "SELECT w.*, wm.module_id AS assigned_module_id FROM words w \
             LEFT JOIN word_modules wm ON wm.word_id = w.id ORDER BY w.id, wm.module_id",
            Vec::new(),
        )
        .await
        .unwrap();

    let modules = ModuleExtractor::new(db.clone())
        .extract(&report, &rows, Some("assigned_module_id"))
        .await;

    let ids: Vec<ModuleId> = modules.iter().map(|m| m.id.clone()).collect();
    assert_eq!(ids, [20, 10, 30, 40].map(ModuleId::Int));
    assert_eq!(modules[0].description, "Words about the home");
    assert_eq!(modules[3].name, "Module 40");
}

/// An unreadable catalog falls back to word-row derivation
#[tokio::test]
async fn test_extract_withFailingCatalogQuery_shouldDeriveFromRows() {
    let db = common::create_course_db(NORMALIZED_COURSE);
    let report = schema::inspect(&db).await;
    let executor = Arc::new(ScriptedExecutor::new(db).failing_on("FROM modules"));

    let rows = vec![Row::from_pairs(vec![
        ("id", Value::Integer(1)),
        ("term", Value::Text("casa".to_string())),
        ("assigned_module_id", Value::Integer(20)),
    ])];

    let modules = ModuleExtractor::new(executor.clone())
        .extract(&report, &rows, Some("assigned_module_id"))
        .await;

    assert_eq!(modules, vec![Module::new(20, "Module 20", "Module containing 1 words")]);
    assert_eq!(executor.count_matching("FROM modules"), 1);
}

/// Without a modules table no catalog query is issued at all
#[tokio::test]
async fn test_extract_withoutModulesTable_shouldNotQuery() {
    let executor = Arc::new(FailingExecutor);
    let report = SchemaReport::from_columns(vec![("words", "id"), ("words", "module_id")]);
    let rows = vec![Row::from_pairs(vec![
        ("id", Value::Integer(1)),
        ("term", Value::Text("casa".to_string())),
        ("module_id", Value::Integer(3)),
    ])];

    let modules = ModuleExtractor::new(executor).extract(&report, &rows, Some("module_id")).await;

    assert_eq!(modules.len(), 1);
    assert_eq!(modules[0].id, ModuleId::Int(3));
}

/// Derivation never yields duplicates and covers every referenced id,
/// whatever the row order
#[test]
fn test_deriveFromRows_withShuffledRows_shouldCoverEveryReferencedIdOnce() {
    let module_ids = [4, 1, 4, 0, 9, 1, 1, 7, 9, 4];

    for rotation in 0..module_ids.len() {
        let mut ids = module_ids.to_vec();
        ids.rotate_left(rotation);

        let rows: Vec<Row> = ids
            .iter()
            .enumerate()
            .map(|(idx, module_id)| {
                Row::from_pairs(vec![
                    ("id", Value::Integer(idx as i64 + 1)),
                    ("module_id", Value::Integer(*module_id)),
                ])
            })
            .collect();

        let modules = derive_from_rows(&rows, "module_id");
        let produced: Vec<ModuleId> = modules.iter().map(|m| m.id.clone()).collect();
        let unique: HashSet<ModuleId> = produced.iter().cloned().collect();
        let referenced: HashSet<ModuleId> = ids
            .iter()
            .copied()
            .filter(|id| *id != 0)
            .map(ModuleId::Int)
            .collect();

        assert_eq!(produced.len(), unique.len());
        assert_eq!(unique, referenced);
        assert_eq!(derive_from_rows(&rows, "module_id"), modules);
    }
}
