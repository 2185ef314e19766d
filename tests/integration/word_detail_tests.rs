/*!
 * Integration tests for assembling word details
 */

use std::sync::Arc;

use course_loader::content::WordDetailAssembler;
use course_loader::errors::ContentError;
use course_loader::{Config, CourseService, DatabaseConnection};
use tempfile::TempDir;

use crate::common::mock_executors::ScriptedExecutor;
use crate::common::{self, LEGACY_COURSE, NORMALIZED_COURSE};

/// Test that the stored translation for the requested language is used
#[tokio::test]
async fn test_assemble_withStoredTranslation_shouldUseIt() {
    let assembler = WordDetailAssembler::new(common::create_shared_db(LEGACY_COURSE));

    let model = assembler.assemble(1, "es").await.unwrap();

    assert_eq!(model.term, "casa");
    assert_eq!(model.translation.as_deref(), Some("house"));
    assert_eq!(model.audio_ref.as_deref(), Some("casa.mp3"));
}

/// Without a row for the language the word's own translation column is used
#[tokio::test]
async fn test_assemble_withMissingLanguage_shouldFallBackToWordColumn() {
    let assembler = WordDetailAssembler::new(common::create_shared_db(LEGACY_COURSE));

    let with_fallback = assembler.assemble(1, "fr").await.unwrap();
    let without_fallback = assembler.assemble(2, "fr").await.unwrap();

    assert_eq!(with_fallback.translation.as_deref(), Some("home"));
    assert_eq!(without_fallback.translation, None);
}

/// Missing optional tables give empty sub-resources and camelCase keys
#[tokio::test]
async fn test_assemble_withoutOptionalTables_shouldSerializeEmptyCollections() {
    let assembler = WordDetailAssembler::new(common::create_shared_db(LEGACY_COURSE));

    let model = assembler.assemble(3, "es").await.unwrap();
    let json = serde_json::to_value(&model).unwrap();

    assert_eq!(json["exampleSentences"], serde_json::json!([]));
    assert_eq!(json["clips"], serde_json::json!([]));
    assert!(model.conversation.is_empty());
    assert_eq!(json["audioRef"], serde_json::Value::Null);
}

/// Test that an unknown word id fails with NotFound
#[tokio::test]
async fn test_assemble_withUnknownWord_shouldFailNotFound() {
    let assembler = WordDetailAssembler::new(common::create_shared_db(NORMALIZED_COURSE));

    let err = assembler.assemble(999, "es").await.unwrap_err();

    assert!(matches!(err, ContentError::NotFound { word_id: 999 }));
}

/// A stored row whose term is NULL is a load failure, not a missing word
#[tokio::test]
async fn test_assemble_withNullTerm_shouldNotReportNotFound() {
    let assembler = WordDetailAssembler::new(common::create_shared_db(
        "CREATE TABLE words (id INTEGER PRIMARY KEY, term TEXT, definition TEXT);
         INSERT INTO words VALUES (1, NULL, 'def');",
    ));

    let err = assembler.assemble(1, "es").await.unwrap_err();

    assert!(matches!(err, ContentError::LoadFailure(_)));
    assert!(err.to_string().contains("word #1"));
}

/// Sub-resource rows missing their text are skipped, the rest are kept
#[tokio::test]
async fn test_assemble_withIncompleteSubResourceRows_shouldSkipThem() {
    common::init_test_logging();
    let assembler = WordDetailAssembler::new(common::create_shared_db(
        "CREATE TABLE words (id INTEGER PRIMARY KEY, term TEXT);
         INSERT INTO words VALUES (1, 'casa');
         CREATE TABLE examples (id INTEGER PRIMARY KEY, word_id INTEGER, sentence TEXT);
         INSERT INTO examples VALUES (1, 1, NULL), (2, 1, 'La casa.');
         CREATE TABLE clips (id INTEGER PRIMARY KEY, word_id INTEGER, url TEXT);
         INSERT INTO clips VALUES (1, 1, ''), (2, 1, 'https://example.org/v');",
    ));

    let model = assembler.assemble(1, "es").await.unwrap();

    assert_eq!(model.example_sentences.len(), 1);
    assert_eq!(model.example_sentences[0].id, 2);
    assert_eq!(model.clips.len(), 1);
    assert_eq!(model.clips[0].id, 2);
}

/// Examples keep storage order and carry their own translations
#[tokio::test]
async fn test_assemble_withExamples_shouldAttachTranslationsInOrder() {
    let assembler = WordDetailAssembler::new(common::create_shared_db(NORMALIZED_COURSE));

    let model = assembler.assemble(1, "es").await.unwrap();

    let examples: Vec<(i64, &str, Option<&str>)> = model
        .example_sentences
        .iter()
        .map(|e| (e.id, e.sentence.as_str(), e.translation.as_deref()))
        .collect();
    assert_eq!(
        examples,
        vec![
            (100, "Mi casa es tu casa.", Some("My house is your house.")),
            (101, "La casa es azul.", Some("The house is blue.")),
        ]
    );
}

/// Conversation turns follow line_order, translated where a row exists
#[tokio::test]
async fn test_assemble_withConversation_shouldOrderTurnsBySequence() {
    let assembler = WordDetailAssembler::new(common::create_shared_db(NORMALIZED_COURSE));

    let model = assembler.assemble(1, "es").await.unwrap();
    let turns = &model.conversation.turns;

    assert_eq!(turns.iter().map(|t| t.id).collect::<Vec<_>>(), vec![201, 200, 202]);
    assert_eq!(turns[0].speaker, "Luis");
    assert_eq!(turns[0].translation.as_deref(), Some("Is this your house?"));
    assert!(turns[1..].iter().all(|t| t.translation.is_none()));
    assert_eq!(model.conversation.speakers(), vec!["Luis", "Ana"]);
}

/// Test clip fields and the audio column variant of normalized databases
#[tokio::test]
async fn test_assemble_withClips_shouldReadTimes() {
    let assembler = WordDetailAssembler::new(common::create_shared_db(NORMALIZED_COURSE));

    let model = assembler.assemble(1, "es").await.unwrap();

    assert_eq!(model.clips.len(), 2);
    assert_eq!(model.clips[0].title.as_deref(), Some("House tour"));
    assert_eq!(model.clips[0].start_seconds, Some(12.5));
    assert_eq!(model.clips[0].end_seconds, Some(20.0));
    assert_eq!(model.clips[1].title, None);
    assert_eq!(model.audio_ref.as_deref(), Some("https://cdn.example/casa.mp3"));
}

/// A failing sub-resource query does not fail the word
#[tokio::test]
async fn test_assemble_withFailingExamplesQuery_shouldStillSucceed() {
    common::init_test_logging();
    let executor = Arc::new(
        ScriptedExecutor::new(common::create_course_db(NORMALIZED_COURSE)).failing_on("FROM examples"),
    );
    let assembler = WordDetailAssembler::new(executor.clone());

    let model = assembler.assemble(1, "es").await.unwrap();

    assert!(model.example_sentences.is_empty());
    assert_eq!(model.conversation.turns.len(), 3);
    assert_eq!(model.translation.as_deref(), Some("house"));
    assert_eq!(executor.count_matching("examples_translations"), 0);
}

/// Test the service against a database file on disk
#[tokio::test]
async fn test_wordDetails_withDatabaseFile_shouldUseConfiguredLanguage() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("course.sqlite3");
    {
        let conn = rusqlite::Connection::open(&path).unwrap();
        conn.execute_batch(NORMALIZED_COURSE).unwrap();
    }

    let db = DatabaseConnection::open(&path).unwrap();
    let config = Config {
        target_language: "fre".to_string(),
        ..Config::default()
    };
    let service = CourseService::new(Arc::new(db), config);

    let model = service.word_details(1).await.unwrap();
    assert_eq!(model.translation.as_deref(), Some("maison"));

    let spanish = service.word_details_in(1, "es").await.unwrap();
    assert_eq!(spanish.translation.as_deref(), Some("house"));
}
