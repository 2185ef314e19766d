/*!
 * Word detail assembly.
 *
 * Joins a word row with its optional sub-resources (translation, examples,
 * conversation lines, clips) into one `WordViewModel`. Only the base word
 * fetch can fail the assembly; every other step degrades to an empty value
 * when its table is missing or its query fails.
 */

use log::{debug, info};
use rusqlite::types::Value;
use std::sync::Arc;

use super::models::{
    Clip, Conversation, ConversationTurn, EntityKind, ExampleSentence, Word, WordViewModel,
};
use super::translation::TranslationResolver;
use crate::database::{QueryExecutor, Row};
use crate::errors::{ContentError, QueryError};

const WORD_SQL: &str = "SELECT * FROM words WHERE id = ?1 LIMIT 1";
const EXAMPLES_SQL: &str = "SELECT * FROM examples WHERE word_id = ?1 ORDER BY id";
const CONVERSATION_SQL: &str =
    "SELECT * FROM conversation_lines WHERE word_id = ?1 ORDER BY line_order, id";
const CLIPS_SQL: &str = "SELECT * FROM clips WHERE word_id = ?1 ORDER BY id";

/// Builds the view model for a selected word
#[derive(Clone)]
pub struct WordDetailAssembler {
    executor: Arc<dyn QueryExecutor>,
    resolver: TranslationResolver,
}

impl WordDetailAssembler {
    /// Create an assembler reading through the given executor
    pub fn new(executor: Arc<dyn QueryExecutor>) -> Self {
        let resolver = TranslationResolver::new(executor.clone());
        Self { executor, resolver }
    }

    /// Assemble the view model of `word_id` for `language`
    ///
    /// Fails with `NotFound` when the word does not exist and with
    /// `LoadFailure` when the word row cannot be read at all.
    pub async fn assemble(&self, word_id: i64, language: &str) -> Result<WordViewModel, ContentError> {
        let rows = self
            .executor
            .query(WORD_SQL, vec![Value::Integer(word_id)])
            .await?;
        let row = rows.first().ok_or(ContentError::NotFound { word_id })?;
        let word = Word::from_row(row).ok_or_else(|| {
            QueryError::Failure(format!("word #{} has no id or term", word_id))
        })?;

        let (translation, example_sentences, conversation, clips) = futures::join!(
            self.word_translation(&word, language),
            self.examples(word_id, language),
            self.conversation(word_id, language),
            self.clips(word_id),
        );

        info!(
            "Assembled word #{} ({} examples, {} conversation turns, {} clips)",
            word_id,
            example_sentences.len(),
            conversation.turns.len(),
            clips.len()
        );

        Ok(WordViewModel {
            id: word.id,
            term: word.term,
            definition: word.definition,
            pronunciation: word.pronunciation,
            audio_ref: word.audio_ref,
            translation,
            example_sentences,
            conversation,
            clips,
        })
    }

    async fn word_translation(&self, word: &Word, language: &str) -> Option<String> {
        self.resolver
            .resolve(EntityKind::Word, word.id, language)
            .await
            .or_else(|| word.stored_translation.clone())
    }

    async fn examples(&self, word_id: i64, language: &str) -> Vec<ExampleSentence> {
        let rows = self.optional_rows("examples", EXAMPLES_SQL, word_id).await;
        let examples: Vec<(i64, String)> = rows
            .iter()
            .filter_map(|row| {
                let example = row.get_i64("id").zip(row.first_text(&["sentence", "text"]));
                if example.is_none() {
                    debug!("Skipping example of word #{} without id or sentence", word_id);
                }
                example
            })
            .collect();

        let ids: Vec<i64> = examples.iter().map(|(id, _)| *id).collect();
        let translations = self
            .resolver
            .resolve_many(EntityKind::Example, &ids, language)
            .await;

        examples
            .into_iter()
            .zip(translations)
            .map(|((id, sentence), translation)| ExampleSentence {
                id,
                sentence,
                translation,
            })
            .collect()
    }

    async fn conversation(&self, word_id: i64, language: &str) -> Conversation {
        let rows = self
            .optional_rows("conversation_lines", CONVERSATION_SQL, word_id)
            .await;
        let lines: Vec<(i64, String, i64, String)> = rows
            .iter()
            .filter_map(|row| {
                let (Some(id), Some(text)) = (row.get_i64("id"), row.get_text("text")) else {
                    debug!("Skipping conversation line of word #{} without id or text", word_id);
                    return None;
                };
                Some((
                    id,
                    row.first_text(&["speaker_label", "speaker"])
                        .unwrap_or_default(),
                    row.get_i64("line_order").unwrap_or(id),
                    text,
                ))
            })
            .collect();

        let ids: Vec<i64> = lines.iter().map(|(id, ..)| *id).collect();
        let translations = self
            .resolver
            .resolve_many(EntityKind::ConversationLine, &ids, language)
            .await;

        let turns = lines
            .into_iter()
            .zip(translations)
            .map(|((id, speaker, sequence, text), translation)| ConversationTurn {
                id,
                speaker,
                sequence,
                text,
                translation,
            })
            .collect();

        Conversation { turns }
    }

    async fn clips(&self, word_id: i64) -> Vec<Clip> {
        self.optional_rows("clips", CLIPS_SQL, word_id)
            .await
            .iter()
            .filter_map(|row| {
                let (Some(id), Some(url)) = (
                    row.get_i64("id"),
                    row.first_text(&["url", "video_url", "youtube_url"]),
                ) else {
                    debug!("Skipping clip of word #{} without id or url", word_id);
                    return None;
                };
                Some(Clip {
                    id,
                    url,
                    title: row.get_non_empty_text("title"),
                    start_seconds: row.get_f64("start_time"),
                    end_seconds: row.get_f64("end_time"),
                })
            })
            .collect()
    }

    /// Rows of an optional sub-resource; any failure reads as "no rows"
    async fn optional_rows(&self, resource: &str, sql: &str, word_id: i64) -> Vec<Row> {
        match self.executor.query(sql, vec![Value::Integer(word_id)]).await {
            Ok(rows) => rows,
            Err(e) => {
                debug!("Skipping {} for word #{}: {}", resource, word_id, e);
                Vec::new()
            }
        }
    }
}
