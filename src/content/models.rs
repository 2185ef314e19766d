/*!
 * Course content models.
 *
 * These are the plain-data values handed to the UI layer: modules, the
 * navigation tree and the per-word view model. They carry no behavior beyond
 * small accessors and serialize with camelCase keys.
 */

use rusqlite::types::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::database::Row;

/// Identifier of a module as stored in the database
///
/// Integer ids are the common case, but legacy databases may key modules by
/// text codes such as `"A1"`. Numeric text reads as an integer id so that
/// `'5'` and `5` name the same module.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ModuleId {
    Int(i64),
    Text(String),
}

impl ModuleId {
    /// Interpret a stored value; NULL, zero and blank values mean "no module"
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Integer(0) => None,
            Value::Integer(n) => Some(Self::Int(*n)),
            Value::Real(f) if f.fract() == 0.0 => Self::from_value(&Value::Integer(*f as i64)),
            Value::Real(f) => Some(Self::Text(f.to_string())),
            Value::Text(s) => Self::parse(s),
            Value::Null | Value::Blob(_) => None,
        }
    }

    /// Module reference held by `column` of a row
    pub fn from_row(row: &Row, column: &str) -> Option<Self> {
        row.value(column).and_then(Self::from_value)
    }

    fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        match text.parse::<i64>() {
            Ok(0) => None,
            Ok(n) => Some(Self::Int(n)),
            Err(_) => Some(Self::Text(text.to_string())),
        }
    }
}

impl From<i64> for ModuleId {
    fn from(id: i64) -> Self {
        Self::Int(id)
    }
}

impl From<i32> for ModuleId {
    fn from(id: i32) -> Self {
        Self::Int(i64::from(id))
    }
}

impl From<&str> for ModuleId {
    fn from(id: &str) -> Self {
        Self::Text(id.to_string())
    }
}

impl From<String> for ModuleId {
    fn from(id: String) -> Self {
        Self::Text(id)
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModuleId::Int(id) => write!(f, "{}", id),
            ModuleId::Text(id) => write!(f, "{}", id),
        }
    }
}

/// A named grouping of words in the course
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    /// Module identifier, unique within a catalog
    pub id: ModuleId,
    /// Display name
    pub name: String,
    /// Short description, possibly synthesized
    pub description: String,
}

impl Module {
    /// Create a module from stored values
    pub fn new(
        id: impl Into<ModuleId>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
        }
    }

    /// Placeholder for a module that is referenced but not stored
    pub fn placeholder(id: ModuleId) -> Self {
        let name = placeholder_name(&id);
        Self::new(id, name, String::new())
    }
}

/// Name given to modules without a stored name
pub fn placeholder_name(id: &ModuleId) -> String {
    format!("Module {}", id)
}

/// Description given to modules derived from word rows
pub fn synthesized_description(word_count: usize) -> String {
    format!("Module containing {} words", word_count)
}

/// Entity kinds that can carry per-language translations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Word,
    Example,
    ConversationLine,
}

impl EntityKind {
    /// Translation table for this kind
    pub fn translation_table(&self) -> &'static str {
        match self {
            Self::Word => "words_translations",
            Self::Example => "examples_translations",
            Self::ConversationLine => "conversation_lines_translations",
        }
    }

    /// Foreign key column in the translation table
    pub fn foreign_key(&self) -> &'static str {
        match self {
            Self::Word => "word_id",
            Self::Example => "example_id",
            Self::ConversationLine => "conversation_line_id",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Word => write!(f, "word"),
            EntityKind::Example => write!(f, "example"),
            EntityKind::ConversationLine => write!(f, "conversation_line"),
        }
    }
}

/// Full vocabulary entry as stored in `words`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Word {
    pub id: i64,
    pub term: String,
    pub definition: Option<String>,
    pub pronunciation: Option<String>,
    pub audio_ref: Option<String>,
    /// Translation stored directly on the word row, used as fallback
    pub stored_translation: Option<String>,
}

impl Word {
    /// Read a word from a `words` row; rows without id or term are rejected
    pub fn from_row(row: &Row) -> Option<Self> {
        Some(Self {
            id: row.get_i64("id")?,
            term: row.get_text("term")?,
            definition: row.get_non_empty_text("definition"),
            pronunciation: row.get_non_empty_text("pronunciation"),
            audio_ref: row.first_text(&["audio_ref", "audio_url", "audio_file"]),
            stored_translation: row.get_non_empty_text("translation"),
        })
    }

    /// Navigation summary of this word
    pub fn summary(&self) -> WordSummary {
        WordSummary {
            id: self.id,
            term: self.term.clone(),
        }
    }
}

/// What the navigation tree shows for a word
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WordSummary {
    pub id: i64,
    pub term: String,
}

/// A word placed in the tree together with its module association
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignedWord {
    pub word: WordSummary,
    /// `None` puts the word in the ungrouped bucket
    pub module_id: Option<ModuleId>,
}

impl AssignedWord {
    /// Create an assignment
    pub fn new(word: WordSummary, module_id: Option<ModuleId>) -> Self {
        Self { word, module_id }
    }

    /// Read an assignment from a word row using the layout's module column
    pub fn from_row(row: &Row, module_column: Option<&str>) -> Option<Self> {
        let word = WordSummary {
            id: row.get_i64("id")?,
            term: row.get_text("term")?,
        };
        let module_id = module_column.and_then(|column| ModuleId::from_row(row, column));
        Some(Self { word, module_id })
    }
}

/// Grouping key of a navigation group
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKey {
    Module(ModuleId),
    Ungrouped,
}

/// One module (or the ungrouped bucket) with its words
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationGroup {
    pub key: GroupKey,
    /// `None` only for the ungrouped bucket
    pub module: Option<Module>,
    pub words: Vec<WordSummary>,
}

impl NavigationGroup {
    /// Heading shown for this group
    pub fn label(&self) -> &str {
        match &self.module {
            Some(module) => &module.name,
            None => "Ungrouped",
        }
    }
}

/// Ordered, module-grouped structure that drives the browsing UI
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationTree {
    pub groups: Vec<NavigationGroup>,
}

impl NavigationTree {
    /// Group for a module, if the module appears in the tree
    pub fn group_for(&self, module_id: impl Into<ModuleId>) -> Option<&NavigationGroup> {
        let key = GroupKey::Module(module_id.into());
        self.groups.iter().find(|g| g.key == key)
    }

    /// The ungrouped bucket, if any word lacks a module
    pub fn ungrouped(&self) -> Option<&NavigationGroup> {
        self.groups.iter().find(|g| g.key == GroupKey::Ungrouped)
    }

    /// Module ids in tree order
    pub fn module_ids(&self) -> Vec<ModuleId> {
        self.groups
            .iter()
            .filter_map(|g| match &g.key {
                GroupKey::Module(id) => Some(id.clone()),
                GroupKey::Ungrouped => None,
            })
            .collect()
    }

    /// Number of word placements (a word in two modules counts twice)
    pub fn word_count(&self) -> usize {
        self.groups.iter().map(|g| g.words.len()).sum()
    }

    /// Whether the tree has no groups
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Example sentence for a word
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExampleSentence {
    pub id: i64,
    pub sentence: String,
    pub translation: Option<String>,
}

/// One named turn of a word's conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub id: i64,
    pub speaker: String,
    /// Value of the explicit `line_order` column
    pub sequence: i64,
    pub text: String,
    pub translation: Option<String>,
}

/// All conversation lines of a word, in sequence order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub turns: Vec<ConversationTurn>,
}

impl Conversation {
    /// Whether the word has no conversation
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Distinct speakers in order of first appearance
    pub fn speakers(&self) -> Vec<&str> {
        let mut speakers: Vec<&str> = Vec::new();
        for turn in &self.turns {
            if !speakers.contains(&turn.speaker.as_str()) {
                speakers.push(&turn.speaker);
            }
        }
        speakers
    }
}

/// Video or audio clip attached to a word
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Clip {
    pub id: i64,
    pub url: String,
    pub title: Option<String>,
    pub start_seconds: Option<f64>,
    pub end_seconds: Option<f64>,
}

/// UI-ready aggregate of a word and its sub-resources
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordViewModel {
    pub id: i64,
    pub term: String,
    pub definition: Option<String>,
    pub pronunciation: Option<String>,
    pub audio_ref: Option<String>,
    /// Resolved translation for the requested language
    pub translation: Option<String>,
    pub example_sentences: Vec<ExampleSentence>,
    pub conversation: Conversation,
    pub clips: Vec<Clip>,
}
