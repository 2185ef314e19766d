/*!
 * Course content loading.
 *
 * This module turns database rows into the values the UI consumes:
 * - `modules`: canonical module list, stored or synthesized
 * - `navigation`: module-grouped navigation tree
 * - `translation`: per-language translation lookup with fallback
 * - `assembler`: per-word view model assembly
 */

pub mod assembler;
pub mod models;
pub mod modules;
pub mod navigation;
pub mod translation;

pub use assembler::WordDetailAssembler;
pub use models::{
    AssignedWord, Clip, Conversation, ConversationTurn, EntityKind, ExampleSentence, GroupKey,
    Module, ModuleId, NavigationGroup, NavigationTree, Word, WordSummary, WordViewModel,
};
pub use modules::ModuleExtractor;
pub use navigation::{GroupOrder, NavigationTreeBuilder};
pub use translation::TranslationResolver;
