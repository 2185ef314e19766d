/*!
 * Navigation tree building.
 *
 * Groups words under their modules. Building is a pure function of its
 * inputs: the same words and modules always give the same tree, and word
 * order inside a group is the order the caller supplied.
 */

use std::collections::HashMap;

use super::models::{AssignedWord, GroupKey, Module, NavigationGroup, NavigationTree};

/// How groups are ordered in the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupOrder {
    /// Groups appear in the order their first word appears; only modules
    /// with words are listed
    FirstSeen,
    /// Groups follow the module list order, ungrouped words last
    Catalog {
        /// List modules that have no words with an empty word list
        include_empty: bool,
    },
}

/// Builds a `NavigationTree` from assigned words and modules
#[derive(Debug, Clone, Copy)]
pub struct NavigationTreeBuilder {
    order: GroupOrder,
}

impl NavigationTreeBuilder {
    /// Create a builder with the given group order
    pub fn new(order: GroupOrder) -> Self {
        Self { order }
    }

    /// Group `words` by module
    ///
    /// A module id referenced by a word but absent from `modules` gets a
    /// placeholder module; such groups are never dropped.
    pub fn build(&self, words: &[AssignedWord], modules: &[Module]) -> NavigationTree {
        let mut keys: Vec<GroupKey> = Vec::new();
        let mut buckets: HashMap<GroupKey, NavigationGroup> = HashMap::new();

        for assigned in words {
            let key = assigned
                .module_id
                .clone()
                .map_or(GroupKey::Ungrouped, GroupKey::Module);
            buckets
                .entry(key.clone())
                .or_insert_with(|| {
                    keys.push(key.clone());
                    new_group(&key, modules)
                })
                .words
                .push(assigned.word.clone());
        }

        let ordered_keys = match self.order {
            GroupOrder::FirstSeen => keys,
            GroupOrder::Catalog { include_empty } => {
                catalog_keys(&keys, modules, &buckets, include_empty)
            }
        };

        let groups = ordered_keys
            .into_iter()
            .map(|key| buckets.remove(&key).unwrap_or_else(|| new_group(&key, modules)))
            .collect();

        NavigationTree { groups }
    }
}

/// Catalog order, then modules only known from words, then the ungrouped bucket
fn catalog_keys(
    first_seen: &[GroupKey],
    modules: &[Module],
    buckets: &HashMap<GroupKey, NavigationGroup>,
    include_empty: bool,
) -> Vec<GroupKey> {
    let mut ordered: Vec<GroupKey> = Vec::new();

    for module in modules {
        let key = GroupKey::Module(module.id.clone());
        if ordered.contains(&key) {
            continue;
        }
        if include_empty || buckets.contains_key(&key) {
            ordered.push(key);
        }
    }

    for key in first_seen {
        if *key != GroupKey::Ungrouped && !ordered.contains(key) {
            ordered.push(key.clone());
        }
    }

    if buckets.contains_key(&GroupKey::Ungrouped) {
        ordered.push(GroupKey::Ungrouped);
    }

    ordered
}

fn new_group(key: &GroupKey, modules: &[Module]) -> NavigationGroup {
    let module = match key {
        GroupKey::Module(id) => Some(
            modules
                .iter()
                .find(|m| m.id == *id)
                .cloned()
                .unwrap_or_else(|| Module::placeholder(id.clone())),
        ),
        GroupKey::Ungrouped => None,
    };

    NavigationGroup {
        key: key.clone(),
        module,
        words: Vec::new(),
    }
}
