//! The clue ledger -- catalog of every clue plus earned/unplaced tracking.
//!
//! The ledger is the single source of truth for which clues exist and which
//! the player has found. Earned clues carry a bookkeeping entry only while
//! their token is still waiting in the scroll pool; placing the token into a
//! slot removes the entry but never un-earns the clue itself.

use casebook_data::{ClueCategory, ClueDef};
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Catalog entry, immutable after load apart from the earned flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClueDefinition {
    /// Effective id, already resolved (explicit or derived from the title).
    pub id: String,
    pub title: String,
    pub description: String,
    pub icon: Option<String>,
    pub category: ClueCategory,
    pub is_earned: bool,
}

impl ClueDefinition {
    fn from_def(def: &ClueDef) -> ClueDefinition {
        ClueDefinition {
            id: def.effective_id(),
            title: def.title.clone(),
            description: def.description.clone(),
            icon: def.icon.clone(),
            category: def.category,
            is_earned: false,
        }
    }
}

/// Bookkeeping for one earned, not-yet-placed clue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EarnedEntry {
    /// Grant ordinal; orders the pool under [`SortMethod::ByEarnedTime`].
    pub seq: usize,
}

/// Presentation orderings for the unplaced-token pool.
///
/// Sorting is pure: it never mutates ledger state, only the returned order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortMethod {
    /// Name < Location < Object < Action, ties broken by title.
    ByCategory,
    /// Lexicographic by title.
    ByTitle,
    /// Grant order, newest last.
    #[default]
    ByEarnedTime,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClueLedger {
    clues: HashMap<String, ClueDefinition>,
    /// Catalog ids in authored order, for stable listings and title lookup.
    order: Vec<String>,
    earned: HashMap<String, EarnedEntry>,
    next_seq: usize,
    sort_method: SortMethod,
}

impl ClueLedger {
    /// Build the ledger from authored clue definitions.
    ///
    /// Effective ids are resolved here once; duplicate ids should have been
    /// rejected by `casebook_data::validate_case` before this point (later
    /// duplicates overwrite earlier ones).
    pub fn new(defs: &[ClueDef]) -> ClueLedger {
        let mut ledger = ClueLedger::default();
        for def in defs {
            let definition = ClueDefinition::from_def(def);
            ledger.order.push(definition.id.clone());
            ledger.clues.insert(definition.id.clone(), definition);
        }
        info!("clue ledger built with {} catalog entries", ledger.clues.len());
        ledger
    }

    /// Catalog lookup by id, independent of earned state.
    pub fn get_clue(&self, clue_id: &str) -> Option<&ClueDefinition> {
        self.clues.get(clue_id)
    }

    /// First catalog match by exact title, in authored order. Case-sensitive.
    pub fn get_clue_by_title(&self, title: &str) -> Option<&ClueDefinition> {
        self.order
            .iter()
            .filter_map(|id| self.clues.get(id))
            .find(|def| def.title == title)
    }

    /// Whether the clue has ever been granted. Stays true after the token is
    /// placed in a slot -- placement consumes the pool entry, not the find.
    pub fn has_clue(&self, clue_id: &str) -> bool {
        self.clues.get(clue_id).is_some_and(|def| def.is_earned)
    }

    /// Whether the clue is earned and its token still waits in the pool.
    pub fn is_unplaced(&self, clue_id: &str) -> bool {
        self.earned.contains_key(clue_id)
    }

    pub fn catalog_len(&self) -> usize {
        self.clues.len()
    }

    pub fn earned_count(&self) -> usize {
        self.clues.values().filter(|def| def.is_earned).count()
    }

    pub fn unplaced_count(&self) -> usize {
        self.earned.len()
    }

    pub fn sort_method(&self) -> SortMethod {
        self.sort_method
    }

    pub fn set_sort_method(&mut self, method: SortMethod) {
        self.sort_method = method;
    }

    /// The unplaced pool ordered by the current sort method.
    pub fn sorted_unplaced(&self) -> Vec<&ClueDefinition> {
        let mut entries: Vec<(EarnedEntry, &ClueDefinition)> = self
            .earned
            .iter()
            .filter_map(|(id, entry)| self.clues.get(id).map(|def| (*entry, def)))
            .collect();
        match self.sort_method {
            SortMethod::ByCategory => entries.sort_by(|a, b| {
                a.1.category
                    .cmp(&b.1.category)
                    .then_with(|| a.1.title.cmp(&b.1.title))
            }),
            SortMethod::ByTitle => entries.sort_by(|a, b| a.1.title.cmp(&b.1.title)),
            SortMethod::ByEarnedTime => entries.sort_by_key(|(entry, _)| entry.seq),
        }
        entries.into_iter().map(|(_, def)| def).collect()
    }

    /// Mark a clue earned and create its pool entry. Caller has already
    /// checked the clue exists and was not earned before.
    pub(crate) fn mark_earned(&mut self, clue_id: &str) {
        if let Some(def) = self.clues.get_mut(clue_id) {
            def.is_earned = true;
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.earned.insert(clue_id.to_string(), EarnedEntry { seq });
    }

    /// Drop the pool entry for a permanently placed clue.
    /// The underlying definition stays earned.
    pub(crate) fn remove_earned(&mut self, clue_id: &str) {
        self.earned.remove(clue_id);
    }

    /// Reconstitute the pool entry after a slot was cleared.
    /// The returned token sorts as the newest find under earned-time order.
    pub(crate) fn restore_earned(&mut self, clue_id: &str) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.earned.insert(clue_id.to_string(), EarnedEntry { seq });
    }
}
