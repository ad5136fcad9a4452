//! Completion detection -- an aggregate latch over every slot on the board.
//!
//! The detector keeps its own cache of known slot ids because the scene can
//! create slots lazily; anything that changes the slot population must
//! invalidate the cache. `game_completed` is a one-way latch: once the case
//! is solved it stays solved for the rest of the session.

use crate::ledger::ClueLedger;
use crate::slot::{ClueSlot, SlotId};
use crate::token::ClueToken;

use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Snapshot of board progress. Purely diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionStats {
    pub filled: usize,
    pub correct: usize,
    pub total: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompletionDetector {
    cached_slots: Vec<SlotId>,
    cache_valid: bool,
    pub game_completed: bool,
}

impl CompletionDetector {
    /// Mark the slot cache stale; it is rebuilt on the next query.
    pub fn invalidate_cache(&mut self) {
        self.cache_valid = false;
    }

    /// Rebuild the slot cache from the current slot population.
    pub fn refresh_cache(&mut self, slots: &HashMap<SlotId, ClueSlot>) {
        self.cached_slots = slots.keys().copied().collect();
        self.cache_valid = true;
    }

    fn ensure_cache(&mut self, slots: &HashMap<SlotId, ClueSlot>) {
        if !self.cache_valid {
            self.refresh_cache(slots);
        }
    }

    pub fn known_slot_count(&self) -> usize {
        self.cached_slots.len()
    }

    /// True iff every known slot is filled.
    ///
    /// An empty slot set is never complete -- a board with no slots wired up
    /// is a setup in progress, not a solved case.
    pub fn are_all_slots_filled(&mut self, slots: &HashMap<SlotId, ClueSlot>) -> bool {
        self.ensure_cache(slots);
        if self.cached_slots.is_empty() {
            return false;
        }
        self.cached_slots
            .iter()
            .all(|id| slots.get(id).is_some_and(ClueSlot::is_filled))
    }

    /// Stricter diagnostic check: every slot filled with a still-matching
    /// token. Functionally redundant in normal play, since slots only ever
    /// accept the correct clue.
    pub fn are_all_slots_correctly_filled(
        &mut self,
        slots: &HashMap<SlotId, ClueSlot>,
        tokens: &HashMap<String, ClueToken>,
        ledger: &ClueLedger,
    ) -> bool {
        self.ensure_cache(slots);
        if self.cached_slots.is_empty() {
            warn!("completion check ran with no slots registered");
            return false;
        }
        self.cached_slots
            .iter()
            .all(|id| slots.get(id).is_some_and(|slot| slot.has_correct_clue(tokens, ledger)))
    }

    /// Count filled and correctly-filled slots. No side effects beyond a
    /// possible cache rebuild.
    pub fn completion_stats(
        &mut self,
        slots: &HashMap<SlotId, ClueSlot>,
        tokens: &HashMap<String, ClueToken>,
        ledger: &ClueLedger,
    ) -> CompletionStats {
        self.ensure_cache(slots);
        let mut stats = CompletionStats {
            filled: 0,
            correct: 0,
            total: self.cached_slots.len(),
        };
        for id in &self.cached_slots {
            let Some(slot) = slots.get(id) else { continue };
            if slot.is_filled() {
                stats.filled += 1;
                if slot.has_correct_clue(tokens, ledger) {
                    stats.correct += 1;
                }
            }
        }
        stats
    }
}
