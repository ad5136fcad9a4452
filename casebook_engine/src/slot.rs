//! Placement slots -- drop targets each bound to one expected clue.
//!
//! A slot accepts exactly one token, and only the right one. Occupancy is
//! private so that `filled` and the stored token can never disagree.

use crate::idgen;
use crate::ledger::ClueLedger;
use crate::token::ClueToken;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

/// Stable identity of a slot, derived from its case-file symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotId(pub Uuid);

impl SlotId {
    pub fn from_symbol(symbol: &str) -> SlotId {
        SlotId(idgen::slot_uuid(symbol))
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One placement target on the case board.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClueSlot {
    pub id: SlotId,
    pub symbol: String,
    /// Expected clue, configured as an id or an exact title.
    pub expected_clue: String,
    filled: bool,
    current: Option<String>,
}

impl ClueSlot {
    pub fn new(symbol: &str, expected_clue: impl Into<String>) -> ClueSlot {
        ClueSlot {
            id: SlotId::from_symbol(symbol),
            symbol: symbol.to_string(),
            expected_clue: expected_clue.into(),
            filled: false,
            current: None,
        }
    }

    pub fn is_filled(&self) -> bool {
        self.filled
    }

    /// Clue id of the seated token, if any.
    pub fn current_clue(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Three-way identity check against the expected clue.
    ///
    /// Matches when the token's id equals the expectation, when the token's
    /// title equals it (slots may be configured by human-readable title), or
    /// when treating the expectation as a title and resolving it through the
    /// catalog yields the token's id (covers auto-derived ids). First match
    /// short-circuits; an empty expectation never matches.
    pub fn is_correct_clue(&self, token: &ClueToken, ledger: &ClueLedger) -> bool {
        if self.expected_clue.is_empty() {
            return false;
        }
        if token.clue_id == self.expected_clue {
            return true;
        }
        if token.title == self.expected_clue {
            return true;
        }
        ledger
            .get_clue_by_title(&self.expected_clue)
            .is_some_and(|def| def.id == token.clue_id)
    }

    /// Filled and the seated token still passes the identity check.
    pub fn has_correct_clue(&self, tokens: &HashMap<String, ClueToken>, ledger: &ClueLedger) -> bool {
        self.filled
            && self
                .current
                .as_ref()
                .and_then(|id| tokens.get(id))
                .is_some_and(|token| self.is_correct_clue(token, ledger))
    }

    /// Record a token as permanently seated.
    pub(crate) fn seat(&mut self, clue_id: &str) {
        self.filled = true;
        self.current = Some(clue_id.to_string());
    }

    /// Vacate the slot, returning the previous occupant's clue id.
    pub(crate) fn clear(&mut self) -> Option<String> {
        self.filled = false;
        self.current.take()
    }
}
