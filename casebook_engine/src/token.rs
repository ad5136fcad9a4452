//! Clue tokens and their container transitions.
//!
//! A token is the movable representation of one earned clue. It lives in the
//! scroll pool until a drag gesture carries it into a slot; a rejected or
//! interrupted gesture always puts it back in the pool. The container is an
//! enum, so a token can never be in two places or in none.

use crate::slot::SlotId;

use casebook_data::ClueCategory;
use log::debug;
use serde::{Deserialize, Serialize};
use variantly::Variantly;

/// Where a token currently lives.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Variantly)]
#[serde(rename_all = "camelCase")]
pub enum TokenContainer {
    /// The shared pool of earned, unplaced tokens.
    #[default]
    ScrollArea,
    /// Seated in a slot.
    Slot(SlotId),
    /// Mid-gesture, between pointer down and drop resolution.
    InTransit,
}

/// Runtime representation of one earned clue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClueToken {
    pub clue_id: String,
    pub title: String,
    pub category: ClueCategory,
    draggable: bool,
    container: TokenContainer,
    origin: Option<TokenContainer>,
}

impl ClueToken {
    pub fn new(clue_id: impl Into<String>, title: impl Into<String>, category: ClueCategory) -> ClueToken {
        ClueToken {
            clue_id: clue_id.into(),
            title: title.into(),
            category,
            draggable: true,
            container: TokenContainer::ScrollArea,
            origin: None,
        }
    }

    pub fn is_draggable(&self) -> bool {
        self.draggable
    }

    pub fn container(&self) -> TokenContainer {
        self.container
    }

    /// Container snapshot taken at drag start; `None` outside a gesture.
    pub fn drag_origin(&self) -> Option<TokenContainer> {
        self.origin
    }

    /// Begin a drag gesture.
    ///
    /// Returns `false` without any state change when the token is inert.
    pub fn begin_drag(&mut self) -> bool {
        if !self.draggable {
            debug!("token '{}' is not draggable; drag ignored", self.clue_id);
            return false;
        }
        self.origin = Some(self.container);
        self.container = TokenContainer::InTransit;
        true
    }

    /// Resolve a drag gesture.
    ///
    /// When a slot accepted the drop it has already reparented the token and
    /// this only discards the origin snapshot. Otherwise the token lands back
    /// in the scroll pool, draggable again -- never orphaned, regardless of
    /// where the gesture started.
    pub fn end_drag(&mut self) {
        if self.container.is_in_transit() {
            self.container = TokenContainer::ScrollArea;
            self.draggable = true;
        }
        self.origin = None;
    }

    pub fn set_draggable(&mut self, draggable: bool) {
        self.draggable = draggable;
    }

    /// Seat the token in a slot permanently.
    pub(crate) fn seat_in(&mut self, slot_id: SlotId) {
        self.container = TokenContainer::Slot(slot_id);
        self.draggable = false;
        self.origin = None;
    }

    /// Return the token to the scroll pool and make it draggable again.
    pub(crate) fn release_to_pool(&mut self) {
        self.container = TokenContainer::ScrollArea;
        self.draggable = true;
        self.origin = None;
    }
}
