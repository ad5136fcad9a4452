//! Typed events emitted by the clue core.
//!
//! Replaces ad-hoc callback delegates with an explicit queue: the host drains
//! it once per frame and reacts (opening the notebook, loading a scene,
//! rebuilding the scroll layout). Firing conditions follow state transitions,
//! not calls -- a duplicate grant emits nothing, completion fires once.

use crate::slot::SlotId;
use crate::stage::Stage;

use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Everything the clue core can tell the rest of the game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaseEvent {
    /// A clue was granted for the first time.
    ClueEarned { clue_id: String },
    /// A token was permanently seated in a slot.
    CluePlaced { clue_id: String, slot_id: SlotId },
    /// A placed token was administratively returned to the pool.
    ClueReturned { clue_id: String, slot_id: SlotId },
    /// A slot changed occupancy, in either direction.
    SlotUpdated { slot_id: SlotId },
    /// The stage clock moved to a new phase.
    StageChanged { stage: Stage },
    /// Every slot is filled. Fired at most once per session.
    GameCompleted,
    /// Ask the notebook collaborator to open.
    NotebookRequested,
    /// Ask the layout collaborator to rebuild the scroll pool.
    LayoutRebuildRequested,
    /// Ask the scene collaborator to load the named scene.
    SceneRequested { scene: String },
}

/// FIFO queue of pending events.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventBus {
    queue: VecDeque<CaseEvent>,
}

impl EventBus {
    pub fn emit(&mut self, event: CaseEvent) {
        debug!("event emitted: {event:?}");
        self.queue.push_back(event);
    }

    /// Take every pending event, oldest first.
    pub fn drain(&mut self) -> Vec<CaseEvent> {
        self.queue.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_returns_events_in_emission_order() {
        let mut bus = EventBus::default();
        bus.emit(CaseEvent::ClueEarned {
            clue_id: "clue_a".into(),
        });
        bus.emit(CaseEvent::GameCompleted);

        let events = bus.drain();
        assert_eq!(events.len(), 2);
        assert!(matches!(&events[0], CaseEvent::ClueEarned { clue_id } if clue_id == "clue_a"));
        assert!(matches!(events[1], CaseEvent::GameCompleted));
        assert!(bus.is_empty());
    }

    #[test]
    fn drain_on_empty_bus_is_empty() {
        let mut bus = EventBus::default();
        assert!(bus.drain().is_empty());
    }
}
