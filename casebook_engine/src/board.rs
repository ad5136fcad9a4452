//! The case board -- aggregate runtime state and the clue placement flow.
//!
//! `CaseBoard` owns the ledger, every live token and slot, the completion
//! latch, the stage clock, and the deferred-task scheduler. The functions in
//! this module are the entry points the surrounding game calls from input
//! handlers; each one resolves fully before returning, so a drop is never
//! interleaved with another gesture.

use crate::completion::{CompletionDetector, CompletionStats};
use crate::events::{CaseEvent, EventBus};
use crate::ledger::ClueLedger;
use crate::scheduler::{DeferredAction, Scheduler};
use crate::slot::{ClueSlot, SlotId};
use crate::stage::{Stage, StageClock};
use crate::token::{ClueToken, TokenContainer};
use crate::CASEBOOK_VERSION;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Frames to wait before reasserting a fresh token's drag state, so that
/// same-frame initialization elsewhere cannot clobber it.
const TOKEN_VISUAL_FIXUP_FRAMES: u64 = 3;
/// Frames to wait before asking for a scroll-pool layout rebuild.
const LAYOUT_REBUILD_FRAMES: u64 = 1;

/// Tunables loaded from `settings.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaseSettings {
    /// Scene requested once the completion delay elapses.
    pub end_scene: String,
    pub completion_message: String,
    pub transition_delay_frames: u64,
    pub stage_interval_frames: u64,
    pub auto_advance_stages: bool,
}

impl Default for CaseSettings {
    fn default() -> CaseSettings {
        CaseSettings {
            end_scene: "end_scene".to_string(),
            completion_message: "All clues are in place. Case closed.".to_string(),
            transition_delay_frames: 120,
            stage_interval_frames: 3600,
            auto_advance_stages: true,
        }
    }
}

/// Board operations that reference entities which must exist.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("no token for clue '{0}' on the board")]
    UnknownToken(String),
    #[error("token '{0}' is not mid-drag")]
    TokenNotInTransit(String),
    #[error("no slot {0} on the board")]
    UnknownSlot(SlotId),
}

/// Outcome of resolving a drop gesture over a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// Correct clue; the token is permanently seated.
    Placed,
    /// Wrong clue; the token bounced back to the scroll pool.
    Rejected,
    /// The slot was already occupied; nothing changed except the token
    /// returning to the pool.
    SlotFilled,
}

/// Complete state of one running case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseBoard {
    pub title: String,
    pub ledger: ClueLedger,
    pub tokens: HashMap<String, ClueToken>,
    pub slots: HashMap<SlotId, ClueSlot>,
    pub completion: CompletionDetector,
    pub stage_clock: StageClock,
    pub scheduler: Scheduler,
    pub events: EventBus,
    pub settings: CaseSettings,
    pub frame: u64,
    pub version: String,
}

impl CaseBoard {
    /// Create a new empty board with default settings.
    pub fn new_empty() -> CaseBoard {
        let board = CaseBoard {
            title: String::new(),
            ledger: ClueLedger::default(),
            tokens: HashMap::new(),
            slots: HashMap::new(),
            completion: CompletionDetector::default(),
            stage_clock: StageClock::default(),
            scheduler: Scheduler::default(),
            events: EventBus::default(),
            settings: CaseSettings::default(),
            frame: 0,
            version: CASEBOOK_VERSION.to_string(),
        };
        debug!("new, empty CaseBoard created");
        board
    }

    /// Register a slot and mark the completion cache stale.
    pub fn add_slot(&mut self, slot: ClueSlot) {
        self.slots.insert(slot.id, slot);
        self.completion.invalidate_cache();
    }

    /// Look a slot up by its case-file symbol.
    pub fn slot_by_symbol(&self, symbol: &str) -> Option<&ClueSlot> {
        self.slots.values().find(|slot| slot.symbol == symbol)
    }
}

/// Grant a clue to the player, once.
///
/// Silent no-op when the id is empty, the clue is unknown, or it was already
/// earned -- repeated grants are expected interaction, not errors. On the
/// one real transition this creates the token in the scroll pool, fires
/// `ClueEarned`, and (when asked) requests the notebook.
pub fn grant_clue(board: &mut CaseBoard, clue_id: &str, open_notebook: bool) {
    if clue_id.trim().is_empty() {
        warn!("grant ignored: clue id is empty");
        return;
    }
    let Some(def) = board.ledger.get_clue(clue_id) else {
        warn!("grant ignored: clue '{clue_id}' not found in catalog");
        return;
    };
    if def.is_earned {
        debug!("grant ignored: clue '{clue_id}' already earned");
        return;
    }
    let title = def.title.clone();
    let category = def.category;

    board.ledger.mark_earned(clue_id);
    board
        .tokens
        .insert(clue_id.to_string(), ClueToken::new(clue_id, title, category));
    info!("clue '{clue_id}' granted; token added to the scroll pool");

    board.scheduler.schedule_in(
        board.frame,
        TOKEN_VISUAL_FIXUP_FRAMES,
        DeferredAction::RefreshTokenVisual {
            clue_id: clue_id.to_string(),
        },
        Some(format!("reassert visual state of '{clue_id}'")),
    );
    board.scheduler.schedule_in(
        board.frame,
        LAYOUT_REBUILD_FRAMES,
        DeferredAction::RebuildScrollLayout,
        Some("token joined the scroll pool".to_string()),
    );

    board.events.emit(CaseEvent::ClueEarned {
        clue_id: clue_id.to_string(),
    });
    if open_notebook {
        board.events.emit(CaseEvent::NotebookRequested);
    }
}

/// Begin a drag gesture on a token.
///
/// Returns `false` (no state change) when the token is missing or inert.
pub fn begin_drag(board: &mut CaseBoard, clue_id: &str) -> bool {
    board
        .tokens
        .get_mut(clue_id)
        .is_some_and(|token| token.begin_drag())
}

/// Resolve a drag that ended with no valid drop target: the token returns
/// to the scroll pool.
///
/// # Errors
/// - when no token exists for `clue_id`
pub fn cancel_drag(board: &mut CaseBoard, clue_id: &str) -> Result<(), BoardError> {
    match board.tokens.get_mut(clue_id) {
        Some(token) => {
            token.end_drag();
            Ok(())
        },
        None => Err(BoardError::UnknownToken(clue_id.to_string())),
    }
}

/// Resolve a drop of an in-transit token over a slot.
///
/// A filled slot ignores every drop; a wrong clue bounces back to the pool.
/// A correct clue is seated atomically: the slot fills, the token becomes
/// inert and reparents to the slot, the ledger forgets the pool entry, and
/// the completion detector is notified.
///
/// # Errors
/// - when the token or slot does not exist, or the token was never dragged
pub fn resolve_drop(board: &mut CaseBoard, clue_id: &str, slot_id: SlotId) -> Result<DropOutcome, BoardError> {
    let Some(token) = board.tokens.get(clue_id) else {
        return Err(BoardError::UnknownToken(clue_id.to_string()));
    };
    if !token.container().is_in_transit() {
        return Err(BoardError::TokenNotInTransit(clue_id.to_string()));
    }
    let Some(slot) = board.slots.get(&slot_id) else {
        return Err(BoardError::UnknownSlot(slot_id));
    };

    if slot.is_filled() {
        info!(
            "drop on filled slot '{}' ignored; token '{clue_id}' returns to pool",
            slot.symbol
        );
        if let Some(token) = board.tokens.get_mut(clue_id) {
            token.end_drag();
        }
        return Ok(DropOutcome::SlotFilled);
    }

    if !slot.is_correct_clue(token, &board.ledger) {
        info!("drop rejected: '{clue_id}' does not belong in slot '{}'", slot.symbol);
        if let Some(token) = board.tokens.get_mut(clue_id) {
            token.end_drag();
        }
        return Ok(DropOutcome::Rejected);
    }

    if let Some(token) = board.tokens.get_mut(clue_id) {
        token.seat_in(slot_id);
    }
    if let Some(slot) = board.slots.get_mut(&slot_id) {
        slot.seat(clue_id);
    }
    board.ledger.remove_earned(clue_id);
    info!("clue '{clue_id}' seated in slot {slot_id}");

    board.events.emit(CaseEvent::CluePlaced {
        clue_id: clue_id.to_string(),
        slot_id,
    });
    board.scheduler.schedule_in(
        board.frame,
        LAYOUT_REBUILD_FRAMES,
        DeferredAction::RebuildScrollLayout,
        Some("token left the scroll pool".to_string()),
    );
    notify_slot_updated(board, slot_id);
    Ok(DropOutcome::Placed)
}

/// Administratively vacate a slot (puzzle reset).
///
/// The only way back from `Filled`: restores the token's drag state, returns
/// it to the pool, reconstitutes the ledger's unplaced entry, and notifies
/// the completion detector. No-op on an empty slot.
///
/// # Errors
/// - when no slot exists for `slot_id`
pub fn clear_slot(board: &mut CaseBoard, slot_id: SlotId) -> Result<(), BoardError> {
    let Some(slot) = board.slots.get_mut(&slot_id) else {
        return Err(BoardError::UnknownSlot(slot_id));
    };
    let Some(clue_id) = slot.clear() else {
        return Ok(());
    };

    if let Some(token) = board.tokens.get_mut(&clue_id) {
        token.release_to_pool();
    }
    board.ledger.restore_earned(&clue_id);
    info!("slot {slot_id} cleared; '{clue_id}' returned to the scroll pool");

    board.events.emit(CaseEvent::ClueReturned {
        clue_id,
        slot_id,
    });
    board.scheduler.schedule_in(
        board.frame,
        LAYOUT_REBUILD_FRAMES,
        DeferredAction::RebuildScrollLayout,
        Some("token rejoined the scroll pool".to_string()),
    );
    notify_slot_updated(board, slot_id);
    Ok(())
}

/// Jump the stage clock and announce the change.
pub fn set_stage(board: &mut CaseBoard, stage: Stage) {
    board.stage_clock.set_stage(stage);
    board.events.emit(CaseEvent::StageChanged { stage });
}

/// Current board progress.
pub fn completion_stats(board: &mut CaseBoard) -> CompletionStats {
    board
        .completion
        .completion_stats(&board.slots, &board.tokens, &board.ledger)
}

/// Advance the board by one frame: stage clock first, then due deferred
/// tasks.
pub fn tick(board: &mut CaseBoard) {
    board.frame += 1;
    if let Some(stage) = board.stage_clock.tick() {
        board.events.emit(CaseEvent::StageChanged { stage });
    }
    for task in board.scheduler.take_due(board.frame) {
        match task.action {
            DeferredAction::RefreshTokenVisual { clue_id } => {
                if let Some(token) = board.tokens.get_mut(&clue_id) {
                    if token.container() == TokenContainer::ScrollArea {
                        token.set_draggable(true);
                    }
                }
            },
            DeferredAction::RebuildScrollLayout => {
                board.events.emit(CaseEvent::LayoutRebuildRequested);
            },
            DeferredAction::LoadScene { scene } => {
                board.events.emit(CaseEvent::SceneRequested { scene });
            },
        }
    }
}

/// Slot-mutation hook: the single path to completion.
///
/// Emits `SlotUpdated`, then -- unless the session is already latched
/// complete -- recomputes the aggregate. On the transition to all-filled it
/// latches, fires `GameCompleted` once, and schedules the end-scene
/// transition after the configured delay.
fn notify_slot_updated(board: &mut CaseBoard, slot_id: SlotId) {
    board.events.emit(CaseEvent::SlotUpdated { slot_id });
    if board.completion.game_completed {
        return;
    }
    if board.completion.are_all_slots_filled(&board.slots) {
        board.completion.game_completed = true;
        info!("{}", board.settings.completion_message);
        board.events.emit(CaseEvent::GameCompleted);
        board.scheduler.schedule_in(
            board.frame,
            board.settings.transition_delay_frames,
            DeferredAction::LoadScene {
                scene: board.settings.end_scene.clone(),
            },
            Some("end-of-case transition".to_string()),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use casebook_data::{ClueCategory, ClueDef};

    fn clue(id: &str, title: &str) -> ClueDef {
        ClueDef {
            id: Some(id.to_string()),
            title: title.to_string(),
            description: format!("About {title}."),
            icon: None,
            category: ClueCategory::Object,
        }
    }

    fn create_test_board() -> CaseBoard {
        let mut board = CaseBoard::new_empty();
        board.ledger = ClueLedger::new(&[clue("evidence_key", "Brass Key"), clue("clue_b", "Clue B")]);
        board.add_slot(ClueSlot::new("desk", "evidence_key"));
        board
    }

    fn desk_slot_id() -> SlotId {
        SlotId::from_symbol("desk")
    }

    #[test]
    fn grant_creates_token_in_pool() {
        let mut board = create_test_board();
        grant_clue(&mut board, "evidence_key", false);

        assert!(board.ledger.has_clue("evidence_key"));
        assert!(board.ledger.is_unplaced("evidence_key"));
        let token = &board.tokens["evidence_key"];
        assert!(token.container().is_scroll_area());
        assert!(token.is_draggable());
        assert!(
            board
                .events
                .drain()
                .iter()
                .any(|e| matches!(e, CaseEvent::ClueEarned { clue_id } if clue_id == "evidence_key"))
        );
    }

    #[test]
    fn grant_with_notebook_requests_it() {
        let mut board = create_test_board();
        grant_clue(&mut board, "evidence_key", true);
        assert!(
            board
                .events
                .drain()
                .iter()
                .any(|e| matches!(e, CaseEvent::NotebookRequested))
        );
    }

    #[test]
    fn grant_is_silent_on_empty_and_unknown_ids() {
        let mut board = create_test_board();
        grant_clue(&mut board, "", false);
        grant_clue(&mut board, "clue_nonexistent", false);
        assert!(board.tokens.is_empty());
        assert!(board.events.is_empty());
    }

    #[test]
    fn duplicate_grant_earns_once() {
        let mut board = create_test_board();
        grant_clue(&mut board, "evidence_key", false);
        grant_clue(&mut board, "evidence_key", false);

        assert_eq!(board.tokens.len(), 1);
        let earned_events = board
            .events
            .drain()
            .into_iter()
            .filter(|e| matches!(e, CaseEvent::ClueEarned { .. }))
            .count();
        assert_eq!(earned_events, 1);
    }

    #[test]
    fn correct_drop_seats_token_and_updates_ledger() {
        let mut board = create_test_board();
        grant_clue(&mut board, "evidence_key", false);
        board.events.drain();

        assert!(begin_drag(&mut board, "evidence_key"));
        let outcome = resolve_drop(&mut board, "evidence_key", desk_slot_id()).unwrap();
        assert_eq!(outcome, DropOutcome::Placed);

        let slot = &board.slots[&desk_slot_id()];
        assert!(slot.is_filled());
        assert_eq!(slot.current_clue(), Some("evidence_key"));
        assert!(!board.ledger.is_unplaced("evidence_key"));
        assert!(board.ledger.has_clue("evidence_key"));
        assert!(!board.tokens["evidence_key"].is_draggable());
    }

    #[test]
    fn wrong_clue_bounces_back_to_pool() {
        let mut board = create_test_board();
        grant_clue(&mut board, "clue_b", false);

        begin_drag(&mut board, "clue_b");
        let outcome = resolve_drop(&mut board, "clue_b", desk_slot_id()).unwrap();
        assert_eq!(outcome, DropOutcome::Rejected);

        let token = &board.tokens["clue_b"];
        assert!(token.container().is_scroll_area());
        assert!(token.is_draggable());
        assert!(!board.slots[&desk_slot_id()].is_filled());
    }

    #[test]
    fn filled_slot_ignores_further_drops() {
        let mut board = create_test_board();
        grant_clue(&mut board, "evidence_key", false);
        grant_clue(&mut board, "clue_b", false);

        begin_drag(&mut board, "evidence_key");
        resolve_drop(&mut board, "evidence_key", desk_slot_id()).unwrap();

        begin_drag(&mut board, "clue_b");
        let outcome = resolve_drop(&mut board, "clue_b", desk_slot_id()).unwrap();
        assert_eq!(outcome, DropOutcome::SlotFilled);
        assert_eq!(board.slots[&desk_slot_id()].current_clue(), Some("evidence_key"));
        assert!(board.tokens["clue_b"].container().is_scroll_area());
    }

    #[test]
    fn drop_without_drag_is_an_error_and_changes_nothing() {
        let mut board = create_test_board();
        grant_clue(&mut board, "evidence_key", false);

        let err = resolve_drop(&mut board, "evidence_key", desk_slot_id()).unwrap_err();
        assert_eq!(err, BoardError::TokenNotInTransit("evidence_key".to_string()));
        assert!(!board.slots[&desk_slot_id()].is_filled());
        assert!(board.tokens["evidence_key"].container().is_scroll_area());
    }

    #[test]
    fn unknown_ids_are_reported() {
        let mut board = create_test_board();
        assert!(matches!(
            resolve_drop(&mut board, "clue_ghost", desk_slot_id()),
            Err(BoardError::UnknownToken(_))
        ));

        grant_clue(&mut board, "evidence_key", false);
        begin_drag(&mut board, "evidence_key");
        assert!(matches!(
            resolve_drop(&mut board, "evidence_key", SlotId::from_symbol("nowhere")),
            Err(BoardError::UnknownSlot(_))
        ));
    }

    #[test]
    fn cancel_drag_returns_token_to_pool() {
        let mut board = create_test_board();
        grant_clue(&mut board, "evidence_key", false);

        begin_drag(&mut board, "evidence_key");
        cancel_drag(&mut board, "evidence_key").unwrap();

        let token = &board.tokens["evidence_key"];
        assert!(token.container().is_scroll_area());
        assert!(token.is_draggable());
    }

    #[test]
    fn clear_slot_restores_pool_entry_and_drag_state() {
        let mut board = create_test_board();
        // two slots so the case does not complete during this test
        board.add_slot(ClueSlot::new("door", "clue_b"));
        grant_clue(&mut board, "evidence_key", false);
        begin_drag(&mut board, "evidence_key");
        resolve_drop(&mut board, "evidence_key", desk_slot_id()).unwrap();
        board.events.drain();

        clear_slot(&mut board, desk_slot_id()).unwrap();

        assert!(!board.slots[&desk_slot_id()].is_filled());
        assert!(board.ledger.is_unplaced("evidence_key"));
        let token = &board.tokens["evidence_key"];
        assert!(token.container().is_scroll_area());
        assert!(token.is_draggable());
        let events = board.events.drain();
        assert!(events.iter().any(|e| matches!(e, CaseEvent::ClueReturned { .. })));
        assert!(events.iter().any(|e| matches!(e, CaseEvent::SlotUpdated { .. })));
    }

    #[test]
    fn clear_on_empty_slot_is_a_no_op() {
        let mut board = create_test_board();
        clear_slot(&mut board, desk_slot_id()).unwrap();
        assert!(board.events.is_empty());
    }

    #[test]
    fn completion_fires_once_and_schedules_transition() {
        let mut board = create_test_board();
        board.settings.transition_delay_frames = 2;
        grant_clue(&mut board, "evidence_key", false);
        begin_drag(&mut board, "evidence_key");
        resolve_drop(&mut board, "evidence_key", desk_slot_id()).unwrap();

        assert!(board.completion.game_completed);
        let completed = board
            .events
            .drain()
            .into_iter()
            .filter(|e| matches!(e, CaseEvent::GameCompleted))
            .count();
        assert_eq!(completed, 1);

        tick(&mut board);
        assert!(!board
            .events
            .drain()
            .iter()
            .any(|e| matches!(e, CaseEvent::SceneRequested { .. })));
        tick(&mut board);
        assert!(
            board
                .events
                .drain()
                .iter()
                .any(|e| matches!(e, CaseEvent::SceneRequested { scene } if scene == "end_scene"))
        );
    }

    #[test]
    fn completion_latch_survives_clear_and_refill() {
        let mut board = create_test_board();
        grant_clue(&mut board, "evidence_key", false);
        begin_drag(&mut board, "evidence_key");
        resolve_drop(&mut board, "evidence_key", desk_slot_id()).unwrap();
        board.events.drain();

        clear_slot(&mut board, desk_slot_id()).unwrap();
        begin_drag(&mut board, "evidence_key");
        resolve_drop(&mut board, "evidence_key", desk_slot_id()).unwrap();

        assert!(board.completion.game_completed);
        let completed = board
            .events
            .drain()
            .into_iter()
            .filter(|e| matches!(e, CaseEvent::GameCompleted))
            .count();
        assert_eq!(completed, 0);
    }

    #[test]
    fn deferred_token_fixup_reasserts_drag_state() {
        let mut board = create_test_board();
        grant_clue(&mut board, "evidence_key", false);
        // something same-frame disables the new token by mistake
        if let Some(token) = board.tokens.get_mut("evidence_key") {
            token.set_draggable(false);
        }
        for _ in 0..TOKEN_VISUAL_FIXUP_FRAMES {
            tick(&mut board);
        }
        assert!(board.tokens["evidence_key"].is_draggable());
    }

    #[test]
    fn stage_clock_emits_through_the_board() {
        let mut board = create_test_board();
        board.stage_clock = StageClock::new(2);
        tick(&mut board);
        tick(&mut board);
        assert!(
            board
                .events
                .drain()
                .iter()
                .any(|e| matches!(e, CaseEvent::StageChanged { stage } if *stage == Stage::Midday))
        );
    }

    #[test]
    fn set_stage_announces_change() {
        let mut board = create_test_board();
        set_stage(&mut board, Stage::Night);
        assert!(
            board
                .events
                .drain()
                .iter()
                .any(|e| matches!(e, CaseEvent::StageChanged { stage } if *stage == Stage::Night))
        );
    }
}
