//! Frame-deferred task scheduler.
//!
//! Some fixups must run a few frames after the mutation that caused them:
//! reasserting a fresh token's drag state after same-frame initialization,
//! asking for a layout rebuild once positions have settled, and the delayed
//! end-scene transition. Tasks are one-shot; a scheduler that is dropped
//! drops its pending tasks with it, which is the only cancellation anyone
//! needs.

use log::info;
use serde::{Deserialize, Serialize};

/// Work the board performs when a deferred task comes due.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeferredAction {
    /// Reassert the drag/visual state of a freshly created token.
    RefreshTokenVisual { clue_id: String },
    /// Ask the host to rebuild the scroll-pool layout.
    RebuildScrollLayout,
    /// Load the named scene (end-of-case transition).
    LoadScene { scene: String },
}

/// One scheduled task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeferredTask {
    pub frame_due: u64,
    pub action: DeferredAction,
    pub note: Option<String>,
}

/// Pending deferred tasks, drained once per frame.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scheduler {
    tasks: Vec<DeferredTask>,
}

impl Scheduler {
    /// Schedule an action a number of frames in the future.
    pub fn schedule_in(&mut self, now: u64, frames_ahead: u64, action: DeferredAction, note: Option<String>) {
        let frame_due = now + frames_ahead;
        let log_msg = note.as_deref().unwrap_or("<no note provided>");
        info!("scheduling task (frame now/due = {now}/{frame_due}): \"{log_msg}\"");
        self.tasks.push(DeferredTask {
            frame_due,
            action,
            note,
        });
    }

    /// Remove and return every task due by `now`.
    ///
    /// Due tasks come back ordered by due frame, ties in schedule order.
    pub fn take_due(&mut self, now: u64) -> Vec<DeferredTask> {
        let (mut due, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.tasks)
            .into_iter()
            .partition(|task| task.frame_due <= now);
        self.tasks = pending;
        due.sort_by_key(|task| task.frame_due);
        due
    }

    pub fn pending(&self) -> usize {
        self.tasks.len()
    }
}
