//! One-shot clue givers.
//!
//! A giver bundles the clues a single interaction hands out -- examining a
//! body, finishing a conversation -- behind a latch, so wiring the same
//! interaction to several triggers can never double-grant.

use crate::board::{self, CaseBoard};

use log::debug;
use serde::{Deserialize, Serialize};

/// A reusable grant bundle with a fired-once latch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClueGiver {
    pub clue_ids: Vec<String>,
    /// Whether firing should also ask the notebook to open.
    pub open_notebook: bool,
    granted: bool,
}

impl ClueGiver {
    pub fn new(clue_ids: Vec<String>, open_notebook: bool) -> ClueGiver {
        ClueGiver {
            clue_ids,
            open_notebook,
            granted: false,
        }
    }

    /// Convenience constructor for the common single-clue giver.
    pub fn single(clue_id: impl Into<String>, open_notebook: bool) -> ClueGiver {
        ClueGiver::new(vec![clue_id.into()], open_notebook)
    }

    pub fn has_granted(&self) -> bool {
        self.granted
    }

    /// Grant every bundled clue, once. Later calls are silent no-ops.
    ///
    /// The notebook is requested at most once per firing, not per clue.
    pub fn fire(&mut self, board: &mut CaseBoard) {
        if self.granted {
            debug!("clue giver already fired; ignoring");
            return;
        }
        self.granted = true;
        for (i, clue_id) in self.clue_ids.iter().enumerate() {
            board::grant_clue(board, clue_id, self.open_notebook && i == 0);
        }
    }
}
