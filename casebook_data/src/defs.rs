//! Serialized definitions for a Casebook case file.
//!
//! A case file describes the clue catalog and the board's placement slots.
//! These types carry no runtime state; `casebook_engine` builds its live
//! board from them at load time.

use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Categories a clue can belong to.
///
/// Variant order is the fixed presentation order used when sorting the clue
/// pool by category (names first, actions last).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ClueCategory {
    #[default]
    Name,
    Location,
    Object,
    Action,
}

impl Display for ClueCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClueCategory::Name => write!(f, "name"),
            ClueCategory::Location => write!(f, "location"),
            ClueCategory::Object => write!(f, "object"),
            ClueCategory::Action => write!(f, "action"),
        }
    }
}

/// One clue as authored in the case file.
///
/// `id` may be omitted, in which case it is derived from the title via
/// [`derive_clue_id`]. Collisions between derived ids are a data-entry error
/// caught by validation, not handled at runtime.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClueDef {
    #[serde(default)]
    pub id: Option<String>,
    pub title: String,
    pub description: String,
    /// Opaque asset name for the clue's icon; the engine never interprets it.
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub category: ClueCategory,
}

impl ClueDef {
    /// The id this clue is registered under: the explicit id when present,
    /// otherwise one derived from the title.
    pub fn effective_id(&self) -> String {
        match &self.id {
            Some(id) if !id.trim().is_empty() => id.clone(),
            _ => derive_clue_id(&self.title),
        }
    }
}

/// One placement target on the case board.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlotDef {
    /// Stable symbol used to derive the slot's runtime id.
    pub symbol: String,
    /// Expected clue, given as an id or an exact title (matching tries both).
    pub expected_clue: String,
}

/// Top-level case file: catalog plus board layout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CaseDef {
    pub title: String,
    #[serde(default)]
    pub clues: Vec<ClueDef>,
    #[serde(default)]
    pub slots: Vec<SlotDef>,
}

/// Derive a stable clue id from a display title.
///
/// Pure function: lowercase, runs of whitespace become single underscores,
/// punctuation is dropped, and the result is prefixed with `clue_`.
/// `"The Letter"` becomes `"clue_the_letter"`.
pub fn derive_clue_id(title: &str) -> String {
    let mut id = String::from("clue_");
    let mut pending_sep = false;
    for ch in title.trim().chars() {
        if ch.is_alphanumeric() {
            if pending_sep && id.len() > "clue_".len() {
                id.push('_');
            }
            for lower in ch.to_lowercase() {
                id.push(lower);
            }
            pending_sep = false;
        } else if ch.is_whitespace() {
            pending_sep = true;
        }
        // punctuation contributes nothing, not even a separator
    }
    id
}
