//! Loader utilities for building a `CaseBoard` from serialized data.
//!
//! Case content (clues and slots) is loaded from the authored `CaseDef`
//! (RON), while runtime tunables remain TOML-backed.

use crate::board::{CaseBoard, CaseSettings};
use crate::data_paths::data_path;
use crate::ledger::ClueLedger;
use crate::slot::ClueSlot;
use crate::stage::StageClock;

use anyhow::{Context, Result, bail};
use casebook_data::CaseDef;
use log::{info, warn};
use std::fs;
use std::path::Path;

/// Load the `CaseBoard` from the authored `CaseDef` and settings files.
///
/// # Errors
/// Errors bubble up from file IO, deserialization, or failed validation.
pub fn load_case() -> Result<CaseBoard> {
    let case_ron_path = data_path("case.ron");
    let settings_toml_path = data_path("settings.toml");

    let case_def = load_case_def(&case_ron_path).context("while loading case from file")?;
    validate_case_def(&case_def)?;
    let settings = load_settings(&settings_toml_path);
    let board = build_board_from_def(&case_def, settings);
    info!("{} clues added to the catalog", board.ledger.catalog_len());
    info!("{} slots added to the board", board.slots.len());

    Ok(board)
}

/// Load a `CaseDef` from a RON file.
pub fn load_case_def(path: &Path) -> Result<CaseDef> {
    let text = fs::read_to_string(path).with_context(|| format!("reading case from '{}'", path.display()))?;
    ron::from_str(&text).with_context(|| format!("parsing case RON from '{}'", path.display()))
}

/// Loads settings from a TOML file, falling back to defaults on error.
///
/// Never fails: a missing or malformed settings file means default tunables,
/// with a warning, not a dead board.
pub fn load_settings(toml_path: &Path) -> CaseSettings {
    match try_load_settings(toml_path) {
        Ok(settings) => {
            info!("settings loaded from '{}'", toml_path.display());
            settings
        },
        Err(e) => {
            warn!(
                "Could not load settings from '{}': {}. Using defaults.",
                toml_path.display(),
                e
            );
            CaseSettings::default()
        },
    }
}

fn try_load_settings(toml_path: &Path) -> Result<CaseSettings> {
    let text = fs::read_to_string(toml_path)?;
    Ok(toml::from_str(&text)?)
}

/// Convert a validated `CaseDef` into a ready `CaseBoard`.
pub fn build_board_from_def(def: &CaseDef, settings: CaseSettings) -> CaseBoard {
    let mut board = CaseBoard::new_empty();
    board.title = def.title.clone();
    board.ledger = ClueLedger::new(&def.clues);

    for slot_def in &def.slots {
        board.add_slot(ClueSlot::new(&slot_def.symbol, slot_def.expected_clue.clone()));
    }
    board.completion.refresh_cache(&board.slots);

    board.stage_clock = StageClock::new(settings.stage_interval_frames);
    board.stage_clock.auto_advance = settings.auto_advance_stages;
    board.settings = settings;
    board
}

/// Validate the authored `CaseDef` and return a single aggregated error.
fn validate_case_def(def: &CaseDef) -> Result<()> {
    let errors = casebook_data::validate_case(def);
    if errors.is_empty() {
        return Ok(());
    }
    let details = errors
        .into_iter()
        .map(|err| format!("- {err}"))
        .collect::<Vec<_>>()
        .join("\n");
    bail!("case validation failed:\n{details}");
}
