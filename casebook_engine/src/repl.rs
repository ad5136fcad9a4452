//! Debug console for exercising a case board from the terminal.
//!
//! A read-eval-print loop over the board operations: grant clues, place and
//! return tokens, inspect the pool and the slots, and drive frames by hand.
//! Intended for content authors checking a case file, not for players.

use crate::board::{self, CaseBoard, DropOutcome};
use crate::events::CaseEvent;
use crate::ledger::SortMethod;
use crate::stage::Stage;

use anyhow::Result;
use colored::Colorize;
use log::warn;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

/// Control flow signal used by handlers to exit the REPL.
pub enum ReplControl {
    Continue,
    Quit,
}

/// Run the debug console until the user quits.
///
/// # Errors
/// - Propagates readline initialization failures.
pub fn run_repl(board: &mut CaseBoard) -> Result<()> {
    let mut editor = DefaultEditor::new()?;
    loop {
        let prompt = format!("\n[frame {} | {}]>> ", board.frame, board.stage_clock.current);
        let line = match editor.readline(&prompt) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                println!("{}", "Command canceled.".dimmed());
                continue;
            },
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                warn!("readline failed: {err}");
                break;
            },
        };
        if !line.trim().is_empty() {
            let _ = editor.add_history_entry(line.as_str());
        }

        if let ReplControl::Quit = dispatch(board, &line) {
            break;
        }

        board::tick(board);
        report_events(board);
    }
    Ok(())
}

/// Parse and execute one console command.
fn dispatch(board: &mut CaseBoard, line: &str) -> ReplControl {
    let words: Vec<&str> = line.split_whitespace().collect();
    match words.as_slice() {
        [] => {},
        ["quit" | "exit"] => return ReplControl::Quit,
        ["help"] => print_help(),
        ["grant", clue_id] => board::grant_clue(board, clue_id, false),
        ["grant", clue_id, "notebook"] => board::grant_clue(board, clue_id, true),
        ["place", clue_id, symbol] => place_handler(board, clue_id, symbol),
        ["clear", symbol] => clear_handler(board, symbol),
        ["clues"] => clues_handler(board),
        ["slots"] => slots_handler(board),
        ["stats"] => stats_handler(board),
        ["sort", method] => sort_handler(board, method),
        ["stage"] => println!("current stage: {}", board.stage_clock.current.to_string().cyan()),
        ["stage", name] => stage_handler(board, name),
        ["tick"] => {},
        ["tick", count] => tick_handler(board, count),
        _ => println!("{}", "Unrecognized command. Try 'help'.".red()),
    }
    ReplControl::Continue
}

fn print_help() {
    println!("{}", "Commands:".bold());
    println!("  grant <clue_id> [notebook]  earn a clue (optionally open the notebook)");
    println!("  place <clue_id> <slot>      drag a token onto a slot");
    println!("  clear <slot>                return a slot's token to the pool");
    println!("  clues                       list unplaced tokens, in sort order");
    println!("  slots                       list slots and their occupants");
    println!("  stats                       show board progress");
    println!("  sort <category|title|time>  change the pool sort order");
    println!("  stage [name]                show or set the current stage");
    println!("  tick [n]                    advance n extra frames (default 1)");
    println!("  quit                        leave the console");
}

fn place_handler(board: &mut CaseBoard, clue_id: &str, symbol: &str) {
    let Some(slot) = board.slot_by_symbol(symbol) else {
        println!("{}", format!("no slot with symbol '{symbol}'").red());
        return;
    };
    let slot_id = slot.id;
    if !board::begin_drag(board, clue_id) {
        println!("{}", format!("token '{clue_id}' cannot be dragged").red());
        return;
    }
    match board::resolve_drop(board, clue_id, slot_id) {
        Ok(DropOutcome::Placed) => println!("{}", format!("'{clue_id}' placed in '{symbol}'").green()),
        Ok(DropOutcome::Rejected) => println!("{}", format!("'{clue_id}' does not fit '{symbol}'").yellow()),
        Ok(DropOutcome::SlotFilled) => println!("{}", format!("slot '{symbol}' is already filled").yellow()),
        Err(err) => println!("{}", err.to_string().red()),
    }
}

fn clear_handler(board: &mut CaseBoard, symbol: &str) {
    let Some(slot) = board.slot_by_symbol(symbol) else {
        println!("{}", format!("no slot with symbol '{symbol}'").red());
        return;
    };
    let slot_id = slot.id;
    if let Err(err) = board::clear_slot(board, slot_id) {
        println!("{}", err.to_string().red());
    }
}

fn clues_handler(board: &CaseBoard) {
    let pool = board.ledger.sorted_unplaced();
    if pool.is_empty() {
        println!("{}", "no unplaced clues".dimmed());
        return;
    }
    println!("{}", format!("unplaced clues ({:?}):", board.ledger.sort_method()).bold());
    for def in pool {
        println!("  {} {} [{}]", def.id.cyan(), def.title, def.category);
    }
}

fn slots_handler(board: &CaseBoard) {
    let mut slots: Vec<_> = board.slots.values().collect();
    slots.sort_by(|a, b| a.symbol.cmp(&b.symbol));
    for slot in slots {
        let occupant = match slot.current_clue() {
            Some(clue_id) => clue_id.green().to_string(),
            None => "empty".dimmed().to_string(),
        };
        println!("  {} (expects {}): {}", slot.symbol.cyan(), slot.expected_clue, occupant);
    }
}

fn stats_handler(board: &mut CaseBoard) {
    let stats = board::completion_stats(board);
    println!(
        "  slots filled: {}/{} ({} correct)",
        stats.filled, stats.total, stats.correct
    );
    println!(
        "  clues earned: {}/{} ({} unplaced)",
        board.ledger.earned_count(),
        board.ledger.catalog_len(),
        board.ledger.unplaced_count()
    );
    if board.completion.game_completed {
        println!("  {}", "case complete".green().bold());
    }
}

fn sort_handler(board: &mut CaseBoard, method: &str) {
    let method = match method {
        "category" => SortMethod::ByCategory,
        "title" => SortMethod::ByTitle,
        "time" | "earned" => SortMethod::ByEarnedTime,
        other => {
            println!("{}", format!("unknown sort method '{other}'").red());
            return;
        },
    };
    board.ledger.set_sort_method(method);
    clues_handler(board);
}

fn stage_handler(board: &mut CaseBoard, name: &str) {
    let stage = match name {
        "morning" => Stage::Morning,
        "midday" => Stage::Midday,
        "afternoon" => Stage::Afternoon,
        "evening" => Stage::Evening,
        "night" => Stage::Night,
        other => {
            println!("{}", format!("unknown stage '{other}'").red());
            return;
        },
    };
    board::set_stage(board, stage);
}

fn tick_handler(board: &mut CaseBoard, count: &str) {
    match count.parse::<u64>() {
        // one tick always runs after dispatch; these are the extras
        Ok(n) => {
            for _ in 1..n {
                board::tick(board);
            }
        },
        Err(_) => println!("{}", format!("'{count}' is not a frame count").red()),
    }
}

/// Print every event the last command produced, in order.
fn report_events(board: &mut CaseBoard) {
    for event in board.events.drain() {
        let line = match event {
            CaseEvent::ClueEarned { clue_id } => format!("clue earned: {clue_id}").green().to_string(),
            CaseEvent::CluePlaced { clue_id, .. } => format!("clue placed: {clue_id}").green().to_string(),
            CaseEvent::ClueReturned { clue_id, .. } => format!("clue returned: {clue_id}").yellow().to_string(),
            CaseEvent::SlotUpdated { slot_id } => format!("slot updated: {slot_id}").dimmed().to_string(),
            CaseEvent::StageChanged { stage } => format!("stage changed: {stage}").cyan().to_string(),
            CaseEvent::GameCompleted => "CASE COMPLETE".green().bold().to_string(),
            CaseEvent::NotebookRequested => "notebook requested".cyan().to_string(),
            CaseEvent::LayoutRebuildRequested => "layout rebuild requested".dimmed().to_string(),
            CaseEvent::SceneRequested { scene } => format!("scene requested: {scene}").magenta().bold().to_string(),
        };
        println!("* {line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::ClueLedger;
    use crate::slot::ClueSlot;
    use casebook_data::{ClueCategory, ClueDef};

    fn create_test_board() -> CaseBoard {
        let mut board = CaseBoard::new_empty();
        board.ledger = ClueLedger::new(&[ClueDef {
            id: Some("clue_a".into()),
            title: "Clue A".into(),
            description: String::new(),
            icon: None,
            category: ClueCategory::Object,
        }]);
        board.add_slot(ClueSlot::new("desk", "clue_a"));
        board
    }

    #[test]
    fn dispatch_routes_grant_and_place() {
        let mut board = create_test_board();
        dispatch(&mut board, "grant clue_a");
        assert!(board.ledger.has_clue("clue_a"));

        dispatch(&mut board, "place clue_a desk");
        let slot_id = board.slot_by_symbol("desk").unwrap().id;
        assert!(board.slots[&slot_id].is_filled());
    }

    #[test]
    fn dispatch_quit_signals_exit() {
        let mut board = create_test_board();
        assert!(matches!(dispatch(&mut board, "quit"), ReplControl::Quit));
        assert!(matches!(dispatch(&mut board, "grant clue_a"), ReplControl::Continue));
    }

    #[test]
    fn unknown_command_is_harmless() {
        let mut board = create_test_board();
        dispatch(&mut board, "frobnicate everything");
        assert!(board.events.is_empty());
        assert!(board.tokens.is_empty());
    }

    #[test]
    fn tick_handler_advances_extra_frames() {
        let mut board = create_test_board();
        dispatch(&mut board, "tick 5");
        assert_eq!(board.frame, 4);
    }
}
