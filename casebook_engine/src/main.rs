#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
//! ** Casebook **
//! Clue-board debug console for point-and-click mystery cases.

use casebook_engine::{load_case, run_repl};

use anyhow::{Context, Result};
use colored::Colorize;
use log::info;

fn main() -> Result<()> {
    env_logger::init();
    info!("Start: loading case...");
    let mut board = load_case().context("while loading CaseBoard")?;
    info!("CaseBoard loaded successfully.");

    println!("{:^60}", board.title.to_uppercase().bright_yellow().underline());
    println!(
        "\n{} clues to find, {} slots to fill. Type {} for commands.\n",
        board.ledger.catalog_len().to_string().bold(),
        board.slots.len().to_string().bold(),
        "help".cyan()
    );

    run_repl(&mut board)
}
