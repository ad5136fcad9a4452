#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]

pub const CASEBOOK_VERSION: &str = env!("CARGO_PKG_VERSION");

// Core modules
pub mod board;
pub mod completion;
pub mod data_paths;
pub mod events;
pub mod giver;
pub mod idgen;
pub mod ledger;
pub mod loader;
pub mod repl;
pub mod scheduler;
pub mod slot;
pub mod stage;
pub mod token;

// Re-exports for convenience
pub use board::{CaseBoard, DropOutcome};
pub use events::CaseEvent;
pub use giver::ClueGiver;
pub use ledger::{ClueDefinition, ClueLedger, SortMethod};
pub use loader::load_case;
pub use repl::run_repl;
pub use slot::{ClueSlot, SlotId};
pub use stage::{Stage, StageClock};
pub use token::{ClueToken, TokenContainer};
