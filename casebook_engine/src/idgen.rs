//! ** idgen module **
//! Stable v5 uuids for board entities declared in case data files.
//! Clue ids stay human-readable strings; only slots get uuid identity.
use uuid::Uuid;

pub const NAMESPACE_SLOT: Uuid = uuid::uuid!("7f1c3a52-9b0e-4f46-8a2d-5d8c41f0b7e9");

/// Generate a v5 UUID for a slot symbol from the case data files.
pub fn slot_uuid(symbol: &str) -> Uuid {
    Uuid::new_v5(&NAMESPACE_SLOT, symbol.as_bytes())
}
