//! Storage-backed operations used by the CLI.
//!
//! Each function takes the [`Database`](crate::storage::Database) handle and an
//! explicit `now`, loads rows, runs the pure calculators and writes back.

pub mod dragon;
pub mod harvest;
pub mod streaks;

use crate::error::ValidationError;

fn require_owner(owner_id: &str) -> Result<(), ValidationError> {
    if owner_id.trim().is_empty() {
        return Err(ValidationError::Empty("owner_id".into()));
    }
    Ok(())
}
