//! Command-line interface.
//!
//! - `status` - Withdrawal status of one animal or the whole herd
//! - `alerts` - Treatments in withdrawal and about to clear
//! - `dashboard` - Herd overview
//! - `recommend` - Drug suggestion for a diagnosis
//! - `login` / `logout` - Session management
//! - `treat` - Record a treatment as the signed-in veterinarian

pub mod args;

pub use args::{Cli, Commands};
