//! Course progress and the gamification statistics derived from it

mod stats;
mod store;

pub use stats::*;
pub use store::{BackupSummary, ProgressStore};
