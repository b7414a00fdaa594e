//! Achievements derived from progress statistics

mod definitions;
mod ledger;

pub use definitions::*;
pub use ledger::{AchievementLedger, EarnedAchievement};
