//! Append-only history of when achievements were first earned

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::definitions::catalog;
use crate::error::Result;
use crate::progress::ProgressStats;
use crate::storage::{keys, KeyValueStore};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarnedAchievement {
    pub id: String,
    pub earned_at: DateTime<Utc>,
}

/// Entries are only ever appended. A later drop in stats leaves the
/// history intact even though the live achievement list no longer shows
/// the badge as earned.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AchievementLedger {
    entries: Vec<EarnedAchievement>,
}

impl AchievementLedger {
    pub fn load(storage: &impl KeyValueStore) -> Result<Self> {
        match storage.load(keys::ACHIEVEMENT_LEDGER)? {
            Some(json) => match serde_json::from_str(&json) {
                Ok(ledger) => Ok(ledger),
                Err(e) => {
                    warn!("Achievement ledger is unreadable, starting empty: {}", e);
                    Ok(Self::default())
                }
            },
            None => Ok(Self::default()),
        }
    }

    pub fn save(&self, storage: &impl KeyValueStore) -> Result<()> {
        storage.save(keys::ACHIEVEMENT_LEDGER, &serde_json::to_string(self)?)
    }

    pub fn entries(&self) -> &[EarnedAchievement] {
        &self.entries
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    pub fn earned_at(&self, id: &str) -> Option<DateTime<Utc>> {
        self.entries.iter().find(|e| e.id == id).map(|e| e.earned_at)
    }

    /// Appends every achievement that holds for `stats` and is not yet in
    /// the ledger. Returns the ids added.
    pub fn record(&mut self, stats: &ProgressStats, now: DateTime<Utc>) -> Vec<&'static str> {
        let mut added = Vec::new();

        for def in catalog() {
            if def.is_earned(stats) && !self.contains(def.id) {
                info!(achievement = def.id, "Achievement earned");
                self.entries.push(EarnedAchievement {
                    id: def.id.to_string(),
                    earned_at: now,
                });
                added.push(def.id);
            }
        }

        added
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::simple_course;
    use crate::storage::MemoryStore;
    use chrono::{Duration, TimeZone};

    fn stats(done: u32) -> ProgressStats {
        let mut course = simple_course(1, 4, 400);
        course.set_completed_lessons(done);
        ProgressStats::from_courses(&[course])
    }

    #[test]
    fn test_record_appends_once() {
        let t0 = Utc.with_ymd_and_hms(2024, 2, 1, 8, 0, 0).unwrap();
        let mut ledger = AchievementLedger::default();

        assert_eq!(ledger.record(&stats(1), t0), vec!["first-lesson"]);
        let added = ledger.record(&stats(4), t0 + Duration::days(1));
        assert_eq!(added, vec!["first-course", "week-streak"]);
        assert!(ledger.record(&stats(4), t0 + Duration::days(2)).is_empty());

        assert_eq!(ledger.earned_at("first-lesson"), Some(t0));
        assert_eq!(ledger.entries().len(), 3);
    }

    #[test]
    fn test_history_survives_stats_regression() {
        let t0 = Utc.with_ymd_and_hms(2024, 2, 1, 8, 0, 0).unwrap();
        let mut ledger = AchievementLedger::default();
        ledger.record(&stats(4), t0);

        ledger.record(&stats(0), t0 + Duration::hours(1));
        assert!(ledger.contains("first-course"));
    }

    #[test]
    fn test_persists_through_storage() {
        let storage = MemoryStore::new();
        let t0 = Utc.with_ymd_and_hms(2024, 2, 1, 8, 0, 0).unwrap();
        let mut ledger = AchievementLedger::load(&storage).unwrap();
        ledger.record(&stats(4), t0);
        ledger.save(&storage).unwrap();

        assert_eq!(AchievementLedger::load(&storage).unwrap(), ledger);
    }
}
