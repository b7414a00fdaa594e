//! Leaderboard of seeded rivals plus the current learner

use serde::Serialize;

use crate::progress::level_for_xp;

/// A learner on the board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rival {
    pub name: String,
    pub xp: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub name: String,
    pub xp: u32,
    pub level: u32,
    pub is_current_user: bool,
}

pub fn default_rivals() -> Vec<Rival> {
    [
        ("Алексей К.", 2450),
        ("Мария П.", 1980),
        ("Иван С.", 1620),
        ("Ольга Н.", 1210),
        ("Павел Д.", 860),
        ("Катя Л.", 540),
        ("Артём В.", 310),
        ("Софья Г.", 120),
    ]
    .into_iter()
    .map(|(name, xp)| Rival {
        name: name.to_string(),
        xp,
    })
    .collect()
}

/// Ranks rivals and the current user by XP, highest first.
///
/// On equal XP the current user is placed ahead, then names break ties.
pub fn build(rivals: &[Rival], user_name: &str, user_xp: u32) -> Vec<LeaderboardEntry> {
    let mut rows: Vec<(&str, u32, bool)> = rivals
        .iter()
        .map(|r| (r.name.as_str(), r.xp, false))
        .collect();
    rows.push((user_name, user_xp, true));

    rows.sort_by(|a, b| {
        b.1.cmp(&a.1)
            .then_with(|| b.2.cmp(&a.2))
            .then_with(|| a.0.cmp(b.0))
    });

    rows.into_iter()
        .enumerate()
        .map(|(i, (name, xp, is_current_user))| LeaderboardEntry {
            rank: i as u32 + 1,
            name: name.to_string(),
            xp,
            level: level_for_xp(xp),
            is_current_user,
        })
        .collect()
}

pub fn rank_of_current_user(entries: &[LeaderboardEntry]) -> Option<u32> {
    entries.iter().find(|e| e.is_current_user).map(|e| e.rank)
}
