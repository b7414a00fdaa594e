//! Derived statistics: XP, level, streak
//!
//! Nothing here is stored. Every value is recomputed from the course list.

use serde::Serialize;

use crate::catalog::Course;

pub const XP_PER_LEVEL: u32 = 200;
pub const XP_PER_STREAK_DAY: u32 = 50;
pub const MAX_STREAK_DAYS: u32 = 30;

/// Adds up in `u64` and saturates, so oversized imported courses cannot
/// overflow the totals.
fn saturating_sum(values: impl Iterator<Item = u32>) -> u32 {
    values
        .map(u64::from)
        .sum::<u64>()
        .min(u64::from(u32::MAX)) as u32
}

/// Sum of `round(xp * progress / 100)` over all courses
pub fn total_xp(courses: &[Course]) -> u32 {
    saturating_sum(courses.iter().map(Course::earned_xp))
}

pub fn completed_courses(courses: &[Course]) -> u32 {
    courses.iter().filter(|c| c.is_completed()).count() as u32
}

/// `floor(xp / 200) + 1`
pub fn level_for_xp(xp: u32) -> u32 {
    xp / XP_PER_LEVEL + 1
}

/// Display-only streak, derived from XP and capped at 30 days.
pub fn streak_for_xp(xp: u32) -> u32 {
    (xp / XP_PER_STREAK_DAY).min(MAX_STREAK_DAYS)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressStats {
    pub total_xp: u32,
    pub completed_courses: u32,
    pub level: u32,
    pub streak_days: u32,
    pub lessons_completed: u32,
    pub courses_started: u32,
    pub total_courses: u32,
}

impl ProgressStats {
    pub fn from_courses(courses: &[Course]) -> Self {
        let total_xp = total_xp(courses);
        Self {
            total_xp,
            completed_courses: completed_courses(courses),
            level: level_for_xp(total_xp),
            streak_days: streak_for_xp(total_xp),
            lessons_completed: saturating_sum(courses.iter().map(|c| c.completed_lessons)),
            courses_started: courses.iter().filter(|c| c.is_started()).count() as u32,
            total_courses: courses.len() as u32,
        }
    }

    /// XP earned inside the current level
    pub fn xp_into_level(&self) -> u32 {
        self.total_xp % XP_PER_LEVEL
    }

    pub fn xp_to_next_level(&self) -> u32 {
        XP_PER_LEVEL - self.xp_into_level()
    }

    pub fn level_progress_percent(&self) -> u32 {
        self.xp_into_level() * 100 / XP_PER_LEVEL
    }

    pub fn all_courses_completed(&self) -> bool {
        self.total_courses > 0 && self.completed_courses == self.total_courses
    }
}
