//! Course catalog: courses, lessons, exercises and the seed data

mod edit;
mod seed;
mod types;

pub use edit::{CourseDraft, CoursePatch};
pub use seed::seed_catalog;
pub use types::*;

/// Counter-only course used throughout the tests
#[cfg(test)]
pub(crate) fn simple_course(id: types::CourseId, lessons: u32, xp: u32) -> types::Course {
    types::Course {
        id,
        title: format!("Course {}", id),
        description: String::new(),
        author: "Test".to_string(),
        difficulty: types::Difficulty::Beginner,
        badge: "📘".to_string(),
        image: String::new(),
        lessons,
        completed_lessons: 0,
        xp,
        progress: 0,
        full_lessons: None,
    }
}
