//! Catalog data types

use serde::{Deserialize, Serialize};

pub type CourseId = u64;

/// Difficulty tier shown on the course card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Beginner,
        Difficulty::Intermediate,
        Difficulty::Advanced,
        Difficulty::Expert,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "Beginner",
            Difficulty::Intermediate => "Intermediate",
            Difficulty::Advanced => "Advanced",
            Difficulty::Expert => "Expert",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "Начальный",
            Difficulty::Intermediate => "Средний",
            Difficulty::Advanced => "Продвинутый",
            Difficulty::Expert => "Эксперт",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s.trim()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseKind {
    Text,
    Practice,
    Reflection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: u32,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: ExerciseKind,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
    pub id: u32,
    pub title: String,
    #[serde(default)]
    pub content: String,
    /// Minutes
    #[serde(default)]
    pub duration: u32,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exercises: Vec<Exercise>,
}

impl Lesson {
    /// True once every exercise is done. Lessons without exercises qualify
    /// immediately.
    pub fn is_fully_exercised(&self) -> bool {
        self.exercises.iter().all(|e| e.completed)
    }

    pub fn exercise_mut(&mut self, exercise_id: u32) -> Option<&mut Exercise> {
        self.exercises.iter_mut().find(|e| e.id == exercise_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: CourseId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub author: String,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub badge: String,
    #[serde(default)]
    pub image: String,
    pub lessons: u32,
    #[serde(default)]
    pub completed_lessons: u32,
    /// Full award for finishing the course
    pub xp: u32,
    /// 0..=100
    #[serde(default)]
    pub progress: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_lessons: Option<Vec<Lesson>>,
}

/// `round(num / den)` with halves rounded up, on non-negative integers.
pub(crate) fn round_ratio(num: u64, den: u64) -> u64 {
    (2 * num + den) / (2 * den)
}

impl Course {
    /// Brings `progress` back in line with `completed_lessons / lessons`.
    ///
    /// A course with no lessons has nothing to complete: both counters are
    /// pinned to zero.
    pub fn recompute_progress(&mut self) {
        if self.lessons == 0 {
            self.completed_lessons = 0;
            self.progress = 0;
            return;
        }

        self.completed_lessons = self.completed_lessons.min(self.lessons);
        self.progress =
            round_ratio(self.completed_lessons as u64 * 100, self.lessons as u64) as u8;
    }

    /// Sets the completed-lesson count and recomputes progress.
    pub fn set_completed_lessons(&mut self, completed: u32) {
        self.completed_lessons = completed;
        self.recompute_progress();
    }

    /// XP awarded so far: `round(xp * progress / 100)`
    pub fn earned_xp(&self) -> u32 {
        round_ratio(self.xp as u64 * self.progress as u64, 100) as u32
    }

    pub fn is_completed(&self) -> bool {
        self.progress == 100
    }

    pub fn is_started(&self) -> bool {
        self.progress > 0
    }

    /// Courses without `full_lessons` are tracked by counters only.
    pub fn is_simple(&self) -> bool {
        self.full_lessons.is_none()
    }

    pub fn lesson(&self, lesson_id: u32) -> Option<&Lesson> {
        self.full_lessons
            .as_ref()
            .and_then(|lessons| lessons.iter().find(|l| l.id == lesson_id))
    }

    pub fn lesson_mut(&mut self, lesson_id: u32) -> Option<&mut Lesson> {
        self.full_lessons
            .as_mut()
            .and_then(|lessons| lessons.iter_mut().find(|l| l.id == lesson_id))
    }

    /// Re-derives `completed_lessons` from the lesson flags.
    pub fn sync_from_lessons(&mut self) {
        if let Some(lessons) = &self.full_lessons {
            let done = lessons.iter().filter(|l| l.completed).count() as u32;
            self.set_completed_lessons(done);
        }
    }

    /// Clears counters and every lesson/exercise flag.
    pub fn reset(&mut self) {
        self.completed_lessons = 0;
        self.progress = 0;
        if let Some(lessons) = self.full_lessons.as_mut() {
            for lesson in lessons.iter_mut() {
                lesson.completed = false;
                for exercise in lesson.exercises.iter_mut() {
                    exercise.completed = false;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::simple_course;

    #[test]
    fn test_progress_rounds_half_up() {
        let mut course = simple_course(1, 8, 100);
        course.set_completed_lessons(1);
        assert_eq!(course.progress, 13);

        course.set_completed_lessons(3);
        assert_eq!(course.progress, 38);
    }

    #[test]
    fn test_zero_lessons_pins_progress_to_zero() {
        let mut course = simple_course(1, 0, 100);
        course.set_completed_lessons(5);
        assert_eq!(course.progress, 0);
        assert_eq!(course.completed_lessons, 0);
    }

    #[test]
    fn test_completed_lessons_clamped_to_total() {
        let mut course = simple_course(1, 4, 100);
        course.set_completed_lessons(9);
        assert_eq!(course.completed_lessons, 4);
        assert_eq!(course.progress, 100);
    }

    #[test]
    fn test_earned_xp_is_proportional() {
        let mut course = simple_course(1, 3, 250);
        course.set_completed_lessons(1);
        // 250 * 33 / 100 = 82.5
        assert_eq!(course.earned_xp(), 83);
    }

    #[test]
    fn test_json_uses_camel_case_fields() {
        let mut course = simple_course(7, 10, 300);
        course.set_completed_lessons(5);
        let json = serde_json::to_value(&course).unwrap();

        assert_eq!(json["completedLessons"], 5);
        assert_eq!(json["difficulty"], "Beginner");
        assert!(json.get("fullLessons").is_none());
    }

    #[test]
    fn test_exercise_kind_serialized_as_type() {
        let exercise = Exercise {
            id: 1,
            title: "Think".to_string(),
            description: String::new(),
            kind: ExerciseKind::Reflection,
            completed: false,
        };
        let json = serde_json::to_value(&exercise).unwrap();
        assert_eq!(json["type"], "reflection");
    }

    #[test]
    fn test_difficulty_parse() {
        assert_eq!(Difficulty::parse("expert"), Some(Difficulty::Expert));
        assert_eq!(Difficulty::parse("master"), None);
    }
}
