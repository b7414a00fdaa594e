//! Admin-side course creation and editing

use serde::{Deserialize, Serialize};

use super::types::{Course, CourseId, Difficulty};

/// Fields an admin fills in when creating a course
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDraft {
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
    pub xp: u32,
}

impl CourseDraft {
    pub fn into_course(self, id: CourseId) -> Course {
        Course {
            id,
            title: self.title,
            description: self.description,
            author: self.author,
            difficulty: self.difficulty,
            badge: self.badge,
            image: self.image,
            lessons: self.lessons,
            completed_lessons: 0,
            xp: self.xp,
            progress: 0,
            full_lessons: None,
        }
    }
}

/// Shallow edit: every `Some` field overwrites the stored one, except the
/// lesson counters of a course with `full_lessons`, which always follow the
/// lesson list.
///
/// `progress` is not patchable; it is recomputed from the merged
/// lesson counters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoursePatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub author: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub badge: Option<String>,
    pub image: Option<String>,
    pub lessons: Option<u32>,
    pub completed_lessons: Option<u32>,
    pub xp: Option<u32>,
}

impl CoursePatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.author.is_none()
            && self.difficulty.is_none()
            && self.badge.is_none()
            && self.image.is_none()
            && self.lessons.is_none()
            && self.completed_lessons.is_none()
            && self.xp.is_none()
    }

    pub fn apply(self, course: &mut Course) {
        if let Some(title) = self.title {
            course.title = title;
        }
        if let Some(description) = self.description {
            course.description = description;
        }
        if let Some(author) = self.author {
            course.author = author;
        }
        if let Some(difficulty) = self.difficulty {
            course.difficulty = difficulty;
        }
        if let Some(badge) = self.badge {
            course.badge = badge;
        }
        if let Some(image) = self.image {
            course.image = image;
        }
        if let Some(xp) = self.xp {
            course.xp = xp;
        }

        // Courses with real lessons count them; the counters are not editable.
        if let Some(count) = course.full_lessons.as_ref().map(Vec::len) {
            course.lessons = count as u32;
            course.sync_from_lessons();
            return;
        }

        if let Some(lessons) = self.lessons {
            course.lessons = lessons;
        }
        if let Some(completed) = self.completed_lessons {
            course.completed_lessons = completed;
        }
        course.recompute_progress();
    }
}
