//! The progress store: single owner of the course list

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use super::stats::{self, ProgressStats};
use crate::catalog::{seed_catalog, Course, CourseDraft, CourseId, CoursePatch};
use crate::error::{Error, Result};
use crate::interchange::{import_courses, BackupEnvelope, BackupKind, ExportDocument};
use crate::storage::{keys, KeyValueStore};

/// Owns the course catalog and mirrors every change to `S`.
///
/// Mutations are applied in memory first and then persisted. When the write
/// fails the change stays applied and the caller gets
/// [`Error::StorageUnavailable`], so memory and storage may disagree until
/// the next successful write.
pub struct ProgressStore<S> {
    courses: Vec<Course>,
    storage: S,
}

#[derive(Debug, Clone, Serialize)]
pub struct BackupSummary {
    pub key: String,
    pub timestamp: DateTime<Utc>,
    pub kind: BackupKind,
    pub course_count: usize,
}

impl<S: KeyValueStore> ProgressStore<S> {
    /// Reads the stored catalog, falling back to the seed catalog when
    /// nothing usable is stored.
    pub fn load(storage: S) -> Result<Self> {
        let stored = match storage.load(keys::COURSES)? {
            Some(json) => match serde_json::from_str::<Vec<Course>>(&json) {
                Ok(courses) => {
                    debug!("Loaded {} courses from storage", courses.len());
                    Some(courses)
                }
                Err(e) => {
                    warn!("Stored course list is unreadable, reseeding: {}", e);
                    None
                }
            },
            None => None,
        };

        match stored {
            Some(courses) => Ok(Self { courses, storage }),
            None => {
                info!("Seeding course catalog");
                Self::with_courses(storage, seed_catalog())
            }
        }
    }

    pub fn with_courses(storage: S, courses: Vec<Course>) -> Result<Self> {
        let store = Self { courses, storage };
        store.persist()?;
        Ok(store)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn course(&self, id: CourseId) -> Option<&Course> {
        self.courses.iter().find(|c| c.id == id)
    }

    fn course_mut(&mut self, id: CourseId) -> Option<&mut Course> {
        self.courses.iter_mut().find(|c| c.id == id)
    }

    fn persist(&self) -> Result<()> {
        let json = serde_json::to_string(&self.courses)?;
        self.storage.save(keys::COURSES, &json).map_err(|e| {
            error!("Failed to persist {} courses: {}", self.courses.len(), e);
            match e {
                Error::StorageUnavailable(_) => e,
                other => Error::StorageUnavailable(other.to_string()),
            }
        })
    }

    /// Replaces the whole catalog. Callers guarantee unique ids.
    pub fn set_courses(&mut self, courses: Vec<Course>) -> Result<()> {
        info!("Replacing catalog with {} courses", courses.len());
        self.courses = courses;
        self.persist()
    }

    /// Sets the completed-lesson count of a course and recomputes its
    /// progress. Returns `false` for an unknown id.
    pub fn update_course_progress(&mut self, id: CourseId, lessons_completed: u32) -> Result<bool> {
        let Some(course) = self.course_mut(id) else {
            warn!(course_id = id, "Progress update for unknown course ignored");
            return Ok(false);
        };

        course.set_completed_lessons(lessons_completed);
        info!(
            course_id = id,
            completed = course.completed_lessons,
            progress = course.progress,
            "Course progress updated"
        );
        self.persist()?;
        Ok(true)
    }

    /// Marks a lesson done and re-derives the course counters from the
    /// lesson flags.
    pub fn complete_lesson(&mut self, course_id: CourseId, lesson_id: u32) -> Result<bool> {
        let Some(course) = self.course_mut(course_id) else {
            warn!(course_id, "Lesson completion for unknown course ignored");
            return Ok(false);
        };
        let Some(lesson) = course.lesson_mut(lesson_id) else {
            warn!(course_id, lesson_id, "Lesson completion for unknown lesson ignored");
            return Ok(false);
        };

        lesson.completed = true;
        course.sync_from_lessons();
        info!(course_id, lesson_id, progress = course.progress, "Lesson completed");
        self.persist()?;
        Ok(true)
    }

    pub fn complete_exercise(
        &mut self,
        course_id: CourseId,
        lesson_id: u32,
        exercise_id: u32,
    ) -> Result<bool> {
        let exercise = self
            .course_mut(course_id)
            .and_then(|c| c.lesson_mut(lesson_id))
            .and_then(|l| l.exercise_mut(exercise_id));

        let Some(exercise) = exercise else {
            warn!(course_id, lesson_id, exercise_id, "Exercise completion for unknown exercise ignored");
            return Ok(false);
        };

        exercise.completed = true;
        debug!(course_id, lesson_id, exercise_id, "Exercise completed");
        self.persist()?;
        Ok(true)
    }

    pub fn total_xp(&self) -> u32 {
        stats::total_xp(&self.courses)
    }

    pub fn completed_courses(&self) -> u32 {
        stats::completed_courses(&self.courses)
    }

    pub fn user_level(&self) -> u32 {
        stats::level_for_xp(self.total_xp())
    }

    pub fn streak_days(&self) -> u32 {
        stats::streak_for_xp(self.total_xp())
    }

    pub fn stats(&self) -> ProgressStats {
        ProgressStats::from_courses(&self.courses)
    }

    pub fn reset_all_progress(&mut self) -> Result<()> {
        for course in self.courses.iter_mut() {
            course.reset();
        }
        info!("All course progress reset");
        self.persist()
    }

    /// Adds a course with id `max(existing) + 1`.
    pub fn create_course(&mut self, draft: CourseDraft) -> Result<CourseId> {
        let id = self.courses.iter().map(|c| c.id).max().unwrap_or(0) + 1;
        let course = draft.into_course(id);
        info!(course_id = id, title = %course.title, "Course created");
        self.courses.push(course);
        self.persist()?;
        Ok(id)
    }

    pub fn edit_course(&mut self, id: CourseId, patch: CoursePatch) -> Result<bool> {
        let Some(course) = self.course_mut(id) else {
            warn!(course_id = id, "Edit for unknown course ignored");
            return Ok(false);
        };

        if patch.is_empty() {
            debug!(course_id = id, "Empty course edit skipped");
            return Ok(true);
        }

        patch.apply(course);
        info!(course_id = id, "Course edited");
        self.persist()?;
        Ok(true)
    }

    pub fn delete_course(&mut self, id: CourseId) -> Result<bool> {
        let before = self.courses.len();
        self.courses.retain(|c| c.id != id);

        if self.courses.len() == before {
            warn!(course_id = id, "Delete for unknown course ignored");
            return Ok(false);
        }

        info!(course_id = id, "Course deleted");
        self.persist()?;
        Ok(true)
    }

    pub fn export_document(&self, now: DateTime<Utc>) -> ExportDocument {
        ExportDocument::new(&self.courses, now)
    }

    /// Replaces the catalog with the courses of an export file. The catalog
    /// is left untouched when the file is rejected.
    pub fn import_json(&mut self, text: &str) -> Result<usize> {
        let courses = import_courses(text)?;
        let count = courses.len();
        self.set_courses(courses)?;
        Ok(count)
    }

    /// Stores a snapshot of the current catalog and returns its key.
    pub fn create_backup(&self, kind: BackupKind, now: DateTime<Utc>) -> Result<String> {
        let key = keys::backup_key(now.timestamp_millis());
        let envelope = BackupEnvelope {
            courses: self.courses.clone(),
            timestamp: now,
            kind,
        };

        let json = serde_json::to_string(&envelope)?;
        self.storage.save(&key, &json).map_err(|e| {
            error!("Failed to write backup {}: {}", key, e);
            Error::StorageUnavailable(e.to_string())
        })?;

        info!(key = %key, courses = self.courses.len(), "Backup created");
        Ok(key)
    }

    /// Stored backups, newest first. Unreadable entries are skipped.
    pub fn list_backups(&self) -> Result<Vec<BackupSummary>> {
        let mut backups = Vec::new();

        for key in self.storage.keys_with_prefix(keys::BACKUP_PREFIX)? {
            let Some(json) = self.storage.load(&key)? else {
                continue;
            };
            match serde_json::from_str::<BackupEnvelope>(&json) {
                Ok(envelope) => backups.push(BackupSummary {
                    key,
                    timestamp: envelope.timestamp,
                    kind: envelope.kind,
                    course_count: envelope.courses.len(),
                }),
                Err(e) => warn!("Skipping unreadable backup {}: {}", key, e),
            }
        }

        backups.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(backups)
    }

    pub fn restore_backup(&mut self, key: &str) -> Result<()> {
        let json = self
            .storage
            .load(key)?
            .ok_or_else(|| Error::NotFound(format!("backup {}", key)))?;
        let mut envelope: BackupEnvelope = serde_json::from_str(&json)?;
        for course in envelope.courses.iter_mut() {
            course.recompute_progress();
        }

        info!(key, courses = envelope.courses.len(), "Restoring backup");
        self.set_courses(envelope.courses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{simple_course, Difficulty};
    use crate::storage::{Database, MemoryStore};
    use chrono::TimeZone;

    fn store_with(courses: Vec<Course>) -> ProgressStore<MemoryStore> {
        ProgressStore::with_courses(MemoryStore::new(), courses).unwrap()
    }

    #[test]
    fn test_half_then_full_completion() {
        let mut store = store_with(vec![simple_course(1, 12, 300)]);

        assert!(store.update_course_progress(1, 6).unwrap());
        assert_eq!(store.course(1).unwrap().progress, 50);
        assert_eq!(store.total_xp(), 150);
        assert_eq!(store.user_level(), 1);

        assert!(store.update_course_progress(1, 12).unwrap());
        assert_eq!(store.course(1).unwrap().progress, 100);
        assert_eq!(store.total_xp(), 300);
        assert_eq!(store.user_level(), 2);
        assert_eq!(store.completed_courses(), 1);
    }

    #[test]
    fn test_progress_is_monotonic_in_completed_lessons() {
        let mut store = store_with(vec![simple_course(1, 7, 70)]);
        let mut last = 0;

        for n in 0..=7 {
            store.update_course_progress(1, n).unwrap();
            let progress = store.course(1).unwrap().progress;
            assert!(progress >= last);
            assert_eq!(progress == 100, n == 7);
            last = progress;
        }
    }

    #[test]
    fn test_total_xp_matches_per_course_sum() {
        let mut store = store_with(vec![
            simple_course(1, 3, 250),
            simple_course(2, 9, 90),
            simple_course(3, 6, 600),
        ]);
        store.update_course_progress(1, 1).unwrap();
        store.update_course_progress(2, 4).unwrap();
        store.update_course_progress(3, 6).unwrap();
        store.delete_course(2).unwrap();

        let expected: u32 = store.courses().iter().map(|c| c.earned_xp()).sum();
        assert_eq!(store.total_xp(), expected);
        assert_eq!(store.user_level(), store.total_xp() / 200 + 1);
    }

    #[test]
    fn test_unknown_course_is_a_no_op() {
        let mut store = store_with(vec![simple_course(1, 4, 100)]);
        assert!(!store.update_course_progress(99, 2).unwrap());
        assert!(!store.delete_course(99).unwrap());
        assert!(!store.edit_course(99, CoursePatch::default()).unwrap());
        assert_eq!(store.courses().len(), 1);
        assert_eq!(store.course(1).unwrap().progress, 0);
    }

    #[test]
    fn test_reset_twice_equals_reset_once() {
        let mut store = ProgressStore::load(MemoryStore::new()).unwrap();
        store.update_course_progress(1, 5).unwrap();
        store.complete_exercise(2, 1, 1).unwrap();
        store.complete_lesson(2, 1).unwrap();

        store.reset_all_progress().unwrap();
        let once = store.courses().to_vec();
        store.reset_all_progress().unwrap();

        assert_eq!(store.courses(), once.as_slice());
        for course in store.courses() {
            assert_eq!(course.progress, 0);
            assert_eq!(course.completed_lessons, 0);
            for lesson in course.full_lessons.iter().flatten() {
                assert!(!lesson.completed);
                assert!(lesson.exercises.iter().all(|e| !e.completed));
            }
        }
    }

    #[test]
    fn test_complete_lesson_derives_counters_from_flags() {
        let mut store = ProgressStore::load(MemoryStore::new()).unwrap();

        assert!(store.complete_lesson(2, 1).unwrap());
        assert!(store.complete_lesson(2, 3).unwrap());
        // repeated completion does not double count
        assert!(store.complete_lesson(2, 3).unwrap());

        let course = store.course(2).unwrap();
        assert_eq!(course.completed_lessons, 2);
        assert_eq!(course.progress, 50);
        assert!(!store.complete_lesson(2, 99).unwrap());
    }

    #[test]
    fn test_complete_exercise_flips_flag() {
        let mut store = ProgressStore::load(MemoryStore::new()).unwrap();
        assert!(!store.course(2).unwrap().lesson(1).unwrap().is_fully_exercised());

        store.complete_exercise(2, 1, 1).unwrap();
        store.complete_exercise(2, 1, 2).unwrap();

        assert!(store.course(2).unwrap().lesson(1).unwrap().is_fully_exercised());
        assert!(!store.complete_exercise(2, 1, 42).unwrap());
    }

    #[test]
    fn test_create_course_uses_next_id() {
        let mut store = store_with(vec![simple_course(4, 1, 10), simple_course(9, 1, 10)]);
        let id = store
            .create_course(CourseDraft {
                title: "New".to_string(),
                description: String::new(),
                author: String::new(),
                difficulty: Difficulty::Beginner,
                badge: String::new(),
                image: String::new(),
                lessons: 3,
                xp: 30,
            })
            .unwrap();
        assert_eq!(id, 10);
        assert_eq!(store.courses().last().unwrap().id, 10);
    }

    #[test]
    fn test_create_in_empty_catalog_starts_at_one() {
        let mut store = store_with(Vec::new());
        let id = store
            .create_course(CourseDraft {
                title: "First".to_string(),
                description: String::new(),
                author: String::new(),
                difficulty: Difficulty::Advanced,
                badge: String::new(),
                image: String::new(),
                lessons: 1,
                xp: 10,
            })
            .unwrap();
        assert_eq!(id, 1);
    }

    #[test]
    fn test_mutations_survive_reload() {
        let db = Database::open_in_memory().unwrap();
        let mut store = ProgressStore::load(db).unwrap();
        store.update_course_progress(3, 5).unwrap();
        store.delete_course(6).unwrap();

        let ProgressStore { storage, .. } = store;
        let reloaded = ProgressStore::load(storage).unwrap();
        assert_eq!(reloaded.course(3).unwrap().progress, 50);
        assert!(reloaded.course(6).is_none());
    }

    #[test]
    fn test_unreadable_storage_reseeds() {
        let storage = MemoryStore::new();
        storage.save(keys::COURSES, "{broken").unwrap();
        let store = ProgressStore::load(storage).unwrap();
        assert_eq!(store.courses(), seed_catalog().as_slice());
    }

    #[test]
    fn test_storage_failure_is_surfaced_and_memory_kept() {
        let mut store = store_with(vec![simple_course(1, 4, 100)]);
        store.storage().set_quota(Some(8));

        let err = store.update_course_progress(1, 2).unwrap_err();
        assert!(matches!(err, Error::StorageUnavailable(_)));
        assert_eq!(store.course(1).unwrap().progress, 50);
    }

    #[test]
    fn test_empty_edit_does_not_write() {
        let mut store = store_with(vec![simple_course(1, 4, 100)]);
        store.storage().set_quota(Some(1));
        assert!(store.edit_course(1, CoursePatch::default()).unwrap());
    }

    #[test]
    fn test_edit_keeps_lesson_backed_counters() {
        let mut store = ProgressStore::load(MemoryStore::new()).unwrap();
        let patch = CoursePatch {
            lessons: Some(2),
            ..Default::default()
        };
        assert!(store.edit_course(2, patch).unwrap());

        store.complete_lesson(2, 1).unwrap();
        store.complete_lesson(2, 2).unwrap();

        let course = store.course(2).unwrap();
        assert_eq!(course.lessons, 4);
        assert_eq!(course.progress, 50);
        assert_eq!(store.completed_courses(), 0);
    }

    #[test]
    fn test_import_with_huge_xp_saturates_totals() {
        let course = r#"{"id": ID, "title": "Big", "difficulty": "Expert", "lessons": 1, "completedLessons": 1, "xp": 3000000000}"#;
        let json = format!(
            r#"{{"courses": [{}, {}]}}"#,
            course.replace("ID", "1"),
            course.replace("ID", "2")
        );

        let mut store = store_with(Vec::new());
        store.import_json(&json).unwrap();
        assert_eq!(store.total_xp(), u32::MAX);
        assert_eq!(store.completed_courses(), 2);
    }

    #[test]
    fn test_restore_recomputes_progress() {
        let storage = MemoryStore::new();
        let mut course = simple_course(1, 4, 100);
        course.completed_lessons = 1;
        course.progress = 100;
        let envelope = BackupEnvelope {
            courses: vec![course],
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap(),
            kind: BackupKind::Manual,
        };
        storage
            .save("backup_1", &serde_json::to_string(&envelope).unwrap())
            .unwrap();

        let mut store = ProgressStore::with_courses(storage, Vec::new()).unwrap();
        store.restore_backup("backup_1").unwrap();
        assert_eq!(store.course(1).unwrap().progress, 25);
        assert_eq!(store.total_xp(), 25);
    }

    #[test]
    fn test_failed_import_leaves_catalog_untouched() {
        let mut store = store_with(vec![simple_course(1, 4, 100)]);
        let err = store.import_json(r#"{"version": "1.0"}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidImport(_)));
        assert_eq!(store.courses().len(), 1);
    }

    #[test]
    fn test_export_import_round_trip() {
        let mut source = ProgressStore::load(MemoryStore::new()).unwrap();
        source.update_course_progress(1, 3).unwrap();
        source.complete_lesson(4, 2).unwrap();

        let now = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let json = source.export_document(now).to_json().unwrap();

        let mut target = store_with(Vec::new());
        assert_eq!(target.import_json(&json).unwrap(), source.courses().len());
        assert_eq!(target.courses(), source.courses());
    }

    #[test]
    fn test_backup_and_restore() {
        let mut store = store_with(vec![simple_course(1, 4, 100)]);
        store.update_course_progress(1, 4).unwrap();

        let first = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        let key = store.create_backup(BackupKind::Manual, first).unwrap();
        assert_eq!(key, format!("backup_{}", first.timestamp_millis()));

        store.reset_all_progress().unwrap();
        let second = Utc.with_ymd_and_hms(2024, 5, 2, 10, 0, 0).unwrap();
        store.create_backup(BackupKind::Auto, second).unwrap();

        let backups = store.list_backups().unwrap();
        assert_eq!(backups.len(), 2);
        assert_eq!(backups[0].timestamp, second);
        assert_eq!(backups[1].kind, BackupKind::Manual);

        store.restore_backup(&key).unwrap();
        assert_eq!(store.course(1).unwrap().progress, 100);
        assert!(matches!(store.restore_backup("backup_0"), Err(Error::NotFound(_))));
    }
}
