//! Export/import file format and backup envelopes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::catalog::Course;
use crate::error::{Error, Result};

pub const EXPORT_VERSION: &str = "1.0";

/// Downloadable course export
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub courses: Vec<Course>,
    pub export_date: DateTime<Utc>,
    pub version: String,
    pub total_courses: u32,
    pub completed_courses: u32,
}

impl ExportDocument {
    pub fn new(courses: &[Course], now: DateTime<Utc>) -> Self {
        Self {
            courses: courses.to_vec(),
            export_date: now,
            version: EXPORT_VERSION.to_string(),
            total_courses: courses.len() as u32,
            completed_courses: courses.iter().filter(|c| c.is_completed()).count() as u32,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn file_name(&self) -> String {
        format!("courses-export-{}.json", self.export_date.format("%Y-%m-%d"))
    }
}

/// Reads the course list out of an export file.
///
/// Only the `courses` array is checked; the other fields are informational
/// and may be missing or stale.
pub fn import_courses(text: &str) -> Result<Vec<Course>> {
    let mut value: Value =
        serde_json::from_str(text).map_err(|e| Error::InvalidImport(e.to_string()))?;

    let courses = match value.get_mut("courses") {
        Some(courses @ Value::Array(_)) => courses.take(),
        _ => return Err(Error::InvalidImport("missing \"courses\" array".to_string())),
    };

    let mut courses: Vec<Course> =
        serde_json::from_value(courses).map_err(|e| Error::InvalidImport(e.to_string()))?;

    for course in courses.iter_mut() {
        course.recompute_progress();
    }

    Ok(courses)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackupKind {
    Manual,
    Auto,
    PreReset,
}

/// Snapshot of the course list stored under a `backup_<ms>` key
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupEnvelope {
    pub courses: Vec<Course>,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: BackupKind,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::simple_course;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_export_counts_completed_courses() {
        let mut done = simple_course(1, 4, 100);
        done.set_completed_lessons(4);
        let open = simple_course(2, 4, 100);

        let doc = ExportDocument::new(&[done, open], fixed_now());
        assert_eq!(doc.total_courses, 2);
        assert_eq!(doc.completed_courses, 1);
        assert_eq!(doc.version, "1.0");
        assert_eq!(doc.file_name(), "courses-export-2024-03-15.json");
    }

    #[test]
    fn test_export_then_import_preserves_courses() {
        let mut course = simple_course(1, 12, 300);
        course.set_completed_lessons(6);
        let courses = vec![course, simple_course(2, 5, 50)];

        let json = ExportDocument::new(&courses, fixed_now()).to_json().unwrap();
        assert!(json.contains("\"exportDate\""));
        assert_eq!(import_courses(&json).unwrap(), courses);
    }

    #[test]
    fn test_import_without_courses_is_rejected() {
        let err = import_courses(r#"{"version": "1.0", "totalCourses": 3}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidImport(_)));
    }

    #[test]
    fn test_import_with_non_array_courses_is_rejected() {
        let err = import_courses(r#"{"courses": {"id": 1}}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidImport(_)));
    }

    #[test]
    fn test_import_rejects_garbage() {
        assert!(matches!(
            import_courses("not json at all"),
            Err(Error::InvalidImport(_))
        ));
    }

    #[test]
    fn test_import_ignores_metadata() {
        let json = r#"{
            "courses": [{"id": 9, "title": "Solo", "difficulty": "Expert", "lessons": 2, "completedLessons": 1, "xp": 40}]
        }"#;
        let courses = import_courses(json).unwrap();
        assert_eq!(courses.len(), 1);
        assert_eq!(courses[0].progress, 50);
    }

    #[test]
    fn test_backup_envelope_field_names() {
        let envelope = BackupEnvelope {
            courses: Vec::new(),
            timestamp: fixed_now(),
            kind: BackupKind::PreReset,
        };
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["type"], "pre-reset");
        assert!(json["timestamp"].as_str().unwrap().starts_with("2024-03-15T12:00:00"));
    }
}
