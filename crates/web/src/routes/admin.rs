use askama::Template;
use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{Html, IntoResponse, Redirect},
    Form, Json,
};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;

use learnhub_core::admin::{OperationHandle, OperationStatus, SystemOperation};
use learnhub_core::catalog::{CourseDraft, CoursePatch, Difficulty};
use learnhub_core::interchange::BackupKind;
use learnhub_core::progress::BackupSummary;
use learnhub_core::{CourseId, Error as CoreError};

use super::{chrome, require_admin, Chrome, NoticeQuery};
use crate::error::AppError;
use crate::AppState;

// ============================================================================
// TEMPLATES
// ============================================================================

#[derive(Template)]
#[template(path = "admin.html")]
pub struct AdminTemplate {
    pub chrome: Chrome,
    pub courses: Vec<AdminCourseRow>,
    pub difficulties: Vec<(&'static str, &'static str)>,
    pub backups: Vec<BackupRow>,
    pub operations: Vec<OperationRow>,
}

pub struct AdminCourseRow {
    pub id: CourseId,
    pub title: String,
    pub author: String,
    pub difficulty: String,
    pub lessons: u32,
    pub completed_lessons: u32,
    pub xp: u32,
    pub progress: u8,
}

pub struct BackupRow {
    pub key: String,
    pub created: String,
    pub kind: String,
    pub course_count: usize,
}

impl From<BackupSummary> for BackupRow {
    fn from(b: BackupSummary) -> Self {
        Self {
            key: b.key,
            created: b.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            kind: match b.kind {
                BackupKind::Manual => "вручную",
                BackupKind::Auto => "авто",
                BackupKind::PreReset => "перед сбросом",
            }
            .to_string(),
            course_count: b.course_count,
        }
    }
}

pub struct OperationRow {
    pub slug: &'static str,
    pub label: &'static str,
    pub status: String,
}

fn status_text(status: Option<OperationStatus>) -> String {
    match status {
        None => "не запускалась".to_string(),
        Some(OperationStatus::Running { .. }) => "выполняется…".to_string(),
        Some(OperationStatus::Finished(outcome)) => outcome.message,
        Some(OperationStatus::Cancelled) => "отменена".to_string(),
    }
}

// ============================================================================
// HANDLERS
// ============================================================================

pub async fn panel(
    State(state): State<Arc<AppState>>,
    Query(query): Query<NoticeQuery>,
) -> Result<Html<String>, AppError> {
    let operations = {
        let handles = state.operations();
        SystemOperation::ALL
            .iter()
            .map(|op| OperationRow {
                slug: op.as_str(),
                label: op.label(),
                status: status_text(handles.get(op).map(OperationHandle::status)),
            })
            .collect()
    };

    let store = state.progress();
    require_admin(store.storage())?;

    let template = AdminTemplate {
        chrome: chrome(&store, "Администрирование", query.notice.as_deref())?,
        courses: store
            .courses()
            .iter()
            .map(|c| AdminCourseRow {
                id: c.id,
                title: c.title.clone(),
                author: c.author.clone(),
                difficulty: c.difficulty.label().to_string(),
                lessons: c.lessons,
                completed_lessons: c.completed_lessons,
                xp: c.xp,
                progress: c.progress,
            })
            .collect(),
        difficulties: Difficulty::ALL.iter().map(|d| (d.as_str(), d.label())).collect(),
        backups: store.list_backups()?.into_iter().map(BackupRow::from).collect(),
        operations,
    };
    Ok(Html(template.render()?))
}

#[derive(Deserialize)]
pub struct CourseForm {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub author: String,
    pub difficulty: String,
    #[serde(default)]
    pub badge: String,
    #[serde(default)]
    pub image: String,
    pub lessons: u32,
    pub xp: u32,
}

pub async fn create_course(
    State(state): State<Arc<AppState>>,
    Form(form): Form<CourseForm>,
) -> Result<Redirect, AppError> {
    let mut store = state.progress();
    require_admin(store.storage())?;

    let difficulty = Difficulty::parse(&form.difficulty).unwrap_or(Difficulty::Beginner);
    store.create_course(CourseDraft {
        title: form.title.trim().to_string(),
        description: form.description,
        author: form.author,
        difficulty,
        badge: form.badge,
        image: form.image,
        lessons: form.lessons,
        xp: form.xp,
    })?;
    Ok(Redirect::to("/admin?notice=course-created"))
}

/// HTML forms send every field; blanks mean "leave unchanged".
#[derive(Deserialize, Default)]
pub struct EditForm {
    pub title: Option<String>,
    pub description: Option<String>,
    pub author: Option<String>,
    pub difficulty: Option<String>,
    pub badge: Option<String>,
    pub image: Option<String>,
    pub lessons: Option<String>,
    pub completed_lessons: Option<String>,
    pub xp: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn number(value: Option<String>) -> Option<u32> {
    non_blank(value).and_then(|v| v.parse().ok())
}

impl From<EditForm> for CoursePatch {
    fn from(form: EditForm) -> Self {
        CoursePatch {
            title: non_blank(form.title),
            description: non_blank(form.description),
            author: non_blank(form.author),
            difficulty: non_blank(form.difficulty).and_then(|d| Difficulty::parse(&d)),
            badge: non_blank(form.badge),
            image: non_blank(form.image),
            lessons: number(form.lessons),
            completed_lessons: number(form.completed_lessons),
            xp: number(form.xp),
        }
    }
}

pub async fn edit_course(
    State(state): State<Arc<AppState>>,
    Path(id): Path<CourseId>,
    Form(form): Form<EditForm>,
) -> Result<Redirect, AppError> {
    let mut store = state.progress();
    require_admin(store.storage())?;

    store.edit_course(id, form.into())?;
    Ok(Redirect::to("/admin?notice=course-updated"))
}

pub async fn delete_course(
    State(state): State<Arc<AppState>>,
    Path(id): Path<CourseId>,
) -> Result<Redirect, AppError> {
    let mut store = state.progress();
    require_admin(store.storage())?;

    store.delete_course(id)?;
    Ok(Redirect::to("/admin?notice=course-deleted"))
}

pub async fn reset_progress(State(state): State<Arc<AppState>>) -> Result<Redirect, AppError> {
    let mut store = state.progress();
    require_admin(store.storage())?;

    store.create_backup(BackupKind::PreReset, Utc::now())?;
    store.reset_all_progress()?;
    Ok(Redirect::to("/admin?notice=progress-reset"))
}

pub async fn export(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, AppError> {
    let store = state.progress();
    require_admin(store.storage())?;

    let document = store.export_document(Utc::now());
    let disposition = format!("attachment; filename=\"{}\"", document.file_name());
    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        document.to_json()?,
    ))
}

#[derive(Deserialize)]
pub struct ImportForm {
    pub payload: String,
}

pub async fn import(
    State(state): State<Arc<AppState>>,
    Form(form): Form<ImportForm>,
) -> Result<Redirect, AppError> {
    let mut store = state.progress();
    require_admin(store.storage())?;

    match store.import_json(&form.payload) {
        Ok(count) => {
            tracing::info!("Imported {} courses", count);
            Ok(Redirect::to("/admin?notice=import-ok"))
        }
        Err(CoreError::InvalidImport(reason)) => {
            tracing::warn!("Rejected import: {}", reason);
            Ok(Redirect::to("/admin?notice=import-invalid"))
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn backup(State(state): State<Arc<AppState>>) -> Result<Redirect, AppError> {
    let store = state.progress();
    require_admin(store.storage())?;

    store.create_backup(BackupKind::Manual, Utc::now())?;
    Ok(Redirect::to("/admin?notice=backup-created"))
}

pub async fn restore_backup(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> Result<Redirect, AppError> {
    let mut store = state.progress();
    require_admin(store.storage())?;

    store.restore_backup(&key)?;
    Ok(Redirect::to("/admin?notice=backup-restored"))
}

// ============================================================================
// SYSTEM OPERATIONS
// ============================================================================

fn parse_operation(slug: &str) -> Result<SystemOperation, AppError> {
    SystemOperation::parse(slug).ok_or_else(|| AppError::NotFound(format!("operation {}", slug)))
}

/// Starts an operation. Restarting replaces (and aborts) the previous run.
pub async fn start_operation(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Json<OperationStatus>, AppError> {
    require_admin(state.progress().storage())?;
    let operation = parse_operation(&slug)?;

    let handle = OperationHandle::start(operation);
    let status = handle.status();
    state.operations().insert(operation, handle);
    Ok(Json(status))
}

pub async fn operation_status(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Json<OperationStatus>, AppError> {
    require_admin(state.progress().storage())?;
    let operation = parse_operation(&slug)?;

    let status = state.operations().get(&operation).map(OperationHandle::status);
    status
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("run of {}", slug)))
}

pub async fn cancel_operation(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Json<OperationStatus>, AppError> {
    require_admin(state.progress().storage())?;
    let operation = parse_operation(&slug)?;

    let operations = state.operations();
    let handle = operations
        .get(&operation)
        .ok_or_else(|| AppError::NotFound(format!("run of {}", slug)))?;
    handle.cancel();
    Ok(Json(handle.status()))
}

#[cfg(test)]
mod tests {
    use crate::test_support::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_panel_requires_admin() {
        let state = state();
        assert_eq!(get(&state, "/admin").await.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            post_form(&state, "/admin/courses/1/delete", "").await.status(),
            StatusCode::FORBIDDEN
        );
        assert!(state.progress().course(1).is_some());
    }

    #[tokio::test]
    async fn test_create_edit_delete_course() {
        let state = admin_state();

        let form = "title=Rust&author=Ferris&difficulty=Expert&lessons=10&xp=1000";
        post_form(&state, "/admin/courses", form).await;
        assert_eq!(state.progress().course(7).unwrap().title, "Rust");

        post_form(&state, "/admin/courses/7/edit", "title=&completed_lessons=5&xp=").await;
        {
            let store = state.progress();
            let course = store.course(7).unwrap();
            assert_eq!(course.title, "Rust");
            assert_eq!(course.progress, 50);
            assert_eq!(course.xp, 1000);
        }

        post_form(&state, "/admin/courses/7/delete", "").await;
        assert!(state.progress().course(7).is_none());
    }

    #[tokio::test]
    async fn test_export_is_attachment() {
        let state = admin_state();
        let response = get(&state, "/admin/export").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers()["content-disposition"]
            .to_str()
            .unwrap()
            .starts_with("attachment; filename=\"courses-export-"));

        let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(json["version"], "1.0");
        assert_eq!(json["totalCourses"], 6);
        assert_eq!(json["courses"].as_array().unwrap().len(), 6);
    }

    #[tokio::test]
    async fn test_invalid_import_keeps_catalog() {
        let state = admin_state();
        let response = post_form(&state, "/admin/import", "payload=%7B%22version%22%3A%221.0%22%7D").await;
        assert_eq!(response.headers()["location"], "/admin?notice=import-invalid");
        assert_eq!(state.progress().courses().len(), 6);
    }

    #[tokio::test]
    async fn test_reset_keeps_a_backup() {
        let state = admin_state();
        state.progress().update_course_progress(1, 12).unwrap();

        post_form(&state, "/admin/reset", "").await;
        let store = state.progress();
        assert_eq!(store.total_xp(), 0);

        let backups = store.list_backups().unwrap();
        assert_eq!(backups.len(), 1);
        assert_eq!(backups[0].kind, learnhub_core::interchange::BackupKind::PreReset);
    }

    #[tokio::test]
    async fn test_operation_lifecycle() {
        let state = admin_state();
        assert_eq!(
            get(&state, "/admin/ops/clear-cache").await.status(),
            StatusCode::NOT_FOUND
        );

        let started = body_text(post_form(&state, "/admin/ops/clear-cache", "").await).await;
        assert!(started.contains("\"status\":\"running\""));

        let cancelled = body_text(post_form(&state, "/admin/ops/clear-cache/cancel", "").await).await;
        assert!(cancelled.contains("\"status\":\"cancelled\""));

        assert_eq!(
            post_form(&state, "/admin/ops/format-disk", "").await.status(),
            StatusCode::NOT_FOUND
        );
    }

    #[tokio::test]
    async fn test_panel_renders_for_admin() {
        let state = admin_state();
        let response = get(&state, "/admin").await;
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("Оптимизировать базу данных"));
        assert!(html.contains("не запускалась"));
    }
}
