use askama::Template;
use axum::{
    extract::{Path, Query, State},
    response::{Html, Redirect},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use learnhub_core::catalog::{ExerciseKind, Lesson};
use learnhub_core::CourseId;

use super::{chrome, record_achievements, Chrome, CourseCard, NoticeQuery};
use crate::error::AppError;
use crate::AppState;

// ============================================================================
// TEMPLATES
// ============================================================================

#[derive(Template)]
#[template(path = "courses.html")]
pub struct CatalogTemplate {
    pub chrome: Chrome,
    pub courses: Vec<CourseCard>,
}

#[derive(Template)]
#[template(path = "course.html")]
pub struct CourseTemplate {
    pub chrome: Chrome,
    pub id: CourseId,
    pub title: String,
    pub description: String,
    pub author: String,
    pub badge: String,
    pub difficulty: String,
    pub lessons: u32,
    pub completed_lessons: u32,
    pub progress: u8,
    pub xp: u32,
    pub earned_xp: u32,
    pub lesson_rows: Vec<LessonView>,
}

pub struct LessonView {
    pub id: u32,
    pub title: String,
    pub content: String,
    pub duration: u32,
    pub completed: bool,
    pub ready: bool,
    pub exercises: Vec<ExerciseView>,
}

pub struct ExerciseView {
    pub id: u32,
    pub title: String,
    pub description: String,
    pub kind: &'static str,
    pub completed: bool,
}

impl LessonView {
    fn from_lesson(lesson: &Lesson) -> Self {
        Self {
            id: lesson.id,
            title: lesson.title.clone(),
            content: lesson.content.clone(),
            duration: lesson.duration,
            completed: lesson.completed,
            ready: lesson.is_fully_exercised(),
            exercises: lesson
                .exercises
                .iter()
                .map(|e| ExerciseView {
                    id: e.id,
                    title: e.title.clone(),
                    description: e.description.clone(),
                    kind: match e.kind {
                        ExerciseKind::Text => "Вопрос",
                        ExerciseKind::Practice => "Практика",
                        ExerciseKind::Reflection => "Рефлексия",
                    },
                    completed: e.completed,
                })
                .collect(),
        }
    }
}

// ============================================================================
// HANDLERS
// ============================================================================

pub async fn catalog(
    State(state): State<Arc<AppState>>,
    Query(query): Query<NoticeQuery>,
) -> Result<Html<String>, AppError> {
    let store = state.progress();
    let template = CatalogTemplate {
        chrome: chrome(&store, "Курсы", query.notice.as_deref())?,
        courses: store.courses().iter().map(CourseCard::from_course).collect(),
    };
    Ok(Html(template.render()?))
}

pub async fn course_page(
    State(state): State<Arc<AppState>>,
    Path(id): Path<CourseId>,
    Query(query): Query<NoticeQuery>,
) -> Result<Html<String>, AppError> {
    let store = state.progress();
    let course = store
        .course(id)
        .ok_or_else(|| AppError::NotFound(format!("course {}", id)))?;

    let template = CourseTemplate {
        chrome: chrome(&store, &course.title, query.notice.as_deref())?,
        id: course.id,
        title: course.title.clone(),
        description: course.description.clone(),
        author: course.author.clone(),
        badge: course.badge.clone(),
        difficulty: course.difficulty.label().to_string(),
        lessons: course.lessons,
        completed_lessons: course.completed_lessons,
        progress: course.progress,
        xp: course.xp,
        earned_xp: course.earned_xp(),
        lesson_rows: course
            .full_lessons
            .iter()
            .flatten()
            .map(LessonView::from_lesson)
            .collect(),
    };
    Ok(Html(template.render()?))
}

/// Completes the next lesson of a counter-only course.
pub async fn advance(
    State(state): State<Arc<AppState>>,
    Path(id): Path<CourseId>,
) -> Result<Redirect, AppError> {
    let mut store = state.progress();
    let next = store
        .course(id)
        .map(|c| c.completed_lessons + 1)
        .ok_or_else(|| AppError::NotFound(format!("course {}", id)))?;

    store.update_course_progress(id, next)?;
    record_achievements(&store)?;
    Ok(Redirect::to(&format!("/courses/{}?notice=lesson-done", id)))
}

pub async fn complete_lesson(
    State(state): State<Arc<AppState>>,
    Path((id, lesson_id)): Path<(CourseId, u32)>,
) -> Result<Redirect, AppError> {
    let mut store = state.progress();
    let lesson = store
        .course(id)
        .and_then(|c| c.lesson(lesson_id))
        .ok_or_else(|| AppError::NotFound(format!("lesson {}/{}", id, lesson_id)))?;

    // The model accepts any completion; the page insists on finished exercises.
    if !lesson.is_fully_exercised() {
        return Ok(Redirect::to(&format!("/courses/{}?notice=exercises-pending", id)));
    }

    store.complete_lesson(id, lesson_id)?;
    record_achievements(&store)?;
    Ok(Redirect::to(&format!("/courses/{}?notice=lesson-done", id)))
}

pub async fn complete_exercise(
    State(state): State<Arc<AppState>>,
    Path((id, lesson_id, exercise_id)): Path<(CourseId, u32, u32)>,
) -> Result<Redirect, AppError> {
    let mut store = state.progress();
    if !store.complete_exercise(id, lesson_id, exercise_id)? {
        return Err(AppError::NotFound(format!(
            "exercise {}/{}/{}",
            id, lesson_id, exercise_id
        )));
    }
    Ok(Redirect::to(&format!("/courses/{}", id)))
}

// ============================================================================
// API
// ============================================================================

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRequest {
    pub lessons_completed: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressResponse {
    pub updated: bool,
    pub progress: Option<u8>,
    pub total_xp: u32,
    pub level: u32,
}

/// Unknown ids are answered with `updated: false` rather than an error.
pub async fn update_progress(
    State(state): State<Arc<AppState>>,
    Path(id): Path<CourseId>,
    Json(req): Json<ProgressRequest>,
) -> Result<Json<ProgressResponse>, AppError> {
    let mut store = state.progress();
    let updated = store.update_course_progress(id, req.lessons_completed)?;
    if updated {
        record_achievements(&store)?;
    }

    Ok(Json(ProgressResponse {
        updated,
        progress: store.course(id).map(|c| c.progress),
        total_xp: store.total_xp(),
        level: store.user_level(),
    }))
}
