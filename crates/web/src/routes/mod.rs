use askama::Template;
use axum::{
    extract::{Query, State},
    response::{Html, Redirect},
    Form, Json,
};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;

use learnhub_core::achievements::{self, AchievementLedger};
use learnhub_core::session::{self, User};
use learnhub_core::settings::{self, Theme};
use learnhub_core::{Database, KeyValueStore, ProgressStats, ProgressStore};

use crate::error::AppError;
use crate::AppState;

pub mod admin;
pub mod courses;
pub mod profile;
pub mod support;

/// Layout data every page needs
pub struct Chrome {
    pub title: String,
    pub theme: &'static Theme,
    pub user: Option<User>,
    pub avatar: Option<String>,
    pub notice: Option<String>,
}

impl Chrome {
    pub fn is_admin(&self) -> bool {
        self.user.as_ref().map(|u| u.is_admin).unwrap_or(false)
    }

    pub fn display_name(&self) -> &str {
        self.user.as_ref().map(|u| u.username.as_str()).unwrap_or("Гость")
    }
}

pub fn chrome(
    store: &ProgressStore<Database>,
    title: &str,
    notice: Option<&str>,
) -> Result<Chrome, AppError> {
    let storage = store.storage();
    Ok(Chrome {
        title: title.to_string(),
        theme: settings::theme(storage)?,
        user: session::current_user(storage)?,
        avatar: settings::avatar(storage)?,
        notice: notice.and_then(notice_text).map(String::from),
    })
}

#[derive(Deserialize, Default)]
pub struct NoticeQuery {
    pub notice: Option<String>,
}

/// User-facing text for the `?notice=` codes set by redirects
fn notice_text(code: &str) -> Option<&'static str> {
    Some(match code {
        "login-failed" => "Неверный логин или пароль",
        "logged-in" => "Вы вошли в систему",
        "logged-out" => "Вы вышли из системы",
        "exercises-pending" => "Сначала выполните все упражнения урока",
        "lesson-done" => "Урок пройден!",
        "theme-saved" => "Тема сохранена",
        "avatar-saved" => "Аватар обновлён",
        "course-created" => "Курс создан",
        "course-updated" => "Курс обновлён",
        "course-deleted" => "Курс удалён",
        "progress-reset" => "Прогресс сброшен, резервная копия сохранена",
        "import-ok" => "Курсы импортированы",
        "import-invalid" => "Неверный формат файла",
        "backup-created" => "Резервная копия создана",
        "backup-restored" => "Резервная копия восстановлена",
        "admin-only" => "Раздел доступен только администратору",
        _ => return None,
    })
}

/// Appends newly earned achievements to the ledger after a progress change.
pub fn record_achievements(store: &ProgressStore<Database>) -> Result<(), AppError> {
    let storage = store.storage();
    let mut ledger = AchievementLedger::load(storage)?;
    if !ledger.record(&store.stats(), Utc::now()).is_empty() {
        ledger.save(storage)?;
    }
    Ok(())
}

pub fn require_admin(storage: &impl KeyValueStore) -> Result<User, AppError> {
    match session::current_user(storage)? {
        Some(user) if user.is_admin => Ok(user),
        _ => Err(AppError::Forbidden),
    }
}

pub struct CourseCard {
    pub id: u64,
    pub title: String,
    pub badge: String,
    pub difficulty: String,
    pub progress: u8,
    pub earned_xp: u32,
    pub xp: u32,
}

impl CourseCard {
    pub fn from_course(course: &learnhub_core::Course) -> Self {
        Self {
            id: course.id,
            title: course.title.clone(),
            badge: course.badge.clone(),
            difficulty: course.difficulty.label().to_string(),
            progress: course.progress,
            earned_xp: course.earned_xp(),
            xp: course.xp,
        }
    }
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub chrome: Chrome,
    pub stats: ProgressStats,
    pub level_progress: u32,
    pub xp_to_next_level: u32,
    pub achievements_earned: u32,
    pub in_progress: Vec<CourseCard>,
}

pub async fn index(
    State(state): State<Arc<AppState>>,
    Query(query): Query<NoticeQuery>,
) -> Result<Html<String>, AppError> {
    let store = state.progress();
    let stats = store.stats();

    let in_progress = store
        .courses()
        .iter()
        .filter(|c| c.is_started() && !c.is_completed())
        .map(CourseCard::from_course)
        .collect();

    let template = IndexTemplate {
        chrome: chrome(&store, "LearnHub", query.notice.as_deref())?,
        stats,
        level_progress: stats.level_progress_percent(),
        xp_to_next_level: stats.xp_to_next_level(),
        achievements_earned: achievements::earned_count(&stats),
        in_progress,
    };
    Ok(Html(template.render()?))
}

pub async fn stats_api(State(state): State<Arc<AppState>>) -> Json<ProgressStats> {
    let stats = state.progress().stats();
    Json(stats)
}

#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Form(form): Form<LoginForm>,
) -> Result<Redirect, AppError> {
    let store = state.progress();
    let stats = store.stats();
    let earned = achievements::earned_count(&stats);

    let user = session::login(store.storage(), &form.username, &form.password, &stats, earned)?;
    drop(store);

    match user {
        Some(user) => {
            state.chat().set_user_name(Some(user.username));
            Ok(Redirect::to("/?notice=logged-in"))
        }
        None => Ok(Redirect::to("/?notice=login-failed")),
    }
}

pub async fn logout(State(state): State<Arc<AppState>>) -> Result<Redirect, AppError> {
    session::logout(state.progress().storage())?;
    state.chat().set_user_name(None);
    Ok(Redirect::to("/?notice=logged-out"))
}

pub async fn health() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use crate::test_support::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_health() {
        let state = state();
        let response = get(&state, "/health").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "OK");
    }

    #[tokio::test]
    async fn test_dashboard_renders_level() {
        let state = state();
        let response = get(&state, "/?notice=logged-in").await;
        assert_eq!(response.status(), StatusCode::OK);

        let html = body_text(response).await;
        assert!(html.contains("Уровень 1"));
        assert!(html.contains("Вы вошли в систему"));
    }

    #[tokio::test]
    async fn test_login_sets_current_user() {
        let state = state();
        let response = post_form(&state, "/login", "username=student&password=student123").await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(state.chat().user_name(), Some("student"));

        let html = body_text(get(&state, "/").await).await;
        assert!(html.contains("student"));
    }

    #[tokio::test]
    async fn test_bad_login_redirects_with_notice() {
        let state = state();
        let response = post_form(&state, "/login", "username=student&password=wrong").await;
        assert_eq!(
            response.headers()["location"],
            "/?notice=login-failed"
        );
    }

    #[tokio::test]
    async fn test_stats_api() {
        let state = state();
        let json = body_text(get(&state, "/api/stats").await).await;
        let stats: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(stats["totalXp"], 0);
        assert_eq!(stats["level"], 1);
        assert_eq!(stats["totalCourses"], 6);
    }
}
