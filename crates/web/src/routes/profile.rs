use askama::Template;
use axum::{
    extract::{Query, State},
    response::{Html, Redirect},
    Form,
};
use serde::Deserialize;
use std::sync::Arc;

use learnhub_core::achievements::{self, AchievementLedger};
use learnhub_core::leaderboard::{self, LeaderboardEntry};
use learnhub_core::settings::{self, Theme, THEMES};

use super::{chrome, Chrome, NoticeQuery};
use crate::error::AppError;
use crate::AppState;

#[derive(Template)]
#[template(path = "achievements.html")]
pub struct AchievementsTemplate {
    pub chrome: Chrome,
    pub achievements: Vec<AchievementView>,
    pub earned: u32,
    pub total: u32,
    pub points: u32,
}

pub struct AchievementView {
    pub title: String,
    pub description: String,
    pub icon: String,
    pub rarity: String,
    pub rarity_label: String,
    pub points: u32,
    pub earned: bool,
    pub earned_on: Option<String>,
}

#[derive(Template)]
#[template(path = "leaderboard.html")]
pub struct LeaderboardTemplate {
    pub chrome: Chrome,
    pub entries: Vec<LeaderboardEntry>,
    pub user_rank: u32,
}

#[derive(Template)]
#[template(path = "settings.html")]
pub struct SettingsTemplate {
    pub chrome: Chrome,
    pub themes: &'static [Theme],
}

pub async fn achievements(
    State(state): State<Arc<AppState>>,
    Query(query): Query<NoticeQuery>,
) -> Result<Html<String>, AppError> {
    let store = state.progress();
    let stats = store.stats();
    let ledger = AchievementLedger::load(store.storage())?;

    let list: Vec<AchievementView> = achievements::evaluate(&stats)
        .into_iter()
        .map(|a| AchievementView {
            title: a.title.to_string(),
            description: a.description.to_string(),
            icon: a.icon.to_string(),
            rarity: a.rarity.as_str().to_string(),
            rarity_label: a.rarity.label().to_string(),
            points: a.points,
            earned: a.earned,
            earned_on: ledger
                .earned_at(a.id)
                .map(|t| t.format("%d.%m.%Y").to_string()),
        })
        .collect();

    let template = AchievementsTemplate {
        chrome: chrome(&store, "Достижения", query.notice.as_deref())?,
        earned: achievements::earned_count(&stats),
        total: list.len() as u32,
        points: achievements::earned_points(&stats),
        achievements: list,
    };
    Ok(Html(template.render()?))
}

pub async fn leaderboard(
    State(state): State<Arc<AppState>>,
) -> Result<Html<String>, AppError> {
    let store = state.progress();
    let chrome = chrome(&store, "Таблица лидеров", None)?;

    let entries = leaderboard::build(&state.rivals, chrome.display_name(), store.total_xp());
    let user_rank = leaderboard::rank_of_current_user(&entries).unwrap_or(0);

    let template = LeaderboardTemplate {
        chrome,
        entries,
        user_rank,
    };
    Ok(Html(template.render()?))
}

pub async fn settings(
    State(state): State<Arc<AppState>>,
    Query(query): Query<NoticeQuery>,
) -> Result<Html<String>, AppError> {
    let store = state.progress();
    let template = SettingsTemplate {
        chrome: chrome(&store, "Настройки", query.notice.as_deref())?,
        themes: &THEMES,
    };
    Ok(Html(template.render()?))
}

#[derive(Deserialize)]
pub struct ThemeForm {
    pub theme: String,
}

pub async fn set_theme(
    State(state): State<Arc<AppState>>,
    Form(form): Form<ThemeForm>,
) -> Result<Redirect, AppError> {
    settings::set_theme(state.progress().storage(), &form.theme)?;
    Ok(Redirect::to("/settings?notice=theme-saved"))
}

#[derive(Deserialize)]
pub struct AvatarForm {
    pub avatar: String,
}

pub async fn set_avatar(
    State(state): State<Arc<AppState>>,
    Form(form): Form<AvatarForm>,
) -> Result<Redirect, AppError> {
    settings::set_avatar(state.progress().storage(), &form.avatar)?;
    Ok(Redirect::to("/settings?notice=avatar-saved"))
}
