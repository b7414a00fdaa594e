use axum::{
    routing::{get, post},
    Router,
};
use clap::Parser;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::task::JoinHandle;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing_subscriber::EnvFilter;

use learnhub_core::admin::{OperationHandle, SystemOperation};
use learnhub_core::leaderboard::{default_rivals, Rival};
use learnhub_core::support::ReplyDelay;
use learnhub_core::{ChatSession, Database, ProgressStore};

mod config;
mod error;
mod routes;

use config::Config;

pub struct AppState {
    pub progress: Mutex<ProgressStore<Database>>,
    pub chat: Mutex<ChatSession>,
    pub chat_reply: Mutex<Option<JoinHandle<()>>>,
    pub operations: Mutex<HashMap<SystemOperation, OperationHandle>>,
    pub reply_delay: ReplyDelay,
    pub rivals: Vec<Rival>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

impl AppState {
    pub fn new(progress: ProgressStore<Database>, reply_delay: ReplyDelay) -> Self {
        Self {
            progress: Mutex::new(progress),
            chat: Mutex::new(ChatSession::new(None)),
            chat_reply: Mutex::new(None),
            operations: Mutex::new(HashMap::new()),
            reply_delay,
            rivals: default_rivals(),
        }
    }

    pub fn progress(&self) -> MutexGuard<'_, ProgressStore<Database>> {
        lock(&self.progress)
    }

    pub fn chat(&self) -> MutexGuard<'_, ChatSession> {
        lock(&self.chat)
    }

    pub fn chat_reply(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        lock(&self.chat_reply)
    }

    pub fn operations(&self) -> MutexGuard<'_, HashMap<SystemOperation, OperationHandle>> {
        lock(&self.operations)
    }
}

pub fn app(state: Arc<AppState>, static_dir: &Path) -> Router {
    Router::new()
        .route("/", get(routes::index))
        .route("/health", get(routes::health))
        .route("/login", post(routes::login))
        .route("/logout", post(routes::logout))
        .route("/api/stats", get(routes::stats_api))
        .route("/courses", get(routes::courses::catalog))
        .route("/courses/:id", get(routes::courses::course_page))
        .route("/courses/:id/advance", post(routes::courses::advance))
        .route(
            "/courses/:id/lessons/:lesson/complete",
            post(routes::courses::complete_lesson),
        )
        .route(
            "/courses/:id/lessons/:lesson/exercises/:exercise/complete",
            post(routes::courses::complete_exercise),
        )
        .route("/api/courses/:id/progress", post(routes::courses::update_progress))
        .route("/achievements", get(routes::profile::achievements))
        .route("/leaderboard", get(routes::profile::leaderboard))
        .route("/settings", get(routes::profile::settings))
        .route("/settings/theme", post(routes::profile::set_theme))
        .route("/settings/avatar", post(routes::profile::set_avatar))
        .route("/admin", get(routes::admin::panel))
        .route("/admin/courses", post(routes::admin::create_course))
        .route("/admin/courses/:id/edit", post(routes::admin::edit_course))
        .route("/admin/courses/:id/delete", post(routes::admin::delete_course))
        .route("/admin/reset", post(routes::admin::reset_progress))
        .route("/admin/export", get(routes::admin::export))
        .route("/admin/import", post(routes::admin::import))
        .route("/admin/backup", post(routes::admin::backup))
        .route("/admin/backups/:key/restore", post(routes::admin::restore_backup))
        .route(
            "/admin/ops/:op",
            get(routes::admin::operation_status).post(routes::admin::start_operation),
        )
        .route("/admin/ops/:op/cancel", post(routes::admin::cancel_operation))
        .route("/api/support/open", post(routes::support::open))
        .route("/api/support/message", post(routes::support::message))
        .route("/api/support/transcript", get(routes::support::transcript))
        .route("/api/support/close", post(routes::support::close))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,learnhub_web=debug,learnhub_core=debug")),
        )
        .init();

    let db = Database::open(&config.db)?;
    let progress = ProgressStore::load(db)?;
    tracing::info!(
        "Loaded {} courses from {}",
        progress.courses().len(),
        config.db.display()
    );

    let reply_delay = ReplyDelay::new(config.min_reply_delay_ms, config.max_reply_delay_ms);
    let state = Arc::new(AppState::new(progress, reply_delay));
    let app = app(state, &config.static_dir);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!("Server running at http://{}", config.addr);

    axum::serve(listener, app).await?;
    Ok(())
}
