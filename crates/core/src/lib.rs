//! LearnHub Core Library
//!
//! Course progress, gamification statistics and the support bot behind the
//! LearnHub web app.

pub mod achievements;
pub mod admin;
pub mod catalog;
pub mod error;
pub mod interchange;
pub mod leaderboard;
pub mod progress;
pub mod session;
pub mod settings;
pub mod storage;
pub mod support;

pub use catalog::{Course, CourseId, Difficulty};
pub use error::{Error, Result};
pub use progress::{ProgressStats, ProgressStore};
pub use storage::{Database, KeyValueStore, MemoryStore};
pub use support::{resolve, BotResponse, ChatSession, Intent};
