//! Login snapshot of the current user
//!
//! The credential table is a demo fixture, not an access-control layer.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::Result;
use crate::progress::ProgressStats;
use crate::storage::{keys, KeyValueStore};

/// Who is signed in, with XP/level/achievements frozen at login time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u32,
    pub username: String,
    pub email: String,
    pub is_admin: bool,
    pub xp: u32,
    pub level: u32,
    pub achievements: u32,
}

struct DemoAccount {
    id: u32,
    username: &'static str,
    password: &'static str,
    email: &'static str,
    is_admin: bool,
}

static DEMO_ACCOUNTS: [DemoAccount; 2] = [
    DemoAccount {
        id: 1,
        username: "admin",
        password: "admin123",
        email: "admin@learnhub.local",
        is_admin: true,
    },
    DemoAccount {
        id: 2,
        username: "student",
        password: "student123",
        email: "student@learnhub.local",
        is_admin: false,
    },
];

/// Checks the demo credentials and stores a snapshot of the user.
/// Returns `None` on a mismatch.
pub fn login(
    storage: &impl KeyValueStore,
    username: &str,
    password: &str,
    stats: &ProgressStats,
    achievements: u32,
) -> Result<Option<User>> {
    let username = username.trim();
    let Some(account) = DEMO_ACCOUNTS
        .iter()
        .find(|a| a.username.eq_ignore_ascii_case(username) && a.password == password)
    else {
        warn!(username, "Login rejected");
        return Ok(None);
    };

    let user = User {
        id: account.id,
        username: account.username.to_string(),
        email: account.email.to_string(),
        is_admin: account.is_admin,
        xp: stats.total_xp,
        level: stats.level,
        achievements,
    };

    storage.save(keys::CURRENT_USER, &serde_json::to_string(&user)?)?;
    info!(username = %user.username, admin = user.is_admin, "User logged in");
    Ok(Some(user))
}

pub fn current_user(storage: &impl KeyValueStore) -> Result<Option<User>> {
    match storage.load(keys::CURRENT_USER)? {
        Some(json) => Ok(serde_json::from_str(&json).ok()),
        None => Ok(None),
    }
}

pub fn logout(storage: &impl KeyValueStore) -> Result<()> {
    storage.remove(keys::CURRENT_USER)?;
    info!("User logged out");
    Ok(())
}
