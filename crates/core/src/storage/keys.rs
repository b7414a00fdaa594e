//! Well-known storage keys

pub const COURSES: &str = "courses";
pub const THEME: &str = "theme";
pub const AVATAR: &str = "avatar";
pub const CURRENT_USER: &str = "currentUser";
pub const ACHIEVEMENT_LEDGER: &str = "achievementLedger";
pub const BACKUP_PREFIX: &str = "backup_";

pub fn backup_key(timestamp_ms: i64) -> String {
    format!("{}{}", BACKUP_PREFIX, timestamp_ms)
}
