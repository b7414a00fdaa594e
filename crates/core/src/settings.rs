//! Display settings: theme and avatar

use serde::Serialize;
use tracing::info;

use crate::error::{Error, Result};
use crate::storage::{keys, KeyValueStore};

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Theme {
    pub id: &'static str,
    pub name: &'static str,
    pub primary: &'static str,
    pub background: &'static str,
}

pub const DEFAULT_THEME: &str = "light";

pub static THEMES: [Theme; 5] = [
    Theme { id: "light", name: "Светлая", primary: "#4f46e5", background: "#ffffff" },
    Theme { id: "dark", name: "Тёмная", primary: "#818cf8", background: "#111827" },
    Theme { id: "ocean", name: "Океан", primary: "#0ea5e9", background: "#f0f9ff" },
    Theme { id: "forest", name: "Лес", primary: "#16a34a", background: "#f0fdf4" },
    Theme { id: "sunset", name: "Закат", primary: "#f97316", background: "#fff7ed" },
];

pub fn find_theme(id: &str) -> Option<&'static Theme> {
    THEMES.iter().find(|t| t.id == id)
}

fn load_string(storage: &impl KeyValueStore, key: &str) -> Result<Option<String>> {
    Ok(storage
        .load(key)?
        .and_then(|json| serde_json::from_str::<String>(&json).ok()))
}

/// The selected theme; unknown or missing ids fall back to the default.
pub fn theme(storage: &impl KeyValueStore) -> Result<&'static Theme> {
    let selected = load_string(storage, keys::THEME)?;
    Ok(selected
        .as_deref()
        .and_then(find_theme)
        .unwrap_or(&THEMES[0]))
}

pub fn set_theme(storage: &impl KeyValueStore, id: &str) -> Result<&'static Theme> {
    let theme = find_theme(id).ok_or_else(|| Error::UnknownTheme(id.to_string()))?;
    storage.save(keys::THEME, &serde_json::to_string(theme.id)?)?;
    info!(theme = theme.id, "Theme changed");
    Ok(theme)
}

pub fn avatar(storage: &impl KeyValueStore) -> Result<Option<String>> {
    load_string(storage, keys::AVATAR)
}

/// Stores an avatar URL or data URI. An empty value clears it.
pub fn set_avatar(storage: &impl KeyValueStore, source: &str) -> Result<()> {
    let source = source.trim();
    if source.is_empty() {
        storage.remove(keys::AVATAR)?;
    } else {
        storage.save(keys::AVATAR, &serde_json::to_string(source)?)?;
    }
    info!("Avatar updated");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_default_theme() {
        let storage = MemoryStore::new();
        assert_eq!(theme(&storage).unwrap().id, DEFAULT_THEME);
    }

    #[test]
    fn test_set_and_read_theme() {
        let storage = MemoryStore::new();
        set_theme(&storage, "ocean").unwrap();
        assert_eq!(theme(&storage).unwrap().id, "ocean");
        assert_eq!(storage.load(keys::THEME).unwrap().as_deref(), Some("\"ocean\""));
    }

    #[test]
    fn test_unknown_theme_rejected() {
        let storage = MemoryStore::new();
        assert!(matches!(set_theme(&storage, "neon"), Err(Error::UnknownTheme(_))));
        assert!(storage.load(keys::THEME).unwrap().is_none());
    }

    #[test]
    fn test_avatar_set_and_clear() {
        let storage = MemoryStore::new();
        set_avatar(&storage, "data:image/png;base64,AAAA").unwrap();
        assert_eq!(avatar(&storage).unwrap().as_deref(), Some("data:image/png;base64,AAAA"));

        set_avatar(&storage, "  ").unwrap();
        assert!(avatar(&storage).unwrap().is_none());
    }
}
