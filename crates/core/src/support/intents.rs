//! Support intents and their trigger keywords

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Intent {
    Greeting,
    Technical,
    Loading,
    Media,
    Performance,
    Browser,
    Mobile,
    Login,
    Courses,
    Progress,
    Achievements,
    Motivation,
    Admin,
    Default,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Greeting => "greeting",
            Intent::Technical => "technical",
            Intent::Loading => "loading",
            Intent::Media => "media",
            Intent::Performance => "performance",
            Intent::Browser => "browser",
            Intent::Mobile => "mobile",
            Intent::Login => "login",
            Intent::Courses => "courses",
            Intent::Progress => "progress",
            Intent::Achievements => "achievements",
            Intent::Motivation => "motivation",
            Intent::Admin => "admin",
            Intent::Default => "default",
        }
    }
}

/// Matching rules in priority order. The first rule with a keyword found
/// anywhere in the lower-cased message wins; `Default` has no rule.
///
/// The generic technical rule sits before the specific technical ones, so
/// its keywords are kept to explicit "technical problem" wording.
pub static RULES: &[(Intent, &[&str])] = &[
    (
        Intent::Greeting,
        &["привет", "здравствуй", "добрый день", "добрый вечер", "доброе утро", "hello"],
    ),
    (
        Intent::Technical,
        &["техническ", "техподдерж", "technical"],
    ),
    (
        Intent::Loading,
        &["загруз", "загруж", "не грузится", "не открывается", "loading"],
    ),
    (
        Intent::Media,
        &["видео", "звук", "аудио", "плеер", "video", "audio", "sound"],
    ),
    (
        Intent::Performance,
        &["медленн", "тормоз", "зависа", "лагает", "slow", "freez"],
    ),
    (
        Intent::Browser,
        &["браузер", "chrome", "firefox", "safari", "ошибк", "browser", "error"],
    ),
    (
        Intent::Mobile,
        &["телефон", "мобильн", "смартфон", "планшет", "android", "iphone", "mobile", "phone"],
    ),
    (
        Intent::Login,
        &["войти", "вход", "логин", "парол", "авториз", "login", "password", "sign in"],
    ),
    (
        Intent::Courses,
        &["курс", "урок", "занят", "course", "lesson"],
    ),
    (
        Intent::Progress,
        &["прогресс", "опыт", "уровен", "уровн", "xp", "progress", "level"],
    ),
    (
        Intent::Achievements,
        &["достижен", "наград", "бейдж", "значок", "achievement", "badge"],
    ),
    (
        Intent::Motivation,
        &["мотивац", "скучно", "устал", "лень", "не хочу", "motivat"],
    ),
    (
        Intent::Admin,
        &["админ", "admin"],
    ),
];
