//! Message → canned response

use serde::Serialize;

use super::intents::{Intent, RULES};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BotResponse {
    pub text: String,
    pub intent: Intent,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub follow_up: Vec<String>,
}

/// First intent whose keywords occur in the message, or `Default`.
pub fn classify(message: &str) -> Intent {
    let lower = message.to_lowercase();
    RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(intent, _)| *intent)
        .unwrap_or(Intent::Default)
}

pub fn resolve(message: &str, user_name: Option<&str>) -> BotResponse {
    let user_name = user_name.map(str::trim).filter(|n| !n.is_empty());
    respond(classify(message), user_name)
}

fn follow_up(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn respond(intent: Intent, user_name: Option<&str>) -> BotResponse {
    let (text, follow_up) = match intent {
        Intent::Greeting => {
            let text = match user_name {
                Some(name) => format!(
                    "Привет, {}! 👋 Я бот поддержки LearnHub. Расскажите, что случилось, и я постараюсь помочь.",
                    name
                ),
                None => "Привет! 👋 Я бот поддержки LearnHub. Расскажите, что случилось, и я постараюсь помочь.".to_string(),
            };
            (
                text,
                follow_up(&["Проблемы со входом", "Как проходить курсы", "Как начисляется опыт"]),
            )
        }
        Intent::Technical => (
            "Жаль, что возникли технические проблемы. Уточните, пожалуйста, что именно не работает: загрузка страниц, видео, скорость работы или ошибки в браузере?".to_string(),
            follow_up(&["Страница не загружается", "Не воспроизводится видео", "Сайт работает медленно"]),
        ),
        Intent::Loading => (
            "Если страница не загружается: обновите её (Ctrl+F5), проверьте подключение к интернету и отключите блокировщики рекламы. Если не помогло, очистите кэш браузера.".to_string(),
            follow_up(&["Как очистить кэш", "Проблема осталась"]),
        ),
        Intent::Media => (
            "Проблемы с видео или звуком чаще всего решаются так: проверьте громкость на устройстве и во вкладке, обновите браузер и попробуйте снизить качество видео.".to_string(),
            Vec::new(),
        ),
        Intent::Performance => (
            "Если платформа работает медленно, закройте лишние вкладки, отключите тяжёлые расширения и проверьте скорость интернета. Мы также рекомендуем последнюю версию браузера.".to_string(),
            Vec::new(),
        ),
        Intent::Browser => (
            "Мы поддерживаем последние версии Chrome, Firefox, Safari и Edge. Попробуйте обновить браузер или открыть платформу в режиме инкогнито. Если ошибка повторяется, пришлите её текст.".to_string(),
            follow_up(&["Какие браузеры поддерживаются", "Ошибка повторяется"]),
        ),
        Intent::Mobile => (
            "Платформа работает в мобильном браузере. Если что-то отображается некорректно, поверните экран или включите полную версию сайта.".to_string(),
            Vec::new(),
        ),
        Intent::Login => (
            "Для входа используйте логин и пароль, выданные при регистрации. Проверьте раскладку клавиатуры и Caps Lock. Если пароль утерян, обратитесь к администратору.".to_string(),
            follow_up(&["Забыл пароль", "Связаться с администратором"]),
        ),
        Intent::Courses => (
            "Все курсы доступны в разделе «Курсы». Откройте курс, проходите уроки по порядку и выполняйте упражнения: урок засчитывается, когда выполнены все задания.".to_string(),
            follow_up(&["Как начисляется опыт", "Где мои достижения"]),
        ),
        Intent::Progress => (
            "Опыт (XP) начисляется пропорционально прогрессу курса. Каждые 200 XP повышают уровень на единицу. Прогресс по всем курсам виден на главной странице.".to_string(),
            Vec::new(),
        ),
        Intent::Achievements => (
            "Достижения выдаются автоматически, когда вы выполняете условия: проходите уроки, завершаете курсы, набираете опыт. Список всех наград есть в разделе «Достижения».".to_string(),
            Vec::new(),
        ),
        Intent::Motivation => (
            "Понимаю, бывает непросто! 💪 Попробуйте ставить маленькие цели: один урок в день уже даёт результат. Загляните в таблицу лидеров, там видно, как далеко вы продвинулись.".to_string(),
            follow_up(&["Показать таблицу лидеров", "Мои достижения"]),
        ),
        Intent::Admin => (
            "Панель администратора доступна пользователям с правами администратора. Там можно управлять курсами, делать резервные копии и выполнять системные операции.".to_string(),
            Vec::new(),
        ),
        Intent::Default => (
            "Извините, я не совсем понял вопрос. Попробуйте переформулировать или выберите одну из популярных тем.".to_string(),
            follow_up(&["Технические проблемы", "Вопросы по курсам", "Проблемы со входом"]),
        ),
    };

    BotResponse {
        text,
        intent,
        follow_up,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greeting_uses_name() {
        let response = resolve("Привет", Some("Ann"));
        assert_eq!(response.intent, Intent::Greeting);
        assert!(response.text.contains("Ann"));
        assert_eq!(response, resolve("Привет", Some("Ann")));
    }

    #[test]
    fn test_greeting_without_name() {
        let response = resolve("ПРИВЕТ!", None);
        assert_eq!(response.intent, Intent::Greeting);
        assert!(response.text.starts_with("Привет!"));

        // blank names count as no name
        assert_eq!(resolve("привет", Some("  ")).text, response.text);
    }

    #[test]
    fn test_empty_message_falls_back_to_default() {
        assert_eq!(resolve("", None).intent, Intent::Default);
        assert_eq!(resolve("   \n\t", Some("Ann")).intent, Intent::Default);
        assert!(!resolve("", None).follow_up.is_empty());
    }

    #[test]
    fn test_login_wins_over_courses() {
        // Login is checked before Courses.
        assert_eq!(classify("Не могу войти в курс"), Intent::Login);
    }

    #[test]
    fn test_greeting_wins_over_everything() {
        assert_eq!(classify("Привет, забыл пароль от курса"), Intent::Greeting);
    }

    #[test]
    fn test_generic_technical_wording_shadows_specific_buckets() {
        assert_eq!(classify("Техническая проблема: видео не грузится"), Intent::Technical);
    }

    #[test]
    fn test_specific_technical_buckets_are_reachable() {
        assert_eq!(classify("Страница медленно загружается"), Intent::Loading);
        assert_eq!(classify("Нет звука в уроке"), Intent::Media);
        assert_eq!(classify("Всё тормозит"), Intent::Performance);
        assert_eq!(classify("В Firefox выскакивает ошибка"), Intent::Browser);
        assert_eq!(classify("На телефоне всё съехало"), Intent::Mobile);
    }

    #[test]
    fn test_remaining_intents() {
        assert_eq!(classify("Сколько XP за курс?"), Intent::Courses);
        assert_eq!(classify("Как поднять уровень?"), Intent::Progress);
        assert_eq!(classify("Где мои награды"), Intent::Achievements);
        assert_eq!(classify("Мне скучно"), Intent::Motivation);
        assert_eq!(classify("Как стать админом"), Intent::Admin);
        assert_eq!(classify("Какая сегодня погода?"), Intent::Default);
    }

    #[test]
    fn test_match_can_occur_mid_word() {
        // "expert" contains "xp"
        assert_eq!(classify("expert"), Intent::Progress);
    }
}
