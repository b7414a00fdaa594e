//! Achievement catalog and evaluation

use serde::Serialize;

use crate::progress::ProgressStats;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rarity::Common => "common",
            Rarity::Uncommon => "uncommon",
            Rarity::Rare => "rare",
            Rarity::Epic => "epic",
            Rarity::Legendary => "legendary",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Rarity::Common => "Обычное",
            Rarity::Uncommon => "Необычное",
            Rarity::Rare => "Редкое",
            Rarity::Epic => "Эпическое",
            Rarity::Legendary => "Легендарное",
        }
    }
}

pub struct AchievementDef {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub rarity: Rarity,
    pub points: u32,
    pub condition: fn(&ProgressStats) -> bool,
}

/// An achievement together with whether the current stats satisfy it
#[derive(Debug, Clone, Serialize)]
pub struct AchievementStatus {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub rarity: Rarity,
    pub points: u32,
    pub earned: bool,
}

static CATALOG: [AchievementDef; 8] = [
    AchievementDef {
        id: "first-lesson",
        title: "Первый шаг",
        description: "Пройдите первый урок",
        icon: "👣",
        rarity: Rarity::Common,
        points: 10,
        condition: |s| s.lessons_completed >= 1,
    },
    AchievementDef {
        id: "first-course",
        title: "Выпускник",
        description: "Завершите первый курс",
        icon: "🎓",
        rarity: Rarity::Uncommon,
        points: 50,
        condition: |s| s.completed_courses >= 1,
    },
    AchievementDef {
        id: "week-streak",
        title: "Неделя в строю",
        description: "Серия из 7 дней",
        icon: "🔥",
        rarity: Rarity::Uncommon,
        points: 30,
        condition: |s| s.streak_days >= 7,
    },
    AchievementDef {
        id: "xp-hunter",
        title: "Охотник за опытом",
        description: "Наберите 500 XP",
        icon: "⚡",
        rarity: Rarity::Rare,
        points: 100,
        condition: |s| s.total_xp >= 500,
    },
    AchievementDef {
        id: "level-five",
        title: "Пятый уровень",
        description: "Достигните 5 уровня",
        icon: "⭐",
        rarity: Rarity::Rare,
        points: 100,
        condition: |s| s.level >= 5,
    },
    AchievementDef {
        id: "scholar",
        title: "Эрудит",
        description: "Завершите 3 курса",
        icon: "📚",
        rarity: Rarity::Epic,
        points: 200,
        condition: |s| s.completed_courses >= 3,
    },
    AchievementDef {
        id: "month-streak",
        title: "Месяц без перерыва",
        description: "Серия из 30 дней",
        icon: "🗓️",
        rarity: Rarity::Epic,
        points: 150,
        condition: |s| s.streak_days >= 30,
    },
    AchievementDef {
        id: "grandmaster",
        title: "Грандмастер",
        description: "Завершите все курсы каталога",
        icon: "👑",
        rarity: Rarity::Legendary,
        points: 500,
        condition: |s| s.all_courses_completed(),
    },
];

pub fn catalog() -> &'static [AchievementDef] {
    &CATALOG
}

impl AchievementDef {
    pub fn is_earned(&self, stats: &ProgressStats) -> bool {
        (self.condition)(stats)
    }

    pub fn status(&self, stats: &ProgressStats) -> AchievementStatus {
        AchievementStatus {
            id: self.id,
            title: self.title,
            description: self.description,
            icon: self.icon,
            rarity: self.rarity,
            points: self.points,
            earned: self.is_earned(stats),
        }
    }
}

/// Every achievement, earned iff its condition holds for `stats` right now.
pub fn evaluate(stats: &ProgressStats) -> Vec<AchievementStatus> {
    CATALOG.iter().map(|def| def.status(stats)).collect()
}

pub fn earned_count(stats: &ProgressStats) -> u32 {
    CATALOG.iter().filter(|def| def.is_earned(stats)).count() as u32
}

pub fn earned_points(stats: &ProgressStats) -> u32 {
    CATALOG
        .iter()
        .filter(|def| def.is_earned(stats))
        .map(|def| def.points)
        .sum()
}
