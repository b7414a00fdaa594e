//! Initial course catalog

use super::types::*;

fn exercise(id: u32, title: &str, description: &str, kind: ExerciseKind) -> Exercise {
    Exercise {
        id,
        title: title.to_string(),
        description: description.to_string(),
        kind,
        completed: false,
    }
}

fn lesson(id: u32, title: &str, content: &str, duration: u32, exercises: Vec<Exercise>) -> Lesson {
    Lesson {
        id,
        title: title.to_string(),
        content: content.to_string(),
        duration,
        completed: false,
        exercises,
    }
}

#[allow(clippy::too_many_arguments)]
fn course(
    id: CourseId,
    title: &str,
    description: &str,
    author: &str,
    difficulty: Difficulty,
    badge: &str,
    image: &str,
    lessons: u32,
    xp: u32,
) -> Course {
    Course {
        id,
        title: title.to_string(),
        description: description.to_string(),
        author: author.to_string(),
        difficulty,
        badge: badge.to_string(),
        image: image.to_string(),
        lessons,
        completed_lessons: 0,
        xp,
        progress: 0,
        full_lessons: None,
    }
}

fn with_lessons(mut course: Course, lessons: Vec<Lesson>) -> Course {
    course.lessons = lessons.len() as u32;
    course.full_lessons = Some(lessons);
    course
}

/// The catalog a fresh installation starts with
pub fn seed_catalog() -> Vec<Course> {
    vec![
        course(
            1,
            "Основы JavaScript",
            "Переменные, функции, массивы и объекты: всё, с чего начинается веб-разработка.",
            "Анна Смирнова",
            Difficulty::Beginner,
            "🟨",
            "/static/img/courses/javascript.svg",
            12,
            300,
        ),
        with_lessons(
            course(
                2,
                "React для начинающих",
                "Компоненты, состояние и хуки на примере небольшого приложения.",
                "Дмитрий Орлов",
                Difficulty::Intermediate,
                "⚛️",
                "/static/img/courses/react.svg",
                0,
                400,
            ),
            vec![
                lesson(
                    1,
                    "Что такое компонент",
                    "Компонент это функция, которая возвращает разметку.",
                    15,
                    vec![
                        exercise(1, "Первый компонент", "Напишите компонент Greeting.", ExerciseKind::Practice),
                        exercise(2, "Вопрос", "Чем компонент отличается от шаблона?", ExerciseKind::Text),
                    ],
                ),
                lesson(
                    2,
                    "Props и композиция",
                    "Данные передаются сверху вниз через props.",
                    20,
                    vec![exercise(1, "Карточка курса", "Соберите CourseCard из трёх компонентов.", ExerciseKind::Practice)],
                ),
                lesson(
                    3,
                    "Состояние и useState",
                    "Локальное состояние компонента и повторный рендер.",
                    25,
                    vec![
                        exercise(1, "Счётчик", "Реализуйте счётчик с кнопками + и -.", ExerciseKind::Practice),
                        exercise(2, "Рефлексия", "Где в вашем проекте нужно состояние?", ExerciseKind::Reflection),
                    ],
                ),
                lesson(
                    4,
                    "Эффекты",
                    "useEffect, зависимости и очистка.",
                    30,
                    Vec::new(),
                ),
            ],
        ),
        course(
            3,
            "Node.js и Express",
            "Серверная часть на JavaScript: маршруты, middleware и работа с файлами.",
            "Игорь Ковалёв",
            Difficulty::Intermediate,
            "🟩",
            "/static/img/courses/node.svg",
            10,
            350,
        ),
        with_lessons(
            course(
                4,
                "TypeScript на практике",
                "Типы, дженерики и строгий режим в реальном коде.",
                "Мария Лебедева",
                Difficulty::Advanced,
                "🔷",
                "/static/img/courses/typescript.svg",
                0,
                450,
            ),
            vec![
                lesson(
                    1,
                    "Базовые типы",
                    "string, number, boolean, массивы и кортежи.",
                    20,
                    vec![exercise(1, "Типизация функции", "Добавьте типы к функции sum.", ExerciseKind::Practice)],
                ),
                lesson(
                    2,
                    "Интерфейсы и типы",
                    "interface против type и когда что выбирать.",
                    25,
                    vec![exercise(1, "Сравнение", "Опишите разницу своими словами.", ExerciseKind::Reflection)],
                ),
                lesson(
                    3,
                    "Дженерики",
                    "Обобщённые функции и ограничения extends.",
                    35,
                    vec![
                        exercise(1, "Generic-стек", "Реализуйте Stack<T>.", ExerciseKind::Practice),
                        exercise(2, "Ограничения", "Зачем нужен extends в дженериках?", ExerciseKind::Text),
                    ],
                ),
            ],
        ),
        course(
            5,
            "Алгоритмы и структуры данных",
            "Сложность, сортировки, графы и динамическое программирование.",
            "Сергей Волков",
            Difficulty::Advanced,
            "🧮",
            "/static/img/courses/algorithms.svg",
            20,
            600,
        ),
        course(
            6,
            "Архитектура веб-приложений",
            "Слои, модули, кэширование и масштабирование.",
            "Елена Морозова",
            Difficulty::Expert,
            "🏛️",
            "/static/img/courses/architecture.svg",
            15,
            800,
        ),
    ]
}
