//! Швы между view-моделями и слоем отображения.
//!
//! View не создаёт диалоги и не управляет маршрутизацией сама: она просит об
//! этом `Presenter` и `Navigator`, которые ей передали снаружи.

use std::fmt;
use std::str::FromStr;

use crate::models::Movie;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Клиентский маршрут.
pub enum Route {
    /// Стартовый экран (маршрут по умолчанию).
    #[default]
    Welcome,
    /// Список фильмов.
    Movies,
    /// Профиль пользователя.
    Profile,
}

impl Route {
    /// Путь маршрута без ведущего слэша.
    pub fn path(self) -> &'static str {
        match self {
            Self::Welcome => "welcome",
            Self::Movies => "movies",
            Self::Profile => "profile",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for Route {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().trim_matches('/') {
            "" | "welcome" => Ok(Self::Welcome),
            "movies" => Ok(Self::Movies),
            "profile" => Ok(Self::Profile),
            other => Err(format!("unknown route: {other}")),
        }
    }
}

/// Переход между маршрутами.
pub trait Navigator: Send + Sync {
    /// Просит перейти на маршрут.
    fn navigate(&self, route: Route);
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Модальный диалог с заголовком и текстом. Поведения, кроме показа, нет.
pub struct MessageBox {
    /// Заголовок.
    pub title: String,
    /// Текст.
    pub content: String,
}

impl MessageBox {
    /// Создаёт диалог.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }

    /// Диалог с описанием жанра фильма.
    pub fn genre(movie: &Movie) -> Self {
        Self::new(movie.genre.name.to_uppercase(), movie.genre.description.clone())
    }

    /// Диалог с биографией режиссёра.
    pub fn director(movie: &Movie) -> Self {
        Self::new(movie.director.name.to_uppercase(), movie.director.bio.clone())
    }

    /// Диалог с описанием фильма.
    pub fn detail(movie: &Movie) -> Self {
        Self::new(movie.title.to_uppercase(), movie.description.clone())
    }
}

/// Слой отображения: диалоги, всплывающие уведомления и блокирующие окна.
pub trait Presenter: Send + Sync {
    /// Показывает модальный диалог.
    fn show_dialog(&self, dialog: MessageBox);
    /// Показывает короткое уведомление (snackbar).
    fn notify(&self, message: &str);
    /// Блокирующее сообщение.
    fn alert(&self, message: &str);
    /// Блокирующий вопрос «да/нет».
    fn confirm(&self, question: &str) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_movie() -> Movie {
        serde_json::from_value(serde_json::json!({
            "_id": "m1",
            "title": "Heat",
            "description": "A group of high-end professional thieves.",
            "genre": {"name": "Crime", "description": "Crime films"},
            "director": {"name": "Michael Mann", "bio": "American director"}
        }))
        .expect("movie must parse")
    }

    #[test]
    fn route_parses_paths_and_defaults_to_welcome() {
        assert_eq!("".parse::<Route>(), Ok(Route::Welcome));
        assert_eq!("/movies".parse::<Route>(), Ok(Route::Movies));
        assert_eq!("profile".parse::<Route>(), Ok(Route::Profile));
        assert!("admin".parse::<Route>().is_err());
    }

    #[test]
    fn route_display_round_trips_path() {
        assert_eq!(Route::Profile.to_string(), "profile");
        assert_eq!(Route::default(), Route::Welcome);
    }

    #[test]
    fn movie_dialogs_upper_case_titles() {
        let movie = sample_movie();

        let genre = MessageBox::genre(&movie);
        assert_eq!(genre.title, "CRIME");
        assert_eq!(genre.content, "Crime films");

        let director = MessageBox::director(&movie);
        assert_eq!(director.title, "MICHAEL MANN");
        assert_eq!(director.content, "American director");

        let detail = MessageBox::detail(&movie);
        assert_eq!(detail.title, "HEAT");
        assert_eq!(detail.content, "A group of high-end professional thieves.");
    }
}
