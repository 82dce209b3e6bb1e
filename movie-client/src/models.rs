use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
/// Идентификатор фильма.
///
/// API отдаёт идентификаторы то строкой, то числом, то в виде
/// `{"$oid": "..."}`, поэтому внутри всегда хранится строка и сравнение
/// идёт по строковому представлению.
pub struct MovieId(String);

impl MovieId {
    /// Создаёт идентификатор из строки.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Строковое представление идентификатора.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MovieId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for MovieId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl<'de> Deserialize<'de> for MovieId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(i64),
            ObjectId {
                #[serde(rename = "$oid")]
                oid: String,
            },
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(value) => Self(value),
            RawId::Number(value) => Self(value.to_string()),
            RawId::ObjectId { oid } => Self(oid),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
/// Жанр фильма.
pub struct Genre {
    /// Название жанра.
    #[serde(default, alias = "Name")]
    pub name: String,
    /// Описание жанра.
    #[serde(default, alias = "Description")]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
/// Режиссёр фильма.
pub struct Director {
    /// Имя режиссёра.
    #[serde(default, alias = "Name")]
    pub name: String,
    /// Биография.
    #[serde(default, alias = "Bio")]
    pub bio: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Публичная модель фильма. Клиент её только читает.
pub struct Movie {
    /// Идентификатор фильма.
    #[serde(rename = "_id")]
    pub id: MovieId,
    /// Название.
    #[serde(default, alias = "Title")]
    pub title: String,
    /// Описание.
    #[serde(default, alias = "Description")]
    pub description: String,
    /// Жанр.
    #[serde(default, alias = "Genre")]
    pub genre: Genre,
    /// Режиссёр.
    #[serde(default, alias = "Director")]
    pub director: Director,
    /// Путь к постеру.
    #[serde(
        default,
        rename = "imagePath",
        alias = "ImagePath",
        skip_serializing_if = "Option::is_none"
    )]
    pub image_path: Option<String>,
    /// Признак «избранного» фильма в каталоге.
    #[serde(default, alias = "Featured")]
    pub featured: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Публичная модель пользователя.
///
/// Пароль сюда не попадает: он только отправляется в API, но никогда не
/// читается и не сохраняется в сессии.
pub struct User {
    /// Идентификатор пользователя в API.
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Логин.
    #[serde(rename = "Username")]
    pub username: String,
    /// Email.
    #[serde(rename = "Email", default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Дата рождения в том виде, в каком её вернул API.
    #[serde(rename = "Birthday", default, skip_serializing_if = "Option::is_none")]
    pub birthday: Option<String>,
    /// Идентификаторы избранных фильмов.
    #[serde(rename = "FavoriteMovies", default)]
    pub favorite_movies: Vec<MovieId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Ответ после успешного входа.
pub struct AuthResponse {
    /// Данные пользователя.
    pub user: User,
    /// Bearer-токен.
    pub token: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
/// Список идентификаторов избранных фильмов пользователя.
pub struct FavoriteList {
    /// Идентификаторы в порядке, который хранит API.
    #[serde(rename = "FavoriteMovies", default)]
    pub movie_ids: Vec<MovieId>,
}

impl FavoriteList {
    /// Проверяет, входит ли фильм в список (сравнение по строке).
    pub fn contains(&self, id: &MovieId) -> bool {
        self.movie_ids.iter().any(|fav| fav.as_str() == id.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
/// Данные формы регистрации.
pub struct RegistrationRequest {
    /// Логин.
    #[serde(rename = "Username")]
    pub username: String,
    /// Пароль.
    #[serde(rename = "Password")]
    pub password: String,
    /// Email.
    #[serde(rename = "Email")]
    pub email: String,
    /// Дата рождения.
    #[serde(rename = "Birthday", skip_serializing_if = "String::is_empty")]
    pub birthday: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
/// Данные формы входа.
pub struct LoginRequest {
    /// Логин.
    #[serde(rename = "Username")]
    pub username: String,
    /// Пароль.
    #[serde(rename = "Password")]
    pub password: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
/// Частичное обновление профиля: отсутствующие поля не отправляются.
pub struct UserPatch {
    /// Новый логин.
    #[serde(rename = "Username", skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Новый пароль.
    #[serde(rename = "Password", skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Новый email.
    #[serde(rename = "Email", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Новая дата рождения.
    #[serde(rename = "Birthday", skip_serializing_if = "Option::is_none")]
    pub birthday: Option<String>,
}
