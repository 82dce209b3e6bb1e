use async_trait::async_trait;

use crate::error::MovieClientResult;
use crate::models::{
    AuthResponse, FavoriteList, LoginRequest, Movie, MovieId, RegistrationRequest, User, UserPatch,
};

/// Шлюз к удалённому API каталога: один метод на один REST endpoint.
///
/// Каждый вызов делает ровно один запрос, без повторов, кэша и батчинга.
/// Сохранять результат (например, в сессию) обязан вызывающий код.
#[async_trait]
pub trait MovieApi: Send + Sync {
    /// `POST /users`: регистрация нового пользователя.
    async fn register(&self, request: &RegistrationRequest) -> MovieClientResult<User>;

    /// `POST /login`: вход, возвращает пользователя и токен.
    async fn login(&self, request: &LoginRequest) -> MovieClientResult<AuthResponse>;

    /// `GET /movies`: весь каталог.
    async fn list_movies(&self) -> MovieClientResult<Vec<Movie>>;

    /// `GET /users/{username}`.
    async fn get_user(&self, username: &str) -> MovieClientResult<User>;

    /// `PUT /users/{username}`: частичное обновление профиля.
    async fn edit_user(&self, username: &str, patch: &UserPatch) -> MovieClientResult<User>;

    /// `DELETE /users/{username}`.
    async fn delete_user(&self, username: &str) -> MovieClientResult<()>;

    /// `GET /users/{username}/movies`: идентификаторы избранного.
    async fn get_favorites(&self, username: &str) -> MovieClientResult<FavoriteList>;

    /// `POST /users/{username}/movies/{movie_id}`.
    async fn add_favorite(&self, username: &str, movie_id: &MovieId) -> MovieClientResult<User>;

    /// `DELETE /users/{username}/movies/{movie_id}`.
    async fn remove_favorite(&self, username: &str, movie_id: &MovieId)
    -> MovieClientResult<User>;
}
