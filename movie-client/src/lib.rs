//! Клиентская библиотека каталога фильмов.
//!
//! Вся бизнес-логика живёт в удалённом REST API; здесь только:
//! - шлюз к API (`MovieApi`, реализация поверх `reqwest`: `HttpClient`);
//! - сессия (`SessionContext` поверх key/value-хранилища с ключами `user`/`token`);
//! - view-модели экранов (`components`), которые общаются с отображением
//!   через `Presenter` и `Navigator`.
#![warn(missing_docs)]

mod api;
pub mod components;
mod error;
mod http_client;
mod models;
pub mod session;
mod state;
mod ui;

pub use api::MovieApi;
pub use error::{MovieClientError, MovieClientResult};
pub use http_client::HttpClient;
pub use models::{
    AuthResponse, Director, FavoriteList, Genre, LoginRequest, Movie, MovieId,
    RegistrationRequest, User, UserPatch,
};
pub use session::{FileStorage, KeyValueStore, MemoryStorage, SessionContext};
pub use state::AppContext;
pub use ui::{MessageBox, Navigator, Presenter, Route};
