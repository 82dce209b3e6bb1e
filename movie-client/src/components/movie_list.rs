use tracing::{error, info, warn};

use crate::components::{
    favorite_add_failed, favorite_added, favorite_remove_failed, favorite_removed,
};
use crate::models::{FavoriteList, Movie};
use crate::state::AppContext;
use crate::ui::{MessageBox, Route};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Стадия загрузки списка.
pub enum LoadState {
    /// `load()` ещё не вызывался (или в сессии нет пользователя).
    #[default]
    Initial,
    /// Запросы в полёте.
    Loading,
    /// Оба запроса завершились, успешно или нет.
    Ready,
}

#[derive(Debug)]
/// Список фильмов с отметками избранного.
pub struct MovieListView {
    ctx: AppContext,
    state: LoadState,
    movies: Vec<Movie>,
    favorites: FavoriteList,
}

impl MovieListView {
    /// Создаёт пустой список.
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            state: LoadState::Initial,
            movies: Vec::new(),
            favorites: FavoriteList::default(),
        }
    }

    /// Текущая стадия загрузки.
    pub fn state(&self) -> LoadState {
        self.state
    }

    /// Загруженные фильмы.
    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    /// Последний полученный список избранного.
    pub fn favorites(&self) -> &FavoriteList {
        &self.favorites
    }

    /// Ищет загруженный фильм по идентификатору.
    pub fn find_movie(&self, id: &str) -> Option<&Movie> {
        self.movies.iter().find(|movie| movie.id.as_str() == id)
    }

    /// Загружает каталог и избранное параллельно.
    ///
    /// Результаты применяются независимо: упавший запрос логируется и не
    /// мешает второму. Пока избранное не пришло, все фильмы считаются
    /// неизбранными.
    pub async fn load(&mut self) {
        let Some(username) = self.ctx.session.require_username("load movies") else {
            return;
        };

        self.state = LoadState::Loading;
        let (movies, favorites) = tokio::join!(
            self.ctx.api.list_movies(),
            self.ctx.api.get_favorites(&username)
        );

        match movies {
            Ok(movies) => {
                info!(count = movies.len(), "movies loaded");
                self.movies = movies;
            }
            Err(err) => error!(error = %err, "failed to load movies"),
        }
        match favorites {
            Ok(favorites) => self.favorites = favorites,
            Err(err) => error!(error = %err, %username, "failed to load favorites"),
        }
        self.state = LoadState::Ready;
    }

    /// Входит ли фильм в избранное.
    pub fn is_favorite(&self, movie: &Movie) -> bool {
        self.favorites.contains(&movie.id)
    }

    /// Добавляет фильм в избранное или убирает из него.
    ///
    /// Локальный список меняется только после успешного ответа API.
    pub async fn toggle_favorite(&mut self, movie: &Movie) {
        let Some(username) = self.ctx.session.require_username("toggle favorite") else {
            return;
        };

        if self.is_favorite(movie) {
            match self.ctx.api.remove_favorite(&username, &movie.id).await {
                Ok(_) => {
                    self.favorites
                        .movie_ids
                        .retain(|id| id.as_str() != movie.id.as_str());
                    self.ctx.presenter.notify(&favorite_removed(&movie.title));
                }
                Err(err) => {
                    warn!(error = %err, movie_id = %movie.id, "remove favorite failed");
                    self.ctx
                        .presenter
                        .notify(&favorite_remove_failed(&movie.title));
                }
            }
        } else {
            match self.ctx.api.add_favorite(&username, &movie.id).await {
                Ok(_) => {
                    self.favorites.movie_ids.push(movie.id.clone());
                    self.ctx.presenter.notify(&favorite_added(&movie.title));
                }
                Err(err) => {
                    warn!(error = %err, movie_id = %movie.id, "add favorite failed");
                    self.ctx.presenter.notify(&favorite_add_failed(&movie.title));
                }
            }
        }
    }

    /// Показывает описание жанра.
    pub fn show_genre(&self, movie: &Movie) {
        self.ctx.presenter.show_dialog(MessageBox::genre(movie));
    }

    /// Показывает биографию режиссёра.
    pub fn show_director(&self, movie: &Movie) {
        self.ctx.presenter.show_dialog(MessageBox::director(movie));
    }

    /// Показывает описание фильма.
    pub fn show_detail(&self, movie: &Movie) {
        self.ctx.presenter.show_dialog(MessageBox::detail(movie));
    }

    /// Переход в профиль.
    pub fn open_profile(&self) {
        self.ctx.navigator.navigate(Route::Profile);
    }

    /// Выход: удаляется только токен, снимок пользователя остаётся.
    pub fn logout(&self) {
        if let Err(err) = self.ctx.session.clear_token() {
            error!(error = %err, "failed to clear token");
        }
        self.ctx.navigator.navigate(Route::Welcome);
    }
}
