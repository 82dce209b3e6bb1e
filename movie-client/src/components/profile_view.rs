use chrono::{DateTime, NaiveDate};
use tracing::{error, info, warn};
use validator::{Validate, ValidationError};

use crate::components::{favorite_remove_failed, favorite_removed};
use crate::models::{FavoriteList, Movie, User, UserPatch};
use crate::state::AppContext;
use crate::ui::{MessageBox, Route};

const DELETE_QUESTION: &str =
    "Are you sure you want to delete your profile? This action is irreversible.";
const DELETED_MESSAGE: &str = "Your profile has been deleted.";

/// Разбирает дату рождения в форматах `YYYY-MM-DD` и RFC 3339.
pub fn parse_birthday(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(raw) {
        return Some(datetime.date_naive());
    }
    // "1990-05-01T00:00:00.000" без зоны
    raw.get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
}

fn validate_username(value: &str) -> Result<(), ValidationError> {
    let len = value.trim().chars().count();
    if (1..=64).contains(&len) {
        return Ok(());
    }
    Err(ValidationError::new("username").with_message("must be 1 to 64 characters".into()))
}

fn validate_birthday(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() || parse_birthday(value).is_some() {
        return Ok(());
    }
    Err(ValidationError::new("birthday").with_message("must be a date (YYYY-MM-DD)".into()))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
/// Поля формы редактирования профиля.
pub struct ProfileForm {
    /// Логин.
    #[validate(custom(function = "validate_username"))]
    pub username: String,
    /// Новый пароль; пустой не меняется.
    pub password: String,
    /// Email.
    #[validate(email)]
    pub email: String,
    /// Дата рождения, `YYYY-MM-DD` или пусто.
    #[validate(custom(function = "validate_birthday"))]
    pub birthday: String,
}

impl ProfileForm {
    fn from_user(user: &User) -> Self {
        let birthday = user
            .birthday
            .as_deref()
            .map(|raw| match parse_birthday(raw) {
                Some(date) => date.format("%Y-%m-%d").to_string(),
                None => raw.to_string(),
            })
            .unwrap_or_default();

        Self {
            username: user.username.clone(),
            password: String::new(),
            email: user.email.clone().unwrap_or_default(),
            birthday,
        }
    }

    /// Все поля формы в виде патча. Пустой пароль не отправляется.
    pub fn to_patch(&self) -> UserPatch {
        let password = self.password.trim();
        let birthday = self.birthday.trim();
        UserPatch {
            username: Some(self.username.trim().to_string()),
            password: (!password.is_empty()).then(|| password.to_string()),
            email: Some(self.email.trim().to_string()),
            birthday: (!birthday.is_empty()).then(|| birthday.to_string()),
        }
    }
}

fn filter_favorites(movies: Vec<Movie>, favorites: &FavoriteList) -> Vec<Movie> {
    movies
        .into_iter()
        .filter(|movie| favorites.contains(&movie.id))
        .collect()
}

#[derive(Debug)]
/// Профиль: данные пользователя, редактирование, удаление, избранное.
pub struct ProfileView {
    ctx: AppContext,
    user: Option<User>,
    form: ProfileForm,
    is_editing: bool,
    is_loading: bool,
    favorite_movies: Vec<Movie>,
}

impl ProfileView {
    /// Создаёт профиль в состоянии загрузки.
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            user: None,
            form: ProfileForm::default(),
            is_editing: false,
            is_loading: true,
            favorite_movies: Vec::new(),
        }
    }

    /// Последний полученный снимок пользователя.
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Форма профиля.
    pub fn form(&self) -> &ProfileForm {
        &self.form
    }

    /// Форма для правки. Доступна только в режиме редактирования.
    pub fn form_mut(&mut self) -> Option<&mut ProfileForm> {
        self.is_editing.then_some(&mut self.form)
    }

    /// Включён ли режим редактирования.
    pub fn is_editing(&self) -> bool {
        self.is_editing
    }

    /// Идёт ли загрузка.
    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Избранные фильмы с полными данными.
    pub fn favorite_movies(&self) -> &[Movie] {
        &self.favorite_movies
    }

    /// Ищет фильм среди избранных.
    pub fn find_favorite(&self, id: &str) -> Option<&Movie> {
        self.favorite_movies
            .iter()
            .find(|movie| movie.id.as_str() == id)
    }

    /// Загружает пользователя, затем избранное, затем каталог, строго
    /// последовательно.
    ///
    /// Ошибка на первых двух шагах оставляет профиль загруженным частично;
    /// `is_loading` сбрасывается только последним шагом.
    pub async fn load(&mut self) {
        let Some(username) = self.ctx.session.require_username("load profile") else {
            return;
        };

        let user = match self.ctx.api.get_user(&username).await {
            Ok(user) => user,
            Err(err) => {
                error!(error = %err, %username, "failed to load user");
                return;
            }
        };
        self.form = ProfileForm::from_user(&user);
        self.user = Some(user);

        let favorites = match self.ctx.api.get_favorites(&username).await {
            Ok(favorites) => favorites,
            Err(err) => {
                error!(error = %err, %username, "failed to load favorites");
                return;
            }
        };
        if favorites.movie_ids.is_empty() {
            self.favorite_movies.clear();
            self.is_loading = false;
            return;
        }

        match self.ctx.api.list_movies().await {
            Ok(movies) => self.favorite_movies = filter_favorites(movies, &favorites),
            Err(err) => error!(error = %err, "failed to load movies"),
        }
        self.is_loading = false;
    }

    /// Включает редактирование.
    pub fn enable_edit(&mut self) {
        self.is_editing = true;
    }

    /// Выключает редактирование и возвращает форму к последнему снимку.
    pub fn cancel_edit(&mut self) {
        self.is_editing = false;
        self.form = self
            .user
            .as_ref()
            .map(ProfileForm::from_user)
            .unwrap_or_default();
    }

    /// Проверяет форму и отправляет все поля в API.
    ///
    /// После успеха профиль не патчится локально: происходит повторный
    /// переход на `profile`, который перезагружает данные.
    pub async fn save_changes(&mut self) {
        let Some(username) = self.ctx.session.require_username("save profile") else {
            return;
        };

        if let Err(errors) = self.form.validate() {
            warn!(%errors, "profile form is invalid");
            self.ctx
                .presenter
                .notify("Please correct the form before saving.");
            return;
        }

        let patch = self.form.to_patch();
        match self.ctx.api.edit_user(&username, &patch).await {
            Ok(updated) => {
                // логин мог поменяться, следующий load() должен взять новый
                if let Err(err) = self.ctx.session.update_user(&updated) {
                    error!(error = %err, "failed to store updated user");
                }
                info!(username = %updated.username, "profile updated");
                self.is_editing = false;
                self.ctx.presenter.notify("Profile updated.");
                self.ctx.navigator.navigate(Route::Profile);
            }
            Err(err) => {
                warn!(error = %err, "profile update failed");
                self.ctx
                    .presenter
                    .notify(&format!("Could not update profile: {err}"));
            }
        }
    }

    /// Спрашивает подтверждение и удаляет профиль.
    pub async fn confirm_delete(&mut self) {
        if self.ctx.presenter.confirm(DELETE_QUESTION) {
            self.delete_profile().await;
        }
    }

    /// Удаляет профиль.
    ///
    /// Результат запроса не влияет на дальнейшее: сессия очищается, показывается
    /// сообщение и происходит переход на `welcome`.
    pub async fn delete_profile(&mut self) {
        let Some(username) = self.ctx.session.require_username("delete profile") else {
            return;
        };

        match self.ctx.api.delete_user(&username).await {
            Ok(()) => info!(%username, "profile deleted"),
            Err(err) => warn!(error = %err, %username, "delete request failed"),
        }

        if let Err(err) = self.ctx.session.clear() {
            error!(error = %err, "failed to clear session");
        }
        self.ctx.presenter.alert(DELETED_MESSAGE);
        self.ctx.navigator.navigate(Route::Welcome);
    }

    /// Убирает фильм из избранного после подтверждения от API.
    pub async fn remove_favorite(&mut self, movie: &Movie) {
        let Some(username) = self.ctx.session.require_username("remove favorite") else {
            return;
        };

        match self.ctx.api.remove_favorite(&username, &movie.id).await {
            Ok(_) => {
                self.favorite_movies
                    .retain(|fav| fav.id.as_str() != movie.id.as_str());
                self.ctx.presenter.notify(&favorite_removed(&movie.title));
            }
            Err(err) => {
                warn!(error = %err, movie_id = %movie.id, "remove favorite failed");
                self.ctx
                    .presenter
                    .notify(&favorite_remove_failed(&movie.title));
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

    /// Переход к списку фильмов.
    pub fn open_home(&self) {
        self.ctx.navigator.navigate(Route::Movies);
    }

    /// Выход: удаляется только токен.
    pub fn logout(&self) {
        if let Err(err) = self.ctx.session.clear_token() {
            error!(error = %err, "failed to clear token");
        }
        self.ctx.navigator.navigate(Route::Welcome);
    }
}
