//! View-модели экранов и модальных форм.

/// Форма входа.
pub mod login_form;
/// Список фильмов.
pub mod movie_list;
/// Профиль пользователя.
pub mod profile_view;
/// Форма регистрации.
pub mod registration_form;
/// Стартовый экран.
pub mod welcome_page;

fn favorite_added(title: &str) -> String {
    format!("{title} added to favorites.")
}

fn favorite_add_failed(title: &str) -> String {
    format!("Could not add {title} to favorites.")
}

fn favorite_removed(title: &str) -> String {
    format!("{title} removed from favorites.")
}

fn favorite_remove_failed(title: &str) -> String {
    format!("Could not remove {title} from favorites.")
}
