mod logging;
mod settings;
mod terminal;

use std::process;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use movie_client::components::movie_list::MovieListView;
use movie_client::components::profile_view::ProfileView;
use movie_client::components::welcome_page::WelcomePage;
use movie_client::{
    AppContext, FileStorage, HttpClient, LoginRequest, Movie, RegistrationRequest, Route,
    SessionContext,
};
use tracing::debug;

use crate::settings::Settings;
use crate::terminal::{RouteRecorder, TerminalPresenter};

const LOGIN_HINT: &str =
    "Run `movie-cli login --username ... --password ...` or `movie-cli register ...`";

#[derive(Debug, Parser)]
#[command(name = "movie-cli", version, about = "CLI клиент каталога фильмов")]
struct Cli {
    /// Адрес API (по умолчанию MOVIE_API_URL).
    #[arg(long, global = true)]
    server: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Регистрация пользователя.
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        email: String,
        /// Дата рождения, YYYY-MM-DD.
        #[arg(long, default_value = "")]
        birthday: String,
    },
    /// Вход пользователя.
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Выход (удаляет токен).
    Logout,
    /// Стартовый экран.
    Welcome,
    /// Список фильмов с отметками избранного.
    Movies,
    /// Добавить фильм в избранное или убрать из него.
    Favorite { movie_id: String },
    /// Описание жанра фильма.
    Genre { movie_id: String },
    /// Биография режиссёра фильма.
    Director { movie_id: String },
    /// Описание фильма.
    Details { movie_id: String },
    /// Профиль пользователя.
    Profile {
        #[command(subcommand)]
        action: Option<ProfileAction>,
    },
}

#[derive(Debug, Subcommand)]
enum ProfileAction {
    /// Редактирование профиля. Неуказанные поля остаются как есть.
    Edit {
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        birthday: Option<String>,
        #[arg(long)]
        password: Option<String>,
    },
    /// Удаление профиля.
    Delete {
        /// Не спрашивать подтверждение.
        #[arg(long)]
        yes: bool,
    },
    /// Убрать фильм из избранного.
    Unfavorite { movie_id: String },
}

impl Command {
    /// Экран, на котором выполняется команда; рендерится, если view
    /// никуда не перешла сама.
    fn screen(&self) -> Option<Route> {
        match self {
            Self::Welcome => Some(Route::Welcome),
            Self::Movies | Self::Favorite { .. } => Some(Route::Movies),
            Self::Profile { action } => match action {
                None | Some(ProfileAction::Unfavorite { .. }) => Some(Route::Profile),
                Some(_) => None,
            },
            _ => None,
        }
    }

    fn assume_yes(&self) -> bool {
        matches!(
            self,
            Self::Profile {
                action: Some(ProfileAction::Delete { yes: true })
            }
        )
    }
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Error: {err:#}");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let settings = Settings::from_env()?;
    logging::init_logging(&settings.log_level)?;

    let navigator = Arc::new(RouteRecorder::default());
    let ctx = build_context(&settings, cli.server, cli.command.assume_yes(), navigator.clone())?;

    let screen = cli.command.screen();
    execute(cli.command, &ctx).await?;

    if let Some(route) = navigator.take().or(screen) {
        debug!(%route, "rendering route");
        render(route, &ctx).await;
    }
    Ok(())
}

fn build_context(
    settings: &Settings,
    server: Option<String>,
    assume_yes: bool,
    navigator: Arc<RouteRecorder>,
) -> Result<AppContext> {
    let server = normalize_server(server.unwrap_or_else(|| settings.api_url.clone()));
    let session = SessionContext::new(Arc::new(FileStorage::new(&settings.session_file)));

    let mut api = HttpClient::new(&server, Duration::from_secs(settings.api_timeout_secs))
        .with_context(|| format!("invalid API address `{server}`"))?;
    if settings.send_token
        && let Some(token) = session.token()
    {
        api = api.with_bearer_token(token);
    }

    Ok(AppContext::new(
        Arc::new(api),
        session,
        Arc::new(TerminalPresenter::new(assume_yes)),
        navigator,
    ))
}

async fn execute(command: Command, ctx: &AppContext) -> Result<()> {
    match command {
        Command::Register {
            username,
            password,
            email,
            birthday,
        } => {
            let mut form = WelcomePage::new(ctx.clone()).open_registration_dialog();
            form.user_data = RegistrationRequest {
                username,
                password,
                email,
                birthday,
            };
            form.submit().await;
        }
        Command::Login { username, password } => {
            let mut form = WelcomePage::new(ctx.clone()).open_login_dialog();
            form.user_data = LoginRequest { username, password };
            form.submit().await;
        }
        Command::Logout => MovieListView::new(ctx.clone()).logout(),
        Command::Welcome | Command::Movies => {}
        Command::Favorite { movie_id } => {
            let mut view = loaded_movie_list(ctx).await?;
            let movie = require_movie(view.find_movie(&movie_id), &movie_id)?;
            view.toggle_favorite(&movie).await;
        }
        Command::Genre { movie_id } => {
            let view = loaded_movie_list(ctx).await?;
            view.show_genre(&require_movie(view.find_movie(&movie_id), &movie_id)?);
        }
        Command::Director { movie_id } => {
            let view = loaded_movie_list(ctx).await?;
            view.show_director(&require_movie(view.find_movie(&movie_id), &movie_id)?);
        }
        Command::Details { movie_id } => {
            let view = loaded_movie_list(ctx).await?;
            view.show_detail(&require_movie(view.find_movie(&movie_id), &movie_id)?);
        }
        Command::Profile { action: None } => {}
        Command::Profile {
            action:
                Some(ProfileAction::Edit {
                    username,
                    email,
                    birthday,
                    password,
                }),
        } => {
            let mut view = loaded_profile(ctx).await?;
            view.enable_edit();
            if let Some(form) = view.form_mut() {
                if let Some(username) = username {
                    form.username = username;
                }
                if let Some(email) = email {
                    form.email = email;
                }
                if let Some(birthday) = birthday {
                    form.birthday = birthday;
                }
                if let Some(password) = password {
                    form.password = password;
                }
            }
            view.save_changes().await;
        }
        Command::Profile {
            action: Some(ProfileAction::Delete { .. }),
        } => {
            ensure_logged_in(ctx)?;
            ProfileView::new(ctx.clone()).confirm_delete().await;
        }
        Command::Profile {
            action: Some(ProfileAction::Unfavorite { movie_id }),
        } => {
            let mut view = loaded_profile(ctx).await?;
            let movie = view
                .find_favorite(&movie_id)
                .cloned()
                .with_context(|| format!("movie `{movie_id}` is not among favorites"))?;
            view.remove_favorite(&movie).await;
        }
    }

    Ok(())
}

fn ensure_logged_in(ctx: &AppContext) -> Result<()> {
    if !ctx.session.is_authenticated() || ctx.session.username().is_none() {
        bail!("not logged in. {LOGIN_HINT}");
    }
    Ok(())
}

async fn loaded_movie_list(ctx: &AppContext) -> Result<MovieListView> {
    ensure_logged_in(ctx)?;
    let mut view = MovieListView::new(ctx.clone());
    view.load().await;
    Ok(view)
}

async fn loaded_profile(ctx: &AppContext) -> Result<ProfileView> {
    ensure_logged_in(ctx)?;
    let mut view = ProfileView::new(ctx.clone());
    view.load().await;
    if view.user().is_none() {
        bail!("could not load profile");
    }
    Ok(view)
}

fn require_movie(movie: Option<&Movie>, id: &str) -> Result<Movie> {
    movie
        .cloned()
        .with_context(|| format!("movie `{id}` not found"))
}

async fn render(route: Route, ctx: &AppContext) {
    let logged_in = ensure_logged_in(ctx).is_ok();
    match route {
        Route::Movies if logged_in => {
            let mut view = MovieListView::new(ctx.clone());
            view.load().await;
            println!("Movies ({}):", view.movies().len());
            for movie in view.movies() {
                println!("{}", movie_line(movie, view.is_favorite(movie)));
            }
        }
        Route::Profile if logged_in => {
            let mut view = ProfileView::new(ctx.clone());
            view.load().await;
            print_profile(&view);
        }
        _ => {
            println!("Welcome to the movie catalog.");
            println!("{LOGIN_HINT}");
        }
    }
}

fn movie_line(movie: &Movie, favorite: bool) -> String {
    let mark = if favorite { "*" } else { " " };
    format!(
        "  [{mark}] {}  {} ({}, {})",
        movie.id, movie.title, movie.genre.name, movie.director.name
    )
}

fn print_profile(view: &ProfileView) {
    let Some(user) = view.user() else {
        println!("Profile could not be loaded.");
        return;
    };

    let form = view.form();
    println!("Profile: {}", user.username);
    println!("  email: {}", form.email);
    println!("  birthday: {}", form.birthday);
    if view.is_loading() {
        println!("Favorites could not be loaded.");
        return;
    }
    println!("Favorites ({}):", view.favorite_movies().len());
    for movie in view.favorite_movies() {
        println!("  - {}  {}", movie.id, movie.title);
    }
}

fn normalize_server(server: String) -> String {
    let server = server.trim().to_string();
    if server.starts_with("http://") || server.starts_with("https://") {
        return server;
    }

    format!("http://{server}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).expect("arguments must parse")
    }

    #[test]
    fn normalize_server_keeps_scheme() {
        let s = normalize_server("https://movies.example.com".to_string());
        assert_eq!(s, "https://movies.example.com");
    }

    #[test]
    fn normalize_server_adds_http_scheme() {
        let s = normalize_server(" 127.0.0.1:8080 ".to_string());
        assert_eq!(s, "http://127.0.0.1:8080");
    }

    #[test]
    fn register_birthday_is_optional() {
        let cli = parse(&[
            "movie-cli",
            "register",
            "--username",
            "alice",
            "--password",
            "pw",
            "--email",
            "alice@example.com",
        ]);
        match cli.command {
            Command::Register { birthday, .. } => assert!(birthday.is_empty()),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn server_flag_is_global() {
        let cli = parse(&["movie-cli", "movies", "--server", "localhost:9000"]);
        assert_eq!(cli.server.as_deref(), Some("localhost:9000"));
    }

    #[test]
    fn profile_subcommands_map_to_screens() {
        assert_eq!(parse(&["movie-cli", "profile"]).command.screen(), Some(Route::Profile));
        assert_eq!(
            parse(&["movie-cli", "profile", "unfavorite", "m1"]).command.screen(),
            Some(Route::Profile)
        );
        assert_eq!(
            parse(&["movie-cli", "profile", "edit", "--email", "a@b.c"]).command.screen(),
            None
        );
        assert_eq!(parse(&["movie-cli", "favorite", "m1"]).command.screen(), Some(Route::Movies));
        assert_eq!(parse(&["movie-cli", "genre", "m1"]).command.screen(), None);
    }

    #[test]
    fn only_delete_with_yes_skips_confirmation() {
        assert!(parse(&["movie-cli", "profile", "delete", "--yes"]).command.assume_yes());
        assert!(!parse(&["movie-cli", "profile", "delete"]).command.assume_yes());
        assert!(!parse(&["movie-cli", "logout"]).command.assume_yes());
    }

    #[test]
    fn require_movie_reports_unknown_id() {
        let err = require_movie(None, "m9").expect_err("must fail");
        assert_eq!(err.to_string(), "movie `m9` not found");
    }

    #[test]
    fn movie_line_marks_favorites() {
        let movie: Movie = serde_json::from_value(serde_json::json!({
            "_id": "m1",
            "title": "Heat",
            "genre": {"name": "Crime"},
            "director": {"name": "Michael Mann"}
        }))
        .expect("movie must parse");

        assert_eq!(movie_line(&movie, true), "  [*] m1  Heat (Crime, Michael Mann)");
        assert_eq!(movie_line(&movie, false), "  [ ] m1  Heat (Crime, Michael Mann)");
    }
}
