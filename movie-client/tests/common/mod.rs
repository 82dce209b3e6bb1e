#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use movie_client::{
    AppContext, AuthResponse, FavoriteList, KeyValueStore, LoginRequest, MemoryStorage,
    MessageBox, Movie, MovieApi, MovieClientError, MovieClientResult, MovieId, Navigator,
    Presenter, RegistrationRequest, Route, SessionContext, User, UserPatch,
};

pub fn movie(id: &str, title: &str) -> Movie {
    serde_json::from_value(serde_json::json!({
        "_id": id,
        "title": title,
        "description": format!("{title} description"),
        "genre": {"name": "Drama", "description": "Serious films"},
        "director": {"name": "Jane Doe", "bio": "Director bio"}
    }))
    .expect("movie must parse")
}

pub fn user(username: &str, favorites: &[&str]) -> User {
    serde_json::from_value(serde_json::json!({
        "Username": username,
        "Email": format!("{username}@example.com"),
        "Birthday": "1990-05-01T00:00:00.000Z",
        "FavoriteMovies": favorites,
    }))
    .expect("user must parse")
}

#[derive(Default)]
pub struct FakeState {
    pub calls: Vec<&'static str>,
    pub movies: Vec<Movie>,
    pub users: HashMap<String, User>,
    pub tokens: HashMap<String, String>,
    pub failing: HashSet<&'static str>,
    pub last_patch: Option<UserPatch>,
    pub last_registration: Option<RegistrationRequest>,
}

#[derive(Clone, Default)]
pub struct FakeApi {
    state: Arc<Mutex<FakeState>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_movies(self, movies: Vec<Movie>) -> Self {
        self.state().movies = movies;
        self
    }

    pub fn with_user(self, user: User, token: &str) -> Self {
        {
            let mut state = self.state();
            state.tokens.insert(user.username.clone(), token.to_string());
            state.users.insert(user.username.clone(), user);
        }
        self
    }

    pub fn fail(&self, operation: &'static str) {
        self.state().failing.insert(operation);
    }

    pub fn recover(&self, operation: &'static str) {
        self.state().failing.remove(operation);
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.state().calls.clone()
    }

    pub fn remote_favorites(&self, username: &str) -> Vec<String> {
        self.state()
            .users
            .get(username)
            .map(|user| {
                user.favorite_movies
                    .iter()
                    .map(|id| id.as_str().to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn last_patch(&self) -> Option<UserPatch> {
        self.state().last_patch.clone()
    }

    pub fn last_registration(&self) -> Option<RegistrationRequest> {
        self.state().last_registration.clone()
    }

    pub fn state(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().expect("fake api mutex poisoned")
    }

    fn enter(
        &self,
        operation: &'static str,
    ) -> MovieClientResult<std::sync::MutexGuard<'_, FakeState>> {
        let mut state = self.state();
        state.calls.push(operation);
        if state.failing.contains(operation) {
            return Err(MovieClientError::InvalidRequest(format!(
                "simulated {operation} failure"
            )));
        }
        Ok(state)
    }
}

#[async_trait]
impl MovieApi for FakeApi {
    async fn register(&self, request: &RegistrationRequest) -> MovieClientResult<User> {
        let mut state = self.enter("register")?;
        state.last_registration = Some(request.clone());
        let user = User {
            id: None,
            username: request.username.clone(),
            email: Some(request.email.clone()),
            birthday: None,
            favorite_movies: Vec::new(),
        };
        state.users.insert(user.username.clone(), user.clone());
        Ok(user)
    }

    async fn login(&self, request: &LoginRequest) -> MovieClientResult<AuthResponse> {
        let state = self.enter("login")?;
        let user = state
            .users
            .get(&request.username)
            .cloned()
            .ok_or(MovieClientError::Unauthorized)?;
        let token = state
            .tokens
            .get(&request.username)
            .cloned()
            .unwrap_or_else(|| "token".to_string());
        Ok(AuthResponse { user, token })
    }

    async fn list_movies(&self) -> MovieClientResult<Vec<Movie>> {
        let state = self.enter("list_movies")?;
        Ok(state.movies.clone())
    }

    async fn get_user(&self, username: &str) -> MovieClientResult<User> {
        let state = self.enter("get_user")?;
        state
            .users
            .get(username)
            .cloned()
            .ok_or(MovieClientError::NotFound)
    }

    async fn edit_user(&self, username: &str, patch: &UserPatch) -> MovieClientResult<User> {
        let mut state = self.enter("edit_user")?;
        state.last_patch = Some(patch.clone());
        let mut user = state
            .users
            .remove(username)
            .ok_or(MovieClientError::NotFound)?;
        if let Some(new_username) = &patch.username {
            user.username = new_username.clone();
        }
        if let Some(email) = &patch.email {
            user.email = Some(email.clone());
        }
        if let Some(birthday) = &patch.birthday {
            user.birthday = Some(birthday.clone());
        }
        state.users.insert(user.username.clone(), user.clone());
        Ok(user)
    }

    async fn delete_user(&self, username: &str) -> MovieClientResult<()> {
        let mut state = self.enter("delete_user")?;
        state.users.remove(username);
        Ok(())
    }

    async fn get_favorites(&self, username: &str) -> MovieClientResult<FavoriteList> {
        let state = self.enter("get_favorites")?;
        let user = state.users.get(username).ok_or(MovieClientError::NotFound)?;
        Ok(FavoriteList {
            movie_ids: user.favorite_movies.clone(),
        })
    }

    async fn add_favorite(&self, username: &str, movie_id: &MovieId) -> MovieClientResult<User> {
        let mut state = self.enter("add_favorite")?;
        let user = state
            .users
            .get_mut(username)
            .ok_or(MovieClientError::NotFound)?;
        if !user.favorite_movies.contains(movie_id) {
            user.favorite_movies.push(movie_id.clone());
        }
        Ok(user.clone())
    }

    async fn remove_favorite(
        &self,
        username: &str,
        movie_id: &MovieId,
    ) -> MovieClientResult<User> {
        let mut state = self.enter("remove_favorite")?;
        let user = state
            .users
            .get_mut(username)
            .ok_or(MovieClientError::NotFound)?;
        user.favorite_movies.retain(|id| id != movie_id);
        Ok(user.clone())
    }
}

#[derive(Default)]
pub struct RecordingPresenter {
    pub dialogs: Mutex<Vec<MessageBox>>,
    pub notifications: Mutex<Vec<String>>,
    pub alerts: Mutex<Vec<String>>,
    pub questions: Mutex<Vec<String>>,
    pub confirm_answer: Mutex<bool>,
}

impl RecordingPresenter {
    pub fn answer(&self, yes: bool) {
        *self.confirm_answer.lock().expect("presenter mutex poisoned") = yes;
    }

    pub fn notifications(&self) -> Vec<String> {
        self.notifications
            .lock()
            .expect("presenter mutex poisoned")
            .clone()
    }

    pub fn last_notification(&self) -> Option<String> {
        self.notifications().last().cloned()
    }

    pub fn dialogs(&self) -> Vec<MessageBox> {
        self.dialogs.lock().expect("presenter mutex poisoned").clone()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().expect("presenter mutex poisoned").clone()
    }

    pub fn questions(&self) -> Vec<String> {
        self.questions.lock().expect("presenter mutex poisoned").clone()
    }
}

impl Presenter for RecordingPresenter {
    fn show_dialog(&self, dialog: MessageBox) {
        self.dialogs
            .lock()
            .expect("presenter mutex poisoned")
            .push(dialog);
    }

    fn notify(&self, message: &str) {
        self.notifications
            .lock()
            .expect("presenter mutex poisoned")
            .push(message.to_string());
    }

    fn alert(&self, message: &str) {
        self.alerts
            .lock()
            .expect("presenter mutex poisoned")
            .push(message.to_string());
    }

    fn confirm(&self, question: &str) -> bool {
        self.questions
            .lock()
            .expect("presenter mutex poisoned")
            .push(question.to_string());
        *self.confirm_answer.lock().expect("presenter mutex poisoned")
    }
}

#[derive(Default)]
pub struct RecordingNavigator {
    pub routes: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    pub fn routes(&self) -> Vec<Route> {
        self.routes.lock().expect("navigator mutex poisoned").clone()
    }

    pub fn last(&self) -> Option<Route> {
        self.routes().last().copied()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        self.routes
            .lock()
            .expect("navigator mutex poisoned")
            .push(route);
    }
}

pub struct Harness {
    pub api: FakeApi,
    pub storage: Arc<MemoryStorage>,
    pub presenter: Arc<RecordingPresenter>,
    pub navigator: Arc<RecordingNavigator>,
    pub ctx: AppContext,
}

impl Harness {
    pub fn new(api: FakeApi) -> Self {
        let storage = Arc::new(MemoryStorage::new());
        let presenter = Arc::new(RecordingPresenter::default());
        let navigator = Arc::new(RecordingNavigator::default());
        let ctx = AppContext::new(
            Arc::new(api.clone()),
            SessionContext::new(storage.clone()),
            presenter.clone(),
            navigator.clone(),
        );
        Self {
            api,
            storage,
            presenter,
            navigator,
            ctx,
        }
    }

    /// Harness с уже выполненным входом.
    pub fn logged_in(api: FakeApi, user: &User, token: &str) -> Self {
        let harness = Self::new(api);
        harness
            .ctx
            .session
            .set_session(user, token)
            .expect("session must be stored");
        harness
    }

    pub fn stored(&self, key: &str) -> Option<String> {
        self.storage.get_item(key)
    }
}
