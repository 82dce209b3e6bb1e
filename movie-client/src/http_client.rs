use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::{Deserialize, de::DeserializeOwned};
use std::time::Duration;
use tracing::debug;

use crate::api::MovieApi;
use crate::error::{MovieClientError, MovieClientResult};
use crate::models::{
    AuthResponse, FavoriteList, LoginRequest, Movie, MovieId, RegistrationRequest, User, UserPatch,
};

#[derive(Debug, Deserialize)]
struct ErrorResponseDto {
    error: Option<String>,
    message: Option<String>,
}

/// Достаёт человекочитаемое сообщение из тела ответа с ошибкой.
///
/// API отвечает то JSON `{"error": ...}`/`{"message": ...}`, то просто текстом.
fn error_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }

    if let Ok(dto) = serde_json::from_str::<ErrorResponseDto>(body)
        && let Some(message) = dto.error.or(dto.message)
    {
        return Some(message);
    }
    Some(body.to_string())
}

#[derive(Debug, Clone)]
/// HTTP-клиент для REST API каталога фильмов.
pub struct HttpClient {
    base_url: Url,
    client: Client,
    token: Option<String>,
}

impl HttpClient {
    /// Создаёт клиент с базовым URL API и таймаутом запроса.
    pub fn new(base_url: &str, timeout: Duration) -> MovieClientResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|err| MovieClientError::InvalidRequest(format!("invalid api url: {err}")))?;
        if base_url.cannot_be_a_base() {
            return Err(MovieClientError::InvalidRequest(format!(
                "api url cannot be used as a base: {base_url}"
            )));
        }

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            base_url,
            client,
            token: None,
        })
    }

    /// Включает отправку `Authorization: Bearer <token>` во всех запросах.
    ///
    /// По умолчанию токен не отправляется.
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        let token = token.trim();
        self.token = (!token.is_empty()).then(|| token.to_string());
        self
    }

    fn endpoint(&self, segments: &[&str]) -> MovieClientResult<Url> {
        let mut url = self.base_url.clone();
        {
            let mut path = url.path_segments_mut().map_err(|()| {
                MovieClientError::InvalidRequest("api url cannot be used as a base".to_string())
            })?;
            path.pop_if_empty();
            path.extend(segments);
        }
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> MovieClientResult<RequestBuilder> {
        let url = self.endpoint(segments)?;
        debug!(%method, %url, "movie api request");

        let request = self.client.request(method, url);
        Ok(match self.token.as_deref() {
            Some(token) => request.bearer_auth(token),
            None => request,
        })
    }

    async fn decode_error(response: Response) -> MovieClientError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        MovieClientError::from_http_status(status, error_message(&body))
    }

    async fn send(request: RequestBuilder) -> MovieClientResult<Response> {
        let response = request
            .send()
            .await
            .map_err(MovieClientError::from_reqwest)?;
        if !response.status().is_success() {
            return Err(Self::decode_error(response).await);
        }
        Ok(response)
    }

    /// универсальный helper: отправить запрос и разобрать json-ответ
    async fn send_json<TRes>(request: RequestBuilder) -> MovieClientResult<TRes>
    where
        TRes: DeserializeOwned,
    {
        Self::send(request)
            .await?
            .json::<TRes>()
            .await
            .map_err(MovieClientError::from_reqwest)
    }
}

#[async_trait]
impl MovieApi for HttpClient {
    async fn register(&self, request: &RegistrationRequest) -> MovieClientResult<User> {
        let request = self.request(Method::POST, &["users"])?.json(request);
        Self::send_json(request).await
    }

    async fn login(&self, request: &LoginRequest) -> MovieClientResult<AuthResponse> {
        let request = self.request(Method::POST, &["login"])?.json(request);
        Self::send_json(request).await
    }

    async fn list_movies(&self) -> MovieClientResult<Vec<Movie>> {
        let request = self.request(Method::GET, &["movies"])?;
        Self::send_json(request).await
    }

    async fn get_user(&self, username: &str) -> MovieClientResult<User> {
        let request = self.request(Method::GET, &["users", username])?;
        Self::send_json(request).await
    }

    async fn edit_user(&self, username: &str, patch: &UserPatch) -> MovieClientResult<User> {
        let request = self.request(Method::PUT, &["users", username])?.json(patch);
        Self::send_json(request).await
    }

    async fn delete_user(&self, username: &str) -> MovieClientResult<()> {
        // API отвечает текстом вида "alice was deleted.", тело не разбираем
        let request = self.request(Method::DELETE, &["users", username])?;
        Self::send(request).await?;
        Ok(())
    }

    async fn get_favorites(&self, username: &str) -> MovieClientResult<FavoriteList> {
        let request = self.request(Method::GET, &["users", username, "movies"])?;
        match Self::send_json(request).await {
            Err(MovieClientError::NotFound) => {
                debug!(username, "no favorites recorded, treating as empty list");
                Ok(FavoriteList::default())
            }
            other => other,
        }
    }

    async fn add_favorite(&self, username: &str, movie_id: &MovieId) -> MovieClientResult<User> {
        let request =
            self.request(Method::POST, &["users", username, "movies", movie_id.as_str()])?;
        Self::send_json(request).await
    }

    async fn remove_favorite(
        &self,
        username: &str,
        movie_id: &MovieId,
    ) -> MovieClientResult<User> {
        let request =
            self.request(Method::DELETE, &["users", username, "movies", movie_id.as_str()])?;
        Self::send_json(request).await
    }
}
