use thiserror::Error;

#[derive(Debug, Error)]
/// Ошибки клиентской библиотеки `movie-client`.
pub enum MovieClientError {
    /// Ошибка HTTP-транспорта (`reqwest`).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Требуется авторизация (отсутствует/некорректен токен).
    #[error("unauthorized")]
    Unauthorized,

    /// Запрошенный ресурс не найден.
    #[error("not found")]
    NotFound,

    /// Некорректный запрос или бизнес-ошибка на стороне API.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Тело ответа не удалось разобрать.
    #[error("decode error: {0}")]
    Decode(String),

    /// Ошибка чтения/записи хранилища сессии.
    #[error("storage error: {0}")]
    Storage(String),
}

/// Результат операций `movie-client`.
pub type MovieClientResult<T> = Result<T, MovieClientError>;

impl MovieClientError {
    pub(crate) fn from_http_status(status: reqwest::StatusCode, message: Option<String>) -> Self {
        match status {
            reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
                Self::Unauthorized
            }
            reqwest::StatusCode::NOT_FOUND => Self::NotFound,
            _ => {
                let message = message.unwrap_or_else(|| format!("http status {status}"));
                Self::InvalidRequest(message)
            }
        }
    }

    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return Self::from_http_status(status, None);
        }
        if err.is_decode() {
            return Self::Decode(err.to_string());
        }
        Self::Http(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn http_status_mapping_covers_auth_and_missing_resources() {
        let unauth = MovieClientError::from_http_status(StatusCode::UNAUTHORIZED, None);
        assert!(matches!(unauth, MovieClientError::Unauthorized));

        let forbidden = MovieClientError::from_http_status(StatusCode::FORBIDDEN, None);
        assert!(matches!(forbidden, MovieClientError::Unauthorized));

        let not_found = MovieClientError::from_http_status(StatusCode::NOT_FOUND, None);
        assert!(matches!(not_found, MovieClientError::NotFound));
    }

    #[test]
    fn http_status_mapping_keeps_server_message() {
        let err = MovieClientError::from_http_status(
            StatusCode::BAD_REQUEST,
            Some("alice already exists".to_string()),
        );
        match err {
            MovieClientError::InvalidRequest(msg) => assert_eq!(msg, "alice already exists"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn http_status_mapping_falls_back_to_status_text() {
        let err = MovieClientError::from_http_status(StatusCode::INTERNAL_SERVER_ERROR, None);
        match err {
            MovieClientError::InvalidRequest(msg) => assert!(msg.contains("500")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
