use std::sync::Arc;

use crate::api::MovieApi;
use crate::session::SessionContext;
use crate::ui::{Navigator, Presenter};

#[derive(Clone)]
/// Всё, что view получает снаружи: шлюз к API, сессию, слой отображения и
/// навигацию.
pub struct AppContext {
    /// Шлюз к удалённому API.
    pub api: Arc<dyn MovieApi>,
    /// Текущая сессия.
    pub session: SessionContext,
    /// Диалоги и уведомления.
    pub presenter: Arc<dyn Presenter>,
    /// Переходы между маршрутами.
    pub navigator: Arc<dyn Navigator>,
}

impl AppContext {
    /// Собирает контекст из готовых частей.
    pub fn new(
        api: Arc<dyn MovieApi>,
        session: SessionContext,
        presenter: Arc<dyn Presenter>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            api,
            session,
            presenter,
            navigator,
        }
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}
