use tracing::{error, info, warn};

use crate::models::LoginRequest;
use crate::state::AppContext;
use crate::ui::Route;

#[derive(Debug)]
/// Модальная форма входа.
pub struct LoginForm {
    ctx: AppContext,
    /// Данные, привязанные к полям формы.
    pub user_data: LoginRequest,
    is_open: bool,
}

impl LoginForm {
    /// Открывает пустую форму.
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            user_data: LoginRequest::default(),
            is_open: true,
        }
    }

    /// Открыт ли модальный диалог формы.
    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// Закрывает диалог.
    pub fn close(&mut self) {
        self.is_open = false;
    }

    /// Отправляет учётные данные.
    ///
    /// При успехе сохраняет пользователя и токен в сессии, закрывает диалог и
    /// переходит к списку фильмов. При ошибке показывает уведомление, диалог
    /// остаётся открытым.
    pub async fn submit(&mut self) {
        match self.ctx.api.login(&self.user_data).await {
            Ok(auth) => {
                if let Err(err) = self.ctx.session.set_session(&auth.user, &auth.token) {
                    error!(error = %err, "failed to persist session");
                    self.ctx.presenter.notify(&format!("Login failed: {err}"));
                    return;
                }

                info!(username = %auth.user.username, "logged in");
                self.close();
                self.ctx.presenter.notify("Login successful");
                self.ctx.navigator.navigate(Route::Movies);
            }
            Err(err) => {
                warn!(error = %err, "login failed");
                self.ctx.presenter.notify(&format!("Login failed: {err}"));
            }
        }
    }
}
