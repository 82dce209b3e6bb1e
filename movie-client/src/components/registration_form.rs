use tracing::{info, warn};

use crate::models::RegistrationRequest;
use crate::state::AppContext;

#[derive(Debug)]
/// Модальная форма регистрации: логин, пароль, email, дата рождения.
pub struct RegistrationForm {
    ctx: AppContext,
    /// Данные, привязанные к полям формы.
    pub user_data: RegistrationRequest,
    is_open: bool,
}

impl RegistrationForm {
    /// Открывает пустую форму.
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            user_data: RegistrationRequest::default(),
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

    /// Регистрирует пользователя. Сессию не трогает: после регистрации
    /// нужно отдельно войти.
    pub async fn submit(&mut self) {
        match self.ctx.api.register(&self.user_data).await {
            Ok(user) => {
                info!(username = %user.username, "registered");
                self.close();
                self.ctx.presenter.notify("Registration successful");
            }
            Err(err) => {
                warn!(error = %err, "registration failed");
                self.ctx
                    .presenter
                    .notify(&format!("Registration failed: {err}"));
            }
        }
    }
}
