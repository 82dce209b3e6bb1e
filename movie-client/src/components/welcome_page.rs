use crate::components::login_form::LoginForm;
use crate::components::registration_form::RegistrationForm;
use crate::state::AppContext;

#[derive(Debug, Clone)]
/// Стартовый экран: открывает формы регистрации и входа.
pub struct WelcomePage {
    ctx: AppContext,
}

impl WelcomePage {
    /// Создаёт экран.
    pub fn new(ctx: AppContext) -> Self {
        Self { ctx }
    }

    /// Открывает диалог регистрации.
    pub fn open_registration_dialog(&self) -> RegistrationForm {
        RegistrationForm::new(self.ctx.clone())
    }

    /// Открывает диалог входа.
    pub fn open_login_dialog(&self) -> LoginForm {
        LoginForm::new(self.ctx.clone())
    }
}
