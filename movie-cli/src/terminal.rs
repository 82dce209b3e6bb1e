use std::io::{self, BufRead, Write};
use std::sync::Mutex;

use movie_client::{MessageBox, Navigator, Presenter, Route};
use tracing::warn;

/// Диалоги и уведомления в терминале.
#[derive(Debug, Default)]
pub struct TerminalPresenter {
    assume_yes: bool,
}

impl TerminalPresenter {
    /// `assume_yes` отвечает «да» на все вопросы без чтения stdin.
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl Presenter for TerminalPresenter {
    fn show_dialog(&self, dialog: MessageBox) {
        println!("== {} ==", dialog.title);
        println!("{}", dialog.content);
    }

    fn notify(&self, message: &str) {
        println!("* {message}");
    }

    fn alert(&self, message: &str) {
        println!("! {message}");
    }

    fn confirm(&self, question: &str) -> bool {
        if self.assume_yes {
            return true;
        }

        print!("{question} [y/N] ");
        if let Err(err) = io::stdout().flush() {
            warn!(error = %err, "failed to flush stdout");
        }

        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => is_yes(&answer),
            Err(err) => {
                warn!(error = %err, "failed to read confirmation");
                false
            }
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Запоминает последний маршрут, на который попросила перейти view.
#[derive(Debug, Default)]
pub struct RouteRecorder {
    last: Mutex<Option<Route>>,
}

impl RouteRecorder {
    pub fn take(&self) -> Option<Route> {
        self.last.lock().ok().and_then(|mut last| last.take())
    }
}

impl Navigator for RouteRecorder {
    fn navigate(&self, route: Route) {
        match self.last.lock() {
            Ok(mut last) => *last = Some(route),
            Err(_) => warn!(%route, "navigator lock poisoned"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_yes_accepts_only_explicit_consent() {
        assert!(is_yes("y\n"));
        assert!(is_yes(" YES "));
        assert!(!is_yes("\n"));
        assert!(!is_yes("nope"));
    }

    #[test]
    fn assume_yes_skips_the_prompt() {
        assert!(TerminalPresenter::new(true).confirm("Delete?"));
    }

    #[test]
    fn recorder_keeps_last_route_until_taken() {
        let recorder = RouteRecorder::default();
        assert_eq!(recorder.take(), None);

        recorder.navigate(Route::Movies);
        recorder.navigate(Route::Profile);
        assert_eq!(recorder.take(), Some(Route::Profile));
        assert_eq!(recorder.take(), None);
    }
}
