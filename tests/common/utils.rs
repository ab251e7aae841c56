use console_nav::cli::config::{ConsoleConfig, WaitConfig};
use console_nav::entities::Application;

use super::FakeBrowser;

pub fn console() -> ConsoleConfig {
    ConsoleConfig {
        hostname: "console.test".to_string(),
        scheme: "http".to_string(),
        username: "admin".to_string(),
        password: "secret".to_string(),
        api_url: None,
    }
}

/// Waits short enough that a test never sleeps for long.
pub fn fast_waits() -> WaitConfig {
    WaitConfig {
        navigation_secs: 0,
        navigation_delay_ms: 1,
        max_depth: 16,
        view_secs: 0,
        task_secs: 0,
        status_secs: 0,
        poll_delay_ms: 1,
        settle_ms: 0,
    }
}

pub fn app(fake: &FakeBrowser) -> Application {
    Application::new(console(), fake.boxed())
        .unwrap()
        .with_waits(fast_waits())
}
