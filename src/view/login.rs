use crate::browser::{Browser, BrowserError, Locator};
use crate::view::widgets::{Text, TextInput};
use crate::view::{all_displayed, View};

/// Login form shown to anonymous sessions.
#[derive(Debug, Clone)]
pub struct LoginView {
    pub username: TextInput,
    pub password: TextInput,
    pub submit: Text,
}

impl LoginView {
    pub fn new() -> Self {
        Self {
            username: TextInput::id("username"),
            password: TextInput::id("password"),
            submit: Text::xpath("//form[contains(@class, 'login')]//button[@type='submit']"),
        }
    }

    /// Fill the credentials. Returns whether any field changed.
    pub fn fill(&self, browser: &mut dyn Browser, username: &str, password: &str) -> Result<bool, BrowserError> {
        let user_changed = self.username.fill(browser, username)?;
        let password_changed = self.password.fill(browser, password)?;
        Ok(user_changed || password_changed)
    }
}

impl Default for LoginView {
    fn default() -> Self {
        Self::new()
    }
}

impl View for LoginView {
    fn name(&self) -> &'static str {
        "LoginView"
    }

    fn is_displayed(&self, browser: &mut dyn Browser) -> bool {
        all_displayed(browser, &[&self.username.locator, &self.password.locator, &self.submit.locator])
    }
}

/// Error banner shown after a rejected login.
pub fn login_error() -> Locator {
    Locator::xpath("//div[contains(@class, 'alert-danger')]")
}
