pub mod clusters;
pub mod credentials;
pub mod dialogs;
pub mod login;
pub mod navbar;
pub mod pages;
pub mod templates;
pub mod users;
pub mod widgets;

use crate::browser::{Browser, Locator};

/// A screen (or screen state) of the console.
///
/// `is_displayed` must only look at rendered state: it never errors, never
/// changes the page, and returns `false` when the view is not current.
pub trait View {
    fn name(&self) -> &'static str;

    fn is_displayed(&self, browser: &mut dyn Browser) -> bool;
}

impl std::fmt::Debug for dyn View + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Displayed-check that treats any driver error as "not displayed".
pub fn displayed(browser: &mut dyn Browser, locator: &Locator) -> bool {
    browser.is_displayed(locator).unwrap_or(false)
}

/// True when every anchor locator is displayed.
pub fn all_displayed(browser: &mut dyn Browser, anchors: &[&Locator]) -> bool {
    anchors.iter().all(|locator| displayed(browser, locator))
}
