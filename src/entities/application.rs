use std::cell::{RefCell, RefMut};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::browser::Browser;
use crate::cli::config::{ConsoleConfig, WaitConfig};
use crate::entities::clusters::ClustersCollection;
use crate::entities::credentials::ContentCredentialsCollection;
use crate::entities::destinations;
use crate::entities::subject::Subject;
use crate::entities::templates::TemplatesCollection;
use crate::entities::users::UsersCollection;
use crate::error::{Error, Result};
use crate::navigation::{NavigationError, Navigator};
use crate::trace::logger::TraceLogger;
use crate::view::View;
use crate::wait::{Wait, WaitTimeout};

/// One console session: the browser, the destination registry and the
/// settings every entity action needs.
///
/// Entities borrow the application; the browser is borrowed per
/// interaction, so never hold [`Application::browser`] across a call that
/// navigates.
pub struct Application {
    console: ConsoleConfig,
    waits: WaitConfig,
    browser: RefCell<Box<dyn Browser>>,
    navigator: Navigator<Subject>,
    screenshots_dir: Option<PathBuf>,
}

impl Application {
    pub fn new(console: ConsoleConfig, browser: Box<dyn Browser>) -> std::result::Result<Self, NavigationError> {
        let registry = destinations::registry(&console)?;
        let waits = WaitConfig::default();
        let navigator = Navigator::new(registry)
            .with_wait(waits.navigation())
            .with_max_depth(waits.max_depth);
        Ok(Self {
            console,
            waits,
            browser: RefCell::new(browser),
            navigator,
            screenshots_dir: None,
        })
    }

    pub fn with_waits(mut self, waits: WaitConfig) -> Self {
        self.navigator = self
            .navigator
            .with_wait(waits.navigation())
            .with_max_depth(waits.max_depth);
        self.waits = waits;
        self
    }

    pub fn with_trace(mut self, trace: TraceLogger) -> Self {
        self.navigator = self.navigator.with_trace(trace);
        self
    }

    pub fn with_screenshots_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.screenshots_dir = Some(dir.into());
        self
    }

    pub fn console(&self) -> &ConsoleConfig {
        &self.console
    }

    pub fn waits(&self) -> &WaitConfig {
        &self.waits
    }

    pub fn navigator(&self) -> &Navigator<Subject> {
        &self.navigator
    }

    /// Exclusive access to the browser for one interaction.
    pub fn browser(&self) -> RefMut<'_, dyn Browser> {
        RefMut::map(self.browser.borrow_mut(), |browser| browser.as_mut())
    }

    pub fn navigate_to(&self, subject: &Subject, destination: &str) -> Result<Box<dyn View>> {
        let mut browser = self.browser();
        Ok(self.navigator.navigate_to(&mut *browser, subject, destination)?)
    }

    /// Poll until `view` is displayed. The timeout carries the page text.
    pub fn wait_displayed(&self, view: &dyn View, wait: Wait) -> Result<()> {
        let wait = wait.message(format!("{} not displayed", view.name()));
        match wait.until(|| view.is_displayed(&mut *self.browser())) {
            Ok(_) => Ok(()),
            Err(timeout) => {
                let text = self.visible_text().unwrap_or_default();
                Err(Error::Timeout(WaitTimeout {
                    message: format!("{}; visible text: {}", timeout.message, text.trim()),
                    ..timeout
                }))
            }
        }
    }

    pub fn is_displayed(&self, view: &dyn View) -> bool {
        view.is_displayed(&mut *self.browser())
    }

    /// Visible text of the whole page.
    pub fn visible_text(&self) -> Result<String> {
        Ok(self.browser().page_text()?)
    }

    /// Save a screenshot named after `label`. Best effort: failures are
    /// logged and yield `None`.
    pub fn screenshot(&self, label: &str) -> Option<PathBuf> {
        let dir = self.screenshots_dir.as_deref()?;
        let path = screenshot_path(dir, label);
        if let Err(e) = std::fs::create_dir_all(dir) {
            tracing::warn!(dir = %dir.display(), error = %e, "cannot create screenshots dir");
            return None;
        }
        match self.browser().screenshot(&path.to_string_lossy()) {
            Ok(()) => Some(path),
            Err(e) => {
                tracing::warn!(error = %e, "screenshot failed");
                None
            }
        }
    }

    pub fn users(&self) -> UsersCollection<'_> {
        UsersCollection::new(self)
    }

    pub fn clusters(&self) -> ClustersCollection<'_> {
        ClustersCollection::new(self)
    }

    pub fn content_credentials(&self) -> ContentCredentialsCollection<'_> {
        ContentCredentialsCollection::new(self)
    }

    pub fn templates(&self) -> TemplatesCollection<'_> {
        TemplatesCollection::new(self)
    }

    pub fn quit(&self) -> Result<()> {
        Ok(self.browser().quit()?)
    }
}

/// `<dir>/<label>_<unix seconds>.png`, with path separators replaced.
pub fn screenshot_path(dir: &Path, label: &str) -> PathBuf {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let label: String = label
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    dir.join(format!("{}_{}.png", label, stamp))
}
