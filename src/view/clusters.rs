use crate::browser::locator::xpath_literal;
use crate::browser::{Browser, BrowserError, Locator};
use crate::view::widgets::{ActionsMenu, Text};
use crate::view::{all_displayed, View};

/// List of clusters known to the console, managed or not.
#[derive(Debug, Clone)]
pub struct ClustersView {
    pub title: Text,
    pub list: Locator,
}

impl ClustersView {
    pub fn new() -> Self {
        Self {
            title: Text::xpath("//h1[contains(normalize-space(.), 'Clusters')]"),
            list: Locator::xpath("//div[contains(@class, 'cluster-list')]"),
        }
    }

    fn name_cells(&self) -> Locator {
        self.list
            .child(".//div[contains(@class, 'list-group-item')]//*[contains(@class, 'cluster-name')]")
    }

    /// Names (or ids, for clusters without a custom name) in display order.
    pub fn all_ids(&self, browser: &mut dyn Browser) -> Result<Vec<String>, BrowserError> {
        let names = browser.texts(&self.name_cells())?;
        Ok(names.into_iter().map(|s| s.trim().to_string()).collect())
    }

    /// Row of the cluster displayed as `name`.
    pub fn cluster(&self, name: &str) -> ClusterRow {
        ClusterRow::new(self.list.child(&format!(
            ".//div[contains(@class, 'list-group-item')][.//*[contains(@class, 'cluster-name')][normalize-space(.)={}]]",
            xpath_literal(name)
        )))
    }
}

impl Default for ClustersView {
    fn default() -> Self {
        Self::new()
    }
}

impl View for ClustersView {
    fn name(&self) -> &'static str {
        "ClustersView"
    }

    fn is_displayed(&self, browser: &mut dyn Browser) -> bool {
        all_displayed(browser, &[&self.title.locator, &self.list])
    }
}

/// One cluster in the clusters list.
#[derive(Debug, Clone)]
pub struct ClusterRow {
    pub root: Locator,
    pub name: Text,
    pub cluster_version: Text,
    pub managed: Text,
    pub hosts: Text,
    pub status: Text,
    pub volumes: Text,
    pub alerts: Text,
    pub profiling: Text,
    pub health_icon: Locator,
    pub actions: ActionsMenu,
    pub import_button: Text,
    pub dashboard_button: Text,
}

impl ClusterRow {
    pub fn new(root: Locator) -> Self {
        let field = |class: &str| {
            Text::new(root.child(&format!(
                ".//*[contains(@class, '{}')]//*[contains(@class, 'value')]",
                class
            )))
        };
        Self {
            name: Text::new(root.child(".//*[contains(@class, 'cluster-name')]")),
            cluster_version: field("cluster-version"),
            managed: field("cluster-managed"),
            hosts: field("cluster-hosts"),
            status: Text::new(root.child(".//*[contains(@class, 'cluster-status')]")),
            volumes: field("cluster-volumes"),
            alerts: field("cluster-alerts"),
            profiling: field("cluster-profiling"),
            health_icon: root.child(".//*[contains(@class, 'cluster-health')]//span[contains(@class, 'pficon')]"),
            actions: ActionsMenu::new(root.child(".//div[contains(@class, 'dropdown-kebab-pf')]")),
            import_button: Text::new(root.child(".//button[normalize-space(.)='Import']")),
            dashboard_button: Text::new(root.child(".//button[normalize-space(.)='Dashboard']")),
            root,
        }
    }

    /// Health as shown by the status icon tooltip, e.g. "HEALTH_OK".
    pub fn health(&self, browser: &mut dyn Browser) -> Result<Option<String>, BrowserError> {
        if browser.count(&self.health_icon)? == 0 {
            return Ok(None);
        }
        browser.attribute(&self.health_icon, "title")
    }
}
