use crate::browser::{Browser, Locator};
use crate::view::widgets::{ActionsMenu, Dropdown, Text};
use crate::view::{all_displayed, View};

/// Top bar present on every page after login. Doubles as the landing view.
#[derive(Debug, Clone)]
pub struct NavBarView {
    pub brand: Text,
    /// Context selector: "All Clusters" or a single cluster
    pub clusters: Dropdown,
    pub admin: ActionsMenu,
    pub content: ActionsMenu,
    pub user_menu: ActionsMenu,
}

impl NavBarView {
    pub fn new() -> Self {
        Self {
            brand: Text::xpath("//nav[contains(@class, 'navbar-pf')]//*[contains(@class, 'navbar-brand')]"),
            clusters: Dropdown::new(Locator::xpath("//nav[contains(@class, 'navbar-pf')]//select[contains(@class, 'cluster-selector')]")),
            admin: ActionsMenu::new(Locator::xpath("//li[contains(@class, 'dropdown')][.//*[normalize-space(.)='Admin']]")),
            content: ActionsMenu::new(Locator::xpath("//li[contains(@class, 'dropdown')][.//*[normalize-space(.)='Content']]")),
            user_menu: ActionsMenu::new(Locator::xpath("//li[contains(@class, 'dropdown')][.//*[contains(@class, 'pficon-user')]]")),
        }
    }
}

impl Default for NavBarView {
    fn default() -> Self {
        Self::new()
    }
}

impl View for NavBarView {
    fn name(&self) -> &'static str {
        "NavBarView"
    }

    fn is_displayed(&self, browser: &mut dyn Browser) -> bool {
        all_displayed(browser, &[&self.brand.locator, &self.clusters.locator])
    }
}

/// Left-hand navigation inside a single cluster.
#[derive(Debug, Clone)]
pub struct VerticalNav {
    pub hosts: Text,
    pub volumes: Text,
    pub tasks: Text,
    pub events: Text,
}

impl VerticalNav {
    pub fn new() -> Self {
        let link = |label: &str| {
            Text::xpath(format!(
                "//div[contains(@class, 'nav-pf-vertical')]//a[normalize-space(.)='{}']",
                label
            ))
        };
        Self {
            hosts: link("Hosts"),
            volumes: link("Volumes"),
            tasks: link("Tasks"),
            events: link("Events"),
        }
    }
}

impl Default for VerticalNav {
    fn default() -> Self {
        Self::new()
    }
}
