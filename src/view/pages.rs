//! Pages inside a single cluster, the task log and the Grafana dashboard.

use crate::browser::locator::xpath_literal;
use crate::browser::{Browser, Locator};
use crate::view::navbar::VerticalNav;
use crate::view::widgets::Text;
use crate::view::{all_displayed, View};

/// A cluster sub-page: heading plus the cluster's vertical navigation.
#[derive(Debug, Clone)]
pub struct ClusterPageView {
    name: &'static str,
    pub title: Text,
    pub nav: VerticalNav,
    pub list: Locator,
}

impl ClusterPageView {
    fn titled(name: &'static str, heading: &str, list_class: &str) -> Self {
        Self {
            name,
            title: Text::xpath(format!("//h1[normalize-space(.)='{}']", heading)),
            nav: VerticalNav::new(),
            list: Locator::xpath(format!("//div[contains(@class, '{}')]", list_class)),
        }
    }

    pub fn hosts() -> Self {
        Self::titled("ClusterHostsView", "Hosts", "host-list")
    }

    pub fn volumes() -> Self {
        Self::titled("ClusterVolumesView", "Volumes", "volume-list")
    }

    pub fn tasks() -> Self {
        Self::titled("ClusterTasksView", "Tasks", "task-list")
    }

    pub fn events() -> Self {
        Self::titled("ClusterEventsView", "Events", "event-list")
    }

    /// Rows of the page's list, for the tasks page one row per task.
    pub fn rows(&self) -> Locator {
        self.list.child(".//div[contains(@class, 'list-group-item')]")
    }
}

impl View for ClusterPageView {
    fn name(&self) -> &'static str {
        self.name
    }

    fn is_displayed(&self, browser: &mut dyn Browser) -> bool {
        all_displayed(browser, &[&self.title.locator, &self.nav.hosts.locator])
    }
}

/// Columns of a row on the cluster tasks page.
#[derive(Debug, Clone)]
pub struct TaskRow {
    pub task_id: Text,
    pub name: Text,
    pub submitted: Text,
    pub changed: Text,
    pub status: Text,
}

impl TaskRow {
    pub fn new(row: &Locator) -> Self {
        let field = |class: &str| Text::new(row.child(&format!(".//*[contains(@class, '{}')]", class)));
        Self {
            task_id: field("task-id"),
            name: field("task-name"),
            submitted: field("task-submitted"),
            changed: field("task-changed"),
            status: field("task-status"),
        }
    }

    /// Link opening the task log, located by the task id text.
    pub fn link(list: &Locator, task_id: &str) -> Locator {
        list.child(&format!(
            ".//div[contains(@class, 'list-group-item')][.//*[contains(@class, 'task-id')][normalize-space(.)={}]]//a",
            xpath_literal(task_id)
        ))
    }
}

/// Task progress page: overall status and the event log.
#[derive(Debug, Clone)]
pub struct TaskEventsView {
    pub title: Text,
    pub import_status: Text,
    pub cluster_details: Text,
    pub events: Locator,
}

impl TaskEventsView {
    pub fn new() -> Self {
        Self {
            title: Text::xpath("//h1[contains(normalize-space(.), 'Task Details')]"),
            import_status: Text::xpath("//*[contains(@class, 'task-details')]//*[contains(@class, 'status-value')]"),
            cluster_details: Text::xpath("//button[normalize-space(.)='View Cluster Details']"),
            events: Locator::xpath("//div[contains(@class, 'task-log')]//div[contains(@class, 'list-group-item')]"),
        }
    }

    /// Cells of the n-th (1-based) event row.
    pub fn event(&self, index: usize) -> EventRow {
        let row = self.events.nth(index);
        EventRow {
            icon: row.child(".//span[contains(@class, 'pficon')]"),
            description: Text::new(row.child(".//*[contains(@class, 'event-message')]")),
            date: Text::new(row.child(".//*[contains(@class, 'event-date')]")),
        }
    }
}

impl Default for TaskEventsView {
    fn default() -> Self {
        Self::new()
    }
}

impl View for TaskEventsView {
    fn name(&self) -> &'static str {
        "TaskEventsView"
    }

    fn is_displayed(&self, browser: &mut dyn Browser) -> bool {
        all_displayed(browser, &[&self.title.locator, &self.import_status.locator])
    }
}

#[derive(Debug, Clone)]
pub struct EventRow {
    /// Severity icon; its class names carry the event type
    pub icon: Locator,
    pub description: Text,
    pub date: Text,
}

/// Grafana cluster dashboard, opened in a second window.
#[derive(Debug, Clone)]
pub struct GrafanaClusterDashboard {
    pub cluster_name: Text,
    pub hosts_total: Text,
    pub volumes_total: Text,
    pub cluster_health: Text,
}

impl GrafanaClusterDashboard {
    pub fn new() -> Self {
        let panel = |title: &str| {
            Text::xpath(format!(
                "//div[contains(@class, 'panel-container')][.//*[contains(@class, 'panel-title')][contains(., '{}')]]//*[contains(@class, 'singlestat-panel-value')]",
                title
            ))
        };
        Self {
            cluster_name: Text::xpath("//div[contains(@class, 'submenu-item')]//*[contains(@class, 'variable-link-wrapper')]"),
            hosts_total: panel("Hosts"),
            volumes_total: panel("Volumes"),
            cluster_health: panel("Health"),
        }
    }
}

impl Default for GrafanaClusterDashboard {
    fn default() -> Self {
        Self::new()
    }
}

impl View for GrafanaClusterDashboard {
    fn name(&self) -> &'static str {
        "GrafanaClusterDashboard"
    }

    fn is_displayed(&self, browser: &mut dyn Browser) -> bool {
        all_displayed(browser, &[&self.cluster_name.locator, &self.cluster_health.locator])
    }
}
