use serde::{Deserialize, Serialize};

use crate::browser::{Browser, BrowserError};
use crate::entities::application::Application;
use crate::entities::diagnostics::{self, FailureReport};
use crate::entities::subject::Subject;
use crate::entities::tasks::TasksCollection;
use crate::error::{Error, Result};
use crate::view::View;
use crate::view::clusters::ClustersView;
use crate::view::dialogs::{ConfirmationView, ImportClusterView, TaskSubmittedView};
use crate::view::navbar::NavBarView;
use crate::view::pages::{ClusterPageView, GrafanaClusterDashboard, TaskEventsView};
use crate::wait::StatusOutcome;

pub const READY_TO_USE: &str = "Ready to Use";
pub const IMPORT_FAILED: &str = "Import Failed. View Details";
pub const READY_TO_IMPORT: &str = "Ready to Import";
pub const UNMANAGE_FAILED: &str = "Unmanage Failed. View Details";
/// Not a console status; reported once an unmanage has fully settled.
pub const UNMANAGED: &str = "Unmanaged";
pub const TASK_COMPLETED: &str = "Completed";
pub const TASK_FAILED: &str = "Failed";

/// Profiling choice on the import form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Profiling {
    #[default]
    Enable,
    Disable,
    LeaveAsIs,
}

impl Profiling {
    /// Radio button value.
    pub fn value(&self) -> &'static str {
        match self {
            Profiling::Enable => "enable",
            Profiling::Disable => "disable",
            Profiling::LeaveAsIs => "leaveAsIs",
        }
    }
}

/// Outcome of a long-running cluster operation that reached a terminal
/// status. Running out of time is an error, not a failure.
#[derive(Debug, Clone, PartialEq)]
pub enum OperationResult {
    Succeeded,
    Failed(FailureReport),
}

impl OperationResult {
    pub fn is_success(&self) -> bool {
        matches!(self, OperationResult::Succeeded)
    }
}

/// A cluster row as shown in the clusters list.
///
/// Volumes, alerts and profiling are only shown for managed clusters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClusterAttributes {
    pub health: Option<String>,
    pub version: String,
    pub managed: String,
    pub hosts_number: String,
    pub status: String,
    pub volumes_number: Option<String>,
    pub alerts: Option<String>,
    pub profiling: Option<String>,
}

impl ClusterAttributes {
    pub fn is_managed(&self) -> bool {
        self.managed == "Yes"
    }
}

/// Counters shown on the Grafana cluster dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardValues {
    pub cluster_name: String,
    pub host_count: String,
    pub volume_count: String,
    pub health: String,
}

pub struct ClustersCollection<'a> {
    app: &'a Application,
}

impl<'a> ClustersCollection<'a> {
    pub fn new(app: &'a Application) -> Self {
        Self { app }
    }

    /// Entity for a cluster listed as `name`, without reading the UI.
    pub fn instantiate(&self, name: &str) -> Cluster<'a> {
        Cluster {
            app: self.app,
            cluster_id: name.into(),
            name: name.into(),
            attributes: ClusterAttributes::default(),
        }
    }

    /// Every cluster in the list with its current attributes.
    pub fn get_clusters(&self) -> Result<Vec<Cluster<'a>>> {
        self.app.navigate_to(&Subject::Clusters, "All")?;
        let view = ClustersView::new();
        let mut browser = self.app.browser();
        let ids = view.all_ids(&mut *browser)?;
        let mut clusters = Vec::with_capacity(ids.len());
        for id in ids {
            let attributes = read_row(&mut *browser, &view, &id)?;
            clusters.push(Cluster {
                app: self.app,
                cluster_id: id.clone(),
                name: id,
                attributes,
            });
        }
        tracing::debug!(count = clusters.len(), "clusters listed");
        Ok(clusters)
    }
}

/// Read one row of the clusters list. A missing row is `NoSuchElement`.
fn read_row(browser: &mut dyn Browser, view: &ClustersView, name: &str) -> std::result::Result<ClusterAttributes, BrowserError> {
    let row = view.cluster(name);
    if browser.count(&row.root)? == 0 {
        return Err(BrowserError::NoSuchElement { locator: row.root });
    }
    let managed = row.managed.read(browser)?;
    let (volumes_number, alerts, profiling) = if managed == "Yes" {
        (
            Some(row.volumes.read(browser)?),
            Some(row.alerts.read(browser)?),
            Some(row.profiling.read(browser)?),
        )
    } else {
        (None, None, None)
    };
    Ok(ClusterAttributes {
        health: row.health(browser)?,
        version: row.cluster_version.read(browser)?,
        hosts_number: row.hosts.read(browser)?,
        status: row.status.read(browser)?,
        managed,
        volumes_number,
        alerts,
        profiling,
    })
}

/// A storage cluster known to the console.
///
/// `name` is what the list shows: the id until the cluster is imported
/// under a custom name, and the id again after it is unmanaged.
#[derive(Clone)]
pub struct Cluster<'a> {
    app: &'a Application,
    pub cluster_id: String,
    pub name: String,
    pub attributes: ClusterAttributes,
}

impl std::fmt::Debug for Cluster<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cluster")
            .field("cluster_id", &self.cluster_id)
            .field("name", &self.name)
            .field("attributes", &self.attributes)
            .finish()
    }
}

impl<'a> Cluster<'a> {
    pub fn subject(&self) -> Subject {
        Subject::Cluster {
            name: self.name.clone(),
        }
    }

    /// Re-read the cluster's row and return the fresh attributes.
    pub fn update(&mut self) -> Result<ClusterAttributes> {
        self.app.navigate_to(&Subject::Clusters, "All")?;
        let attributes = read_row(&mut *self.app.browser(), &ClustersView::new(), &self.name)?;
        self.attributes = attributes.clone();
        Ok(attributes)
    }

    /// Import the cluster, optionally renaming it, and wait until it is
    /// ready to use (or the import failed).
    pub fn cluster_import(
        &mut self,
        name: Option<&str>,
        profiling: Profiling,
        view_progress: bool,
    ) -> Result<OperationResult> {
        self.app.navigate_to(&self.subject(), "Import")?;
        let form = ImportClusterView::new();
        {
            let mut browser = self.app.browser();
            if let Some(name) = name {
                form.cluster_name.fill(&mut *browser, name)?;
            }
            form.profiling.fill(&mut *browser, profiling.value())?;
            form.confirm_import.click(&mut *browser)?;
        }
        tracing::info!(cluster = %self.name, ?profiling, "import requested");

        let submitted = TaskSubmittedView::import();
        self.app.wait_displayed(&submitted, self.app.waits().view())?;
        if let Some(name) = name {
            self.name = name.to_string();
        }

        if view_progress {
            if let StatusOutcome::Failed(status) = self.follow_task(&submitted)? {
                return Ok(self.failed("import", &status, false));
            }
            let details = TaskEventsView::new();
            details.cluster_details.click(&mut *self.app.browser())?;
            self.app
                .wait_displayed(&ClusterPageView::hosts(), self.app.waits().view())?;
        } else {
            submitted.close_button.click(&mut *self.app.browser())?;
        }

        self.wait_listed()?;
        let outcome = self
            .app
            .waits()
            .status()
            .message(format!("cluster '{}' import did not finish", self.name))
            .until_status(&[READY_TO_USE], &[IMPORT_FAILED], || Ok(self.update()?.status))?;
        if let StatusOutcome::Failed(status) = outcome {
            return Ok(self.failed("import", &status, true));
        }

        self.app
            .waits()
            .status()
            .message(format!("cluster '{}' not shown as managed", self.name))
            .until_status(&["Yes"], &[], || Ok(self.update()?.managed))?;
        tracing::info!(cluster = %self.name, "cluster imported");
        Ok(OperationResult::Succeeded)
    }

    /// Unmanage the cluster and wait until it is ready to import again,
    /// no longer managed and still listing the same hosts.
    ///
    /// The row is renamed back to `original_id` while the task runs, so a
    /// row that disappears is looked up again under that id.
    pub fn unmanage(&mut self, original_id: &str, view_progress: bool) -> Result<OperationResult> {
        let hosts_before = self.update()?.hosts_number;
        ClustersView::new()
            .cluster(&self.name)
            .actions
            .select(&mut *self.app.browser(), "Unmanage")?;

        let dialog = ConfirmationView::unmanage();
        self.app.wait_displayed(&dialog, self.app.waits().view())?;
        dialog.confirm.click(&mut *self.app.browser())?;
        tracing::info!(cluster = %self.name, "unmanage requested");

        let submitted = TaskSubmittedView::unmanage();
        self.app.wait_displayed(&submitted, self.app.waits().view())?;
        if view_progress {
            if let StatusOutcome::Failed(status) = self.follow_task(&submitted)? {
                return Ok(self.failed("unmanage", &status, false));
            }
        } else {
            submitted.close_button.click(&mut *self.app.browser())?;
        }

        let outcome = self
            .app
            .waits()
            .status()
            .message(format!("cluster '{}' unmanage did not finish", self.name))
            .until_status(&[UNMANAGED], &[UNMANAGE_FAILED], || match self.update() {
                Ok(attributes) => Ok(unmanage_progress(&attributes, &hosts_before)),
                Err(Error::Browser(e)) if e.is_missing_element() => {
                    if self.name != original_id {
                        tracing::debug!(from = %self.name, to = original_id, "cluster row renamed");
                        self.name = original_id.to_string();
                    }
                    Ok(String::new())
                }
                Err(e) => Err(e),
            })?;
        if let StatusOutcome::Failed(status) = outcome {
            return Ok(self.failed("unmanage", &status, true));
        }
        tracing::info!(cluster = %self.name, "cluster unmanaged");
        Ok(OperationResult::Succeeded)
    }

    pub fn enable_profiling(&mut self) -> Result<()> {
        self.set_profiling("Enable Profiling", "Enabled")
    }

    pub fn disable_profiling(&mut self) -> Result<()> {
        self.set_profiling("Disable Profiling", "Disabled")
    }

    fn set_profiling(&mut self, action: &str, expected: &str) -> Result<()> {
        self.app.navigate_to(&Subject::Clusters, "All")?;
        ClustersView::new()
            .cluster(&self.name)
            .actions
            .select(&mut *self.app.browser(), action)?;
        self.app
            .waits()
            .status()
            .message(format!("profiling of '{}' not {}", self.name, expected))
            .until_status(&[expected], &[], || {
                Ok(self.update()?.profiling.unwrap_or_default())
            })?;
        // the list flips before the backend has finished the change
        std::thread::sleep(self.app.waits().settle());
        tracing::info!(cluster = %self.name, profiling = expected, "profiling changed");
        Ok(())
    }

    /// Open the cluster's Grafana dashboard, read its counters and return
    /// to the console window.
    pub fn get_values_from_dashboard(&self) -> Result<DashboardValues> {
        self.app.navigate_to(&self.subject(), "Dashboard")?;
        let values = self.read_dashboard();
        close_extra_windows(&mut *self.app.browser())?;
        values
    }

    fn read_dashboard(&self) -> Result<DashboardValues> {
        let view = GrafanaClusterDashboard::new();
        let mut browser = self.app.browser();
        let last_word = |text: String| text.split_whitespace().last().unwrap_or_default().to_string();
        Ok(DashboardValues {
            cluster_name: view.cluster_name.read(&mut *browser)?,
            host_count: last_word(view.hosts_total.read(&mut *browser)?),
            volume_count: last_word(view.volumes_total.read(&mut *browser)?),
            health: view.cluster_health.read(&mut *browser)?,
        })
    }

    /// Expand the cluster onto newly detected hosts and wait until it is
    /// ready to use again.
    pub fn expand(&mut self) -> Result<()> {
        self.app.navigate_to(&Subject::Clusters, "All")?;
        ClustersView::new()
            .cluster(&self.name)
            .actions
            .select(&mut *self.app.browser(), "Expand")?;
        let dialog = ConfirmationView::expand();
        self.app.wait_displayed(&dialog, self.app.waits().view())?;
        dialog.confirm.click(&mut *self.app.browser())?;
        tracing::info!(cluster = %self.name, "expand requested");

        self.app
            .waits()
            .status()
            .message(format!("cluster '{}' expansion did not finish", self.name))
            .until_status(&[READY_TO_USE], &[], || Ok(self.update()?.status))?;
        tracing::info!(cluster = %self.name, hosts = %self.attributes.hosts_number, "cluster expanded");
        Ok(())
    }

    pub fn hosts_view(&self) -> Result<Box<dyn View>> {
        self.app.navigate_to(&self.subject(), "Hosts")
    }

    pub fn tasks(&self) -> TasksCollection<'a> {
        TasksCollection::new(self.app, &self.name)
    }

    /// From a task-submitted page, open the task log and poll its status.
    fn follow_task(&self, submitted: &TaskSubmittedView) -> Result<StatusOutcome> {
        submitted.view_progress.click(&mut *self.app.browser())?;
        let details = TaskEventsView::new();
        self.app.wait_displayed(&details, self.app.waits().view())?;
        self.app
            .waits()
            .task()
            .message(format!("task of cluster '{}' did not finish", self.name))
            .until_status(&[TASK_COMPLETED], &[TASK_FAILED], || {
                Ok(details.import_status.read(&mut *self.app.browser())?)
            })
    }

    /// Wait for the clusters list to show this cluster's row.
    fn wait_listed(&self) -> Result<()> {
        if !self.app.is_displayed(&ClustersView::new()) {
            let navbar = NavBarView::new();
            navbar
                .clusters
                .fill(&mut *self.app.browser(), "All Clusters")?;
        }
        let view = ClustersView::new();
        self.app.wait_displayed(&view, self.app.waits().view())?;
        let row = view.cluster(&self.name);
        self.app
            .waits()
            .view()
            .message(format!("cluster '{}' not listed", self.name))
            .until(|| self.app.browser().count(&row.root).unwrap_or(0) > 0)?;
        Ok(())
    }

    fn failed(&self, operation: &str, status: &str, open_details: bool) -> OperationResult {
        OperationResult::Failed(diagnostics::collect(
            self.app,
            &self.name,
            operation,
            status,
            open_details,
        ))
    }
}

/// Poll value of an unmanage: `UNMANAGED` once the row is ready to import,
/// no longer managed and lists `hosts_before` hosts, otherwise a summary
/// of what is still pending.
fn unmanage_progress(attributes: &ClusterAttributes, hosts_before: &str) -> String {
    if attributes.status != READY_TO_IMPORT {
        return attributes.status.clone();
    }
    if attributes.managed == "No" && attributes.hosts_number == hosts_before {
        return UNMANAGED.to_string();
    }
    format!(
        "{} (managed {}, {} hosts, expected {})",
        attributes.status, attributes.managed, attributes.hosts_number, hosts_before
    )
}

/// Close every window but one and switch to the one left.
pub fn close_extra_windows(browser: &mut dyn Browser) -> std::result::Result<(), BrowserError> {
    let mut handles = browser.window_handles()?;
    while handles.len() > 1 {
        browser.close_window()?;
        handles = browser.window_handles()?;
        if let Some(last) = handles.last() {
            browser.switch_to_window(last)?;
        }
    }
    Ok(())
}
