//! Evidence gathered when an import or unmanage ends in a failed status.

use std::path::PathBuf;

use serde::Serialize;

use crate::entities::application::Application;
use crate::entities::tasks::read_events;
use crate::view::clusters::ClustersView;
use crate::view::pages::TaskEventsView;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailureReport {
    pub operation: String,
    pub cluster: String,
    pub status: String,
    /// Descriptions of the error events in the task log
    pub errors: Vec<String>,
    pub screenshot: Option<PathBuf>,
}

/// Best effort: nothing here fails the caller.
///
/// With `open_details` the failed status link in the clusters list is
/// followed to the task log first; otherwise the log is assumed to be on
/// screen already.
pub fn collect(app: &Application, cluster: &str, operation: &str, status: &str, open_details: bool) -> FailureReport {
    let view = TaskEventsView::new();
    if open_details {
        let row = ClustersView::new().cluster(cluster);
        let clicked = row.status.click(&mut *app.browser());
        match clicked {
            Ok(()) => {
                if let Err(e) = app.wait_displayed(&view, app.waits().view()) {
                    tracing::warn!(cluster, error = %e, "task details not displayed");
                }
            }
            Err(e) => tracing::warn!(cluster, error = %e, "cannot open task details"),
        }
    }

    let events = read_events(&mut *app.browser(), &view);
    let errors = match events {
        Ok(events) => events
            .into_iter()
            .filter(|event| event.is_error())
            .map(|event| event.description)
            .collect(),
        Err(e) => {
            tracing::warn!(cluster, error = %e, "cannot read task log");
            Vec::new()
        }
    };
    let screenshot = app.screenshot(&format!("{}_{}", cluster, operation));

    tracing::error!(
        cluster,
        operation,
        status,
        errors = ?errors,
        screenshot = ?screenshot,
        "cluster operation failed"
    );

    FailureReport {
        operation: operation.into(),
        cluster: cluster.into(),
        status: status.into(),
        errors,
        screenshot,
    }
}
