use serde::Serialize;

use crate::browser::{Browser, BrowserError};
use crate::entities::application::Application;
use crate::entities::subject::Subject;
use crate::error::Result;
use crate::view::pages::{ClusterPageView, TaskEventsView, TaskRow};

pub const TASK_STATUSES: &[&str] = &["New", "Completed", "Failed"];
pub const EVENT_TYPES: &[&str] = &["info", "error"];

/// Tasks of one cluster, as listed on its tasks page.
pub struct TasksCollection<'a> {
    app: &'a Application,
    cluster: String,
}

impl<'a> TasksCollection<'a> {
    pub fn new(app: &'a Application, cluster: &str) -> Self {
        Self {
            app,
            cluster: cluster.into(),
        }
    }

    pub fn get_tasks(&self) -> Result<Vec<Task<'a>>> {
        let subject = Subject::Cluster {
            name: self.cluster.clone(),
        };
        self.app.navigate_to(&subject, "Tasks")?;
        let view = ClusterPageView::tasks();
        let mut browser = self.app.browser();
        let count = browser.count(&view.rows())?;
        let mut tasks = Vec::with_capacity(count);
        for i in 1..=count {
            let row = TaskRow::new(&view.rows().nth(i));
            tasks.push(Task {
                app: self.app,
                cluster: self.cluster.clone(),
                task_id: row.task_id.read(&mut *browser)?,
                name: row.name.read(&mut *browser)?,
                submitted: row.submitted.read(&mut *browser)?,
                changed: row.changed.read(&mut *browser)?,
                status: row.status.read(&mut *browser)?,
            });
        }
        Ok(tasks)
    }
}

#[derive(Clone)]
pub struct Task<'a> {
    app: &'a Application,
    pub cluster: String,
    pub task_id: String,
    pub name: String,
    pub submitted: String,
    pub changed: String,
    pub status: String,
}

impl std::fmt::Debug for Task<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Task")
            .field("cluster", &self.cluster)
            .field("task_id", &self.task_id)
            .field("name", &self.name)
            .field("status", &self.status)
            .finish()
    }
}

impl<'a> Task<'a> {
    pub fn subject(&self) -> Subject {
        Subject::Task {
            cluster: self.cluster.clone(),
            task_id: self.task_id.clone(),
        }
    }

    pub fn events(&self) -> TaskEventsCollection<'a> {
        TaskEventsCollection {
            app: self.app,
            subject: self.subject(),
        }
    }

    /// Everything malformed about this task's row; empty when fine.
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if !is_task_id(&self.task_id) {
            problems.push(format!("task id '{}' is not a UUID", self.task_id));
        }
        if !TASK_STATUSES.contains(&self.status.as_str()) {
            problems.push(format!("task {} has unknown status '{}'", self.task_id, self.status));
        }
        for (label, date) in [("submitted", &self.submitted), ("changed", &self.changed)] {
            if !has_plausible_year(date) {
                problems.push(format!("task {} {} date '{}' is implausible", self.task_id, label, date));
            }
        }
        problems
    }
}

/// Event log of one task.
pub struct TaskEventsCollection<'a> {
    app: &'a Application,
    subject: Subject,
}

impl TaskEventsCollection<'_> {
    pub fn get_events(&self) -> Result<Vec<TaskEvent>> {
        self.app.navigate_to(&self.subject, "Events")?;
        Ok(read_events(&mut *self.app.browser(), &TaskEventsView::new())?)
    }
}

/// One line of a task log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskEvent {
    pub event_type: String,
    pub description: String,
    pub date: String,
}

impl TaskEvent {
    pub fn is_error(&self) -> bool {
        self.event_type == "error"
    }

    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if !EVENT_TYPES.contains(&self.event_type.as_str()) {
            problems.push(format!("event type '{}' is unknown", self.event_type));
        }
        if self.description.chars().count() <= 10 {
            problems.push(format!("event description '{}' is too short", self.description));
        }
        if !has_plausible_year(&self.date) {
            problems.push(format!("event date '{}' is implausible", self.date));
        }
        problems
    }
}

/// Read every event row of a displayed task log.
pub fn read_events(browser: &mut dyn Browser, view: &TaskEventsView) -> std::result::Result<Vec<TaskEvent>, BrowserError> {
    let count = browser.count(&view.events)?;
    let mut events = Vec::with_capacity(count);
    for i in 1..=count {
        let row = view.event(i);
        let class = browser.attribute(&row.icon, "class")?.unwrap_or_default();
        events.push(TaskEvent {
            event_type: event_type(&class).to_string(),
            description: row.description.read(browser)?,
            date: row.date.read(browser)?,
        });
    }
    Ok(events)
}

/// Event type from the severity icon's classes.
pub fn event_type(icon_class: &str) -> &'static str {
    if icon_class.contains("error") {
        "error"
    } else if icon_class.contains("info") {
        "info"
    } else if icon_class.contains("warning") {
        "warning"
    } else {
        "unknown"
    }
}

/// 36 characters with a dash after the first eight.
pub fn is_task_id(id: &str) -> bool {
    id.len() == 36 && id.as_bytes().get(8) == Some(&b'-')
}

/// Dates read `<weekday/month> <day> <year> ...`; the year must fall
/// strictly between 2010 and 2100.
pub fn has_plausible_year(date: &str) -> bool {
    date.split_whitespace()
        .nth(2)
        .and_then(|year| year.trim_end_matches(',').parse::<u32>().ok())
        .is_some_and(|year| year > 2010 && year < 2100)
}
