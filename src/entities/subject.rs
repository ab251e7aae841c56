use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::navigation::Subject as NavSubject;

/// Relation naming the web UI from any subject.
pub const WEB_UI: &str = "application.web_ui";
/// Relation naming the owning collection (or entity, for tasks).
pub const PARENT: &str = "parent";

/// Everything destinations are registered for in the console.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Subject {
    WebUi,
    Users,
    User { user_id: String },
    Clusters,
    Cluster { name: String },
    Task { cluster: String, task_id: String },
    ContentCredentials,
    ContentCredential { name: String },
    Templates,
    Template { name: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubjectKind {
    WebUi,
    Users,
    User,
    Clusters,
    Cluster,
    Task,
    ContentCredentials,
    ContentCredential,
    Templates,
    Template,
}

impl SubjectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubjectKind::WebUi => "web_ui",
            SubjectKind::Users => "users",
            SubjectKind::User => "user",
            SubjectKind::Clusters => "clusters",
            SubjectKind::Cluster => "cluster",
            SubjectKind::Task => "task",
            SubjectKind::ContentCredentials => "content_credentials",
            SubjectKind::ContentCredential => "content_credential",
            SubjectKind::Templates => "templates",
            SubjectKind::Template => "template",
        }
    }
}

impl fmt::Display for SubjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Subject {
    /// Identity of a single entity; empty for the web UI and collections.
    pub fn identity(&self) -> &str {
        match self {
            Subject::User { user_id } => user_id,
            Subject::Cluster { name } => name,
            Subject::Task { task_id, .. } => task_id,
            Subject::ContentCredential { name } | Subject::Template { name } => name,
            Subject::WebUi
            | Subject::Users
            | Subject::Clusters
            | Subject::ContentCredentials
            | Subject::Templates => "",
        }
    }
}

impl NavSubject for Subject {
    type Kind = SubjectKind;

    fn kind(&self) -> SubjectKind {
        match self {
            Subject::WebUi => SubjectKind::WebUi,
            Subject::Users => SubjectKind::Users,
            Subject::User { .. } => SubjectKind::User,
            Subject::Clusters => SubjectKind::Clusters,
            Subject::Cluster { .. } => SubjectKind::Cluster,
            Subject::Task { .. } => SubjectKind::Task,
            Subject::ContentCredentials => SubjectKind::ContentCredentials,
            Subject::ContentCredential { .. } => SubjectKind::ContentCredential,
            Subject::Templates => SubjectKind::Templates,
            Subject::Template { .. } => SubjectKind::Template,
        }
    }

    fn related(&self, attribute: &str) -> Option<Subject> {
        match (attribute, self) {
            (WEB_UI, _) => Some(Subject::WebUi),
            (PARENT, Subject::User { .. }) => Some(Subject::Users),
            (PARENT, Subject::Cluster { .. }) => Some(Subject::Clusters),
            (PARENT, Subject::Task { cluster, .. }) => Some(Subject::Cluster {
                name: cluster.clone(),
            }),
            (PARENT, Subject::ContentCredential { .. }) => Some(Subject::ContentCredentials),
            (PARENT, Subject::Template { .. }) => Some(Subject::Templates),
            _ => None,
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = NavSubject::kind(self);
        match self {
            Subject::Task { cluster, task_id } => write!(f, "{}={}/{}", kind, cluster, task_id),
            _ if self.identity().is_empty() => write!(f, "{}", kind),
            _ => write!(f, "{}={}", kind, self.identity()),
        }
    }
}

/// Parses the `Display` form: `clusters`, `cluster=c1`, `task=c1/<task id>`.
impl FromStr for Subject {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, identity) = match s.split_once('=') {
            Some((kind, identity)) => (kind.trim(), Some(identity.trim())),
            None => (s.trim(), None),
        };
        let need = |what: &str| {
            identity
                .filter(|id| !id.is_empty())
                .map(str::to_string)
                .ok_or_else(|| format!("subject '{}' needs a {} (e.g. {}=<{}>)", kind, what, kind, what))
        };
        match kind {
            "web_ui" => Ok(Subject::WebUi),
            "users" => Ok(Subject::Users),
            "user" => Ok(Subject::User {
                user_id: need("user id")?,
            }),
            "clusters" => Ok(Subject::Clusters),
            "cluster" => Ok(Subject::Cluster { name: need("name")? }),
            "task" => {
                let value = need("cluster/task id")?;
                let (cluster, task_id) = value
                    .split_once('/')
                    .ok_or_else(|| format!("task subject must look like task=<cluster>/<task id>, got '{}'", s))?;
                Ok(Subject::Task {
                    cluster: cluster.to_string(),
                    task_id: task_id.to_string(),
                })
            }
            "content_credentials" => Ok(Subject::ContentCredentials),
            "content_credential" => Ok(Subject::ContentCredential { name: need("name")? }),
            "templates" => Ok(Subject::Templates),
            "template" => Ok(Subject::Template { name: need("name")? }),
            other => Err(format!("unknown subject kind '{}'", other)),
        }
    }
}
