use std::collections::HashMap;

use crate::api::{ApiClient, ApiSession};
use crate::entities::Application;
use crate::entities::clusters::Cluster;
use crate::entities::users::User;
use crate::error::Result;
use crate::scenario::model::AssertionResult;

/// Tracks the execution state and results of a running scenario.
///
/// Entities are cached by the identity the scenario names them with, so
/// later steps see earlier changes (a cluster's new name after import, a
/// user's edited email).
pub struct ScenarioContext<'a> {
    pub app: &'a Application,

    /// Current step index (0-based)
    pub current_step: usize,

    /// All assertion results collected during execution
    pub assertion_results: Vec<AssertionResult>,

    api: Option<&'a ApiClient>,
    api_session: Option<ApiSession>,
    users: HashMap<String, User<'a>>,
    clusters: HashMap<String, Cluster<'a>>,
}

impl<'a> ScenarioContext<'a> {
    pub fn new(app: &'a Application, api: Option<&'a ApiClient>) -> Self {
        ScenarioContext {
            app,
            current_step: 0,
            assertion_results: Vec::new(),
            api,
            api_session: None,
            users: HashMap::new(),
            clusters: HashMap::new(),
        }
    }

    /// Record assertion results from a step.
    pub fn record_assertions(&mut self, results: Vec<AssertionResult>) {
        self.assertion_results.extend(results);
    }

    pub fn record(&mut self, result: AssertionResult) {
        self.assertion_results.push(result);
    }

    /// Check if all recorded assertions passed.
    pub fn all_passed(&self) -> bool {
        self.assertion_results.iter().all(|r| r.passed)
    }

    pub fn pass_count(&self) -> usize {
        self.assertion_results.iter().filter(|r| r.passed).count()
    }

    pub fn fail_count(&self) -> usize {
        self.assertion_results.iter().filter(|r| !r.passed).count()
    }

    pub fn remember_user(&mut self, user: User<'a>) {
        self.users.insert(user.user_id.clone(), user);
    }

    pub fn user(&self, user_id: &str) -> Option<&User<'a>> {
        self.users.get(user_id)
    }

    pub fn user_mut(&mut self, user_id: &str) -> Option<&mut User<'a>> {
        self.users.get_mut(user_id)
    }

    pub fn forget_user(&mut self, user_id: &str) -> Option<User<'a>> {
        self.users.remove(user_id)
    }

    /// Cached cluster entity, created on first use.
    pub fn cluster(&mut self, key: &str) -> &mut Cluster<'a> {
        let app = self.app;
        self.clusters
            .entry(key.to_string())
            .or_insert_with(|| app.clusters().instantiate(key))
    }

    pub fn api(&self) -> Option<&'a ApiClient> {
        self.api
    }

    /// API session, logging in on first use with the console credentials.
    pub fn api_session(&mut self) -> Result<Option<ApiSession>> {
        let Some(api) = self.api else {
            return Ok(None);
        };
        if self.api_session.is_none() {
            let console = self.app.console();
            self.api_session = Some(api.login(&console.username, &console.password)?);
        }
        Ok(self.api_session.clone())
    }

    /// Log out of the API session, if one was opened.
    pub fn close(&mut self) {
        if let (Some(api), Some(session)) = (self.api, self.api_session.take()) {
            if let Err(e) = api.logout(&session) {
                tracing::warn!(error = %e, "api logout failed");
            }
        }
    }
}
