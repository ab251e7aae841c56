use std::time::{Duration, Instant};

use crate::api::ApiClient;
use crate::entities::Application;
use crate::entities::Subject;
use crate::entities::clusters::OperationResult;
use crate::error::{Error, Result};
use crate::scenario::checks::evaluate_assertions;
use crate::scenario::context::ScenarioContext;
use crate::scenario::model::{AssertionResult, AssertionSpec, Scenario, ScenarioResult, Step};

/// Executes a Scenario step-by-step against an application session.
pub struct ScenarioRunner;

impl ScenarioRunner {
    /// Run a complete scenario.
    ///
    /// The first step that errors ends the scenario; its error and the page
    /// text at that moment are reported. Assertion failures are collected
    /// and do not stop the run.
    pub fn run(scenario: &Scenario, app: &Application, api: Option<&ApiClient>) -> ScenarioResult {
        let start = Instant::now();
        let mut ctx = ScenarioContext::new(app, api);
        tracing::info!(scenario = %scenario.name, steps = scenario.steps.len(), "running scenario");

        for (i, step) in scenario.steps.iter().enumerate() {
            ctx.current_step = i;
            tracing::debug!(step = i, action = step.action(), "executing step");

            if let Err(e) = Self::execute_step(step, i, &mut ctx) {
                let visible_text = app.visible_text().ok();
                tracing::warn!(scenario = %scenario.name, step = i, action = step.action(), error = %e, "step failed");
                ctx.close();
                return ScenarioResult {
                    scenario_name: scenario.name.clone(),
                    passed: false,
                    steps_run: i + 1,
                    assertion_results: ctx.assertion_results,
                    error: Some(format!("Step {} ({}) failed: {}", i, step.action(), e)),
                    visible_text,
                    duration_ms: start.elapsed().as_millis(),
                };
            }
        }

        ctx.close();
        let passed = ctx.all_passed();
        ScenarioResult {
            scenario_name: scenario.name.clone(),
            passed,
            steps_run: scenario.steps.len(),
            assertion_results: ctx.assertion_results,
            error: None,
            visible_text: None,
            duration_ms: start.elapsed().as_millis(),
        }
    }

    /// Execute a single step.
    fn execute_step(step: &Step, step_index: usize, ctx: &mut ScenarioContext<'_>) -> Result<()> {
        let app = ctx.app;
        match step {
            Step::Login => {
                app.navigate_to(&Subject::WebUi, "LoggedIn")?;
                Ok(())
            }

            Step::Navigate { subject, destination } => {
                let subject: Subject = subject.parse().map_err(Error::Unexpected)?;
                app.navigate_to(&subject, destination)?;
                Ok(())
            }

            Step::CreateUser(new_user) => {
                let user = app.users().create(new_user.clone())?;
                ctx.remember_user(user);
                Ok(())
            }

            Step::EditUser { user_id, changes } => {
                let user = ctx.user_mut(user_id).ok_or_else(|| Error::NotFound {
                    entity: "user",
                    id: user_id.clone(),
                })?;
                user.edit(changes)?;
                // What the scenario now expects the row to show
                if let Some(name) = &changes.name {
                    user.name = name.clone();
                }
                if let Some(email) = &changes.email {
                    user.email = email.clone();
                }
                Ok(())
            }

            Step::DeleteUser { user_id } => {
                let user = ctx.user(user_id).ok_or_else(|| Error::NotFound {
                    entity: "user",
                    id: user_id.clone(),
                })?;
                user.delete()?;
                Ok(())
            }

            Step::ImportCluster {
                cluster,
                name,
                profiling,
                view_progress,
                expect_success,
            } => {
                let outcome = ctx
                    .cluster(cluster)
                    .cluster_import(name.as_deref(), *profiling, *view_progress)?;
                Self::record_outcome(ctx, step_index, "import", cluster, *expect_success, &outcome);
                Ok(())
            }

            Step::UnmanageCluster {
                cluster,
                view_progress,
                expect_success,
            } => {
                let entity = ctx.cluster(cluster);
                let original_id = entity.cluster_id.clone();
                let outcome = entity.unmanage(&original_id, *view_progress)?;
                Self::record_outcome(ctx, step_index, "unmanage", cluster, *expect_success, &outcome);
                Ok(())
            }

            Step::EnableProfiling { cluster } => ctx.cluster(cluster).enable_profiling(),

            Step::DisableProfiling { cluster } => ctx.cluster(cluster).disable_profiling(),

            Step::ExpandCluster { cluster } => ctx.cluster(cluster).expand(),

            Step::CreateContentCredential(credential) => {
                app.content_credentials().create(credential.clone())?;
                Ok(())
            }

            Step::DeleteContentCredential { name } => app.content_credentials().instantiate(name).delete(),

            Step::CreateTemplate(template) => {
                app.templates().create(template.clone())?;
                Ok(())
            }

            Step::DeleteTemplate { name } => app.templates().instantiate(name).delete(),

            Step::Wait { duration_ms } => {
                std::thread::sleep(Duration::from_millis(*duration_ms));
                Ok(())
            }

            Step::Assert { assertions } => {
                let results = evaluate_assertions(assertions, step_index, ctx);
                ctx.record_assertions(results);
                Ok(())
            }
        }
    }

    /// A terminal status that differs from what the step expected is a soft
    /// failure, reported with the collected diagnostics.
    fn record_outcome(
        ctx: &mut ScenarioContext<'_>,
        step_index: usize,
        operation: &str,
        cluster: &str,
        expect_success: bool,
        outcome: &OperationResult,
    ) {
        let spec = AssertionSpec::OperationOutcome {
            operation: operation.to_string(),
            cluster: cluster.to_string(),
            expect_success,
        };
        let (actual, detail) = match outcome {
            OperationResult::Succeeded => ("succeeded".to_string(), String::new()),
            OperationResult::Failed(report) => {
                let mut detail = format!("status '{}'", report.status);
                if !report.errors.is_empty() {
                    detail.push_str(&format!(", errors: {}", report.errors.join(" | ")));
                }
                if let Some(path) = &report.screenshot {
                    detail.push_str(&format!(", screenshot: {}", path.display()));
                }
                ("failed".to_string(), detail)
            }
        };
        let message = format!(
            "{} of cluster '{}' {} ({}), expected {}",
            operation,
            cluster,
            actual,
            detail,
            if expect_success { "success" } else { "failure" }
        );
        ctx.record(AssertionResult::check(
            step_index,
            &spec,
            outcome.is_success() == expect_success,
            Some(actual),
            message,
        ));
    }
}
