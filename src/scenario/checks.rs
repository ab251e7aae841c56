use crate::entities::Subject;
use crate::error::{Error, Result};
use crate::navigation::Subject as _;
use crate::scenario::context::ScenarioContext;
use crate::scenario::model::{AssertionResult, AssertionSpec};

/// Evaluate a list of assertions against the console.
pub fn evaluate_assertions(
    assertions: &[AssertionSpec],
    step_index: usize,
    ctx: &mut ScenarioContext<'_>,
) -> Vec<AssertionResult> {
    assertions
        .iter()
        .map(|spec| evaluate_one(spec, step_index, ctx))
        .collect()
}

/// Evaluate a single assertion. Errors while looking are failures of the
/// assertion, never of the scenario.
pub fn evaluate_one(spec: &AssertionSpec, step_index: usize, ctx: &mut ScenarioContext<'_>) -> AssertionResult {
    match evaluate(spec, step_index, ctx) {
        Ok(result) => result,
        Err(e) => {
            tracing::warn!(assertion = spec.type_name(), error = %e, "assertion could not be evaluated");
            AssertionResult::fail(step_index, spec, None, format!("Failed to evaluate {}: {}", spec.type_name(), e))
        }
    }
}

fn evaluate(spec: &AssertionSpec, step_index: usize, ctx: &mut ScenarioContext<'_>) -> Result<AssertionResult> {
    let app = ctx.app;
    match spec {
        AssertionSpec::UserExists { user_id, expected } => {
            let Some(user) = ctx.user(user_id) else {
                return Ok(AssertionResult::fail(
                    step_index,
                    spec,
                    None,
                    format!("user '{}' was not created in this scenario", user_id),
                ));
            };
            let exists = user.exists()?;
            Ok(AssertionResult::check(
                step_index,
                spec,
                exists == *expected,
                Some(exists.to_string()),
                format!(
                    "user '{}' with email '{}' {} listed",
                    user_id,
                    user.email,
                    if exists { "is" } else { "is not" }
                ),
            ))
        }

        AssertionSpec::ApiUserExists { username, expected } => {
            let (Some(api), Some(session)) = (ctx.api(), ctx.api_session()?) else {
                return Ok(AssertionResult::fail(step_index, spec, None, "no API client configured"));
            };
            let user = api.get_user(&session, username)?;
            let exists = user.is_some();
            Ok(AssertionResult::check(
                step_index,
                spec,
                exists == *expected,
                user.map(|u| format!("{} <{}> ({})", u.username, u.email, u.role)),
                format!("API user '{}' exists: {}, expected {}", username, exists, expected),
            ))
        }

        AssertionSpec::ClusterStatus { cluster, expected } => {
            let status = ctx.cluster(cluster).update()?.status;
            Ok(AssertionResult::check(
                step_index,
                spec,
                status == *expected,
                Some(status.clone()),
                format!("cluster '{}' status is '{}', expected '{}'", cluster, status, expected),
            ))
        }

        AssertionSpec::ClusterManaged { cluster, expected } => {
            let managed = ctx.cluster(cluster).update()?.managed;
            let want = if *expected { "Yes" } else { "No" };
            Ok(AssertionResult::check(
                step_index,
                spec,
                managed == want,
                Some(managed.clone()),
                format!("cluster '{}' managed is '{}', expected '{}'", cluster, managed, want),
            ))
        }

        AssertionSpec::ClusterProfiling { cluster, expected } => {
            let profiling = ctx.cluster(cluster).update()?.profiling;
            Ok(AssertionResult::check(
                step_index,
                spec,
                profiling.as_deref() == Some(expected.as_str()),
                profiling.clone(),
                format!("cluster '{}' profiling is {:?}, expected '{}'", cluster, profiling, expected),
            ))
        }

        AssertionSpec::TasksWellFormed { cluster } => {
            let tasks = ctx.cluster(cluster).tasks().get_tasks()?;
            let problems: Vec<String> = tasks.iter().flat_map(|task| task.problems()).collect();
            let summary = format!("{} tasks", tasks.len());
            if tasks.is_empty() {
                return Ok(AssertionResult::fail(step_index, spec, Some(summary), format!("cluster '{}' lists no tasks", cluster)));
            }
            Ok(AssertionResult::check(step_index, spec, problems.is_empty(), Some(summary), problems.join("; ")))
        }

        AssertionSpec::TaskLogsWellFormed { cluster, limit } => {
            let tasks = ctx.cluster(cluster).tasks().get_tasks()?;
            let limit = limit.unwrap_or(tasks.len());
            let mut problems = Vec::new();
            let mut checked = 0;
            for task in tasks.iter().take(limit) {
                let events = task.events().get_events()?;
                if events.is_empty() {
                    problems.push(format!("task {} has an empty log", task.task_id));
                }
                for event in &events {
                    problems.extend(
                        event
                            .problems()
                            .into_iter()
                            .map(|p| format!("task {}: {}", task.task_id, p)),
                    );
                }
                checked += 1;
            }
            Ok(AssertionResult::check(
                step_index,
                spec,
                problems.is_empty(),
                Some(format!("{} task logs", checked)),
                problems.join("; "),
            ))
        }

        AssertionSpec::DashboardMatches { cluster } => {
            let cluster = ctx.cluster(cluster);
            let attributes = cluster.update()?;
            let dashboard = cluster.get_values_from_dashboard()?;
            let mut mismatches = Vec::new();
            if dashboard.host_count != attributes.hosts_number {
                mismatches.push(format!(
                    "hosts: dashboard {} vs list {}",
                    dashboard.host_count, attributes.hosts_number
                ));
            }
            if let Some(volumes) = &attributes.volumes_number {
                if dashboard.volume_count != *volumes {
                    mismatches.push(format!("volumes: dashboard {} vs list {}", dashboard.volume_count, volumes));
                }
            }
            Ok(AssertionResult::check(
                step_index,
                spec,
                mismatches.is_empty(),
                Some(format!("hosts {}, volumes {}", dashboard.host_count, dashboard.volume_count)),
                mismatches.join("; "),
            ))
        }

        AssertionSpec::TextPresent { expected } => {
            let text = app.visible_text()?;
            let passed = text.to_lowercase().contains(&expected.to_lowercase());
            Ok(AssertionResult::check(
                step_index,
                spec,
                passed,
                Some(format!("(page text, {} chars)", text.len())),
                format!("Text '{}' not found on page", expected),
            ))
        }

        AssertionSpec::TextAbsent { expected } => {
            let text = app.visible_text()?;
            let passed = !text.to_lowercase().contains(&expected.to_lowercase());
            Ok(AssertionResult::check(
                step_index,
                spec,
                passed,
                Some(format!("(page text, {} chars)", text.len())),
                format!("Text '{}' was found on page but should be absent", expected),
            ))
        }

        AssertionSpec::DestinationDisplayed { subject, destination } => {
            let subject: Subject = subject.parse().map_err(Error::Unexpected)?;
            let Some(step) = app.navigator().registry().get(subject.kind(), destination) else {
                return Ok(AssertionResult::fail(
                    step_index,
                    spec,
                    None,
                    format!("no destination '{}' for {}", destination, subject),
                ));
            };
            let view = step.view(&subject);
            let displayed = app.is_displayed(view.as_ref());
            Ok(AssertionResult::check(
                step_index,
                spec,
                displayed,
                Some(view.name().to_string()),
                format!("{} is not displayed", view.name()),
            ))
        }

        AssertionSpec::ContentCredentialExists { name, expected } => {
            let exists = app.content_credentials().instantiate(name).exists()?;
            Ok(AssertionResult::check(
                step_index,
                spec,
                exists == *expected,
                Some(exists.to_string()),
                format!("content credential '{}' exists: {}, expected {}", name, exists, expected),
            ))
        }

        AssertionSpec::TemplateExists { name, expected } => {
            let exists = app.templates().instantiate(name).exists()?;
            Ok(AssertionResult::check(
                step_index,
                spec,
                exists == *expected,
                Some(exists.to_string()),
                format!("template '{}' exists: {}, expected {}", name, exists, expected),
            ))
        }

        AssertionSpec::OperationOutcome { operation, .. } => Ok(AssertionResult::fail(
            step_index,
            spec,
            None,
            format!("{} outcomes are recorded by their step", operation),
        )),
    }
}
