use std::time::{Duration, Instant};

use crate::browser::Browser;
use crate::navigation::error::NavigationError;
use crate::navigation::registry::Registry;
use crate::navigation::step::{Prerequisite, Subject};
use crate::trace::logger::TraceLogger;
use crate::trace::trace::{NavOutcome, TraceEvent};
use crate::view::View;
use crate::wait::Wait;

const DEFAULT_MAX_DEPTH: usize = 16;

/// Resolves destinations against a registry, one at a time.
pub struct Navigator<S: Subject> {
    registry: Registry<S>,
    wait: Wait,
    max_depth: usize,
    trace: TraceLogger,
}

impl<S: Subject> Navigator<S> {
    pub fn new(registry: Registry<S>) -> Self {
        Self {
            registry,
            wait: Wait::secs(30).delay(Duration::from_millis(500)),
            max_depth: DEFAULT_MAX_DEPTH,
            trace: TraceLogger::disabled(),
        }
    }

    /// Default bound for the display check after a step.
    pub fn with_wait(mut self, wait: Wait) -> Self {
        self.wait = wait;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_trace(mut self, trace: TraceLogger) -> Self {
        self.trace = trace;
        self
    }

    pub fn registry(&self) -> &Registry<S> {
        &self.registry
    }

    /// Reach `destination` of `subject` and return its view.
    ///
    /// Already being there performs no interaction at all. Otherwise the
    /// prerequisite chain is resolved depth-first, then the step runs and
    /// the view must become displayed within the step's bound.
    pub fn navigate_to(
        &self,
        browser: &mut dyn Browser,
        subject: &S,
        destination: &str,
    ) -> Result<Box<dyn View>, NavigationError> {
        let mut chain = Vec::new();
        self.resolve(browser, subject, destination, &mut chain)
    }

    fn resolve(
        &self,
        browser: &mut dyn Browser,
        subject: &S,
        destination: &str,
        chain: &mut Vec<(S::Kind, String)>,
    ) -> Result<Box<dyn View>, NavigationError> {
        let key = (subject.kind(), destination.to_string());
        if chain.contains(&key) {
            let mut names: Vec<String> = chain
                .iter()
                .map(|(kind, name)| format!("{}:{}", kind, name))
                .collect();
            names.push(format!("{}:{}", key.0, key.1));
            return Err(NavigationError::Cycle { chain: names });
        }
        if chain.len() >= self.max_depth {
            return Err(NavigationError::TooDeep {
                limit: self.max_depth,
                destination: destination.into(),
            });
        }

        let step = self
            .registry
            .get(subject.kind(), destination)
            .ok_or_else(|| NavigationError::Unregistered {
                kind: subject.kind().to_string(),
                destination: destination.into(),
            })?;
        let depth = chain.len();
        let view = step.view(subject);

        if step.am_i_here(subject, browser) {
            tracing::debug!(%subject, destination, "already at destination");
            self.trace.log(
                &TraceEvent::now(&subject.to_string(), destination, depth, NavOutcome::AlreadyHere)
                    .with_view(view.name()),
            );
            return Ok(view);
        }

        chain.push(key);
        match step.prerequisite() {
            Prerequisite::None => {}
            Prerequisite::SameSubject(name) => {
                self.resolve(browser, subject, name, chain)?;
            }
            Prerequisite::RelatedVia {
                attribute,
                destination: name,
            } => {
                let related = subject.related(attribute).ok_or_else(|| {
                    NavigationError::UnresolvedRelation {
                        subject: subject.to_string(),
                        attribute: attribute.into(),
                    }
                })?;
                self.resolve(browser, &related, name, chain)?;
            }
        }
        chain.pop();

        let start = Instant::now();
        tracing::info!(%subject, destination, view = view.name(), "navigating");
        if let Err(e) = step.step(subject, browser) {
            self.trace.log(
                &TraceEvent::now(&subject.to_string(), destination, depth, NavOutcome::Failed)
                    .with_elapsed(start.elapsed())
                    .with_error(&e),
            );
            return Err(e);
        }

        let wait = step.wait().unwrap_or_else(|| self.wait.clone());
        match wait.until(|| view.is_displayed(browser)) {
            Ok(_) => {
                self.trace.log(
                    &TraceEvent::now(&subject.to_string(), destination, depth, NavOutcome::Stepped)
                        .with_view(view.name())
                        .with_elapsed(start.elapsed()),
                );
                Ok(view)
            }
            Err(timeout) => {
                let visible_text = browser.page_text().unwrap_or_default();
                let error = NavigationError::Timeout {
                    subject: subject.to_string(),
                    destination: destination.into(),
                    view: view.name(),
                    waited: timeout.waited,
                    visible_text,
                };
                tracing::warn!(%subject, destination, view = view.name(), "destination not displayed in time");
                self.trace.log(
                    &TraceEvent::now(&subject.to_string(), destination, depth, NavOutcome::Failed)
                        .with_view(view.name())
                        .with_elapsed(start.elapsed())
                        .with_error(&error),
                );
                Err(error)
            }
        }
    }
}
