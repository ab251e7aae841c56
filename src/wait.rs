use std::thread;
use std::time::{Duration, Instant};

use thiserror::Error;

use crate::error::Error;

/// A condition did not hold within its bound.
#[derive(Debug, Clone, Error)]
#[error("{message} (waited {waited:.1?}{})", status_suffix(.last_status))]
pub struct WaitTimeout {
    pub message: String,
    pub waited: Duration,
    /// Last value seen by a status poll
    pub last_status: Option<String>,
}

fn status_suffix(last_status: &Option<String>) -> String {
    match last_status {
        Some(status) => format!(", last status '{}'", status),
        None => String::new(),
    }
}

/// Terminal value reached by [`Wait::until_status`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusOutcome {
    Succeeded(String),
    Failed(String),
}

impl StatusOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, StatusOutcome::Succeeded(_))
    }

    pub fn status(&self) -> &str {
        match self {
            StatusOutcome::Succeeded(s) | StatusOutcome::Failed(s) => s,
        }
    }
}

/// Bounded polling: evaluate a condition every `delay` until it holds or
/// `timeout` has elapsed. The condition is always evaluated at least once.
#[derive(Debug, Clone)]
pub struct Wait {
    pub timeout: Duration,
    pub delay: Duration,
    pub message: String,
}

impl Wait {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            delay: Duration::from_secs(1),
            message: "condition not met in time".into(),
        }
    }

    pub fn secs(timeout: u64) -> Self {
        Self::new(Duration::from_secs(timeout))
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn delay_secs(self, delay: u64) -> Self {
        self.delay(Duration::from_secs(delay))
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Poll `condition` until it returns true. Returns the time it took.
    pub fn until<F>(&self, mut condition: F) -> Result<Duration, WaitTimeout>
    where
        F: FnMut() -> bool,
    {
        self.until_some(|| condition().then_some(()))
            .map(|(_, waited)| waited)
    }

    /// Poll `probe` until it yields a value.
    pub fn until_some<T, F>(&self, mut probe: F) -> Result<(T, Duration), WaitTimeout>
    where
        F: FnMut() -> Option<T>,
    {
        let start = Instant::now();
        loop {
            if let Some(value) = probe() {
                return Ok((value, start.elapsed()));
            }
            self.pause(start, None)?;
        }
    }

    /// Poll a status string until it reaches a success or failure value.
    ///
    /// A failure value ends the poll immediately, without waiting out the
    /// timeout. Errors from `observe` propagate unchanged.
    pub fn until_status<F>(
        &self,
        success: &[&str],
        failure: &[&str],
        mut observe: F,
    ) -> Result<StatusOutcome, Error>
    where
        F: FnMut() -> Result<String, Error>,
    {
        let start = Instant::now();
        loop {
            let status = observe()?;
            tracing::debug!(status = %status, "polled status");
            if success.contains(&status.as_str()) {
                return Ok(StatusOutcome::Succeeded(status));
            }
            if failure.contains(&status.as_str()) {
                return Ok(StatusOutcome::Failed(status));
            }
            self.pause(start, Some(status))?;
        }
    }

    /// Sleep before the next attempt, or fail when the bound is spent.
    fn pause(&self, start: Instant, last_status: Option<String>) -> Result<(), WaitTimeout> {
        let elapsed = start.elapsed();
        if elapsed >= self.timeout {
            return Err(WaitTimeout {
                message: self.message.clone(),
                waited: elapsed,
                last_status,
            });
        }
        thread::sleep(self.delay.min(self.timeout - elapsed));
        Ok(())
    }
}
