use std::fmt;
use std::process::Command;

use serde::Serialize;
use thiserror::Error;

use crate::cli::config::NamedRepo;

/// Repository id the packages under test are registered as.
pub const PRODUCT_REPO_ID: &str = "tendrl";

#[derive(Debug, Error)]
pub enum PackagingError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to create a working directory: {0}")]
    TempDir(#[source] std::io::Error),
}

/// Which tool a check runs; decides how its output is judged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    Repoclosure,
    Rpmlint,
    Rpmdeplint,
}

/// A packaging check ready to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckCommand {
    pub kind: CheckKind,
    pub program: String,
    pub args: Vec<String>,
    /// Run inside a fresh temporary directory (repoclosure writes caches)
    pub in_tempdir: bool,
}

impl fmt::Display for CheckCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// `repoclosure --newest` of the product repo, resolving against the base
/// repos as lookaside.
pub fn repoclosure(repo_url: &str, base_repos: &[NamedRepo]) -> CheckCommand {
    let mut args = vec!["--newest".to_string()];
    for repo in base_repos {
        args.push("--repofrompath".into());
        args.push(format!("{},{}", repo.name, repo.url));
        args.push(format!("--lookaside={}", repo.name));
    }
    args.push("--repofrompath".into());
    args.push(format!("{},{}", PRODUCT_REPO_ID, repo_url));
    args.push(format!("--repoid={}", PRODUCT_REPO_ID));
    CheckCommand {
        kind: CheckKind::Repoclosure,
        program: "repoclosure".into(),
        args,
        in_tempdir: true,
    }
}

pub fn rpmlint(rpm_path: &str) -> CheckCommand {
    CheckCommand {
        kind: CheckKind::Rpmlint,
        program: "rpmlint".into(),
        args: vec![rpm_path.into()],
        in_tempdir: false,
    }
}

/// `rpmdeplint <check> --repo name,url ... <rpm>`.
pub fn rpmdeplint(check: &str, rpm_path: &str, repo_url: &str, base_repos: &[NamedRepo]) -> CheckCommand {
    let mut args = vec![check.to_string()];
    for repo in base_repos {
        args.push("--repo".into());
        args.push(format!("{},{}", repo.name, repo.url));
    }
    args.push("--repo".into());
    args.push(format!("{},{}", PRODUCT_REPO_ID, repo_url));
    args.push(rpm_path.into());
    CheckCommand {
        kind: CheckKind::Rpmdeplint,
        program: "rpmdeplint".into(),
        args,
        in_tempdir: false,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    pub kind: CheckKind,
    pub command: String,
    /// `None` when the tool was killed by a signal
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    /// Output lines reported as failures
    pub failures: Vec<String>,
}

impl CheckResult {
    pub fn from_output(command: &CheckCommand, exit_code: Option<i32>, stdout: String, stderr: String) -> Self {
        let failures = if exit_code == Some(0) {
            Vec::new()
        } else {
            failure_lines(command.kind, &stdout, &stderr)
        };
        Self {
            kind: command.kind,
            command: command.to_string(),
            exit_code,
            stdout,
            stderr,
            failures,
        }
    }

    pub fn passed(&self) -> bool {
        match self.kind {
            CheckKind::Rpmlint => self.exit_code == Some(0) || self.failures.is_empty(),
            CheckKind::Repoclosure | CheckKind::Rpmdeplint => self.exit_code == Some(0),
        }
    }
}

/// Lines worth reporting from a failed run.
///
/// rpmlint complains about unknown signing keys and prints a summary line;
/// neither counts as a failure.
pub fn failure_lines(kind: CheckKind, stdout: &str, stderr: &str) -> Vec<String> {
    let lines: Vec<&str> = match kind {
        CheckKind::Repoclosure => stdout.lines().chain(stderr.lines()).collect(),
        CheckKind::Rpmlint => stdout
            .lines()
            .filter(|line| !line.contains("E: unknown-key") && !line.starts_with("1 packages"))
            .collect(),
        CheckKind::Rpmdeplint => stderr.lines().collect(),
    };
    lines
        .into_iter()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}

/// Run a check and capture its output.
pub fn run(command: &CheckCommand) -> Result<CheckResult, PackagingError> {
    tracing::info!(command = %command, "running packaging check");
    let mut process = Command::new(&command.program);
    process.args(&command.args);

    let workdir = if command.in_tempdir {
        Some(tempfile::tempdir().map_err(PackagingError::TempDir)?)
    } else {
        None
    };
    if let Some(dir) = &workdir {
        process.current_dir(dir.path());
    }

    let output = process.output().map_err(|e| PackagingError::Spawn {
        program: command.program.clone(),
        source: e,
    })?;
    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
    tracing::debug!(stdout = %stdout, stderr = %stderr, "check output");

    let result = CheckResult::from_output(command, output.status.code(), stdout, stderr);
    for line in &result.failures {
        tracing::error!(check = ?command.kind, "{}", line);
    }
    Ok(result)
}
