use std::{fs::OpenOptions, io::Write, sync::Mutex};

use crate::trace::trace::TraceEvent;

/// Appends trace events to a JSONL file. Never fails the caller: problems
/// are reported as warnings and the event is dropped.
pub struct TraceLogger {
    file: Option<Mutex<std::fs::File>>,
}

impl TraceLogger {
    pub fn new(path: &str) -> Self {
        let file = OpenOptions::new().create(true).append(true).open(path);

        match file {
            Ok(f) => Self {
                file: Some(Mutex::new(f)),
            },
            Err(e) => {
                tracing::warn!(path, error = %e, "could not open trace file");
                Self::disabled()
            }
        }
    }

    pub fn disabled() -> Self {
        Self { file: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.file.is_some()
    }

    pub fn log(&self, event: &TraceEvent) {
        let file_mutex = match &self.file {
            Some(f) => f,
            None => return,
        };

        let json = match serde_json::to_string(event) {
            Ok(j) => j,
            Err(e) => {
                tracing::warn!(error = %e, "failed to serialize trace event");
                return;
            }
        };

        let mut file = match file_mutex.lock() {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!(error = %e, "trace logger lock poisoned");
                return;
            }
        };

        if let Err(e) = writeln!(file, "{}", json) {
            tracing::warn!(error = %e, "failed to write trace event");
        }
    }
}

impl Default for TraceLogger {
    fn default() -> Self {
        Self::disabled()
    }
}
