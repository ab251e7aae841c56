use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use serde::{Deserialize, Serialize};

use crate::browser::error::BrowserError;
use crate::browser::locator::Locator;
use crate::browser::Browser;

/// Request sent to the browser server over stdin (one JSON line).
#[derive(Debug, Serialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum BrowserRequest {
    Open { url: String },
    Visible { locator: Locator },
    Count { locator: Locator },
    Text { locator: Locator },
    Texts { locator: Locator },
    Attribute { locator: Locator, name: String },
    SelectedText { locator: Locator },
    Click { locator: Locator },
    Fill { locator: Locator, value: String },
    Select { locator: Locator, text: String },
    WindowHandles,
    SwitchWindow { handle: String },
    CloseWindow,
    PageText,
    Screenshot { path: String },
    CurrentUrl,
    Quit,
}

impl BrowserRequest {
    /// Command name as it appears on the wire, used in error messages.
    pub fn command(&self) -> &'static str {
        match self {
            BrowserRequest::Open { .. } => "open",
            BrowserRequest::Visible { .. } => "visible",
            BrowserRequest::Count { .. } => "count",
            BrowserRequest::Text { .. } => "text",
            BrowserRequest::Texts { .. } => "texts",
            BrowserRequest::Attribute { .. } => "attribute",
            BrowserRequest::SelectedText { .. } => "selected_text",
            BrowserRequest::Click { .. } => "click",
            BrowserRequest::Fill { .. } => "fill",
            BrowserRequest::Select { .. } => "select",
            BrowserRequest::WindowHandles => "window_handles",
            BrowserRequest::SwitchWindow { .. } => "switch_window",
            BrowserRequest::CloseWindow => "close_window",
            BrowserRequest::PageText => "page_text",
            BrowserRequest::Screenshot { .. } => "screenshot",
            BrowserRequest::CurrentUrl => "current_url",
            BrowserRequest::Quit => "quit",
        }
    }

    /// Locator the request targets, if any.
    pub fn locator(&self) -> Option<&Locator> {
        match self {
            BrowserRequest::Visible { locator }
            | BrowserRequest::Count { locator }
            | BrowserRequest::Text { locator }
            | BrowserRequest::Texts { locator }
            | BrowserRequest::Attribute { locator, .. }
            | BrowserRequest::SelectedText { locator }
            | BrowserRequest::Click { locator }
            | BrowserRequest::Fill { locator, .. }
            | BrowserRequest::Select { locator, .. } => Some(locator),
            _ => None,
        }
    }
}

/// Response received from the browser server over stdout (one JSON line).
#[derive(Debug, Default, Deserialize)]
pub struct BrowserResponse {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub ready: Option<bool>,
    #[serde(default)]
    pub visible: Option<bool>,
    #[serde(default)]
    pub count: Option<usize>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub texts: Option<Vec<String>>,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub handles: Option<Vec<String>>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Turn an `ok: false` response into the matching driver error.
pub fn response_error(request: &BrowserRequest, error: Option<String>) -> BrowserError {
    let error = error.unwrap_or_else(|| "Unknown error".into());
    let lowered = error.to_lowercase();
    if let Some(locator) = request.locator() {
        if lowered.contains("no such element") {
            return BrowserError::NoSuchElement {
                locator: locator.clone(),
            };
        }
        if lowered.contains("stale") {
            return BrowserError::StaleElement {
                locator: locator.clone(),
            };
        }
    }
    BrowserError::SessionProtocol {
        command: request.command().into(),
        error,
    }
}

/// A persistent browser session backed by a Node.js browser server.
///
/// The server keeps one browser open for the lifetime of the session.
/// Commands are sent as NDJSON over stdin, responses read from stdout.
pub struct BrowserSession {
    child: Child,
    stdin: ChildStdin,
    reader: BufReader<ChildStdout>,
    closed: bool,
}

impl BrowserSession {
    /// Spawn `node <script>` and wait for its ready line.
    pub fn launch(node: &str, script: &str) -> Result<Self, BrowserError> {
        tracing::debug!(node, script, "launching browser server");
        let mut child = Command::new(node)
            .arg(script)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| BrowserError::SubprocessSpawn {
                script: script.into(),
                source: e,
            })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| BrowserError::SessionIo("failed to capture stdin of browser server".into()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| BrowserError::SessionIo("failed to capture stdout of browser server".into()))?;

        let mut session = BrowserSession {
            child,
            stdin,
            reader: BufReader::new(stdout),
            closed: false,
        };

        let ready = session.read_response("ready signal")?;
        if !ready.ok || ready.ready != Some(true) {
            return Err(BrowserError::SessionProtocol {
                command: "launch".into(),
                error: "did not receive ready signal from browser server".into(),
            });
        }

        Ok(session)
    }

    fn read_response(&mut self, context: &str) -> Result<BrowserResponse, BrowserError> {
        let mut line = String::new();
        self.reader
            .read_line(&mut line)
            .map_err(|e| BrowserError::SessionIo(format!("failed to read {}: {}", context, e)))?;

        if line.trim().is_empty() {
            return Err(BrowserError::SessionIo(
                "empty response from browser server (process may have died)".into(),
            ));
        }

        serde_json::from_str(line.trim()).map_err(|e| BrowserError::Json {
            context: context.into(),
            source: e,
        })
    }

    /// Send a request and read the response.
    fn send(&mut self, request: &BrowserRequest) -> Result<BrowserResponse, BrowserError> {
        let json = serde_json::to_string(request).map_err(|e| BrowserError::Json {
            context: "BrowserRequest".into(),
            source: e,
        })?;

        writeln!(self.stdin, "{}", json)
            .and_then(|_| self.stdin.flush())
            .map_err(|e| BrowserError::SessionIo(format!("failed to write to browser server: {}", e)))?;

        self.read_response("browser server response")
    }

    /// Send a request and verify it succeeded.
    fn send_ok(&mut self, request: BrowserRequest) -> Result<BrowserResponse, BrowserError> {
        let response = self.send(&request)?;
        if !response.ok {
            return Err(response_error(&request, response.error));
        }
        Ok(response)
    }

    fn missing_field(command: &str, field: &str) -> BrowserError {
        BrowserError::SessionProtocol {
            command: command.into(),
            error: format!("no '{}' in response", field),
        }
    }
}

impl Browser for BrowserSession {
    fn open(&mut self, url: &str) -> Result<(), BrowserError> {
        self.send_ok(BrowserRequest::Open { url: url.into() })?;
        Ok(())
    }

    fn is_displayed(&mut self, locator: &Locator) -> Result<bool, BrowserError> {
        match self.send_ok(BrowserRequest::Visible {
            locator: locator.clone(),
        }) {
            Ok(response) => Ok(response.visible.unwrap_or(false)),
            Err(e) if e.is_missing_element() => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn count(&mut self, locator: &Locator) -> Result<usize, BrowserError> {
        let response = self.send_ok(BrowserRequest::Count {
            locator: locator.clone(),
        })?;
        Ok(response.count.unwrap_or(0))
    }

    fn text(&mut self, locator: &Locator) -> Result<String, BrowserError> {
        let response = self.send_ok(BrowserRequest::Text {
            locator: locator.clone(),
        })?;
        response.text.ok_or_else(|| BrowserError::NoSuchElement {
            locator: locator.clone(),
        })
    }

    fn texts(&mut self, locator: &Locator) -> Result<Vec<String>, BrowserError> {
        let response = self.send_ok(BrowserRequest::Texts {
            locator: locator.clone(),
        })?;
        Ok(response.texts.unwrap_or_default())
    }

    fn attribute(&mut self, locator: &Locator, name: &str) -> Result<Option<String>, BrowserError> {
        let response = self.send_ok(BrowserRequest::Attribute {
            locator: locator.clone(),
            name: name.into(),
        })?;
        Ok(response.value)
    }

    fn selected_text(&mut self, locator: &Locator) -> Result<Option<String>, BrowserError> {
        let response = self.send_ok(BrowserRequest::SelectedText {
            locator: locator.clone(),
        })?;
        Ok(response.text)
    }

    fn click(&mut self, locator: &Locator) -> Result<(), BrowserError> {
        self.send_ok(BrowserRequest::Click {
            locator: locator.clone(),
        })?;
        Ok(())
    }

    fn fill(&mut self, locator: &Locator, value: &str) -> Result<(), BrowserError> {
        self.send_ok(BrowserRequest::Fill {
            locator: locator.clone(),
            value: value.into(),
        })?;
        Ok(())
    }

    fn select(&mut self, locator: &Locator, visible_text: &str) -> Result<(), BrowserError> {
        self.send_ok(BrowserRequest::Select {
            locator: locator.clone(),
            text: visible_text.into(),
        })?;
        Ok(())
    }

    fn window_handles(&mut self) -> Result<Vec<String>, BrowserError> {
        let response = self.send_ok(BrowserRequest::WindowHandles)?;
        response
            .handles
            .ok_or_else(|| Self::missing_field("window_handles", "handles"))
    }

    fn switch_to_window(&mut self, handle: &str) -> Result<(), BrowserError> {
        self.send_ok(BrowserRequest::SwitchWindow {
            handle: handle.into(),
        })?;
        Ok(())
    }

    fn close_window(&mut self) -> Result<(), BrowserError> {
        self.send_ok(BrowserRequest::CloseWindow)?;
        Ok(())
    }

    fn page_text(&mut self) -> Result<String, BrowserError> {
        let response = self.send_ok(BrowserRequest::PageText)?;
        Ok(response.text.unwrap_or_default())
    }

    fn screenshot(&mut self, path: &str) -> Result<(), BrowserError> {
        self.send_ok(BrowserRequest::Screenshot { path: path.into() })?;
        Ok(())
    }

    fn current_url(&mut self) -> Result<String, BrowserError> {
        let response = self.send_ok(BrowserRequest::CurrentUrl)?;
        response
            .url
            .ok_or_else(|| Self::missing_field("current_url", "url"))
    }

    fn quit(&mut self) -> Result<(), BrowserError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        // Best-effort: the server may already be gone
        let _ = self.send(&BrowserRequest::Quit);
        let _ = self.child.wait();
        Ok(())
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        let _ = self.quit();
    }
}
