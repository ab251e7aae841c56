pub mod error;
pub mod locator;
pub mod session;

pub use error::BrowserError;
pub use locator::Locator;

/// Capability the rest of the crate needs from a browser.
///
/// This is the only I/O boundary of the navigation and entity layers.
/// `BrowserSession` drives a real browser; tests inject scripted fakes.
/// Errors are the driver's own and are meant to propagate unchanged.
pub trait Browser {
    /// Load a URL in the current window.
    fn open(&mut self, url: &str) -> Result<(), BrowserError>;

    /// Whether an element matching the locator is present and visible.
    /// An absent element yields `Ok(false)`, never `NoSuchElement`.
    fn is_displayed(&mut self, locator: &Locator) -> Result<bool, BrowserError>;

    /// Number of elements matching the locator.
    fn count(&mut self, locator: &Locator) -> Result<usize, BrowserError>;

    /// Visible text of the first matching element.
    fn text(&mut self, locator: &Locator) -> Result<String, BrowserError>;

    /// Visible text of every matching element, in document order.
    fn texts(&mut self, locator: &Locator) -> Result<Vec<String>, BrowserError>;

    /// Attribute (or DOM property) value of the first matching element.
    fn attribute(&mut self, locator: &Locator, name: &str) -> Result<Option<String>, BrowserError>;

    /// Visible text of the selected option of a `<select>`.
    fn selected_text(&mut self, locator: &Locator) -> Result<Option<String>, BrowserError>;

    fn click(&mut self, locator: &Locator) -> Result<(), BrowserError>;

    /// Replace the content of an input with `value`.
    fn fill(&mut self, locator: &Locator, value: &str) -> Result<(), BrowserError>;

    /// Pick an option of a `<select>` by its visible text.
    fn select(&mut self, locator: &Locator, visible_text: &str) -> Result<(), BrowserError>;

    fn window_handles(&mut self) -> Result<Vec<String>, BrowserError>;

    fn switch_to_window(&mut self, handle: &str) -> Result<(), BrowserError>;

    /// Close the current window. The caller must switch to another handle.
    fn close_window(&mut self) -> Result<(), BrowserError>;

    /// All visible text of the current page, for failure diagnostics.
    fn page_text(&mut self) -> Result<String, BrowserError>;

    fn screenshot(&mut self, path: &str) -> Result<(), BrowserError>;

    fn current_url(&mut self) -> Result<String, BrowserError>;

    /// End the session. Further calls are not expected to succeed.
    fn quit(&mut self) -> Result<(), BrowserError>;
}
