use std::collections::HashMap;

use crate::browser::locator::xpath_literal;
use crate::browser::{Browser, BrowserError, Locator};
use crate::view::displayed;

// ============================================================================
// Plain elements
// ============================================================================

/// Element read as text and clicked, e.g. headings, links and buttons.
#[derive(Debug, Clone)]
pub struct Text {
    pub locator: Locator,
}

impl Text {
    pub fn new(locator: Locator) -> Self {
        Self { locator }
    }

    pub fn xpath(expr: impl Into<String>) -> Self {
        Self::new(Locator::xpath(expr))
    }

    pub fn read(&self, browser: &mut dyn Browser) -> Result<String, BrowserError> {
        Ok(browser.text(&self.locator)?.trim().to_string())
    }

    pub fn click(&self, browser: &mut dyn Browser) -> Result<(), BrowserError> {
        browser.click(&self.locator)
    }

    pub fn is_displayed(&self, browser: &mut dyn Browser) -> bool {
        displayed(browser, &self.locator)
    }
}

/// Text field. `fill` only types when the value differs.
#[derive(Debug, Clone)]
pub struct TextInput {
    pub locator: Locator,
}

impl TextInput {
    pub fn new(locator: Locator) -> Self {
        Self { locator }
    }

    pub fn id(id: &str) -> Self {
        Self::new(Locator::id(id))
    }

    pub fn read(&self, browser: &mut dyn Browser) -> Result<String, BrowserError> {
        Ok(browser.attribute(&self.locator, "value")?.unwrap_or_default())
    }

    /// Returns whether the field changed.
    pub fn fill(&self, browser: &mut dyn Browser, value: &str) -> Result<bool, BrowserError> {
        if self.read(browser)? == value {
            return Ok(false);
        }
        browser.fill(&self.locator, value)?;
        Ok(true)
    }
}

#[derive(Debug, Clone)]
pub struct Checkbox {
    pub locator: Locator,
}

impl Checkbox {
    pub fn id(id: &str) -> Self {
        Self {
            locator: Locator::id(id),
        }
    }

    pub fn read(&self, browser: &mut dyn Browser) -> Result<bool, BrowserError> {
        let checked = browser.attribute(&self.locator, "checked")?;
        Ok(matches!(checked.as_deref(), Some(v) if v != "false"))
    }

    /// Click when the current state differs. Returns whether it changed.
    pub fn fill(&self, browser: &mut dyn Browser, value: bool) -> Result<bool, BrowserError> {
        if self.read(browser)? == value {
            return Ok(false);
        }
        browser.click(&self.locator)?;
        Ok(true)
    }
}

/// A `<select>` element picked by visible option text.
#[derive(Debug, Clone)]
pub struct Dropdown {
    pub locator: Locator,
}

impl Dropdown {
    pub fn new(locator: Locator) -> Self {
        Self { locator }
    }

    pub fn read(&self, browser: &mut dyn Browser) -> Result<Option<String>, BrowserError> {
        browser.selected_text(&self.locator)
    }

    pub fn fill(&self, browser: &mut dyn Browser, text: &str) -> Result<bool, BrowserError> {
        if self.read(browser)?.as_deref() == Some(text) {
            return Ok(false);
        }
        browser.select(&self.locator, text)?;
        Ok(true)
    }
}

/// Radio buttons sharing one `name`, addressed by their `value`.
#[derive(Debug, Clone)]
pub struct RadioGroup {
    pub name: String,
}

impl RadioGroup {
    pub fn new(name: &str) -> Self {
        Self { name: name.into() }
    }

    pub fn option(&self, value: &str) -> Locator {
        Locator::xpath(format!(
            "//input[@type='radio'][@name={}][@value={}]",
            xpath_literal(&self.name),
            xpath_literal(value)
        ))
    }

    pub fn fill(&self, browser: &mut dyn Browser, value: &str) -> Result<bool, BrowserError> {
        let option = self.option(value);
        let checked = browser.attribute(&option, "checked")?;
        if matches!(checked.as_deref(), Some(v) if v != "false") {
            return Ok(false);
        }
        browser.click(&option)?;
        Ok(true)
    }
}

// ============================================================================
// Composite widgets
// ============================================================================

/// Kebab/dropdown menu: a toggle button and items picked by visible text.
#[derive(Debug, Clone)]
pub struct ActionsMenu {
    pub root: Locator,
}

impl ActionsMenu {
    pub fn new(root: Locator) -> Self {
        Self { root }
    }

    pub fn toggle(&self) -> Locator {
        self.root
            .child(".//*[contains(@class, 'dropdown-toggle')]")
    }

    pub fn item(&self, text: &str) -> Locator {
        self.root.child(&format!(
            ".//ul//a[normalize-space(.)={}]",
            xpath_literal(text)
        ))
    }

    pub fn is_displayed(&self, browser: &mut dyn Browser) -> bool {
        displayed(browser, &self.toggle())
    }

    /// Open the menu and click the named item.
    pub fn select(&self, browser: &mut dyn Browser, text: &str) -> Result<(), BrowserError> {
        browser.click(&self.toggle())?;
        browser.click(&self.item(text))
    }
}

/// Tab header; clicked before touching the fields it holds.
#[derive(Debug, Clone)]
pub struct Tab {
    pub link: Locator,
}

impl Tab {
    pub fn named(label: &str) -> Self {
        Self {
            link: Locator::xpath(format!(
                "//ul[contains(@class, 'nav-tabs')]//a[normalize-space(.)={}]",
                xpath_literal(label)
            )),
        }
    }

    pub fn open(&self, browser: &mut dyn Browser) -> Result<(), BrowserError> {
        browser.click(&self.link)
    }
}

#[derive(Debug, Clone)]
pub struct BreadCrumb {
    pub root: Locator,
}

impl Default for BreadCrumb {
    fn default() -> Self {
        Self {
            root: Locator::xpath("//ol[contains(@class, 'breadcrumb')]"),
        }
    }
}

impl BreadCrumb {
    pub fn locations(&self, browser: &mut dyn Browser) -> Result<Vec<String>, BrowserError> {
        let items = browser.texts(&self.root.child("./li"))?;
        Ok(items.into_iter().map(|s| s.trim().to_string()).collect())
    }

    /// Text of the last (current) location.
    pub fn read(&self, browser: &mut dyn Browser) -> Result<String, BrowserError> {
        Ok(self.locations(browser)?.pop().unwrap_or_default())
    }

    /// `first` is the section and `current` accepts the last location.
    pub fn matches<F>(&self, browser: &mut dyn Browser, first: &str, current: F) -> bool
    where
        F: Fn(&str) -> bool,
    {
        if !displayed(browser, &self.root) {
            return false;
        }
        match self.locations(browser) {
            Ok(locations) => {
                locations.first().map(String::as_str) == Some(first)
                    && locations.last().is_some_and(|last| current(last))
            }
            Err(_) => false,
        }
    }
}

/// Search field plus its submit button.
#[derive(Debug, Clone)]
pub struct SearchBox {
    pub input: TextInput,
    pub button: Locator,
}

impl Default for SearchBox {
    fn default() -> Self {
        Self {
            input: TextInput::new(Locator::xpath("//input[@id='search' or @name='search']")),
            button: Locator::xpath("//button[@id='search-button' or contains(@class, 'search-btn')]"),
        }
    }
}

impl SearchBox {
    pub fn search(&self, browser: &mut dyn Browser, query: &str) -> Result<(), BrowserError> {
        browser.fill(&self.input.locator, query)?;
        browser.click(&self.button)
    }
}

/// HTML table with a declared column order.
#[derive(Debug, Clone)]
pub struct Table {
    pub root: Locator,
    pub columns: Vec<&'static str>,
}

impl Table {
    pub fn new(root: Locator, columns: &[&'static str]) -> Self {
        Self {
            root,
            columns: columns.to_vec(),
        }
    }

    /// 1-based position of a column, as XPath counts.
    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| *c == column).map(|i| i + 1)
    }

    fn index(&self, column: &str) -> Result<usize, BrowserError> {
        self.column_index(column).ok_or_else(|| BrowserError::NoSuchElement {
            locator: self.root.child(&format!(".//th[normalize-space(.)={}]", xpath_literal(column))),
        })
    }

    pub fn rows(&self) -> Locator {
        self.root.child(".//tbody/tr")
    }

    pub fn row_count(&self, browser: &mut dyn Browser) -> Result<usize, BrowserError> {
        browser.count(&self.rows())
    }

    /// Cell of the row whose `key_column` reads exactly `key`.
    pub fn cell_by(&self, key_column: &str, key: &str, column: &str) -> Result<Locator, BrowserError> {
        let key_index = self.index(key_column)?;
        let index = self.index(column)?;
        Ok(self.root.child(&format!(
            ".//tbody/tr[td[{}][normalize-space(.)={}]]/td[{}]",
            key_index,
            xpath_literal(key),
            index
        )))
    }

    /// Whether a row with `key` in `key_column` is listed.
    pub fn has_row(&self, browser: &mut dyn Browser, key_column: &str, key: &str) -> Result<bool, BrowserError> {
        let cell = self.cell_by(key_column, key, key_column)?;
        Ok(browser.count(&cell)? > 0)
    }

    /// Every row as a column-name to cell-text map.
    pub fn read(&self, browser: &mut dyn Browser) -> Result<Vec<HashMap<String, String>>, BrowserError> {
        let count = self.row_count(browser)?;
        let mut rows = Vec::with_capacity(count);
        for row in 1..=count {
            let row_locator = self.rows().nth(row);
            let mut values = HashMap::new();
            for (i, column) in self.columns.iter().enumerate() {
                let cell = row_locator.child(&format!("./td[{}]", i + 1));
                let text = browser.text(&cell)?;
                values.insert(column.to_string(), text.trim().to_string());
            }
            rows.push(values);
        }
        Ok(rows)
    }
}
