use std::fmt;

use serde::{Deserialize, Serialize};

/// How the browser server should find an element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Locator {
    #[serde(rename = "xpath")]
    XPath(String),
    #[serde(rename = "id")]
    Id(String),
    #[serde(rename = "name")]
    Name(String),
}

impl Locator {
    pub fn xpath(expr: impl Into<String>) -> Self {
        Locator::XPath(expr.into())
    }

    pub fn id(id: impl Into<String>) -> Self {
        Locator::Id(id.into())
    }

    pub fn name(name: impl Into<String>) -> Self {
        Locator::Name(name.into())
    }

    /// Equivalent absolute XPath expression.
    pub fn to_xpath(&self) -> String {
        match self {
            Locator::XPath(expr) => expr.clone(),
            Locator::Id(id) => format!("//*[@id={}]", xpath_literal(id)),
            Locator::Name(name) => format!("//*[@name={}]", xpath_literal(name)),
        }
    }

    /// Scope a relative XPath (`./a`, `.//td[2]`) under this locator.
    pub fn child(&self, relative: &str) -> Locator {
        let base = self.to_xpath();
        let relative = relative.strip_prefix('.').unwrap_or(relative);
        let relative = if relative.starts_with('/') || relative.starts_with('[') {
            relative.to_string()
        } else {
            format!("/{}", relative)
        };
        Locator::XPath(format!("{}{}", base, relative))
    }

    /// The n-th (1-based) match of this locator in document order.
    pub fn nth(&self, index: usize) -> Locator {
        Locator::XPath(format!("({})[{}]", self.to_xpath(), index))
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::XPath(expr) => write!(f, "xpath={}", expr),
            Locator::Id(id) => write!(f, "id={}", id),
            Locator::Name(name) => write!(f, "name={}", name),
        }
    }
}

/// Quote a string for use inside an XPath expression.
///
/// Values containing both quote kinds are split with `concat()`.
pub fn xpath_literal(value: &str) -> String {
    if !value.contains('\'') {
        format!("'{}'", value)
    } else if !value.contains('"') {
        format!("\"{}\"", value)
    } else {
        let parts: Vec<String> = value
            .split('\'')
            .map(|part| format!("'{}'", part))
            .collect();
        format!("concat({})", parts.join(", \"'\", "))
    }
}
