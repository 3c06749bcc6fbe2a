//! Locator definitions and the query strings built from them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single primitive element query understood by a [`Driver`](crate::driver::Driver)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "by", rename_all = "snake_case")]
pub enum Selector {
    /// Exact text match
    Text { text: String },
    /// Substring text match
    TextContains { text: String },
    /// Exact accessibility description (content-desc) match
    Description { text: String },
    /// Elements of a widget class, filtered on their clickable flag
    Class {
        class_name: String,
        #[serde(default = "default_clickable")]
        clickable: bool,
    },
}

fn default_clickable() -> bool {
    true
}

impl Selector {
    pub fn text(text: impl Into<String>) -> Self {
        Selector::Text { text: text.into() }
    }

    pub fn text_contains(text: impl Into<String>) -> Self {
        Selector::TextContains { text: text.into() }
    }

    pub fn description(text: impl Into<String>) -> Self {
        Selector::Description { text: text.into() }
    }

    pub fn clickable_class(class_name: impl Into<String>) -> Self {
        Selector::Class {
            class_name: class_name.into(),
            clickable: true,
        }
    }

    /// Render the UiAutomator selector string, e.g. `new UiSelector().text("Stocks")`
    pub fn to_query(&self) -> String {
        match self {
            Selector::Text { text } => format!("new UiSelector().text(\"{}\")", escape_java(text)),
            Selector::TextContains { text } => {
                format!("new UiSelector().textContains(\"{}\")", escape_java(text))
            }
            Selector::Description { text } => {
                format!("new UiSelector().description(\"{}\")", escape_java(text))
            }
            Selector::Class {
                class_name,
                clickable,
            } => format!(
                "new UiSelector().className(\"{}\").clickable({})",
                escape_java(class_name),
                clickable
            ),
        }
    }

    /// Render the equivalent XPath for WebDriver backends
    pub fn to_xpath(&self) -> String {
        match self {
            Selector::Text { text } => format!("//*[@text={}]", xpath_literal(text)),
            Selector::TextContains { text } => {
                format!("//*[contains(@text,{})]", xpath_literal(text))
            }
            Selector::Description { text } => format!("//*[@content-desc={}]", xpath_literal(text)),
            Selector::Class {
                class_name,
                clickable,
            } => format!(
                "//{}[@clickable=\"{}\"]",
                class_name.replace(['/', '[', ']', '"', '\''], ""),
                clickable
            ),
        }
    }

    /// The user-supplied value this selector matches on
    pub fn value(&self) -> &str {
        match self {
            Selector::Text { text }
            | Selector::TextContains { text }
            | Selector::Description { text } => text,
            Selector::Class { class_name, .. } => class_name,
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query())
    }
}

/// How to find one logical target. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "by", rename_all = "snake_case")]
pub enum Locator {
    Text {
        text: String,
    },
    TextContains {
        text: String,
    },
    Description {
        text: String,
    },
    /// The `index`-th element returned by the `container` query.
    /// Purely positional: reordering the UI silently changes the result.
    Index {
        container: Selector,
        index: usize,
    },
}

impl Locator {
    pub fn by_text(text: impl Into<String>) -> Self {
        Locator::Text { text: text.into() }
    }

    pub fn by_text_contains(text: impl Into<String>) -> Self {
        Locator::TextContains { text: text.into() }
    }

    pub fn by_description(text: impl Into<String>) -> Self {
        Locator::Description { text: text.into() }
    }

    pub fn by_index(container: Selector, index: usize) -> Self {
        Locator::Index { container, index }
    }

    /// The selector handed to the driver. For `Index` this is the container query.
    pub fn selector(&self) -> Selector {
        match self {
            Locator::Text { text } => Selector::text(text.clone()),
            Locator::TextContains { text } => Selector::text_contains(text.clone()),
            Locator::Description { text } => Selector::description(text.clone()),
            Locator::Index { container, .. } => container.clone(),
        }
    }

    pub fn is_positional(&self) -> bool {
        matches!(self, Locator::Index { .. })
    }

    /// Human-readable query used in logs and traces
    pub fn describe(&self) -> String {
        match self {
            Locator::Index { container, index } => format!("{}[{}]", container.to_query(), index),
            other => other.selector().to_query(),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

fn escape_java(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Quote a string for use as an XPath 1.0 literal
fn xpath_literal(value: &str) -> String {
    if !value.contains('"') {
        return format!("\"{}\"", value);
    }
    if !value.contains('\'') {
        return format!("'{}'", value);
    }

    let parts: Vec<String> = value
        .split('"')
        .map(|part| format!("\"{}\"", part))
        .collect();
    format!("concat({})", parts.join(", '\"', "))
}

#[cfg(test)]
#[path = "locator_test.rs"]
mod locator_test;
