//! Widget configuration
//!
//! Configuration comes from three tiers, highest precedence first:
//!
//! 1. `data-*` attributes on the native control
//! 2. Options passed to the constructor
//! 3. Built-in defaults
//!
//! Each of the first two tiers is a [`SelectOptions`] where every field is
//! optional; [`resolve`] folds them over a [`SelectConfig`] of defaults and
//! returns a fully populated configuration.
//!
//! # Example
//!
//! ```ignore
//! use snapselect_core::config::{resolve, SelectConfig, SelectOptions};
//!
//! let options = SelectOptions::from_toml_str("live_search = true\nmax_selections = 3")?;
//! let attributes = SelectOptions::from_attributes(|name| doc.attribute(control, name));
//! let config = resolve(&attributes, &options, &SelectConfig::default());
//! ```

use serde::Deserialize;

use crate::error::Result;

/// Markup attribute names, one per option
pub mod attributes {
    pub const LIVE_SEARCH: &str = "data-live-search";
    pub const MAX_SELECTIONS: &str = "data-max-selections";
    pub const PLACEHOLDER: &str = "data-placeholder";
    pub const CLEAR_ALL_BUTTON: &str = "data-clear-all-button";
    pub const SELECT_OPTGROUPS: &str = "data-select-optgroups";
    pub const SELECT_ALL_OPTION: &str = "data-select-all-option";
    pub const CLOSE_ON_SELECT: &str = "data-close-on-select";
    pub const ALLOW_EMPTY: &str = "data-allow-empty";
}

/// Placeholder shown when nothing is selected
pub const DEFAULT_PLACEHOLDER: &str = "Select...";

// =============================================================================
// SelectionLimit
// =============================================================================

/// Ceiling on the number of selected values (multi-select only)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "LimitRepr")]
pub enum SelectionLimit {
    /// No ceiling
    #[default]
    Unbounded,
    /// At most this many values
    AtMost(usize),
}

impl SelectionLimit {
    /// Whether a selection of `len` values may grow by one more
    pub fn admits(&self, len: usize) -> bool {
        match self {
            SelectionLimit::Unbounded => true,
            SelectionLimit::AtMost(max) => len < *max,
        }
    }

    /// Parse a markup value the way a lenient integer parser would
    ///
    /// Leading whitespace and an optional sign are accepted, trailing garbage
    /// after the digits is ignored, negative values clamp to zero, and input
    /// without any leading digits degrades to [`SelectionLimit::Unbounded`].
    pub fn parse_lenient(raw: &str) -> Self {
        let trimmed = raw.trim_start();
        let (negative, rest) = match trimmed.as_bytes().first() {
            Some(b'-') => (true, &trimmed[1..]),
            Some(b'+') => (false, &trimmed[1..]),
            _ => (false, trimmed),
        };
        let digits: &str = {
            let end = rest
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(rest.len());
            &rest[..end]
        };

        if digits.is_empty() {
            return SelectionLimit::Unbounded;
        }
        if negative {
            return SelectionLimit::AtMost(0);
        }
        // Overflow means "more than anyone can select"
        digits
            .parse::<usize>()
            .map(SelectionLimit::AtMost)
            .unwrap_or(SelectionLimit::Unbounded)
    }
}

/// Serialized forms of a limit: a number, or a word such as `"unbounded"`
#[derive(Deserialize)]
#[serde(untagged)]
enum LimitRepr {
    Count(i64),
    Word(String),
}

impl From<LimitRepr> for SelectionLimit {
    fn from(repr: LimitRepr) -> Self {
        match repr {
            LimitRepr::Count(n) => SelectionLimit::AtMost(n.max(0) as usize),
            LimitRepr::Word(word) => match word.trim().to_ascii_lowercase().as_str() {
                "unbounded" | "infinity" | "none" => SelectionLimit::Unbounded,
                _ => SelectionLimit::parse_lenient(&word),
            },
        }
    }
}

// =============================================================================
// SelectOptions - one configuration tier
// =============================================================================

/// A partial configuration: unset fields defer to the next tier
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SelectOptions {
    /// Show a search box in the panel
    #[serde(alias = "live_search")]
    pub live_search: Option<bool>,
    /// Selection ceiling (multi-select only)
    #[serde(alias = "max_selections")]
    pub max_selections: Option<SelectionLimit>,
    /// Text shown when nothing is selected
    pub placeholder: Option<String>,
    /// Show a clear-all affordance (multi-select only)
    #[serde(alias = "clear_all_button")]
    pub clear_all_button: Option<bool>,
    /// Group headers add their children when clicked (multi-select only)
    #[serde(alias = "select_optgroups")]
    pub select_optgroups: Option<bool>,
    /// Inject a "Select All" row (multi-select only)
    #[serde(alias = "select_all_option")]
    pub select_all_option: Option<bool>,
    /// Close after choosing a value (single-select only)
    #[serde(alias = "close_on_select")]
    pub close_on_select: Option<bool>,
    /// Allow clearing back to no selection (single-select only)
    #[serde(alias = "allow_empty")]
    pub allow_empty: Option<bool>,
}

impl SelectOptions {
    /// Create an empty tier
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML options document
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Parse a JSON options object
    pub fn from_json_str(source: &str) -> Result<Self> {
        Ok(serde_json::from_str(source)?)
    }

    /// Read the markup tier through an attribute lookup
    ///
    /// Boolean attributes are true only when their value is exactly `"true"`;
    /// any other present value means false.
    pub fn from_attributes<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let flag = |name: &str| lookup(name).map(|value| value == "true");

        Self {
            live_search: flag(attributes::LIVE_SEARCH),
            max_selections: lookup(attributes::MAX_SELECTIONS)
                .map(|raw| SelectionLimit::parse_lenient(&raw)),
            placeholder: lookup(attributes::PLACEHOLDER),
            clear_all_button: flag(attributes::CLEAR_ALL_BUTTON),
            select_optgroups: flag(attributes::SELECT_OPTGROUPS),
            select_all_option: flag(attributes::SELECT_ALL_OPTION),
            close_on_select: flag(attributes::CLOSE_ON_SELECT),
            allow_empty: flag(attributes::ALLOW_EMPTY),
        }
    }

    pub fn live_search(mut self, enabled: bool) -> Self {
        self.live_search = Some(enabled);
        self
    }

    pub fn max_selections(mut self, max: usize) -> Self {
        self.max_selections = Some(SelectionLimit::AtMost(max));
        self
    }

    pub fn placeholder(mut self, text: impl Into<String>) -> Self {
        self.placeholder = Some(text.into());
        self
    }

    pub fn clear_all_button(mut self, enabled: bool) -> Self {
        self.clear_all_button = Some(enabled);
        self
    }

    pub fn select_optgroups(mut self, enabled: bool) -> Self {
        self.select_optgroups = Some(enabled);
        self
    }

    pub fn select_all_option(mut self, enabled: bool) -> Self {
        self.select_all_option = Some(enabled);
        self
    }

    pub fn close_on_select(mut self, enabled: bool) -> Self {
        self.close_on_select = Some(enabled);
        self
    }

    pub fn allow_empty(mut self, enabled: bool) -> Self {
        self.allow_empty = Some(enabled);
        self
    }
}

// =============================================================================
// SelectConfig - resolved configuration
// =============================================================================

/// Fully resolved widget configuration
#[derive(Clone, Debug, PartialEq)]
pub struct SelectConfig {
    pub live_search: bool,
    pub max_selections: SelectionLimit,
    pub placeholder: String,
    pub clear_all_button: bool,
    pub select_optgroups: bool,
    pub select_all_option: bool,
    pub close_on_select: bool,
    pub allow_empty: bool,
}

impl Default for SelectConfig {
    fn default() -> Self {
        Self {
            live_search: false,
            max_selections: SelectionLimit::Unbounded,
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            clear_all_button: false,
            select_optgroups: false,
            select_all_option: false,
            close_on_select: true,
            allow_empty: false,
        }
    }
}

/// Fold the attribute and constructor tiers over `defaults`
pub fn resolve(
    attributes: &SelectOptions,
    options: &SelectOptions,
    defaults: &SelectConfig,
) -> SelectConfig {
    fn pick<T: Clone>(attribute: &Option<T>, option: &Option<T>, default: &T) -> T {
        attribute
            .as_ref()
            .or(option.as_ref())
            .unwrap_or(default)
            .clone()
    }

    SelectConfig {
        live_search: pick(&attributes.live_search, &options.live_search, &defaults.live_search),
        max_selections: pick(
            &attributes.max_selections,
            &options.max_selections,
            &defaults.max_selections,
        ),
        placeholder: pick(&attributes.placeholder, &options.placeholder, &defaults.placeholder),
        clear_all_button: pick(
            &attributes.clear_all_button,
            &options.clear_all_button,
            &defaults.clear_all_button,
        ),
        select_optgroups: pick(
            &attributes.select_optgroups,
            &options.select_optgroups,
            &defaults.select_optgroups,
        ),
        select_all_option: pick(
            &attributes.select_all_option,
            &options.select_all_option,
            &defaults.select_all_option,
        ),
        close_on_select: pick(
            &attributes.close_on_select,
            &options.close_on_select,
            &defaults.close_on_select,
        ),
        allow_empty: pick(&attributes.allow_empty, &options.allow_empty, &defaults.allow_empty),
    }
}
