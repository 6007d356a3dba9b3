//! Selection state
//!
//! The in-memory record of what the user has chosen. Multi-select keeps an
//! insertion-ordered set bounded by a [`SelectionLimit`]; single-select keeps
//! at most one value and, unless empty selections are allowed, refuses to go
//! back to none through panel interaction.
//!
//! Every mutating method returns `true` when it actually changed the state.
//! Callers use that to decide whether a write-back and a change notification
//! are due, so a request that changes nothing never notifies the host.

use indexmap::IndexSet;

use crate::config::SelectionLimit;

// =============================================================================
// MultiSelection
// =============================================================================

/// Selected values of a multi-select, in the order they were chosen
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MultiSelection {
    values: IndexSet<String>,
    limit: SelectionLimit,
}

impl MultiSelection {
    pub fn new(limit: SelectionLimit) -> Self {
        Self {
            values: IndexSet::new(),
            limit,
        }
    }

    /// Seed from the control's initial flags, respecting the ceiling
    pub fn with_values<I, S>(limit: SelectionLimit, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut selection = Self::new(limit);
        for value in values {
            selection.insert(value.into());
        }
        selection
    }

    pub fn limit(&self) -> SelectionLimit {
        self.limit
    }

    pub fn contains(&self, value: &str) -> bool {
        self.values.contains(value)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Selected values in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(String::as_str)
    }

    /// Add `value` if the ceiling allows it
    fn insert(&mut self, value: String) -> bool {
        if self.values.contains(&value) || !self.limit.admits(self.values.len()) {
            return false;
        }
        self.values.insert(value)
    }

    /// Remove `value` if present, otherwise add it if below the ceiling
    pub fn toggle(&mut self, value: &str) -> bool {
        if self.values.shift_remove(value) {
            return true;
        }
        self.insert(value.to_string())
    }

    /// Remove `value`; stale values are ignored
    pub fn remove(&mut self, value: &str) -> bool {
        self.values.shift_remove(value)
    }

    /// Whether every one of `total` options is selected
    pub fn is_fully_selected(&self, total: usize) -> bool {
        self.values.len() == total
    }

    /// Add `values` in order until the ceiling is reached
    pub fn select_all<'a>(&mut self, values: impl IntoIterator<Item = &'a str>) -> bool {
        let mut changed = false;
        for value in values {
            if !self.limit.admits(self.values.len()) {
                break;
            }
            changed |= self.insert(value.to_string());
        }
        changed
    }

    pub fn deselect_all(&mut self) -> bool {
        self.clear()
    }

    /// Select-all as one toggle: clear when full, otherwise fill
    pub fn toggle_all<'a>(&mut self, values: impl IntoIterator<Item = &'a str>) -> bool {
        let values: Vec<&str> = values.into_iter().collect();
        if self.is_fully_selected(values.len()) {
            self.deselect_all()
        } else {
            self.select_all(values)
        }
    }

    /// Add every not-yet-selected child of a group, up to the ceiling
    ///
    /// Returns how many values were added. Groups never remove.
    pub fn select_group<'a>(&mut self, children: impl IntoIterator<Item = &'a str>) -> usize {
        children
            .into_iter()
            .filter(|value| self.insert(value.to_string()))
            .count()
    }

    pub fn clear(&mut self) -> bool {
        let changed = !self.values.is_empty();
        self.values.clear();
        changed
    }
}

// =============================================================================
// SingleSelection
// =============================================================================

/// The value of a single-select, if any
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SingleSelection {
    value: Option<String>,
    allow_empty: bool,
}

impl SingleSelection {
    pub fn new(value: Option<String>, allow_empty: bool) -> Self {
        Self { value, allow_empty }
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn allows_empty(&self) -> bool {
        self.allow_empty
    }

    /// Replace the selection; `None` is refused unless empty is allowed
    pub fn set(&mut self, value: Option<&str>) -> bool {
        if value.is_none() && !self.allow_empty {
            return false;
        }
        if self.value.as_deref() == value {
            return false;
        }
        self.value = value.map(str::to_string);
        true
    }

    /// Reset to none regardless of policy (public `clear()` path)
    pub fn clear(&mut self) -> bool {
        self.value.take().is_some()
    }
}

// =============================================================================
// Selection
// =============================================================================

/// Selection state of either flavour
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selection {
    Multi(MultiSelection),
    Single(SingleSelection),
}

impl Selection {
    /// An empty multi-select state
    pub fn multi(limit: SelectionLimit) -> Self {
        Selection::Multi(MultiSelection::new(limit))
    }

    /// An empty single-select state
    pub fn single(allow_empty: bool) -> Self {
        Selection::Single(SingleSelection::new(None, allow_empty))
    }

    pub fn is_multiple(&self) -> bool {
        matches!(self, Selection::Multi(_))
    }

    pub fn contains(&self, value: &str) -> bool {
        match self {
            Selection::Multi(multi) => multi.contains(value),
            Selection::Single(single) => single.value() == Some(value),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Selection::Multi(multi) => multi.len(),
            Selection::Single(single) => usize::from(single.value().is_some()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Selected values in display order
    pub fn values(&self) -> Vec<String> {
        match self {
            Selection::Multi(multi) => multi.iter().map(str::to_string).collect(),
            Selection::Single(single) => single.value().map(str::to_string).into_iter().collect(),
        }
    }

    /// Toggle a value (multi-select; ignored for single)
    pub fn toggle(&mut self, value: &str) -> bool {
        match self {
            Selection::Multi(multi) => multi.toggle(value),
            Selection::Single(_) => false,
        }
    }

    /// Set the single value (single-select; ignored for multi)
    pub fn set_single(&mut self, value: Option<&str>) -> bool {
        match self {
            Selection::Single(single) => single.set(value),
            Selection::Multi(_) => false,
        }
    }

    /// Empty the selection unconditionally
    pub fn clear(&mut self) -> bool {
        match self {
            Selection::Multi(multi) => multi.clear(),
            Selection::Single(single) => single.clear(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRUIT: [&str; 3] = ["a", "b", "c"];

    #[test]
    fn test_toggle_respects_ceiling() {
        let mut selection = MultiSelection::new(SelectionLimit::AtMost(2));

        assert!(selection.toggle("a"));
        assert!(selection.toggle("b"));
        // At the ceiling: silently ignored
        assert!(!selection.toggle("c"));
        assert_eq!(selection.iter().collect::<Vec<_>>(), ["a", "b"]);

        assert!(selection.toggle("a"));
        assert_eq!(selection.iter().collect::<Vec<_>>(), ["b"]);
    }

    #[test]
    fn test_toggle_all_is_involutive_when_unbounded() {
        let mut selection = MultiSelection::new(SelectionLimit::Unbounded);

        assert!(selection.toggle_all(FRUIT));
        assert_eq!(selection.len(), 3);
        assert!(selection.toggle_all(FRUIT));
        assert!(selection.is_empty());
    }

    #[test]
    fn test_select_all_partial_fill() {
        let mut selection = MultiSelection::new(SelectionLimit::AtMost(2));
        selection.toggle("c");

        assert!(selection.toggle_all(FRUIT));
        assert_eq!(selection.iter().collect::<Vec<_>>(), ["c", "a"]);
        // Never fully selected under this ceiling, so toggling keeps filling
        assert!(!selection.toggle_all(FRUIT));
        assert_eq!(selection.len(), 2);
    }

    #[test]
    fn test_select_group_only_adds() {
        let mut selection = MultiSelection::new(SelectionLimit::Unbounded);
        selection.toggle("a");

        assert_eq!(selection.select_group(["a", "b"]), 1);
        assert_eq!(selection.iter().collect::<Vec<_>>(), ["a", "b"]);
        assert_eq!(selection.select_group(["a", "b"]), 0);
    }

    #[test]
    fn test_select_group_stops_at_ceiling() {
        let mut selection = MultiSelection::new(SelectionLimit::AtMost(1));
        assert_eq!(selection.select_group(FRUIT), 1);
        assert!(selection.contains("a"));
    }

    #[test]
    fn test_remove_stale_value_is_noop() {
        let mut selection = MultiSelection::with_values(SelectionLimit::Unbounded, ["a"]);
        assert!(!selection.remove("gone"));
        assert!(selection.remove("a"));
        assert!(!selection.clear());
    }

    #[test]
    fn test_with_values_respects_ceiling() {
        let selection = MultiSelection::with_values(SelectionLimit::AtMost(2), FRUIT);
        assert_eq!(selection.len(), 2);
    }

    #[test]
    fn test_single_refuses_empty() {
        let mut selection = SingleSelection::new(None, false);
        assert!(selection.set(Some("b")));
        assert!(!selection.set(None));
        assert_eq!(selection.value(), Some("b"));
        // Same value again is not a change
        assert!(!selection.set(Some("b")));
        assert!(selection.set(Some("c")));
        // The public clear path ignores the policy
        assert!(selection.clear());
        assert_eq!(selection.value(), None);
        assert!(!selection.clear());
    }

    #[test]
    fn test_single_allows_empty() {
        let mut selection = SingleSelection::new(Some("a".into()), true);
        assert!(selection.set(None));
        assert_eq!(selection.value(), None);
    }

    #[test]
    fn test_selection_dispatch() {
        let mut multi = Selection::multi(SelectionLimit::Unbounded);
        assert!(multi.toggle("a"));
        assert!(!multi.set_single(Some("b")));
        assert_eq!(multi.values(), ["a"]);

        let mut single = Selection::single(false);
        assert!(!single.toggle("a"));
        assert!(single.set_single(Some("b")));
        assert!(single.contains("b"));
        assert_eq!(single.len(), 1);
        assert!(single.clear());
        assert!(single.is_empty());
    }
}
