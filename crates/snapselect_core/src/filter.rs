//! Live search filtering
//!
//! A plain case-insensitive substring match against an option's label or its
//! keyword tag. An optgroup stays visible when its own label matches or when
//! any of its children do.

use crate::options::{ControlDescriptor, Entry};

/// Whether a row with `label` and `keyword` matches an already case-folded term
///
/// A blank keyword only matches the empty term.
pub fn matches(folded_term: &str, label: &str, keyword: &str) -> bool {
    label.to_lowercase().contains(folded_term) || keyword.to_lowercase().contains(folded_term)
}

/// Visibility of one top-level entry
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EntryVisibility {
    Option(bool),
    Group { visible: bool, children: Vec<bool> },
}

impl EntryVisibility {
    /// Whether the entry row (or group block) itself is shown
    pub fn is_visible(&self) -> bool {
        match self {
            EntryVisibility::Option(visible) => *visible,
            EntryVisibility::Group { visible, .. } => *visible,
        }
    }
}

/// Visibility of every entry, parallel to [`ControlDescriptor::entries`]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Visibility {
    pub entries: Vec<EntryVisibility>,
}

impl Visibility {
    /// Whether the option at `entry` (and `child`, inside a group) is shown
    ///
    /// A child inside a hidden group is never shown.
    pub fn is_option_visible(&self, entry: usize, child: Option<usize>) -> bool {
        match (self.entries.get(entry), child) {
            (Some(EntryVisibility::Option(visible)), None) => *visible,
            (Some(EntryVisibility::Group { visible, children }), Some(child)) => {
                *visible && children.get(child).copied().unwrap_or(false)
            }
            _ => false,
        }
    }

    /// Number of visible options
    pub fn visible_option_count(&self) -> usize {
        self.entries
            .iter()
            .map(|entry| match entry {
                EntryVisibility::Option(visible) => usize::from(*visible),
                EntryVisibility::Group { visible, children } => {
                    if *visible {
                        children.iter().filter(|c| **c).count()
                    } else {
                        0
                    }
                }
            })
            .sum()
    }
}

/// Search term and the visibility derived from it
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterState {
    term: String,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    /// Case-folded term used for matching
    pub fn folded_term(&self) -> String {
        self.term.to_lowercase()
    }

    /// Replace the term and recompute visibility for `descriptor`
    pub fn set_term(&mut self, term: &str, descriptor: &ControlDescriptor) -> Visibility {
        self.term = term.to_string();
        self.visibility(descriptor)
    }

    /// Visibility of every entry under the current term
    pub fn visibility(&self, descriptor: &ControlDescriptor) -> Visibility {
        let term = self.folded_term();

        let entries = descriptor
            .entries
            .iter()
            .map(|entry| match entry {
                Entry::Option(option) => {
                    EntryVisibility::Option(matches(&term, &option.label, &option.keyword))
                }
                Entry::Group(group) => {
                    let children: Vec<bool> = group
                        .children
                        .iter()
                        .map(|option| matches(&term, &option.label, &option.keyword))
                        .collect();
                    let visible =
                        group.label.to_lowercase().contains(&term) || children.contains(&true);
                    EntryVisibility::Group { visible, children }
                }
            })
            .collect();

        tracing::trace!("filter recomputed for term {:?}", self.term);
        Visibility { entries }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{Optgroup, PlainOption};
    use snapselect_platform::NodeId;

    fn option(value: &str, label: &str, keyword: &str) -> PlainOption {
        PlainOption {
            value: value.into(),
            label: label.into(),
            keyword: keyword.into(),
            node: NodeId::default(),
        }
    }

    fn descriptor() -> ControlDescriptor {
        ControlDescriptor {
            entries: vec![
                Entry::Option(option("a", "Apple", "")),
                Entry::Group(Optgroup {
                    label: "Berries".into(),
                    children: vec![
                        option("s", "Strawberry", "red"),
                        option("b", "Blueberry", ""),
                    ],
                    node: NodeId::default(),
                }),
                Entry::Option(option("c", "Cherry", "stone fruit")),
            ],
        }
    }

    #[test]
    fn test_matches() {
        assert!(matches("app", "Apple", ""));
        assert!(matches("", "Apple", ""));
        assert!(matches("stone", "Cherry", "Stone Fruit"));
        assert!(!matches("pear", "Apple", ""));
    }

    #[test]
    fn test_empty_term_shows_everything() {
        let filter = FilterState::new();
        let visibility = filter.visibility(&descriptor());
        assert_eq!(visibility.visible_option_count(), 4);
        assert!(visibility.entries.iter().all(EntryVisibility::is_visible));
    }

    #[test]
    fn test_single_match_shows_enclosing_group() {
        let mut filter = FilterState::new();
        let desc = descriptor();
        let visibility = filter.set_term("STRAW", &desc);

        assert_eq!(visibility.visible_option_count(), 1);
        assert!(!visibility.is_option_visible(0, None));
        assert!(visibility.entries[1].is_visible());
        assert!(visibility.is_option_visible(1, Some(0)));
        assert!(!visibility.is_option_visible(1, Some(1)));
        assert!(!visibility.is_option_visible(2, None));

        let restored = filter.set_term("", &desc);
        assert_eq!(restored.visible_option_count(), 4);
    }

    #[test]
    fn test_group_label_match_keeps_group_visible() {
        let mut filter = FilterState::new();
        let visibility = filter.set_term("berries", &descriptor());

        assert!(visibility.entries[1].is_visible());
        assert_eq!(visibility.visible_option_count(), 0);
    }

    #[test]
    fn test_keyword_match() {
        let mut filter = FilterState::new();
        let visibility = filter.set_term("red", &descriptor());
        assert!(visibility.is_option_visible(1, Some(0)));
        assert_eq!(visibility.visible_option_count(), 1);
    }
}
