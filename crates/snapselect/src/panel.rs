//! Floating panel
//!
//! A panel exists only while the widget is open. It is made of a full-page
//! overlay (clicks on it dismiss the panel) and a listbox appended to the
//! body, populated from a fresh read of the control. Every listener the panel
//! registers is kept in its [`ListenerSet`] and released on teardown.
//!
//! # State Machine
//!
//! ```text
//! Closed ──Open/Toggle──► Open
//!   ▲                      │
//!   └─────Close/Toggle─────┘
//! ```

use snapselect_core::filter::matches;
use snapselect_core::{ControlDescriptor, Entry, FilterState, PlainOption, SelectConfig, Selection};
use snapselect_platform::{Document, EventKind, EventTarget, ListenerId, NodeId};

use crate::binding::{Binding, ListenerSet};
use crate::display::REMOVE_GLYPH;

/// Label of the injected select-all row
pub const SELECT_ALL_LABEL: &str = "Select All";

/// Placeholder of the search input
pub const SEARCH_PLACEHOLDER: &str = "Search...";

// =============================================================================
// State machine
// =============================================================================

/// Lifecycle state of a widget's panel
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PanelState {
    #[default]
    Closed,
    Open,
}

/// Requests that drive [`PanelState`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PanelEvent {
    Open,
    Close,
    Toggle,
}

impl PanelState {
    /// Handle an event and return the new state, or None if no transition
    pub fn on_event(&self, event: PanelEvent) -> Option<Self> {
        match (self, event) {
            (PanelState::Closed, PanelEvent::Open | PanelEvent::Toggle) => Some(PanelState::Open),
            (PanelState::Open, PanelEvent::Close | PanelEvent::Toggle) => Some(PanelState::Closed),
            _ => None,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, PanelState::Open)
    }
}

// =============================================================================
// Panel instance
// =============================================================================

/// One option row of the listbox
#[derive(Clone, Debug)]
struct ItemRow {
    /// Top-level entry index
    entry: usize,
    /// Index inside the group, for grouped options
    child: Option<usize>,
    row: NodeId,
    checkbox: Option<NodeId>,
    value: String,
}

#[derive(Clone, Copy, Debug)]
struct SearchBox {
    input: NodeId,
    clear: NodeId,
}

#[derive(Clone, Copy, Debug)]
struct SelectAllRow {
    row: NodeId,
    checkbox: NodeId,
}

/// What a panel needs to know to populate itself
pub struct PanelContext<'a> {
    pub trigger: NodeId,
    pub multiple: bool,
    pub config: &'a SelectConfig,
    pub selection: &'a Selection,
}

/// The live panel of an open widget
#[derive(Debug)]
pub struct PanelInstance {
    overlay: NodeId,
    listbox: NodeId,
    descriptor: ControlDescriptor,
    filter: FilterState,
    search: Option<SearchBox>,
    select_all: Option<SelectAllRow>,
    rows: Vec<ItemRow>,
    /// Group blocks by entry index
    groups: Vec<(usize, NodeId)>,
    listeners: ListenerSet,
}

impl PanelInstance {
    /// Build the overlay and listbox, populate them, and subscribe
    pub fn build(doc: &mut dyn Document, descriptor: ControlDescriptor, cx: &PanelContext<'_>) -> Self {
        let body = doc.body();

        let overlay = doc.create_element("div");
        doc.add_class(overlay, "snap-select-overlay");
        doc.append_child(body, overlay);

        let listbox = doc.create_element("div");
        doc.add_class(listbox, "snap-select-items");
        doc.set_attribute(listbox, "role", "listbox");
        if cx.multiple {
            doc.set_attribute(listbox, "aria-multiselectable", "true");
        }
        doc.set_attribute(listbox, "tabindex", "-1");
        doc.set_style(listbox, "display", "block");
        doc.append_child(body, listbox);

        let mut panel = Self {
            overlay,
            listbox,
            descriptor,
            filter: FilterState::new(),
            search: None,
            select_all: None,
            rows: Vec::new(),
            groups: Vec::new(),
            listeners: ListenerSet::new(),
        };

        panel.populate(doc, cx);

        let listeners = &mut panel.listeners;
        listeners.listen(doc, EventTarget::Node(overlay), EventKind::Click, Binding::Overlay);
        listeners.listen(doc, EventTarget::Node(listbox), EventKind::KeyDown, Binding::ListboxKey);
        listeners.listen(doc, EventTarget::Window, EventKind::Scroll, Binding::WindowScroll);
        listeners.listen(doc, EventTarget::Window, EventKind::Resize, Binding::WindowResize);
        listeners.listen(
            doc,
            EventTarget::Node(cx.trigger),
            EventKind::ElementResize,
            Binding::TriggerResize,
        );

        panel
    }

    fn populate(&mut self, doc: &mut dyn Document, cx: &PanelContext<'_>) {
        if cx.config.live_search {
            let wrapper = doc.create_element("div");
            doc.add_class(wrapper, "snap-select-search-wrapper");
            doc.append_child(self.listbox, wrapper);

            let input = doc.create_element("input");
            doc.add_class(input, "snap-select-search");
            doc.set_attribute(input, "placeholder", SEARCH_PLACEHOLDER);
            doc.append_child(wrapper, input);

            let clear = doc.create_element("span");
            doc.add_class(clear, "snap-select-clear-search");
            doc.set_text_content(clear, REMOVE_GLYPH);
            doc.set_style(clear, "display", "none");
            doc.append_child(wrapper, clear);

            self.listeners.listen(doc, EventTarget::Node(input), EventKind::Input, Binding::SearchInput);
            self.listeners.listen(doc, EventTarget::Node(clear), EventKind::Click, Binding::SearchClear);
            self.search = Some(SearchBox { input, clear });
        }

        if cx.multiple && cx.config.select_all_option {
            let row = doc.create_element("div");
            doc.add_class(row, "snap-select-item");
            doc.add_class(row, "snap-select-all");
            let checkbox = checkbox(doc);
            doc.append_child(row, checkbox);
            let label = label(doc, SELECT_ALL_LABEL);
            doc.append_child(row, label);
            doc.append_child(self.listbox, row);

            self.listeners.listen(doc, EventTarget::Node(row), EventKind::Click, Binding::SelectAll);
            self.select_all = Some(SelectAllRow { row, checkbox });
        }

        let entries = self.descriptor.entries.clone();
        for (index, entry) in entries.iter().enumerate() {
            match entry {
                Entry::Option(option) => {
                    let row = self.item(doc, cx, option, index, None);
                    doc.set_attribute(row, "data-optgroup", "");
                    doc.append_child(self.listbox, row);
                }
                Entry::Group(group) => {
                    let block = doc.create_element("div");
                    doc.add_class(block, "snap-select-optgroup");

                    let heading = doc.create_element("div");
                    doc.add_class(heading, "snap-select-optgroup-label");
                    doc.set_text_content(heading, &group.label);
                    doc.set_style(heading, "font-weight", "bold");
                    if cx.multiple && cx.config.select_optgroups {
                        self.listeners.listen(
                            doc,
                            EventTarget::Node(heading),
                            EventKind::Click,
                            Binding::GroupLabel(index),
                        );
                    }
                    doc.append_child(block, heading);

                    for (child, option) in group.children.iter().enumerate() {
                        let row = self.item(doc, cx, option, index, Some(child));
                        doc.append_child(block, row);
                    }

                    doc.append_child(self.listbox, block);
                    self.groups.push((index, block));
                }
            }
        }

        self.sync_checks(doc, cx.selection);
    }

    fn item(
        &mut self,
        doc: &mut dyn Document,
        cx: &PanelContext<'_>,
        option: &PlainOption,
        entry: usize,
        child: Option<usize>,
    ) -> NodeId {
        let row = doc.create_element("div");
        doc.add_class(row, "snap-select-item");
        doc.set_attribute(row, "data-value", &option.value);
        doc.set_attribute(row, "data-key", &option.keyword);

        let checkbox = if cx.multiple {
            let checkbox = checkbox(doc);
            doc.append_child(row, checkbox);
            let label = label(doc, &option.label);
            doc.append_child(row, label);
            self.listeners.listen(
                doc,
                EventTarget::Node(row),
                EventKind::Click,
                Binding::ItemToggle(option.value.clone()),
            );
            Some(checkbox)
        } else {
            doc.set_text_content(row, &option.label);
            self.listeners.listen(
                doc,
                EventTarget::Node(row),
                EventKind::Click,
                Binding::SingleItem(option.value.clone()),
            );
            None
        };

        self.rows.push(ItemRow {
            entry,
            child,
            row,
            checkbox,
            value: option.value.clone(),
        });
        row
    }

    pub fn overlay(&self) -> NodeId {
        self.overlay
    }

    pub fn listbox(&self) -> NodeId {
        self.listbox
    }

    /// The control snapshot this panel was populated from
    pub fn descriptor(&self) -> &ControlDescriptor {
        &self.descriptor
    }

    /// The binding of one of this panel's listeners
    pub fn binding(&self, listener: ListenerId) -> Option<&Binding> {
        self.listeners.get(listener)
    }

    pub fn search_input(&self) -> Option<NodeId> {
        self.search.map(|search| search.input)
    }

    pub fn search_term(&self) -> &str {
        self.filter.term()
    }

    /// Make every checkbox match `selection`
    ///
    /// The select-all box is checked only when every option is selected.
    pub fn sync_checks(&self, doc: &mut dyn Document, selection: &Selection) {
        for row in &self.rows {
            if let Some(checkbox) = row.checkbox {
                doc.set_checked(checkbox, selection.contains(&row.value));
            }
        }
        if let Some(select_all) = self.select_all {
            let full = match selection {
                Selection::Multi(multi) => multi.is_fully_selected(self.descriptor.option_count()),
                Selection::Single(_) => false,
            };
            doc.set_checked(select_all.checkbox, full);
        }
    }

    /// Replace the search term and refilter
    pub fn set_search_term(&mut self, doc: &mut dyn Document, term: &str) {
        let visibility = self.filter.set_term(term, &self.descriptor);

        if let Some(search) = self.search {
            doc.set_style(search.clear, "display", if term.is_empty() { "none" } else { "inline" });
        }

        let show = |visible: bool| if visible { "" } else { "none" };

        if let Some(select_all) = self.select_all {
            let visible = matches(&self.filter.folded_term(), SELECT_ALL_LABEL, "");
            doc.set_style(select_all.row, "display", show(visible));
        }
        for row in &self.rows {
            let visible = match row.child {
                // A grouped row follows its own match; the group block hides it otherwise
                Some(child) => match visibility.entries.get(row.entry) {
                    Some(snapselect_core::EntryVisibility::Group { children, .. }) => {
                        children.get(child).copied().unwrap_or(false)
                    }
                    _ => false,
                },
                None => visibility.is_option_visible(row.entry, None),
            };
            doc.set_style(row.row, "display", show(visible));
        }
        for &(entry, block) in &self.groups {
            let visible = visibility.entries.get(entry).is_some_and(|e| e.is_visible());
            doc.set_style(block, "display", show(visible));
        }
    }

    /// Clear the search box and restore every row
    pub fn clear_search(&mut self, doc: &mut dyn Document) {
        if let Some(search) = self.search {
            doc.set_input_value(search.input, "");
        }
        self.set_search_term(doc, "");
    }

    fn is_rendered(&self, doc: &dyn Document, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if doc.style(id, "display").as_deref() == Some("none") {
                return false;
            }
            if id == self.listbox {
                return true;
            }
            current = doc.parent(id);
        }
        false
    }

    /// Checkboxes a keyboard user can reach, in order
    pub fn visible_toggles(&self, doc: &dyn Document) -> Vec<NodeId> {
        self.select_all
            .map(|select_all| select_all.checkbox)
            .into_iter()
            .chain(self.rows.iter().filter_map(|row| row.checkbox))
            .filter(|&checkbox| self.is_rendered(doc, checkbox))
            .collect()
    }

    /// The binding a checkbox activates
    pub fn toggle_binding(&self, checkbox: NodeId) -> Option<Binding> {
        if self.select_all.is_some_and(|select_all| select_all.checkbox == checkbox) {
            return Some(Binding::SelectAll);
        }
        self.rows
            .iter()
            .find(|row| row.checkbox == Some(checkbox))
            .map(|row| Binding::ItemToggle(row.value.clone()))
    }

    /// Release every listener and detach the panel nodes
    pub fn teardown(mut self, doc: &mut dyn Document) {
        let released = self.listeners.release(doc);
        doc.remove(self.listbox);
        doc.remove(self.overlay);
        tracing::trace!("panel torn down, {} listener(s) released", released);
    }
}

fn checkbox(doc: &mut dyn Document) -> NodeId {
    let checkbox = doc.create_element("input");
    doc.set_attribute(checkbox, "type", "checkbox");
    doc.add_class(checkbox, "snap-select-checkbox");
    checkbox
}

fn label(doc: &mut dyn Document, text: &str) -> NodeId {
    let label = doc.create_element("label");
    doc.add_class(label, "snap-select-label");
    doc.set_text_content(label, text);
    label
}
