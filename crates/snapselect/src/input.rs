//! Input handling
//!
//! Maps a delivered event, already resolved to one of the widget's
//! [`Binding`]s, onto selection changes and panel transitions. Handlers for
//! buttons inside the trigger and rows inside the panel stop propagation so
//! the trigger does not also toggle.

use snapselect_core::Selection;
use snapselect_platform::{Document, DomEvent, EventTarget, Key, Propagation};

use crate::binding::Binding;
use crate::widget::SelectWidget;

impl SelectWidget {
    pub(crate) fn on_binding(
        &mut self,
        doc: &mut dyn Document,
        binding: Binding,
        event: &DomEvent,
    ) -> Propagation {
        match binding {
            Binding::TriggerClick => {
                self.toggle(doc);
                Propagation::Stop
            }
            Binding::TriggerKey => match event.key() {
                Some(key) if key.is_activation() => {
                    self.toggle(doc);
                    Propagation::Stop
                }
                Some(Key::Escape) => {
                    self.close(doc);
                    Propagation::Continue
                }
                _ => Propagation::Continue,
            },
            Binding::AncestryRemoved => {
                let removed = event
                    .removed_nodes
                    .iter()
                    .any(|&node| doc.contains(node, self.container));
                if removed {
                    tracing::debug!("{:?} removed from the document", self.id);
                    self.close(doc);
                    self.stop_observing(doc);
                }
                Propagation::Continue
            }

            Binding::RemoveTag(value) => {
                if let Selection::Multi(multi) = &mut self.selection {
                    if multi.remove(&value) {
                        self.commit(doc);
                    }
                }
                Propagation::Stop
            }
            Binding::ClearAll => {
                if let Selection::Multi(multi) = &mut self.selection {
                    if multi.clear() {
                        self.commit(doc);
                    }
                }
                Propagation::Stop
            }
            Binding::ClearSingle => {
                if self.selection.set_single(None) {
                    self.commit(doc);
                }
                Propagation::Stop
            }

            Binding::ItemToggle(value) => {
                if self.selection.toggle(&value) {
                    self.commit(doc);
                } else {
                    // Rejected at the ceiling: undo any native checkbox flip
                    self.sync_panel(doc);
                }
                Propagation::Stop
            }
            Binding::SingleItem(value) => {
                if self.selection.set_single(Some(&value)) {
                    self.commit(doc);
                }
                if self.config.close_on_select {
                    self.close(doc);
                }
                Propagation::Stop
            }
            Binding::GroupLabel(index) => {
                self.select_group(doc, index);
                Propagation::Stop
            }
            Binding::SelectAll => {
                self.toggle_all(doc);
                Propagation::Stop
            }

            Binding::SearchInput => {
                if let Some(panel) = self.panel.as_mut() {
                    if let Some(input) = panel.search_input() {
                        let term = doc.input_value(input);
                        panel.set_search_term(doc, &term);
                    }
                }
                Propagation::Continue
            }
            Binding::SearchClear => {
                if let Some(panel) = self.panel.as_mut() {
                    panel.clear_search(doc);
                }
                Propagation::Continue
            }
            Binding::ListboxKey => {
                self.on_listbox_key(doc, event);
                Propagation::Continue
            }
            Binding::Overlay => {
                let on_overlay = self
                    .panel
                    .as_ref()
                    .is_some_and(|panel| event.target == EventTarget::Node(panel.overlay()));
                if on_overlay {
                    self.close(doc);
                }
                Propagation::Continue
            }
            Binding::WindowScroll => {
                let inside = match (event.target, self.panel.as_ref()) {
                    (EventTarget::Node(node), Some(panel)) => doc.contains(panel.listbox(), node),
                    _ => false,
                };
                if !inside {
                    self.reposition(doc);
                }
                Propagation::Continue
            }
            Binding::WindowResize | Binding::TriggerResize => {
                self.reposition(doc);
                Propagation::Continue
            }
        }
    }

    fn select_group(&mut self, doc: &mut dyn Document, index: usize) {
        let Some(group) = self.panel.as_ref().and_then(|panel| panel.descriptor().group(index)) else {
            return;
        };
        let children: Vec<String> = group.children.iter().map(|option| option.value.clone()).collect();

        let added = match &mut self.selection {
            Selection::Multi(multi) => multi.select_group(children.iter().map(String::as_str)),
            Selection::Single(_) => 0,
        };
        if added > 0 {
            self.commit(doc);
        }
    }

    fn toggle_all(&mut self, doc: &mut dyn Document) {
        let Some(panel) = self.panel.as_ref() else {
            return;
        };
        let values: Vec<String> = panel
            .descriptor()
            .options()
            .map(|option| option.value.clone())
            .collect();

        let changed = match &mut self.selection {
            Selection::Multi(multi) => multi.toggle_all(values.iter().map(String::as_str)),
            Selection::Single(_) => false,
        };
        if changed {
            self.commit(doc);
        } else {
            self.sync_panel(doc);
        }
    }

    fn on_listbox_key(&mut self, doc: &mut dyn Document, event: &DomEvent) {
        let Some(key) = event.key() else {
            return;
        };

        if *key == Key::Escape {
            self.close(doc);
            return;
        }
        // Item navigation is wired for multi selects only
        if !self.is_multiple() {
            return;
        }
        let Some(panel) = self.panel.as_ref() else {
            return;
        };

        let toggles = panel.visible_toggles(doc);
        let current = doc
            .active_element()
            .and_then(|focused| toggles.iter().position(|&toggle| toggle == focused));

        match key {
            Key::Down | Key::Up if !toggles.is_empty() => {
                let last = toggles.len() - 1;
                let next = match (key, current) {
                    (Key::Down, Some(index)) if index < last => index + 1,
                    (Key::Down, _) => 0,
                    (_, Some(index)) if index > 0 => index - 1,
                    _ => last,
                };
                doc.focus(toggles[next]);
            }
            key if key.is_activation() => {
                let binding = current.and_then(|index| panel.toggle_binding(toggles[index]));
                if let Some(binding) = binding {
                    self.on_binding(doc, binding, event);
                }
            }
            _ => {}
        }
    }
}
