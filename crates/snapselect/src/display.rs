//! Trigger display
//!
//! Repaints the tag area of the trigger from the current selection. Multi
//! selects show one removable tag per value (plus an optional clear-all
//! button), single selects show the chosen label. Either falls back to the
//! placeholder when nothing is selected.

use snapselect_core::{ControlDescriptor, SelectConfig, Selection};
use snapselect_platform::{Document, EventKind, EventTarget, NodeId};

use crate::binding::{Binding, ListenerSet};

/// Text of the remove and clear buttons
pub const REMOVE_GLYPH: &str = "×";

fn element(doc: &mut dyn Document, tag: &str, class: &str, text: &str) -> NodeId {
    let node = doc.create_element(tag);
    doc.add_class(node, class);
    if !text.is_empty() {
        doc.set_text_content(node, text);
    }
    node
}

/// Rebuild the contents of `tags`
///
/// `listeners` holds the previous repaint's buttons and is released first.
pub fn render(
    doc: &mut dyn Document,
    tags: NodeId,
    selection: &Selection,
    descriptor: &ControlDescriptor,
    config: &SelectConfig,
    listeners: &mut ListenerSet,
) {
    listeners.release(doc);
    doc.clear_children(tags);

    match selection {
        Selection::Multi(multi) if multi.is_empty() => {
            let placeholder = element(doc, "div", "snap-select-placeholder", &config.placeholder);
            doc.append_child(tags, placeholder);
        }
        Selection::Multi(multi) => {
            for value in multi.iter() {
                // Values whose option disappeared from the control are skipped
                let Some(option) = descriptor.find(value) else {
                    continue;
                };

                let tag = element(doc, "div", "snap-select-tag", &option.label);
                let remove = element(doc, "span", "snap-select-remove", REMOVE_GLYPH);
                doc.append_child(tag, remove);
                doc.append_child(tags, tag);
                listeners.listen(
                    doc,
                    EventTarget::Node(remove),
                    EventKind::Click,
                    Binding::RemoveTag(value.to_string()),
                );
            }

            if config.clear_all_button {
                let clear = element(doc, "span", "snap-select-clear-all", REMOVE_GLYPH);
                doc.append_child(tags, clear);
                listeners.listen(doc, EventTarget::Node(clear), EventKind::Click, Binding::ClearAll);
            }
        }
        Selection::Single(single) => {
            let text = single
                .value()
                .and_then(|value| descriptor.find(value))
                .map(|option| option.label.as_str())
                .unwrap_or(config.placeholder.as_str());

            let selected = element(doc, "div", "snap-select-single-selected-text", text);

            if config.allow_empty {
                let clear = element(doc, "span", "snap-select-clear-all", REMOVE_GLYPH);
                doc.set_style(clear, "float", "right");
                doc.append_child(selected, clear);
                doc.set_style(selected, "display", "inline-block");
                doc.set_style(selected, "width", "calc(100% - 4px)");
                listeners.listen(doc, EventTarget::Node(clear), EventKind::Click, Binding::ClearSingle);
            }

            doc.append_child(tags, selected);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snapselect_core::{MultiSelection, SelectionLimit, SingleSelection};
    use snapselect_platform_headless::HeadlessDocument;

    fn fixture(multiple: bool) -> (HeadlessDocument, NodeId, ControlDescriptor) {
        let mut doc = HeadlessDocument::new();
        let body = doc.body();
        let control = doc.add_select(body, multiple);
        doc.add_option(control, "a", "Apple");
        doc.add_option(control, "b", "Banana");
        let tags = doc.create_element("div");
        doc.append_child(body, tags);
        let descriptor = ControlDescriptor::read(&doc, control);
        (doc, tags, descriptor)
    }

    #[test]
    fn test_multi_placeholder_when_empty() {
        let (mut doc, tags, descriptor) = fixture(true);
        let mut listeners = ListenerSet::new();
        let selection = Selection::multi(SelectionLimit::Unbounded);

        render(&mut doc, tags, &selection, &descriptor, &SelectConfig::default(), &mut listeners);

        let children = doc.children(tags);
        assert_eq!(children.len(), 1);
        assert!(doc.has_class(children[0], "snap-select-placeholder"));
        assert_eq!(doc.text_content(children[0]), "Select...");
        assert!(listeners.is_empty());
    }

    #[test]
    fn test_multi_tags_in_insertion_order() {
        let (mut doc, tags, descriptor) = fixture(true);
        let mut listeners = ListenerSet::new();
        let selection = Selection::Multi(MultiSelection::with_values(
            SelectionLimit::Unbounded,
            ["b", "gone", "a"],
        ));
        let config = SelectConfig {
            clear_all_button: true,
            ..SelectConfig::default()
        };

        render(&mut doc, tags, &selection, &descriptor, &config, &mut listeners);

        let children = doc.children(tags);
        assert_eq!(children.len(), 3);
        assert_eq!(doc.own_text(children[0]), "Banana");
        assert_eq!(doc.own_text(children[1]), "Apple");
        assert!(doc.has_class(children[2], "snap-select-clear-all"));
        // Two remove buttons and the clear-all button
        assert_eq!(listeners.len(), 3);

        // A repaint replaces the previous buttons
        render(&mut doc, tags, &selection, &descriptor, &config, &mut listeners);
        assert_eq!(listeners.len(), 3);
        assert_eq!(doc.listener_count(), 3);
    }

    #[test]
    fn test_single_label_and_clear_button() {
        let (mut doc, tags, descriptor) = fixture(false);
        let mut listeners = ListenerSet::new();
        let selection = Selection::Single(SingleSelection::new(Some("b".into()), true));
        let config = SelectConfig {
            allow_empty: true,
            ..SelectConfig::default()
        };

        render(&mut doc, tags, &selection, &descriptor, &config, &mut listeners);

        let text = doc.children(tags)[0];
        assert_eq!(doc.own_text(text), "Banana");
        assert_eq!(doc.style(text, "display").as_deref(), Some("inline-block"));
        assert_eq!(doc.children(text).len(), 1);
        assert_eq!(listeners.len(), 1);
    }

    #[test]
    fn test_single_placeholder_without_clear_button() {
        let (mut doc, tags, descriptor) = fixture(false);
        let mut listeners = ListenerSet::new();

        render(
            &mut doc,
            tags,
            &Selection::single(false),
            &descriptor,
            &SelectConfig::default(),
            &mut listeners,
        );

        let text = doc.children(tags)[0];
        assert_eq!(doc.text_content(text), "Select...");
        assert!(doc.children(text).is_empty());
        assert!(listeners.is_empty());
    }
}
