//! Option model - reads the native control and writes selection back into it
//!
//! The native `select` element stays the source of truth for what can be
//! selected. [`ControlDescriptor::read`] takes a fresh snapshot of its entries
//! every time a panel is populated, so options the host adds or removes
//! between openings are picked up on the next open.

use snapselect_platform::{Document, NodeId};

use crate::selection::Selection;

/// Attribute holding an option's extra searchable keywords
pub const KEYWORD_ATTRIBUTE: &str = "data-key";

/// A selectable leaf of the control
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlainOption {
    /// The value submitted with the form
    pub value: String,
    /// Text shown for the option
    pub label: String,
    /// Additional search keywords (may be blank)
    pub keyword: String,
    /// The `option` element this was read from
    pub node: NodeId,
}

impl PlainOption {
    fn read(doc: &dyn Document, node: NodeId) -> Self {
        let label = doc.text_content(node);
        Self {
            value: doc.attribute(node, "value").unwrap_or_else(|| label.clone()),
            keyword: doc.attribute(node, KEYWORD_ATTRIBUTE).unwrap_or_default(),
            label,
            node,
        }
    }
}

/// A labelled group of options
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Optgroup {
    /// Group heading
    pub label: String,
    /// Options in the group, in document order
    pub children: Vec<PlainOption>,
    /// The `optgroup` element this was read from
    pub node: NodeId,
}

/// A top-level entry of the control
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Entry {
    Option(PlainOption),
    Group(Optgroup),
}

/// Snapshot of a control's entries in document order
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ControlDescriptor {
    pub entries: Vec<Entry>,
}

impl ControlDescriptor {
    /// Read the entries of `control`
    pub fn read(doc: &dyn Document, control: NodeId) -> Self {
        let entries = doc
            .children(control)
            .into_iter()
            .filter_map(|child| match doc.tag_name(child).as_str() {
                "option" => Some(Entry::Option(PlainOption::read(doc, child))),
                "optgroup" => Some(Entry::Group(Optgroup {
                    label: doc.attribute(child, "label").unwrap_or_default(),
                    children: doc
                        .children(child)
                        .into_iter()
                        .filter(|&option| doc.tag_name(option) == "option")
                        .map(|option| PlainOption::read(doc, option))
                        .collect(),
                    node: child,
                })),
                _ => None,
            })
            .collect();

        Self { entries }
    }

    /// Every option, groups flattened, in document order
    pub fn options(&self) -> impl Iterator<Item = &PlainOption> {
        self.entries.iter().flat_map(|entry| match entry {
            Entry::Option(option) => std::slice::from_ref(option).iter(),
            Entry::Group(group) => group.children.iter(),
        })
    }

    /// Number of options, groups flattened
    pub fn option_count(&self) -> usize {
        self.options().count()
    }

    /// First option carrying `value`
    pub fn find(&self, value: &str) -> Option<&PlainOption> {
        self.options().find(|option| option.value == value)
    }

    /// The group at entry index `index`
    pub fn group(&self, index: usize) -> Option<&Optgroup> {
        match self.entries.get(index) {
            Some(Entry::Group(group)) => Some(group),
            _ => None,
        }
    }
}

/// Adapter over one native control
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OptionModel {
    control: NodeId,
}

impl OptionModel {
    pub fn new(control: NodeId) -> Self {
        Self { control }
    }

    /// The native control
    pub fn control(&self) -> NodeId {
        self.control
    }

    /// Whether the control accepts several values
    pub fn is_multiple(&self, doc: &dyn Document) -> bool {
        doc.attribute(self.control, "multiple").is_some()
    }

    /// Fresh snapshot of the control's entries
    pub fn read(&self, doc: &dyn Document) -> ControlDescriptor {
        ControlDescriptor::read(doc, self.control)
    }

    /// Values of the options currently flagged as selected, in control order
    pub fn selected_values(&self, doc: &dyn Document) -> Vec<String> {
        self.read(doc)
            .options()
            .filter(|option| doc.is_selected(option.node))
            .map(|option| option.value.clone())
            .collect()
    }

    /// Make every option's selected flag match `selection` exactly
    pub fn write_back(&self, doc: &mut dyn Document, selection: &Selection) {
        let descriptor = self.read(doc);
        for option in descriptor.options() {
            doc.set_selected(option.node, selection.contains(&option.value));
        }
    }

    /// Tell host listeners the control's value changed
    pub fn notify_change(&self, doc: &mut dyn Document) {
        doc.dispatch_change(self.control);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SelectionLimit;
    use snapselect_platform_headless::HeadlessDocument;

    fn fruit_control(doc: &mut HeadlessDocument) -> NodeId {
        let body = doc.body();
        let control = doc.add_select(body, true);
        doc.add_option(control, "a", "Apple");
        let group = doc.add_optgroup(control, "Berries");
        let straw = doc.add_option(group, "s", "Strawberry");
        doc.set_attribute(straw, KEYWORD_ATTRIBUTE, "red summer");
        doc.add_option(group, "r", "Raspberry");
        control
    }

    #[test]
    fn test_read_descriptor() {
        let mut doc = HeadlessDocument::new();
        let control = fruit_control(&mut doc);
        let descriptor = ControlDescriptor::read(&doc, control);

        assert_eq!(descriptor.entries.len(), 2);
        assert_eq!(descriptor.option_count(), 3);
        let group = descriptor.group(1).unwrap();
        assert_eq!(group.label, "Berries");
        assert_eq!(group.children[0].keyword, "red summer");
        assert!(descriptor.group(0).is_none());

        let values: Vec<_> = descriptor.options().map(|o| o.value.as_str()).collect();
        assert_eq!(values, ["a", "s", "r"]);
    }

    #[test]
    fn test_value_falls_back_to_text() {
        let mut doc = HeadlessDocument::new();
        let body = doc.body();
        let control = doc.add_select(body, false);
        let option = doc.create_element("option");
        doc.set_text_content(option, "Plain");
        doc.append_child(control, option);

        let descriptor = ControlDescriptor::read(&doc, control);
        assert_eq!(descriptor.find("Plain").unwrap().label, "Plain");
    }

    #[test]
    fn test_write_back_clears_stale_flags() {
        let mut doc = HeadlessDocument::new();
        let control = fruit_control(&mut doc);
        let model = OptionModel::new(control);

        let apple = model.read(&doc).find("a").unwrap().node;
        doc.set_selected(apple, true);
        assert_eq!(model.selected_values(&doc), ["a"]);

        let mut selection = Selection::multi(SelectionLimit::Unbounded);
        selection.toggle("r");
        model.write_back(&mut doc, &selection);

        assert_eq!(model.selected_values(&doc), ["r"]);
        assert!(!doc.is_selected(apple));
    }

    #[test]
    fn test_notify_change_counts() {
        let mut doc = HeadlessDocument::new();
        let control = fruit_control(&mut doc);
        let model = OptionModel::new(control);

        assert!(model.is_multiple(&doc));
        model.notify_change(&mut doc);
        assert_eq!(doc.change_count(control), 1);
    }
}
