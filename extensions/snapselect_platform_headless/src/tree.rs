//! Node storage for the headless document

use rustc_hash::FxHashMap;
use snapselect_platform::Rect;

use crate::selector::Matchable;

/// One element of the in-memory tree
#[derive(Clone, Debug, Default)]
pub(crate) struct NodeData {
    pub tag: String,
    pub parent: Option<snapselect_platform::NodeId>,
    pub children: Vec<snapselect_platform::NodeId>,
    pub attributes: FxHashMap<String, String>,
    pub classes: Vec<String>,
    pub text: String,
    pub styles: FxHashMap<String, String>,
    pub selected: bool,
    pub checked: bool,
    pub value: String,
    /// Layout rectangle supplied by the embedder
    pub rect: Rect,
}

impl NodeData {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            ..Default::default()
        }
    }

    pub fn attribute(&self, name: &str) -> Option<String> {
        if name == "class" {
            return (!self.classes.is_empty()).then(|| self.classes.join(" "));
        }
        self.attributes.get(name).cloned()
    }

    pub fn set_attribute(&mut self, name: &str, value: &str) {
        if name == "class" {
            self.classes = value.split_whitespace().map(str::to_string).collect();
        } else {
            self.attributes.insert(name.to_string(), value.to_string());
        }
    }

    /// Parse a `px` style length
    pub fn style_px(&self, property: &str) -> Option<f32> {
        self.styles
            .get(property)?
            .trim()
            .trim_end_matches("px")
            .parse()
            .ok()
    }
}

impl Matchable for NodeData {
    fn tag(&self) -> &str {
        &self.tag
    }

    fn attr(&self, name: &str) -> Option<String> {
        self.attribute(name)
    }

    fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_attribute_round_trips_through_classes() {
        let mut node = NodeData::new("DIV");
        assert_eq!(node.tag, "div");
        assert_eq!(node.attribute("class"), None);

        node.set_attribute("class", "a  b");
        assert!(node.has_class("a"));
        assert!(node.has_class("b"));
        assert_eq!(node.attribute("class").as_deref(), Some("a b"));
    }

    #[test]
    fn test_style_px() {
        let mut node = NodeData::new("div");
        node.styles.insert("left".into(), "12.5px".into());
        node.styles.insert("width".into(), "calc(100% - 4px)".into());
        assert_eq!(node.style_px("left"), Some(12.5));
        assert_eq!(node.style_px("width"), None);
        assert_eq!(node.style_px("top"), None);
    }
}
