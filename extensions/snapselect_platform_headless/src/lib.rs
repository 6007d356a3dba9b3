//! SnapSelect Headless Host
//!
//! An in-memory implementation of [`Document`] and [`EventQueue`]. It keeps a
//! small element tree with attributes, classes, inline styles, form flags and
//! embedder-supplied layout rectangles, and it records the events a user would
//! produce so they can be routed later.
//!
//! Tree edits that detach nodes queue `ChildList` records for every observer
//! whose subtree lost a node, the way a mutation observer would.
//!
//! # Example
//!
//! ```rust
//! use snapselect_platform::Document;
//! use snapselect_platform_headless::HeadlessDocument;
//!
//! let mut doc = HeadlessDocument::new();
//! let body = doc.body();
//! let control = doc.add_select(body, true);
//! doc.add_option(control, "a", "Apple");
//!
//! assert_eq!(doc.query_selector_all("select").unwrap(), vec![control]);
//! assert_eq!(doc.text_content(control), "Apple");
//! ```

mod selector;
mod tree;

use std::collections::VecDeque;

use rustc_hash::FxHashMap;
use slotmap::SlotMap;
use smallvec::SmallVec;
use snapselect_platform::{
    Document, DomEvent, EventKind, EventQueue, EventTarget, Key, ListenerId, NodeId, Rect,
    Result, Viewport,
};

use tree::NodeData;

#[derive(Clone, Copy, Debug)]
struct Listener {
    target: EventTarget,
    kind: EventKind,
}

/// In-memory host document
pub struct HeadlessDocument {
    nodes: SlotMap<NodeId, NodeData>,
    body: NodeId,
    listeners: SlotMap<ListenerId, Listener>,
    /// Registration order, used for delivery order
    listener_order: Vec<ListenerId>,
    queue: VecDeque<DomEvent>,
    focused: Option<NodeId>,
    viewport: Viewport,
    changes: FxHashMap<NodeId, usize>,
    change_log: Vec<NodeId>,
}

impl Default for HeadlessDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessDocument {
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let body = nodes.insert(NodeData::new("body"));
        Self {
            nodes,
            body,
            listeners: SlotMap::with_key(),
            listener_order: Vec::new(),
            queue: VecDeque::new(),
            focused: None,
            viewport: Viewport::default(),
            changes: FxHashMap::default(),
            change_log: Vec::new(),
        }
    }

    fn node(&self, node: NodeId) -> Option<&NodeData> {
        self.nodes.get(node)
    }

    fn node_mut(&mut self, node: NodeId) -> Option<&mut NodeData> {
        let data = self.nodes.get_mut(node);
        if data.is_none() {
            tracing::warn!("ignoring edit of unknown node {:?}", node);
        }
        data
    }

    // =========================================================================
    // Fixture builders
    // =========================================================================

    /// Append a `<select>` to `parent`
    pub fn add_select(&mut self, parent: NodeId, multiple: bool) -> NodeId {
        let select = self.create_element("select");
        if multiple {
            self.set_attribute(select, "multiple", "");
        }
        self.append_child(parent, select);
        select
    }

    /// Append an `<option>` with a value attribute and label text to `parent`
    pub fn add_option(&mut self, parent: NodeId, value: &str, label: &str) -> NodeId {
        let option = self.create_element("option");
        self.set_attribute(option, "value", value);
        self.set_text_content(option, label);
        self.append_child(parent, option);
        option
    }

    /// Append an `<optgroup>` with a label to `parent`
    pub fn add_optgroup(&mut self, parent: NodeId, label: &str) -> NodeId {
        let group = self.create_element("optgroup");
        self.set_attribute(group, "label", label);
        self.append_child(parent, group);
        group
    }

    /// Set the page-space layout rectangle of `node`
    pub fn set_rect(&mut self, node: NodeId, rect: Rect) {
        if let Some(data) = self.node_mut(node) {
            data.rect = rect;
        }
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    // =========================================================================
    // User simulation
    // =========================================================================

    /// Queue a click on `node`
    pub fn click(&mut self, node: NodeId) {
        self.push_event(DomEvent::click(node));
    }

    /// Queue a key press on `node`
    pub fn press_key(&mut self, node: NodeId, key: Key) {
        self.push_event(DomEvent::key_down(node, key));
    }

    /// Replace the value of `input` and queue an input notification
    pub fn type_text(&mut self, input: NodeId, text: &str) {
        self.set_input_value(input, text);
        self.push_event(DomEvent::input(input));
    }

    /// Queue a scroll of `target` without moving the page
    pub fn scroll(&mut self, target: EventTarget) {
        self.push_event(DomEvent::scroll(target));
    }

    /// Scroll the page to `(x, y)` and queue a window scroll
    pub fn set_scroll(&mut self, x: f32, y: f32) {
        self.viewport.scroll_x = x;
        self.viewport.scroll_y = y;
        self.push_event(DomEvent::scroll(EventTarget::Window));
    }

    /// Resize the viewport and queue a window resize
    pub fn resize_window(&mut self, width: f32, height: f32) {
        self.viewport.width = width;
        self.viewport.height = height;
        self.push_event(DomEvent::resize());
    }

    /// Change the size of `node` and queue an element resize
    pub fn resize_element(&mut self, node: NodeId, width: f32, height: f32) {
        if let Some(data) = self.node_mut(node) {
            data.rect.width = width;
            data.rect.height = height;
        }
        self.push_event(DomEvent::element_resize(node));
    }

    pub fn push_event(&mut self, event: DomEvent) {
        tracing::trace!("queued {:?} on {:?}", event.kind, event.target);
        self.queue.push_back(event);
    }

    /// Number of events waiting to be routed
    pub fn pending_events(&self) -> usize {
        self.queue.len()
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    /// How many change notifications `node` has received
    pub fn change_count(&self, node: NodeId) -> usize {
        self.changes.get(&node).copied().unwrap_or(0)
    }

    /// Every change notification, in order
    pub fn change_log(&self) -> &[NodeId] {
        &self.change_log
    }

    /// Whether `node` is attached under the body
    pub fn is_connected(&self, node: NodeId) -> bool {
        self.contains(self.body, node)
    }

    /// Text of `node` itself, without descendants
    pub fn own_text(&self, node: NodeId) -> String {
        self.node(node).map(|n| n.text.clone()).unwrap_or_default()
    }

    /// Number of live listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// First node matching `selector`
    pub fn query_selector(&self, selector: &str) -> Option<NodeId> {
        self.query_selector_all(selector).ok()?.into_iter().next()
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Detach `node` from its parent and notify subtree observers
    fn detach(&mut self, node: NodeId) {
        let Some(parent) = self.node(node).and_then(|n| n.parent) else {
            return;
        };
        if let Some(data) = self.nodes.get_mut(parent) {
            data.children.retain(|&c| c != node);
        }
        if let Some(data) = self.nodes.get_mut(node) {
            data.parent = None;
        }

        if let Some(focused) = self.focused {
            if self.contains(node, focused) {
                self.focused = None;
            }
        }

        let mut roots: SmallVec<[NodeId; 4]> = SmallVec::new();
        for id in &self.listener_order {
            let Some(listener) = self.listeners.get(*id) else {
                continue;
            };
            if listener.kind != EventKind::ChildList {
                continue;
            }
            if let EventTarget::Node(root) = listener.target {
                if self.contains(root, parent) && !roots.contains(&root) {
                    roots.push(root);
                }
            }
        }
        for root in roots {
            self.push_event(DomEvent::child_list(root, vec![node]));
        }
    }

    fn listeners_on(
        &self,
        target: EventTarget,
        kind: EventKind,
    ) -> impl Iterator<Item = ListenerId> + '_ {
        self.listener_order.iter().copied().filter(move |id| {
            self.listeners
                .get(*id)
                .is_some_and(|l| l.target == target && l.kind == kind)
        })
    }

    /// The select an option belongs to, looking through an optgroup
    fn owning_select(&self, option: NodeId) -> Option<NodeId> {
        let parent = self.node(option)?.parent?;
        match self.node(parent)?.tag.as_str() {
            "select" => Some(parent),
            "optgroup" => {
                let grand = self.node(parent)?.parent?;
                (self.node(grand)?.tag == "select").then_some(grand)
            }
            _ => None,
        }
    }

    fn descendants(&self, root: NodeId, out: &mut Vec<NodeId>) {
        if let Some(data) = self.node(root) {
            for &child in &data.children {
                out.push(child);
                self.descendants(child, out);
            }
        }
    }

    /// Layout rectangle in page coordinates
    fn page_rect(&self, data: &NodeData) -> Rect {
        let absolute = data.styles.get("position").map(String::as_str) == Some("absolute");
        match (absolute, data.style_px("left"), data.style_px("top")) {
            (true, Some(left), Some(top)) => Rect::new(
                left,
                top,
                data.style_px("width").unwrap_or(data.rect.width),
                data.rect.height,
            ),
            _ => data.rect,
        }
    }
}

impl Document for HeadlessDocument {
    fn body(&self) -> NodeId {
        self.body
    }

    fn create_element(&mut self, tag: &str) -> NodeId {
        self.nodes.insert(NodeData::new(tag))
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.insert_before(parent, child, None);
    }

    fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: Option<NodeId>) {
        if !self.nodes.contains_key(parent) || !self.nodes.contains_key(child) {
            tracing::warn!("insert of unknown node {:?} into {:?}", child, parent);
            return;
        }
        if self.contains(child, parent) {
            tracing::warn!("refusing to insert {:?} into its own subtree", child);
            return;
        }

        self.detach(child);

        if let Some(data) = self.nodes.get_mut(parent) {
            let index = reference
                .and_then(|r| data.children.iter().position(|&c| c == r))
                .unwrap_or(data.children.len());
            data.children.insert(index, child);
        }
        if let Some(data) = self.nodes.get_mut(child) {
            data.parent = Some(parent);
        }
    }

    fn remove(&mut self, node: NodeId) {
        self.detach(node);
    }

    fn clear_children(&mut self, node: NodeId) {
        for child in self.children(node) {
            self.detach(child);
        }
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node)?.parent
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.node(node).map(|n| n.children.clone()).unwrap_or_default()
    }

    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.node(id).and_then(|n| n.parent);
        }
        false
    }

    fn tag_name(&self, node: NodeId) -> String {
        self.node(node).map(|n| n.tag.clone()).unwrap_or_default()
    }

    fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>> {
        let compounds = selector::parse(selector)?;
        let mut candidates = Vec::new();
        self.descendants(self.body, &mut candidates);

        Ok(candidates
            .into_iter()
            .filter(|&id| {
                self.node(id)
                    .is_some_and(|data| compounds.iter().any(|c| c.matches(data)))
            })
            .collect())
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.node(node)?.attribute(name)
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(data) = self.node_mut(node) {
            data.set_attribute(name, value);
        }
    }

    fn add_class(&mut self, node: NodeId, class: &str) {
        if let Some(data) = self.node_mut(node) {
            if !data.classes.iter().any(|c| c == class) {
                data.classes.push(class.to_string());
            }
        }
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.node(node)
            .is_some_and(|n| n.classes.iter().any(|c| c == class))
    }

    fn text_content(&self, node: NodeId) -> String {
        let Some(data) = self.node(node) else {
            return String::new();
        };
        let mut text = data.text.clone();
        for &child in &data.children {
            text.push_str(&self.text_content(child));
        }
        text
    }

    fn set_text_content(&mut self, node: NodeId, text: &str) {
        if let Some(data) = self.node_mut(node) {
            data.text = text.to_string();
        }
    }

    fn style(&self, node: NodeId, property: &str) -> Option<String> {
        self.node(node)?.styles.get(property).cloned()
    }

    fn set_style(&mut self, node: NodeId, property: &str, value: &str) {
        if let Some(data) = self.node_mut(node) {
            if value.is_empty() {
                data.styles.remove(property);
            } else {
                data.styles.insert(property.to_string(), value.to_string());
            }
        }
    }

    fn is_selected(&self, option: NodeId) -> bool {
        self.node(option).is_some_and(|n| n.selected)
    }

    fn set_selected(&mut self, option: NodeId, selected: bool) {
        if selected {
            if let Some(select) = self.owning_select(option) {
                if self.attribute(select, "multiple").is_none() {
                    let mut options = Vec::new();
                    self.descendants(select, &mut options);
                    for other in options {
                        if let Some(data) = self.nodes.get_mut(other) {
                            if data.tag == "option" {
                                data.selected = false;
                            }
                        }
                    }
                }
            }
        }
        if let Some(data) = self.node_mut(option) {
            data.selected = selected;
        }
    }

    fn is_checked(&self, checkbox: NodeId) -> bool {
        self.node(checkbox).is_some_and(|n| n.checked)
    }

    fn set_checked(&mut self, checkbox: NodeId, checked: bool) {
        if let Some(data) = self.node_mut(checkbox) {
            data.checked = checked;
        }
    }

    fn input_value(&self, input: NodeId) -> String {
        self.node(input).map(|n| n.value.clone()).unwrap_or_default()
    }

    fn set_input_value(&mut self, input: NodeId, value: &str) {
        if let Some(data) = self.node_mut(input) {
            data.value = value.to_string();
        }
    }

    fn focus(&mut self, node: NodeId) {
        if self.nodes.contains_key(node) {
            self.focused = Some(node);
        }
    }

    fn active_element(&self) -> Option<NodeId> {
        self.focused
    }

    fn bounding_rect(&self, node: NodeId) -> Rect {
        let Some(data) = self.node(node) else {
            return Rect::default();
        };
        let page = self.page_rect(data);
        Rect::new(
            page.x - self.viewport.scroll_x,
            page.y - self.viewport.scroll_y,
            page.width,
            page.height,
        )
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn listen(&mut self, target: EventTarget, kind: EventKind) -> ListenerId {
        let id = self.listeners.insert(Listener { target, kind });
        self.listener_order.push(id);
        id
    }

    fn unlisten(&mut self, listener: ListenerId) {
        if self.listeners.remove(listener).is_some() {
            self.listener_order.retain(|&id| id != listener);
        }
    }

    fn is_listening(&self, listener: ListenerId) -> bool {
        self.listeners.contains_key(listener)
    }

    fn dispatch_path(&self, event: &DomEvent) -> Vec<ListenerId> {
        let mut path = Vec::new();
        match event.kind {
            EventKind::Click | EventKind::KeyDown | EventKind::Input => {
                let mut current = event.target.node();
                while let Some(node) = current {
                    path.extend(self.listeners_on(EventTarget::Node(node), event.kind));
                    current = self.parent(node);
                }
                path.extend(self.listeners_on(EventTarget::Window, event.kind));
            }
            EventKind::Scroll => {
                path.extend(self.listeners_on(EventTarget::Window, event.kind));
                if let EventTarget::Node(node) = event.target {
                    path.extend(self.listeners_on(EventTarget::Node(node), event.kind));
                }
            }
            EventKind::Resize => {
                path.extend(self.listeners_on(EventTarget::Window, event.kind));
            }
            EventKind::ElementResize | EventKind::ChildList => {
                if let EventTarget::Node(_) = event.target {
                    path.extend(self.listeners_on(event.target, event.kind));
                }
            }
        }
        path
    }

    fn dispatch_change(&mut self, node: NodeId) {
        tracing::debug!("change fired on {:?}", node);
        *self.changes.entry(node).or_insert(0) += 1;
        self.change_log.push(node);
    }
}

impl EventQueue for HeadlessDocument {
    fn next_event(&mut self) -> Option<DomEvent> {
        self.queue.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tree_edits() {
        let mut doc = HeadlessDocument::new();
        let body = doc.body();
        let a = doc.create_element("div");
        let b = doc.create_element("div");
        doc.append_child(body, a);
        doc.insert_before(body, b, Some(a));
        assert_eq!(doc.children(body), vec![b, a]);

        doc.append_child(a, b);
        assert_eq!(doc.children(body), vec![a]);
        assert!(doc.contains(body, b));
        assert!(doc.is_connected(b));

        doc.remove(a);
        assert!(!doc.is_connected(b));
        assert_eq!(doc.parent(a), None);
    }

    #[test]
    fn test_child_list_records_for_observers() {
        let mut doc = HeadlessDocument::new();
        let body = doc.body();
        let wrapper = doc.create_element("div");
        let inner = doc.create_element("div");
        doc.append_child(body, wrapper);
        doc.append_child(wrapper, inner);

        let observer = doc.listen(EventTarget::Node(body), EventKind::ChildList);
        doc.remove(wrapper);

        let event = doc.next_event().unwrap();
        assert_eq!(event.kind, EventKind::ChildList);
        assert_eq!(event.removed_nodes, vec![wrapper]);
        assert_eq!(doc.dispatch_path(&event), vec![observer]);
        assert!(doc.next_event().is_none());
    }

    #[test]
    fn test_click_bubbles_then_window() {
        let mut doc = HeadlessDocument::new();
        let body = doc.body();
        let outer = doc.create_element("div");
        let inner = doc.create_element("span");
        doc.append_child(body, outer);
        doc.append_child(outer, inner);

        let window = doc.listen(EventTarget::Window, EventKind::Click);
        let on_outer = doc.listen(EventTarget::Node(outer), EventKind::Click);
        let on_inner = doc.listen(EventTarget::Node(inner), EventKind::Click);
        doc.listen(EventTarget::Node(inner), EventKind::KeyDown);

        let path = doc.dispatch_path(&DomEvent::click(inner));
        assert_eq!(path, vec![on_inner, on_outer, window]);

        doc.unlisten(on_outer);
        doc.unlisten(on_outer);
        assert!(!doc.is_listening(on_outer));
        assert_eq!(doc.dispatch_path(&DomEvent::click(inner)), vec![on_inner, window]);
    }

    #[test]
    fn test_single_select_keeps_one_option() {
        let mut doc = HeadlessDocument::new();
        let body = doc.body();
        let select = doc.add_select(body, false);
        let a = doc.add_option(select, "a", "A");
        let group = doc.add_optgroup(select, "G");
        let b = doc.add_option(group, "b", "B");

        doc.set_selected(a, true);
        doc.set_selected(b, true);
        assert!(!doc.is_selected(a));
        assert!(doc.is_selected(b));
    }

    #[test]
    fn test_absolute_rect_tracks_scroll() {
        let mut doc = HeadlessDocument::new();
        let body = doc.body();
        let panel = doc.create_element("div");
        doc.append_child(body, panel);
        doc.set_style(panel, "position", "absolute");
        doc.set_style(panel, "left", "100px");
        doc.set_style(panel, "top", "250px");
        doc.set_style(panel, "width", "300px");

        doc.set_scroll(0.0, 50.0);
        let rect = doc.bounding_rect(panel);
        assert_eq!(rect.x, 100.0);
        assert_eq!(rect.y, 200.0);
        assert_eq!(rect.width, 300.0);
    }

    #[test]
    fn test_removing_focused_subtree_clears_focus() {
        let mut doc = HeadlessDocument::new();
        let body = doc.body();
        let panel = doc.create_element("div");
        let input = doc.create_element("input");
        doc.append_child(body, panel);
        doc.append_child(panel, input);

        doc.focus(input);
        assert_eq!(doc.active_element(), Some(input));
        doc.remove(panel);
        assert_eq!(doc.active_element(), None);
    }

    #[test]
    fn test_query_selector_all() {
        let mut doc = HeadlessDocument::new();
        let body = doc.body();
        let first = doc.add_select(body, false);
        let second = doc.add_select(body, true);
        doc.set_attribute(second, "id", "pick");

        assert_eq!(doc.query_selector_all("select").unwrap(), vec![first, second]);
        assert_eq!(doc.query_selector("#pick"), Some(second));
        assert!(doc.query_selector_all("select option").is_err());
    }
}
