//! Document trait and node handles

use slotmap::new_key_type;

use crate::error::Result;
use crate::event::{DomEvent, EventKind, EventTarget};
use crate::geometry::{Rect, Viewport};

new_key_type! {
    /// Handle to an element in a host document
    pub struct NodeId;

    /// Handle to a registered listener
    pub struct ListenerId;
}

/// Host element-tree abstraction
///
/// This trait is implemented by each host backend to give the widget a
/// uniform view of the page: node construction and tree edits, attributes and
/// classes, inline styles, form flags, focus, geometry, and listener
/// registration.
///
/// Listener callbacks are not stored by the host. `listen` hands back a
/// [`ListenerId`], and the router asks [`Document::dispatch_path`] which
/// listeners an event reaches, in delivery order.
pub trait Document {
    // =========================================================================
    // Tree
    // =========================================================================

    /// The document body, parent of floating panels
    fn body(&self) -> NodeId;

    /// Create a detached element with the given tag name
    fn create_element(&mut self, tag: &str) -> NodeId;

    /// Append `child` as the last child of `parent`, detaching it first
    fn append_child(&mut self, parent: NodeId, child: NodeId);

    /// Insert `child` before `reference` (or at the end when `None`)
    fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: Option<NodeId>);

    /// Detach `node` (and its subtree) from its parent
    fn remove(&mut self, node: NodeId);

    /// Detach every child of `node`
    fn clear_children(&mut self, node: NodeId);

    /// Parent of `node`, if attached
    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Children of `node` in document order
    fn children(&self, node: NodeId) -> Vec<NodeId>;

    /// Whether `node` is `ancestor` or one of its descendants
    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool;

    /// Lower-case tag name of `node`
    fn tag_name(&self, node: NodeId) -> String;

    /// Nodes matching a simple selector, in document order
    fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>>;

    // =========================================================================
    // Attributes, classes, text, styles
    // =========================================================================

    fn attribute(&self, node: NodeId, name: &str) -> Option<String>;

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str);

    fn add_class(&mut self, node: NodeId, class: &str);

    fn has_class(&self, node: NodeId, class: &str) -> bool;

    /// Concatenated text of `node` and its descendants
    fn text_content(&self, node: NodeId) -> String;

    /// Replace the own text of `node`
    fn set_text_content(&mut self, node: NodeId, text: &str);

    fn style(&self, node: NodeId, property: &str) -> Option<String>;

    fn set_style(&mut self, node: NodeId, property: &str, value: &str);

    // =========================================================================
    // Form state
    // =========================================================================

    /// `selected` flag of an option element
    fn is_selected(&self, option: NodeId) -> bool;

    fn set_selected(&mut self, option: NodeId, selected: bool);

    /// `checked` flag of a checkbox element
    fn is_checked(&self, checkbox: NodeId) -> bool;

    fn set_checked(&mut self, checkbox: NodeId, checked: bool);

    /// Current value of a text input
    fn input_value(&self, input: NodeId) -> String;

    fn set_input_value(&mut self, input: NodeId, value: &str);

    // =========================================================================
    // Focus and geometry
    // =========================================================================

    fn focus(&mut self, node: NodeId);

    /// The focused node, if any
    fn active_element(&self) -> Option<NodeId>;

    /// Bounding rectangle of `node` in viewport coordinates
    fn bounding_rect(&self, node: NodeId) -> Rect;

    /// Viewport size and scroll offsets
    fn viewport(&self) -> Viewport;

    // =========================================================================
    // Events
    // =========================================================================

    /// Subscribe to `kind` notifications on `target`
    ///
    /// `ElementResize` on a node observes its size, `ChildList` on a node
    /// observes removals anywhere in its subtree. Window `Scroll` listeners
    /// run in the capture phase and see scrolls of any element.
    fn listen(&mut self, target: EventTarget, kind: EventKind) -> ListenerId;

    /// Unsubscribe; unknown or already-removed ids are ignored
    fn unlisten(&mut self, listener: ListenerId);

    /// Whether `listener` is still subscribed
    fn is_listening(&self, listener: ListenerId) -> bool;

    /// Listeners `event` reaches, in delivery order
    fn dispatch_path(&self, event: &DomEvent) -> Vec<ListenerId>;

    /// Fire a bubbling "change" notification on `node`
    fn dispatch_change(&mut self, node: NodeId);
}
