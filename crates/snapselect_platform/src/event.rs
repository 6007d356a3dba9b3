//! Host events and the pending-event queue

use crate::document::NodeId;
use crate::input::{Key, KeyboardEvent};

/// Event queue abstraction
///
/// Hosts implement this trait to hand pending events to the router one at a
/// time. Events raised while another event is being routed (structural-change
/// notifications in particular) are appended and delivered on a later turn.
pub trait EventQueue {
    /// Pop the next pending event, if any
    fn next_event(&mut self) -> Option<DomEvent>;
}

/// Whether an event keeps travelling up the dispatch path
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Propagation {
    /// Deliver to the remaining listeners
    #[default]
    Continue,
    /// Skip the remaining listeners
    Stop,
}

/// Kinds of host notification a listener can subscribe to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Pointer activation (bubbles)
    Click,
    /// Key press (bubbles)
    KeyDown,
    /// Text input value changed (bubbles)
    Input,
    /// Something scrolled; window listeners receive it in the capture phase
    Scroll,
    /// The window was resized
    Resize,
    /// An observed element changed size
    ElementResize,
    /// Children were removed somewhere below an observed node
    ChildList,
}

/// Where an event was fired, or where a listener is attached
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventTarget {
    /// The window / document root
    Window,
    /// A specific node
    Node(NodeId),
}

impl EventTarget {
    /// The node, if the target is one
    pub fn node(&self) -> Option<NodeId> {
        match self {
            EventTarget::Window => None,
            EventTarget::Node(node) => Some(*node),
        }
    }
}

/// A host event waiting to be routed
#[derive(Clone, Debug, PartialEq)]
pub struct DomEvent {
    /// What happened
    pub kind: EventKind,
    /// Where it happened
    pub target: EventTarget,
    /// Key details for `KeyDown`
    pub keyboard: Option<KeyboardEvent>,
    /// Nodes detached by a `ChildList` mutation
    pub removed_nodes: Vec<NodeId>,
}

impl DomEvent {
    fn new(kind: EventKind, target: EventTarget) -> Self {
        Self {
            kind,
            target,
            keyboard: None,
            removed_nodes: Vec::new(),
        }
    }

    /// A click on `node`
    pub fn click(node: NodeId) -> Self {
        Self::new(EventKind::Click, EventTarget::Node(node))
    }

    /// A key press on `node`
    pub fn key_down(node: NodeId, key: Key) -> Self {
        Self {
            keyboard: Some(KeyboardEvent::pressed(key)),
            ..Self::new(EventKind::KeyDown, EventTarget::Node(node))
        }
    }

    /// An input value change on `node`
    pub fn input(node: NodeId) -> Self {
        Self::new(EventKind::Input, EventTarget::Node(node))
    }

    /// A scroll of `target`
    pub fn scroll(target: EventTarget) -> Self {
        Self::new(EventKind::Scroll, target)
    }

    /// A window resize
    pub fn resize() -> Self {
        Self::new(EventKind::Resize, EventTarget::Window)
    }

    /// A size change of an observed element
    pub fn element_resize(node: NodeId) -> Self {
        Self::new(EventKind::ElementResize, EventTarget::Node(node))
    }

    /// A child-list mutation record delivered to an observer rooted at `root`
    pub fn child_list(root: NodeId, removed_nodes: Vec<NodeId>) -> Self {
        Self {
            removed_nodes,
            ..Self::new(EventKind::ChildList, EventTarget::Node(root))
        }
    }

    /// The key carried by a `KeyDown` event
    pub fn key(&self) -> Option<&Key> {
        self.keyboard.as_ref().map(|k| &k.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_propagation_default() {
        assert_eq!(Propagation::default(), Propagation::Continue);
    }

    #[test]
    fn test_key_down_carries_key() {
        let event = DomEvent::key_down(NodeId::default(), Key::Escape);
        assert_eq!(event.kind, EventKind::KeyDown);
        assert_eq!(event.key(), Some(&Key::Escape));
        assert_eq!(DomEvent::resize().key(), None);
    }

    #[test]
    fn test_event_target_node() {
        let node = NodeId::default();
        assert_eq!(EventTarget::Node(node).node(), Some(node));
        assert_eq!(EventTarget::Window.node(), None);
    }
}
