//! Listener bindings
//!
//! The host never stores callbacks. Each subscription the widget makes is
//! recorded here as a [`Binding`] keyed by its [`ListenerId`], and a
//! [`ListenerSet`] owns a group of them so they can be released together.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use snapselect_platform::{Document, EventKind, EventTarget, ListenerId};

/// What a listener means to the widget
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Binding {
    // Trigger surface, alive for the widget's lifetime
    TriggerClick,
    TriggerKey,
    AncestryRemoved,

    // Display repaint, replaced on every repaint
    RemoveTag(String),
    ClearAll,
    ClearSingle,

    // Panel, released on close
    ItemToggle(String),
    SingleItem(String),
    /// Group header at this entry index
    GroupLabel(usize),
    SelectAll,
    SearchInput,
    SearchClear,
    ListboxKey,
    Overlay,
    WindowScroll,
    WindowResize,
    TriggerResize,
}

/// A group of subscriptions released together
#[derive(Debug, Default)]
pub struct ListenerSet {
    bindings: FxHashMap<ListenerId, Binding>,
}

impl ListenerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to `kind` on `target` and remember what it means
    pub fn listen(
        &mut self,
        doc: &mut dyn Document,
        target: EventTarget,
        kind: EventKind,
        binding: Binding,
    ) -> ListenerId {
        let id = doc.listen(target, kind);
        self.bindings.insert(id, binding);
        id
    }

    pub fn get(&self, listener: ListenerId) -> Option<&Binding> {
        self.bindings.get(&listener)
    }

    /// Unsubscribe one listener
    pub fn remove(&mut self, doc: &mut dyn Document, listener: ListenerId) {
        if self.bindings.remove(&listener).is_some() {
            doc.unlisten(listener);
        }
    }

    /// Unsubscribe everything; returns how many listeners were released
    pub fn release(&mut self, doc: &mut dyn Document) -> usize {
        let ids: SmallVec<[ListenerId; 16]> = self.bindings.drain().map(|(id, _)| id).collect();
        for &id in &ids {
            doc.unlisten(id);
        }
        ids.len()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snapselect_platform_headless::HeadlessDocument;

    #[test]
    fn test_release_unlistens_everything() {
        let mut doc = HeadlessDocument::new();
        let body = doc.body();
        let mut set = ListenerSet::new();

        let click = set.listen(&mut doc, EventTarget::Node(body), EventKind::Click, Binding::Overlay);
        let resize = set.listen(&mut doc, EventTarget::Window, EventKind::Resize, Binding::WindowResize);
        assert_eq!(set.get(click), Some(&Binding::Overlay));
        assert_eq!(set.len(), 2);

        assert_eq!(set.release(&mut doc), 2);
        assert!(set.is_empty());
        assert!(!doc.is_listening(click));
        assert!(!doc.is_listening(resize));
        assert_eq!(set.release(&mut doc), 0);
    }

    #[test]
    fn test_remove_single_listener() {
        let mut doc = HeadlessDocument::new();
        let mut set = ListenerSet::new();
        let id = set.listen(&mut doc, EventTarget::Window, EventKind::Scroll, Binding::WindowScroll);

        set.remove(&mut doc, id);
        assert!(set.get(id).is_none());
        assert!(!doc.is_listening(id));
    }
}
