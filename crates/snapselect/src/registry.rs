//! Open-panel registry
//!
//! At most one panel is open on the page. The registry remembers which widget
//! holds it through a weak back-reference, so it never keeps a widget alive.
//! Acquiring the slot closes the previous holder before the new one records
//! itself.
//!
//! ```ignore
//! registry::acquire(doc, id, weak_self);
//! // ... build the panel ...
//! registry::release(id);
//! ```

use std::cell::RefCell;
use std::rc::Weak;

use snapselect_platform::Document;

use crate::widget::WidgetId;

/// Something that can be told to close its panel
pub trait PanelHolder {
    fn close_panel(&mut self, doc: &mut dyn Document);
}

struct Holder {
    id: WidgetId,
    widget: Weak<RefCell<dyn PanelHolder>>,
}

thread_local! {
    static OPEN_PANEL: RefCell<Option<Holder>> = const { RefCell::new(None) };
}

/// Record `id` as the open panel, closing any other holder first
pub fn acquire(doc: &mut dyn Document, id: WidgetId, widget: Weak<RefCell<dyn PanelHolder>>) {
    let previous = OPEN_PANEL.with(|slot| slot.borrow_mut().take());

    if let Some(previous) = previous.filter(|holder| holder.id != id) {
        match previous.widget.upgrade() {
            Some(holder) => match holder.try_borrow_mut() {
                Ok(mut holder) => {
                    tracing::debug!("panel of {:?} closed for {:?}", previous.id, id);
                    holder.close_panel(doc);
                }
                Err(_) => tracing::warn!("panel holder {:?} busy, cannot close it", previous.id),
            },
            None => tracing::debug!("previous panel holder {:?} already dropped", previous.id),
        }
    }

    OPEN_PANEL.with(|slot| *slot.borrow_mut() = Some(Holder { id, widget }));
}

/// Clear the slot if `id` holds it
pub fn release(id: WidgetId) {
    OPEN_PANEL.with(|slot| {
        let mut slot = slot.borrow_mut();
        if slot.as_ref().is_some_and(|holder| holder.id == id) {
            *slot = None;
        }
    });
}

/// The widget whose panel is open, if it is still alive
pub fn open_widget() -> Option<WidgetId> {
    OPEN_PANEL.with(|slot| {
        slot.borrow()
            .as_ref()
            .filter(|holder| holder.widget.strong_count() > 0)
            .map(|holder| holder.id)
    })
}

/// Close whichever panel is open
pub fn close_open_panel(doc: &mut dyn Document) {
    let holder = OPEN_PANEL.with(|slot| slot.borrow_mut().take());
    if let Some(widget) = holder.and_then(|holder| holder.widget.upgrade()) {
        if let Ok(mut widget) = widget.try_borrow_mut() {
            widget.close_panel(doc);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snapselect_platform_headless::HeadlessDocument;
    use std::rc::Rc;

    struct Fake {
        id: WidgetId,
        open: bool,
    }

    impl PanelHolder for Fake {
        fn close_panel(&mut self, _doc: &mut dyn Document) {
            self.open = false;
            release(self.id);
        }
    }

    fn fake() -> Rc<RefCell<Fake>> {
        Rc::new(RefCell::new(Fake {
            id: WidgetId::next(),
            open: false,
        }))
    }

    fn open(doc: &mut HeadlessDocument, widget: &Rc<RefCell<Fake>>) {
        let id = widget.borrow().id;
        let weak: Weak<RefCell<dyn PanelHolder>> = Rc::downgrade(widget) as _;
        acquire(doc, id, weak);
        widget.borrow_mut().open = true;
    }

    #[test]
    fn test_acquire_closes_previous_holder() {
        let mut doc = HeadlessDocument::new();
        let a = fake();
        let b = fake();

        open(&mut doc, &a);
        assert_eq!(open_widget(), Some(a.borrow().id));

        open(&mut doc, &b);
        assert!(!a.borrow().open);
        assert!(b.borrow().open);
        assert_eq!(open_widget(), Some(b.borrow().id));
    }

    #[test]
    fn test_release_only_clears_own_slot() {
        let mut doc = HeadlessDocument::new();
        let a = fake();
        let b = fake();
        open(&mut doc, &a);

        release(b.borrow().id);
        assert_eq!(open_widget(), Some(a.borrow().id));

        release(a.borrow().id);
        assert_eq!(open_widget(), None);
    }

    #[test]
    fn test_dropped_holder_is_not_reported() {
        let mut doc = HeadlessDocument::new();
        let a = fake();
        open(&mut doc, &a);
        drop(a);
        assert_eq!(open_widget(), None);

        let b = fake();
        open(&mut doc, &b);
        assert_eq!(open_widget(), Some(b.borrow().id));
    }

    #[test]
    fn test_close_open_panel() {
        let mut doc = HeadlessDocument::new();
        let a = fake();
        open(&mut doc, &a);

        close_open_panel(&mut doc);
        assert!(!a.borrow().open);
        assert_eq!(open_widget(), None);
        close_open_panel(&mut doc);
    }
}
