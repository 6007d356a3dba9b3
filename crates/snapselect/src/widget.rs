//! The SnapSelect widget
//!
//! A [`SnapSelect`] wraps a native `select` element in a `.snap-select`
//! container, adds a focusable trigger that displays the current selection,
//! and opens a floating panel on demand. The native control remains the
//! source of truth: every selection change is written back to its options and
//! announced with a change notification on it.
//!
//! # Example
//!
//! ```rust
//! use snapselect::{EventRouter, SnapSelect};
//! use snapselect_core::SelectOptions;
//! use snapselect_platform::Document;
//! use snapselect_platform_headless::HeadlessDocument;
//!
//! let mut doc = HeadlessDocument::new();
//! let body = doc.body();
//! let control = doc.add_select(body, true);
//! doc.add_option(control, "a", "Apple");
//!
//! let widget = SnapSelect::new(&mut doc, control, &SelectOptions::new()).unwrap();
//! let mut router = EventRouter::new();
//! router.register(widget.clone());
//!
//! doc.click(widget.trigger());
//! router.run_until_idle(&mut doc);
//! assert!(widget.is_open());
//! ```

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use snapselect_core::{
    resolve, MultiSelection, OptionModel, Result, SelectConfig, SelectOptions, Selection,
    SingleSelection, SnapSelectError,
};
use snapselect_platform::{Document, DomEvent, EventKind, EventTarget, ListenerId, NodeId, Propagation};

use crate::binding::{Binding, ListenerSet};
use crate::display;
use crate::panel::{PanelContext, PanelEvent, PanelInstance, PanelState};
use crate::position::position_panel;
use crate::registry::{self, PanelHolder};
use crate::tasks;

static NEXT_WIDGET_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a widget instance
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WidgetId(u64);

impl WidgetId {
    pub(crate) fn next() -> Self {
        Self(NEXT_WIDGET_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Widget state behind the shared handle
pub(crate) struct SelectWidget {
    pub(crate) id: WidgetId,
    pub(crate) this: Weak<RefCell<SelectWidget>>,
    pub(crate) model: OptionModel,
    pub(crate) config: SelectConfig,
    pub(crate) selection: Selection,
    pub(crate) container: NodeId,
    pub(crate) trigger: NodeId,
    pub(crate) tags: NodeId,
    /// Trigger and ancestry subscriptions, alive as long as the widget
    pub(crate) permanent: ListenerSet,
    /// Buttons of the current display repaint
    pub(crate) display: ListenerSet,
    pub(crate) ancestry: Option<ListenerId>,
    pub(crate) state: PanelState,
    pub(crate) panel: Option<PanelInstance>,
}

impl SelectWidget {
    pub(crate) fn is_multiple(&self) -> bool {
        self.selection.is_multiple()
    }

    /// Repaint the trigger display
    pub(crate) fn render(&mut self, doc: &mut dyn Document) {
        let descriptor = self.model.read(doc);
        display::render(
            doc,
            self.tags,
            &self.selection,
            &descriptor,
            &self.config,
            &mut self.display,
        );
    }

    /// Publish a selection change: write back, notify, repaint
    pub(crate) fn commit(&mut self, doc: &mut dyn Document) {
        self.model.write_back(doc, &self.selection);
        self.model.notify_change(doc);
        self.render(doc);
        self.sync_panel(doc);
    }

    /// Bring open-panel checkboxes in line with the selection
    pub(crate) fn sync_panel(&self, doc: &mut dyn Document) {
        if let Some(panel) = &self.panel {
            panel.sync_checks(doc, &self.selection);
        }
    }

    pub(crate) fn open(&mut self, doc: &mut dyn Document) {
        let Some(next) = self.state.on_event(PanelEvent::Open) else {
            return;
        };

        let holder: Weak<RefCell<dyn PanelHolder>> = self.this.clone();
        registry::acquire(doc, self.id, holder);

        let descriptor = self.model.read(doc);
        let cx = PanelContext {
            trigger: self.trigger,
            multiple: self.is_multiple(),
            config: &self.config,
            selection: &self.selection,
        };
        let panel = PanelInstance::build(doc, descriptor, &cx);

        position_panel(doc, self.trigger, panel.listbox());
        doc.focus(panel.listbox());
        doc.set_attribute(self.container, "aria-expanded", "true");

        self.panel = Some(panel);
        self.state = next;
        tracing::debug!("{:?} panel opened", self.id);
    }

    pub(crate) fn close(&mut self, doc: &mut dyn Document) {
        let Some(next) = self.state.on_event(PanelEvent::Close) else {
            return;
        };

        if let Some(panel) = self.panel.take() {
            panel.teardown(doc);
        }
        doc.focus(self.trigger);
        doc.set_attribute(self.container, "aria-expanded", "false");
        registry::release(self.id);

        self.state = next;
        tracing::debug!("{:?} panel closed", self.id);
    }

    pub(crate) fn toggle(&mut self, doc: &mut dyn Document) {
        if self.state.is_open() {
            self.close(doc);
        } else {
            self.open(doc);
        }
    }

    /// Reposition the open panel
    pub(crate) fn reposition(&self, doc: &mut dyn Document) {
        if let Some(panel) = &self.panel {
            position_panel(doc, self.trigger, panel.listbox());
        }
    }

    /// Empty the selection, publishing only when something changed
    pub(crate) fn clear(&mut self, doc: &mut dyn Document) {
        if self.selection.clear() {
            self.commit(doc);
        }
    }

    /// Start watching the document for removal of the container or any ancestor
    pub(crate) fn observe_ancestry(&mut self, doc: &mut dyn Document) {
        if self.ancestry.is_some() {
            return;
        }
        let body = doc.body();
        if !doc.contains(body, self.container) {
            tracing::warn!(
                "{:?} container is not in the document; removal will not close the panel",
                self.id
            );
            return;
        }
        let id = self.permanent.listen(
            doc,
            EventTarget::Node(body),
            EventKind::ChildList,
            Binding::AncestryRemoved,
        );
        self.ancestry = Some(id);
    }

    /// Stop watching ancestry
    pub(crate) fn stop_observing(&mut self, doc: &mut dyn Document) {
        if let Some(id) = self.ancestry.take() {
            self.permanent.remove(doc, id);
        }
    }

    /// Look up which of this widget's subscriptions `listener` is
    pub(crate) fn binding(&self, listener: ListenerId) -> Option<Binding> {
        self.permanent
            .get(listener)
            .or_else(|| self.display.get(listener))
            .or_else(|| self.panel.as_ref().and_then(|panel| panel.binding(listener)))
            .cloned()
    }
}

impl PanelHolder for SelectWidget {
    fn close_panel(&mut self, doc: &mut dyn Document) {
        self.close(doc);
    }
}

/// Handle to a SnapSelect widget
///
/// Cloning the handle shares the widget.
#[derive(Clone)]
pub struct SnapSelect {
    inner: Rc<RefCell<SelectWidget>>,
}

impl std::fmt::Debug for SnapSelect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("SnapSelect")
            .field("id", &inner.id)
            .field("control", &inner.model.control())
            .field("state", &inner.state)
            .finish()
    }
}

impl SnapSelect {
    /// Enhance `control`
    ///
    /// Markup attributes on the control take precedence over `options`, which
    /// take precedence over the defaults. The initial selection is read from
    /// the control's own flags and no change notification is sent. Flags
    /// beyond the selection ceiling are cleared on the control.
    pub fn new(doc: &mut dyn Document, control: NodeId, options: &SelectOptions) -> Result<Self> {
        if doc.tag_name(control) != "select" {
            return Err(SnapSelectError::NotASelectControl(control));
        }
        let parent = doc
            .parent(control)
            .ok_or(SnapSelectError::Detached(control))?;

        let model = OptionModel::new(control);
        let multiple = model.is_multiple(doc);
        let attributes = SelectOptions::from_attributes(|name| doc.attribute(control, name));
        let config = resolve(&attributes, options, &SelectConfig::default());

        let container = doc.create_element("div");
        doc.add_class(container, "snap-select");
        doc.set_attribute(container, "role", "combobox");
        doc.set_attribute(container, "aria-expanded", "false");
        doc.set_attribute(container, "aria-haspopup", "listbox");
        doc.insert_before(parent, container, Some(control));
        doc.append_child(container, control);

        let trigger = doc.create_element("div");
        doc.add_class(trigger, "snap-select-selected");
        doc.set_attribute(trigger, "aria-live", "polite");
        doc.set_attribute(trigger, "tabindex", "0");
        doc.append_child(container, trigger);

        let tags = doc.create_element("div");
        doc.add_class(tags, "snap-select-tags");
        doc.append_child(trigger, tags);

        let initial = model.selected_values(doc);
        let flagged = initial.len();
        let selection = if multiple {
            Selection::Multi(MultiSelection::with_values(config.max_selections, initial))
        } else {
            Selection::Single(SingleSelection::new(
                initial.into_iter().next(),
                config.allow_empty,
            ))
        };
        // Flags beyond the ceiling are cleared silently.
        if selection.len() < flagged {
            tracing::debug!(
                "{:?}: {} preselected option(s) over the limit cleared",
                control,
                flagged - selection.len()
            );
            model.write_back(doc, &selection);
        }

        let mut permanent = ListenerSet::new();
        permanent.listen(doc, EventTarget::Node(trigger), EventKind::Click, Binding::TriggerClick);
        permanent.listen(doc, EventTarget::Node(trigger), EventKind::KeyDown, Binding::TriggerKey);

        let id = WidgetId::next();
        let inner = Rc::new_cyclic(|this| {
            RefCell::new(SelectWidget {
                id,
                this: this.clone(),
                model,
                config,
                selection,
                container,
                trigger,
                tags,
                permanent,
                display: ListenerSet::new(),
                ancestry: None,
                state: PanelState::Closed,
                panel: None,
            })
        });

        inner.borrow_mut().render(doc);

        let weak = Rc::downgrade(&inner);
        tasks::defer(move |doc| {
            if let Some(widget) = weak.upgrade() {
                if let Ok(mut widget) = widget.try_borrow_mut() {
                    widget.observe_ancestry(doc);
                }
            }
        });

        tracing::debug!(
            "{:?} created over {:?} ({})",
            id,
            control,
            if multiple { "multiple" } else { "single" }
        );
        Ok(Self { inner })
    }

    pub fn id(&self) -> WidgetId {
        self.inner.borrow().id
    }

    /// Reset to the empty selection and notify the control
    ///
    /// An already-empty selection is left alone and nothing is sent.
    pub fn clear(&self, doc: &mut dyn Document) {
        self.inner.borrow_mut().clear(doc);
    }

    pub fn open(&self, doc: &mut dyn Document) {
        self.inner.borrow_mut().open(doc);
    }

    /// Close the panel; closing a closed panel does nothing
    pub fn close(&self, doc: &mut dyn Document) {
        self.inner.borrow_mut().close(doc);
    }

    pub fn toggle(&self, doc: &mut dyn Document) {
        self.inner.borrow_mut().toggle(doc);
    }

    pub fn is_open(&self) -> bool {
        self.inner.borrow().state.is_open()
    }

    /// Selected values, in selection order for multi selects
    pub fn selected_values(&self) -> Vec<String> {
        self.inner.borrow().selection.values()
    }

    pub fn is_multiple(&self) -> bool {
        self.inner.borrow().is_multiple()
    }

    /// The resolved configuration
    pub fn config(&self) -> SelectConfig {
        self.inner.borrow().config.clone()
    }

    /// The native control
    pub fn control(&self) -> NodeId {
        self.inner.borrow().model.control()
    }

    /// The `.snap-select` wrapper
    pub fn container(&self) -> NodeId {
        self.inner.borrow().container
    }

    /// The clickable selection display
    pub fn trigger(&self) -> NodeId {
        self.inner.borrow().trigger
    }

    /// The open panel's listbox
    pub fn listbox(&self) -> Option<NodeId> {
        self.inner.borrow().panel.as_ref().map(PanelInstance::listbox)
    }

    /// The open panel's overlay
    pub fn overlay(&self) -> Option<NodeId> {
        self.inner.borrow().panel.as_ref().map(PanelInstance::overlay)
    }

    /// The open panel's search input, when live search is on
    pub fn search_input(&self) -> Option<NodeId> {
        self.inner.borrow().panel.as_ref().and_then(PanelInstance::search_input)
    }

    /// Route `event`, delivered through `listener`, to this widget
    ///
    /// Returns `None` when the listener does not belong to this widget.
    pub fn handle_event(
        &self,
        doc: &mut dyn Document,
        listener: ListenerId,
        event: &DomEvent,
    ) -> Option<Propagation> {
        let mut widget = match self.inner.try_borrow_mut() {
            Ok(widget) => widget,
            Err(_) => {
                tracing::warn!("widget busy, dropping {:?}", event.kind);
                return None;
            }
        };
        let binding = widget.binding(listener)?;
        Some(widget.on_binding(doc, binding, event))
    }
}
