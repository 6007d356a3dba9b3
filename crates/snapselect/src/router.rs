//! Event routing from the host queue to widgets
//!
//! Bridges host events to the widgets that subscribed to them.
//!
//! # Architecture
//!
//! ```text
//! Host event (click, keydown, scroll, child-list record)
//!     ↓
//! Document::dispatch_path (listeners in delivery order)
//!     ↓
//! EventRouter (find the widget owning each listener)
//!     ↓
//! SnapSelect::handle_event (binding → selection / panel transition)
//! ```
//!
//! Deferred tasks run between events, so work scheduled during one event is
//! done before the next is routed.

use snapselect_platform::{Document, DomEvent, EventQueue, Propagation};

use crate::tasks;
use crate::widget::SnapSelect;

/// Routes host events to registered widgets
#[derive(Debug, Default)]
pub struct EventRouter {
    widgets: Vec<SnapSelect>,
}

impl EventRouter {
    /// Create a new event router
    pub fn new() -> Self {
        Self::default()
    }

    /// Route events to `widget` from now on
    pub fn register(&mut self, widget: SnapSelect) {
        self.widgets.push(widget);
    }

    /// Register several widgets at once
    pub fn register_all(&mut self, widgets: impl IntoIterator<Item = SnapSelect>) {
        self.widgets.extend(widgets);
    }

    pub fn widgets(&self) -> &[SnapSelect] {
        &self.widgets
    }

    /// Deliver one event along its dispatch path
    ///
    /// Listeners removed by an earlier handler on the same path are skipped.
    pub fn dispatch(&self, doc: &mut dyn Document, event: &DomEvent) -> Propagation {
        for listener in doc.dispatch_path(event) {
            if !doc.is_listening(listener) {
                continue;
            }
            let handled = self
                .widgets
                .iter()
                .find_map(|widget| widget.handle_event(doc, listener, event));
            if handled == Some(Propagation::Stop) {
                return Propagation::Stop;
            }
        }
        Propagation::Continue
    }

    /// Route every pending event; returns how many were routed
    pub fn pump<D: Document + EventQueue>(&self, doc: &mut D) -> usize {
        let mut routed = 0;
        while let Some(event) = doc.next_event() {
            tasks::run_deferred(doc);
            self.dispatch(doc, &event);
            routed += 1;
        }
        routed
    }

    /// Run deferred tasks and route events until neither is left
    pub fn run_until_idle<D: Document + EventQueue>(&self, doc: &mut D) -> usize {
        let mut routed = 0;
        loop {
            let ran = tasks::run_deferred(doc);
            let pumped = self.pump(doc);
            routed += pumped;
            if ran == 0 && pumped == 0 {
                break;
            }
        }
        tracing::trace!("router idle after {} event(s)", routed);
        routed
    }
}
