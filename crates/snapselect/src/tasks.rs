//! Deferred one-shot tasks
//!
//! Work that must wait until the current synchronous phase has finished
//! (for example, observing a node's ancestry once it has been attached) is
//! queued here and run by the event loop between events.

use std::cell::RefCell;
use std::collections::VecDeque;

use snapselect_platform::Document;

/// A one-shot task run against the host document
pub type Task = Box<dyn FnOnce(&mut dyn Document)>;

thread_local! {
    static DEFERRED: RefCell<VecDeque<Task>> = const { RefCell::new(VecDeque::new()) };
}

/// Queue `task` to run after the current synchronous phase
pub fn defer<F>(task: F)
where
    F: FnOnce(&mut dyn Document) + 'static,
{
    DEFERRED.with(|queue| queue.borrow_mut().push_back(Box::new(task)));
}

/// Number of tasks waiting to run
pub fn pending() -> usize {
    DEFERRED.with(|queue| queue.borrow().len())
}

/// Run queued tasks, including any they queue themselves
///
/// Returns how many tasks ran.
pub fn run_deferred(doc: &mut dyn Document) -> usize {
    let mut ran = 0;
    while let Some(task) = DEFERRED.with(|queue| queue.borrow_mut().pop_front()) {
        task(&mut *doc);
        ran += 1;
    }
    if ran > 0 {
        tracing::trace!("ran {} deferred task(s)", ran);
    }
    ran
}

#[cfg(test)]
mod tests {
    use super::*;
    use snapselect_platform_headless::HeadlessDocument;
    use std::rc::Rc;

    #[test]
    fn test_tasks_run_in_order_after_defer() {
        let mut doc = HeadlessDocument::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        for i in 0..3 {
            let log = Rc::clone(&log);
            defer(move |_| log.borrow_mut().push(i));
        }
        assert!(log.borrow().is_empty());
        assert_eq!(pending(), 3);

        assert_eq!(run_deferred(&mut doc), 3);
        assert_eq!(*log.borrow(), vec![0, 1, 2]);
        assert_eq!(pending(), 0);
    }

    #[test]
    fn test_nested_defer_runs_in_same_drain() {
        let mut doc = HeadlessDocument::new();
        let hit = Rc::new(RefCell::new(false));

        let inner = Rc::clone(&hit);
        defer(move |_| defer(move |_| *inner.borrow_mut() = true));

        assert_eq!(run_deferred(&mut doc), 2);
        assert!(*hit.borrow());
    }

    #[test]
    fn test_task_sees_document() {
        let mut doc = HeadlessDocument::new();
        let body = doc.body();
        defer(move |doc| {
            let div = doc.create_element("div");
            doc.append_child(body, div);
        });
        run_deferred(&mut doc);
        assert_eq!(doc.children(body).len(), 1);
    }
}
