//=========================================================================
// Event Handlers
//=========================================================================
//
// Auxiliary handlers bound to an eventful entity at runtime, next to its
// mandatory `handle_event` override.
//
// Dispatch order inside the perform step:
//   handle_event → kind handlers (bound for event.kind()) → generic handlers
//
// Filters run before any phase hook; a single `false` skips the whole
// dispatch, profiling included.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;
use std::fmt;

//=== Internal Dependencies ===============================================

use crate::core::input::{Event, EventKind};
use crate::error::HookResult;

//=== Handler Types =======================================================

/// Bound event handler.
pub type EventHandler = Box<dyn FnMut(&Event) -> HookResult>;

/// Event filter. Returning false rejects the event.
pub type EventFilter = Box<dyn Fn(&Event) -> bool>;

//=== EventHandlers =======================================================

/// Filters plus generic and kind-specific handlers of one entity.
#[derive(Default)]
pub struct EventHandlers {
    filters: Vec<EventFilter>,
    by_kind: HashMap<EventKind, Vec<EventHandler>>,
    generic: Vec<EventHandler>,
}

impl EventHandlers {
    pub fn new() -> Self {
        Self::default()
    }

    //--- Binding ----------------------------------------------------------

    /// Binds a handler invoked for every event, after kind handlers.
    pub fn bind<F>(&mut self, handler: F)
    where
        F: FnMut(&Event) -> HookResult + 'static,
    {
        self.generic.push(Box::new(handler));
    }

    /// Binds a handler invoked only for events of `kind`.
    pub fn bind_kind<F>(&mut self, kind: EventKind, handler: F)
    where
        F: FnMut(&Event) -> HookResult + 'static,
    {
        self.by_kind.entry(kind).or_default().push(Box::new(handler));
    }

    /// Adds a filter; all filters must accept an event for it to be handled.
    pub fn add_filter<F>(&mut self, filter: F)
    where
        F: Fn(&Event) -> bool + 'static,
    {
        self.filters.push(Box::new(filter));
    }

    /// Removes all generic and kind-specific handlers.
    pub fn clear_handlers(&mut self) {
        self.generic.clear();
        self.by_kind.clear();
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
    }

    //--- Dispatch ---------------------------------------------------------

    /// Returns true if every filter accepts `event`.
    pub fn accepts(&self, event: &Event) -> bool {
        self.filters.iter().all(|filter| filter(event))
    }

    /// Runs kind-specific handlers, then generic handlers.
    ///
    /// Stops at the first failing handler.
    pub fn dispatch(&mut self, event: &Event) -> HookResult {
        if let Some(handlers) = self.by_kind.get_mut(&event.kind()) {
            for handler in handlers.iter_mut() {
                handler(event)?;
            }
        }

        for handler in self.generic.iter_mut() {
            handler(event)?;
        }

        Ok(())
    }

    pub fn handler_count(&self) -> usize {
        self.generic.len() + self.by_kind.values().map(Vec::len).sum::<usize>()
    }

    pub fn filter_count(&self) -> usize {
        self.filters.len()
    }
}

impl fmt::Debug for EventHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventHandlers")
            .field("filters", &self.filters.len())
            .field("kinds", &self.by_kind.keys().collect::<Vec<_>>())
            .field("generic", &self.generic.len())
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::KeyCode;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder(log: &Rc<RefCell<Vec<&'static str>>>, tag: &'static str) -> impl FnMut(&Event) -> HookResult {
        let log = Rc::clone(log);
        move |_: &Event| {
            log.borrow_mut().push(tag);
            Ok(())
        }
    }

    #[test]
    fn kind_handlers_run_before_generic() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut handlers = EventHandlers::new();
        handlers.bind(recorder(&log, "generic"));
        handlers.bind_kind(EventKind::KeyDown, recorder(&log, "key"));
        handlers.bind_kind(EventKind::Quit, recorder(&log, "quit"));

        handlers.dispatch(&Event::key_down(KeyCode::KeyA)).unwrap();
        assert_eq!(*log.borrow(), ["key", "generic"]);
    }

    #[test]
    fn filters_must_all_accept() {
        let mut handlers = EventHandlers::new();
        assert!(handlers.accepts(&Event::Quit));

        handlers.add_filter(|e| e.kind() != EventKind::Quit);
        handlers.add_filter(|_| true);

        assert!(!handlers.accepts(&Event::Quit));
        assert!(handlers.accepts(&Event::Focus(true)));
    }

    #[test]
    fn dispatch_stops_at_first_failure() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut handlers = EventHandlers::new();
        handlers.bind(|_| Err("nope".into()));
        handlers.bind(recorder(&log, "late"));

        assert!(handlers.dispatch(&Event::Quit).is_err());
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn clear_removes_handlers_but_keeps_filters() {
        let mut handlers = EventHandlers::new();
        handlers.bind(|_| Ok(()));
        handlers.bind_kind(EventKind::User, |_| Ok(()));
        handlers.add_filter(|_| true);
        assert_eq!(handlers.handler_count(), 2);

        handlers.clear_handlers();
        assert_eq!(handlers.handler_count(), 0);
        assert_eq!(handlers.filter_count(), 1);

        handlers.clear_filters();
        assert_eq!(handlers.filter_count(), 0);
    }
}
