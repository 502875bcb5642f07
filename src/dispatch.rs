//! Event dispatch
//!
//! A small synchronous observer registry. Callers subscribe a closure to an
//! [`EventKind`]; [`Dispatcher::dispatch`] invokes every matching observer
//! in subscription order. Observers are `FnMut` so they can accumulate
//! state, but dispatch itself never reenters the dispatcher.

use tracing::trace;

use crate::event::{Event, EventKind};

/// Handle identifying a subscription, for later removal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

struct Subscriber {
    id: SubscriberId,
    kind: EventKind,
    callback: Box<dyn FnMut(&Event)>,
}

/// Synchronous observer registry keyed by event kind
#[derive(Default)]
pub struct Dispatcher {
    subscribers: Vec<Subscriber>,
    next_id: u64,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("subscribers", &self.subscribers.len())
            .field("next_id", &self.next_id)
            .finish()
    }
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer for one kind of event
    pub fn subscribe<F>(&mut self, kind: EventKind, callback: F) -> SubscriberId
    where
        F: FnMut(&Event) + 'static,
    {
        let id = SubscriberId(self.next_id);
        self.next_id += 1;
        self.subscribers.push(Subscriber {
            id,
            kind,
            callback: Box::new(callback),
        });
        trace!(?id, ?kind, "subscribed");
        id
    }

    /// Remove a subscription. Returns false if the id is unknown.
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|s| s.id != id);
        self.subscribers.len() != before
    }

    /// Number of observers registered for `kind`
    pub fn count(&self, kind: EventKind) -> usize {
        self.subscribers.iter().filter(|s| s.kind == kind).count()
    }

    /// Deliver an event to every observer of its kind, in subscription order
    pub fn dispatch(&mut self, event: &Event) {
        let kind = event.kind();
        for sub in self.subscribers.iter_mut().filter(|s| s.kind == kind) {
            (sub.callback)(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_dispatch_reaches_matching_kind_only() {
        let mut dispatcher = Dispatcher::new();
        let keys = Rc::new(RefCell::new(Vec::new()));
        let controls = Rc::new(RefCell::new(0));

        let keys_in = Rc::clone(&keys);
        dispatcher.subscribe(EventKind::Keypress, move |ev| {
            if let Event::Keypress(s) = ev {
                keys_in.borrow_mut().push(s.clone());
            }
        });
        let controls_in = Rc::clone(&controls);
        dispatcher.subscribe(EventKind::Control, move |_| {
            *controls_in.borrow_mut() += 1;
        });

        dispatcher.dispatch(&Event::Keypress("a".into()));
        dispatcher.dispatch(&Event::Keypress("b".into()));

        assert_eq!(*keys.borrow(), vec!["a".to_string(), "b".to_string()]);
        assert_eq!(*controls.borrow(), 0);
    }

    #[test]
    fn test_subscription_order_preserved() {
        let mut dispatcher = Dispatcher::new();
        let order = Rc::new(RefCell::new(Vec::new()));

        for tag in [1, 2, 3] {
            let order = Rc::clone(&order);
            dispatcher.subscribe(EventKind::Keypress, move |_| {
                order.borrow_mut().push(tag);
            });
        }
        dispatcher.dispatch(&Event::Keypress("x".into()));
        assert_eq!(*order.borrow(), vec![1, 2, 3]);
    }

    #[test]
    fn test_unsubscribe() {
        let mut dispatcher = Dispatcher::new();
        let hits = Rc::new(RefCell::new(0));

        let hits_in = Rc::clone(&hits);
        let id = dispatcher.subscribe(EventKind::Keypress, move |_| {
            *hits_in.borrow_mut() += 1;
        });
        assert_eq!(dispatcher.count(EventKind::Keypress), 1);

        assert!(dispatcher.unsubscribe(id));
        assert!(!dispatcher.unsubscribe(id));
        assert_eq!(dispatcher.count(EventKind::Keypress), 0);

        dispatcher.dispatch(&Event::Keypress("x".into()));
        assert_eq!(*hits.borrow(), 0);
    }

    #[test]
    fn test_count_by_kind() {
        let mut dispatcher = Dispatcher::new();
        dispatcher.subscribe(EventKind::Control, |_| {});
        dispatcher.subscribe(EventKind::Control, |_| {});
        dispatcher.subscribe(EventKind::Resize, |_| {});
        assert_eq!(dispatcher.count(EventKind::Control), 2);
        assert_eq!(dispatcher.count(EventKind::Resize), 1);
        assert_eq!(dispatcher.count(EventKind::Special), 0);
    }
}
