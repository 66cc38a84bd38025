//! Per-event-kind subscriber lists

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::event::EventKind;
use super::state::WindowState;

/// A subscriber; receives the window state after the event was applied
pub type Handler = Rc<RefCell<dyn FnMut(&mut WindowState)>>;

/// Token identifying one subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Ordered subscriber lists, one per event kind
///
/// Insertion order is invocation order. Subscriptions stay until removed
/// through their token or until the list for their kind is cleared.
#[derive(Default)]
pub struct SubscriberRegistry {
    lists: HashMap<EventKind, Vec<(SubscriptionId, Handler)>>,
    next_id: u64,
}

impl SubscriberRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `handler` to the list for `kind`
    pub fn subscribe<F>(&mut self, kind: EventKind, handler: F) -> SubscriptionId
    where
        F: FnMut(&mut WindowState) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        let handler: Handler = Rc::new(RefCell::new(handler));
        self.lists.entry(kind).or_default().push((id, handler));
        id
    }

    /// Removes a subscription, returning whether it existed
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        for list in self.lists.values_mut() {
            if let Some(pos) = list.iter().position(|(sid, _)| *sid == id) {
                list.remove(pos);
                return true;
            }
        }
        false
    }

    /// Drops every subscriber for `kind`
    pub fn clear(&mut self, kind: EventKind) {
        self.lists.remove(&kind);
    }

    /// Number of subscribers for `kind`
    pub fn len(&self, kind: EventKind) -> usize {
        self.lists.get(&kind).map_or(0, Vec::len)
    }

    /// Whether no subscriber is registered for any kind
    pub fn is_empty(&self) -> bool {
        self.lists.values().all(Vec::is_empty)
    }

    /// Handlers for `kind` in invocation order
    ///
    /// Dispatchers iterate over this snapshot, so subscriptions made while a
    /// dispatch is running take effect from the next dispatch.
    pub fn snapshot(&self, kind: EventKind) -> Vec<Handler> {
        self.lists
            .get(&kind)
            .map(|list| list.iter().map(|(_, h)| h.clone()).collect())
            .unwrap_or_default()
    }

    /// Invokes a snapshot of subscribers in order
    ///
    /// Takes no registry borrow, so handlers may subscribe or unsubscribe
    /// while running.
    pub fn dispatch(handlers: &[Handler], state: &mut WindowState) {
        for handler in handlers {
            (&mut *handler.borrow_mut())(&mut *state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_in_insertion_order() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let mut registry = SubscriberRegistry::new();
        for tag in ["first", "second", "third"] {
            let order = order.clone();
            registry.subscribe(EventKind::Size, move |_| order.borrow_mut().push(tag));
        }

        let mut state = WindowState::new("test", 800, 600);
        SubscriberRegistry::dispatch(&registry.snapshot(EventKind::Size), &mut state);
        assert_eq!(*order.borrow(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_dispatch_only_matching_kind() {
        let mut registry = SubscriberRegistry::new();
        registry.subscribe(EventKind::Focus, |state| state.title.push('!'));

        let mut state = WindowState::new("test", 800, 600);
        SubscriberRegistry::dispatch(&registry.snapshot(EventKind::Size), &mut state);
        assert_eq!(state.title, "test");
        SubscriberRegistry::dispatch(&registry.snapshot(EventKind::Focus), &mut state);
        assert_eq!(state.title, "test!");
    }

    #[test]
    fn test_unsubscribe() {
        let mut registry = SubscriberRegistry::new();
        let keep = registry.subscribe(EventKind::Key, |_| {});
        let gone = registry.subscribe(EventKind::Key, |_| {});
        assert_eq!(registry.len(EventKind::Key), 2);

        assert!(registry.unsubscribe(gone));
        assert!(!registry.unsubscribe(gone));
        assert_eq!(registry.len(EventKind::Key), 1);
        assert_ne!(keep, gone);
    }

    #[test]
    fn test_clear() {
        let mut registry = SubscriberRegistry::new();
        registry.subscribe(EventKind::Scroll, |_| {});
        registry.subscribe(EventKind::Close, |_| {});
        registry.clear(EventKind::Scroll);
        assert_eq!(registry.len(EventKind::Scroll), 0);
        assert_eq!(registry.len(EventKind::Close), 1);
        assert!(!registry.is_empty());
    }
}
