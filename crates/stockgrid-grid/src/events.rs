//! Change notifications emitted by a grid

use crate::filter_types::Predicate;
use crate::sorting::SortState;

/// Events emitted after a grid's state changes
#[derive(Clone, Debug, PartialEq)]
pub enum GridEvent {
    /// The active predicates, in display order
    FilterChange(Vec<Predicate>),
    SortChange(SortState),
    /// The effective page number
    PageChange(usize),
}

impl GridEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::FilterChange(_) => "filter-change",
            Self::SortChange(_) => "sort-change",
            Self::PageChange(_) => "page-change",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&GridEvent)>;

/// Listeners registered on one grid, called in subscription order
#[derive(Default)]
pub struct EventEmitter {
    next_id: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
}

impl EventEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&GridEvent) + 'static) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns false if the id was not subscribed
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    pub fn emit(&mut self, event: &GridEvent) {
        tracing::trace!(event = event.name(), listeners = self.listeners.len(), "Emitting grid event");
        for (_, listener) in self.listeners.iter_mut() {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl std::fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventEmitter")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_subscribe_and_unsubscribe() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut emitter = EventEmitter::new();

        let sink = seen.clone();
        let id = emitter.subscribe(move |event| sink.borrow_mut().push(event.name()));
        emitter.emit(&GridEvent::PageChange(2));
        assert!(emitter.unsubscribe(id));
        assert!(!emitter.unsubscribe(id));
        emitter.emit(&GridEvent::PageChange(3));

        assert_eq!(*seen.borrow(), vec!["page-change"]);
        assert_eq!(emitter.listener_count(), 0);
    }

    #[test]
    fn test_ids_are_unique() {
        let mut emitter = EventEmitter::new();
        let a = emitter.subscribe(|_| {});
        let b = emitter.subscribe(|_| {});
        assert_ne!(a, b);
    }
}
