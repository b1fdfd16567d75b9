//! Typed notifications for the presentation layer.
//!
//! Subscribers run synchronously, in subscription order, before the call
//! that caused the event returns.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use crate::game::{BuildingType, EnemySpawn, EnemyType, ResourceKey, Selection};

/// Something that changed in a game session.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// A counter was adjusted.
    ResourceAdjusted {
        /// Counter that changed.
        key: ResourceKey,
        /// Delta the caller asked for.
        requested: i64,
        /// Delta applied after clamping.
        delta: i64,
        /// New value.
        total: i64,
    },
    /// A building was placed on the grid.
    BuildingSpawned {
        /// Catalog key.
        key: String,
        /// Building type.
        entry: Arc<BuildingType>,
        /// Grid index.
        index: usize,
    },
    /// Enemies placed by one spawn call. Never empty.
    EnemiesSpawned(Vec<EnemySpawn>),
    /// An enemy was removed from the fight row.
    EnemyKilled {
        /// Catalog key.
        key: String,
        /// Enemy type.
        entry: Arc<EnemyType>,
        /// Index before removal.
        index: usize,
    },
    /// An enemy rolled its daily attack. `damage` is 0 on a miss.
    EnemyAttacked {
        /// Row index of the attacker.
        index: usize,
        /// Health removed.
        damage: i64,
    },
    /// The day counter moved forward.
    DaysElapsed {
        /// New day.
        total: i64,
        /// Number of days that passed.
        elapsed: i64,
    },
    /// The selected instance changed.
    SelectionChanged(Selection),
}

/// Handle returned by [`EventBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(&GameEvent)>;

/// Ordered list of event subscribers.
#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_id: u64,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.len())
            .finish_non_exhaustive()
    }
}

impl EventBus {
    /// A bus with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback for every future event.
    pub fn subscribe(&mut self, callback: impl FnMut(&GameEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Remove a subscriber. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub, _)| *sub != id);
        self.subscribers.len() != before
    }

    /// Deliver an event to every subscriber.
    pub fn publish(&mut self, event: &GameEvent) {
        for (_, callback) in &mut self.subscribers {
            callback(event);
        }
    }

    /// Number of registered subscribers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    /// Whether nobody is listening.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}

/// A subscriber that records every event it sees.
///
/// Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Rc<RefCell<Vec<GameEvent>>>,
}

impl EventLog {
    /// An empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A callback that appends every event it receives to this log.
    pub fn recorder(&self) -> impl FnMut(&GameEvent) + 'static {
        let events = Rc::clone(&self.events);
        move |event| events.borrow_mut().push(event.clone())
    }

    /// Subscribe this log to a bus.
    pub fn attach(&self, bus: &mut EventBus) -> SubscriptionId {
        bus.subscribe(self.recorder())
    }

    /// Remove and return everything recorded so far.
    #[must_use]
    pub fn take(&self) -> Vec<GameEvent> {
        self.events.take()
    }

    /// Drop everything recorded so far.
    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }

    /// Number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    /// Whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn days(total: i64) -> GameEvent {
        GameEvent::DaysElapsed { total, elapsed: 1 }
    }

    #[test]
    fn test_subscribers_run_in_order() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();
        for n in 0..3 {
            let order = Rc::clone(&order);
            bus.subscribe(move |_| order.borrow_mut().push(n));
        }
        bus.publish(&days(2));
        assert_eq!(*order.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn test_unsubscribe() {
        let log = EventLog::new();
        let mut bus = EventBus::new();
        let id = log.attach(&mut bus);
        bus.publish(&days(2));
        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        bus.publish(&days(3));
        assert_eq!(log.take(), vec![days(2)]);
        assert!(log.is_empty());
    }

    #[test]
    fn test_log_clones_share_buffer() {
        let log = EventLog::new();
        let other = log.clone();
        let mut bus = EventBus::new();
        log.attach(&mut bus);
        bus.publish(&days(5));
        assert_eq!(other.len(), 1);
        other.clear();
        assert!(log.is_empty());
    }
}
