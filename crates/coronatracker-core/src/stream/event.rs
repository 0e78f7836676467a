// ── One-shot event slot ──
//
// At-most-once delivery for user-visible notifications: a value stays
// pending until someone takes it, and is never handed out twice.

use std::sync::Arc;

use parking_lot::Mutex;

use super::{Observable, Subscription};

/// Single-slot, at-most-once event channel.
///
/// [`offer`](Self::offer) replaces any unconsumed value, so only the most
/// recent event is guaranteed visible. [`take`](Self::take) returns it once
/// and clears the slot. Observers can [`subscribe`](Self::subscribe) to slot
/// changes (`Some` when an event arrives, `None` when it is consumed); the
/// subscription is a notification only, consuming still goes through `take`.
pub struct EventSlot<T: Clone + Send + Sync + 'static> {
    slot: Arc<Mutex<Option<T>>>,
    notify: Observable<Option<T>>,
}

impl<T: Clone + Send + Sync + 'static> EventSlot<T> {
    pub fn new() -> Self {
        Self {
            slot: Arc::new(Mutex::new(None)),
            notify: Observable::new(None),
        }
    }

    /// Store an event, returning the unconsumed one it replaced.
    pub fn offer(&self, event: T) -> Option<T> {
        let mut slot = self.slot.lock();
        let replaced = slot.replace(event.clone());
        self.notify.publish(Some(event));
        replaced
    }

    /// Take the pending event, leaving the slot empty.
    pub fn take(&self) -> Option<T> {
        let mut slot = self.slot.lock();
        let taken = slot.take();
        if taken.is_some() {
            self.notify.publish(None);
        }
        taken
    }

    /// The pending event, without consuming it.
    pub fn peek(&self) -> Option<T> {
        self.slot.lock().clone()
    }

    pub fn is_pending(&self) -> bool {
        self.slot.lock().is_some()
    }

    /// Drop any pending event.
    pub fn clear(&self) {
        let _ = self.take();
    }

    /// Observe slot changes.
    pub fn subscribe(&self) -> Subscription<Option<T>> {
        self.notify.subscribe()
    }
}

impl<T: Clone + Send + Sync + 'static> Clone for EventSlot<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
            notify: self.notify.clone(),
        }
    }
}

impl<T: Clone + Send + Sync + 'static> Default for EventSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_is_at_most_once() {
        let slot = EventSlot::new();
        assert_eq!(slot.offer("boom"), None);

        assert_eq!(slot.take(), Some("boom"));
        assert_eq!(slot.take(), None);
        assert_eq!(slot.take(), None);
    }

    #[test]
    fn newer_event_replaces_unconsumed() {
        let slot = EventSlot::new();
        slot.offer(1);
        assert_eq!(slot.offer(2), Some(1));

        assert_eq!(slot.peek(), Some(2));
        assert_eq!(slot.take(), Some(2));
        assert!(!slot.is_pending());
    }

    #[test]
    fn subscribers_see_arrival_and_consumption() {
        let slot = EventSlot::new();
        let mut sub = slot.subscribe();
        assert_eq!(*sub.current(), None);

        slot.offer('x');
        assert_eq!(slot.take(), Some('x'));
        // Empty take does not notify.
        slot.clear();

        assert_eq!(sub.try_changed(), Some(Some('x')));
        assert_eq!(sub.try_changed(), Some(None));
        assert_eq!(sub.try_changed(), None);
    }

    #[test]
    fn clones_share_the_slot() {
        let slot = EventSlot::new();
        let other = slot.clone();
        other.offer(9u8);
        assert_eq!(slot.take(), Some(9));
        assert_eq!(other.peek(), None);
    }
}
