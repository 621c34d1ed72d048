//! Typed event queue between a simulation system and whoever consumes it

use std::collections::VecDeque;

/// FIFO of events pushed by a system during `update` and drained by the host.
///
/// A bus built with [`EventBus::bounded`] keeps at most `limit` events; once
/// full, each push evicts the oldest pending event so a host that never
/// drains cannot grow the queue without bound.
pub struct EventBus<E> {
    queue: VecDeque<E>,
    limit: Option<usize>,
    dropped: u64,
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> EventBus<E> {
    /// An unbounded bus
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
            limit: None,
            dropped: 0,
        }
    }

    /// A bus holding at most `limit` pending events (minimum 1)
    pub fn bounded(limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            queue: VecDeque::with_capacity(limit.min(256)),
            limit: Some(limit),
            dropped: 0,
        }
    }

    pub fn push(&mut self, event: E) {
        if let Some(limit) = self.limit {
            if self.queue.len() >= limit {
                self.queue.pop_front();
                if self.dropped == 0 {
                    log::warn!("event backlog reached {limit}; dropping oldest events until drained");
                }
                self.dropped += 1;
            }
        }
        self.queue.push_back(event);
    }

    /// Take every pending event, oldest first
    pub fn drain(&mut self) -> Vec<E> {
        self.queue.drain(..).collect()
    }

    /// Pending events, oldest first, without consuming them
    pub fn pending(&self) -> impl Iterator<Item = &E> {
        self.queue.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Events evicted because the backlog was full
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    enum Ping {
        A,
        B(u32),
    }

    #[test]
    fn drain_returns_push_order() {
        let mut bus = EventBus::new();
        assert!(bus.is_empty());

        bus.push(Ping::A);
        bus.push(Ping::B(3));

        assert_eq!(bus.len(), 2);
        assert_eq!(bus.pending().nth(1), Some(&Ping::B(3)));
        assert_eq!(bus.drain(), vec![Ping::A, Ping::B(3)]);
        assert!(bus.is_empty());
        assert!(bus.drain().is_empty());
    }

    #[test]
    fn bounded_bus_evicts_oldest() {
        let mut bus = EventBus::bounded(3);
        for i in 0..5 {
            bus.push(Ping::B(i));
        }
        assert_eq!(bus.len(), 3);
        assert_eq!(bus.dropped(), 2);
        assert_eq!(bus.drain(), vec![Ping::B(2), Ping::B(3), Ping::B(4)]);
    }

    #[test]
    fn zero_limit_still_keeps_latest() {
        let mut bus = EventBus::bounded(0);
        bus.push(Ping::A);
        bus.push(Ping::B(1));
        assert_eq!(bus.drain(), vec![Ping::B(1)]);
    }
}
