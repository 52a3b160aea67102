//! Debounce deadlines and the per-frame write batch.
//!
//! Timers never call back into the engine; the engine polls them from
//! `tick()` and dispatches whatever came due.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use pagedom::NodeId;

/// A restartable deadline carrying the payload of the latest trigger.
#[derive(Debug, Clone)]
pub struct Debounce<T> {
    delay: Duration,
    pending: Option<(Instant, T)>,
}

impl<T> Debounce<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// (Re)arms the deadline at `now + delay`, replacing any pending payload.
    pub fn trigger(&mut self, now: Instant, payload: T) {
        self.pending = Some((now + self.delay, payload));
    }

    /// Takes the payload once its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((deadline, _)) if *deadline <= now => self.pending.take().map(|(_, p)| p),
            _ => None,
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(deadline, _)| *deadline)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(_, payload)| payload)
    }

    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }
}

/// Writes queued for the next render tick, keyed by node.
///
/// Scheduling twice for the same node keeps only the latest write.
#[derive(Debug, Clone)]
pub struct FrameBatch<T> {
    pending: BTreeMap<NodeId, T>,
}

impl<T> Default for FrameBatch<T> {
    fn default() -> Self {
        Self {
            pending: BTreeMap::new(),
        }
    }
}

impl<T> FrameBatch<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, node: NodeId, write: T) {
        self.pending.insert(node, write);
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Keeps only the pending writes whose node satisfies `keep`.
    pub fn retain(&mut self, mut keep: impl FnMut(NodeId) -> bool) {
        self.pending.retain(|node, _| keep(*node));
    }

    /// Takes every pending write in node order.
    pub fn drain(&mut self) -> Vec<(NodeId, T)> {
        std::mem::take(&mut self.pending).into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debounce_restarts_on_trigger() {
        let start = Instant::now();
        let mut debounce = Debounce::new(Duration::from_millis(150));

        debounce.trigger(start, "na");
        debounce.trigger(start + Duration::from_millis(100), "nab");

        assert_eq!(debounce.poll(start + Duration::from_millis(150)), None);
        assert_eq!(
            debounce.deadline(),
            Some(start + Duration::from_millis(250))
        );
        assert_eq!(debounce.poll(start + Duration::from_millis(250)), Some("nab"));
        assert!(!debounce.is_pending());
        assert_eq!(debounce.poll(start + Duration::from_secs(1)), None);
    }

    #[test]
    fn test_debounce_cancel() {
        let start = Instant::now();
        let mut debounce = Debounce::new(Duration::from_millis(50));
        debounce.trigger(start, ());
        assert_eq!(debounce.cancel(), Some(()));
        assert_eq!(debounce.poll(start + Duration::from_secs(1)), None);
    }
}
