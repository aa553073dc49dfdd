//! Single-slot debounce for the cross-session search box.
//!
//! Scheduling a new query replaces any pending one; only the last query
//! scheduled within the quiet window is ever handed back by [`Debouncer::due`].
//! The owner polls `due` on its tick, so no timer task is spawned and the
//! coalescing logic stays testable with plain `Instant` arithmetic.

use std::time::{Duration, Instant};

/// Quiet interval after the last keystroke before a search is issued.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// A one-slot delayed-task scheduler.
#[derive(Debug)]
pub struct Debouncer {
    quiet: Duration,
    pending: Option<(Instant, String)>,
}

impl Debouncer {
    #[must_use]
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: None,
        }
    }

    /// Schedule `query`, superseding any pending one and restarting the
    /// quiet window.
    pub fn schedule(&mut self, query: impl Into<String>, now: Instant) {
        self.pending = Some((now, query.into()));
    }

    /// Take the pending query if its quiet window has elapsed.
    pub fn due(&mut self, now: Instant) -> Option<String> {
        match &self.pending {
            Some((at, _)) if now.duration_since(*at) >= self.quiet => {
                self.pending.take().map(|(_, query)| query)
            }
            _ => None,
        }
    }

    /// Drop any pending query without firing it.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Whether a query is waiting out its quiet window.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(SEARCH_DEBOUNCE)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_keystrokes_coalesce_to_final_query() {
        let mut debouncer = Debouncer::new(Duration::from_millis(300));
        let start = Instant::now();

        debouncer.schedule("a", start);
        debouncer.schedule("ab", start + Duration::from_millis(100));
        debouncer.schedule("abc", start + Duration::from_millis(200));

        // Nothing fires inside the quiet window of the last keystroke.
        assert_eq!(debouncer.due(start + Duration::from_millis(350)), None);
        assert_eq!(
            debouncer.due(start + Duration::from_millis(500)),
            Some("abc".to_string())
        );
        // Exactly one query fires.
        assert_eq!(debouncer.due(start + Duration::from_millis(900)), None);
    }

    #[test]
    fn test_fires_at_exact_boundary() {
        let mut debouncer = Debouncer::new(Duration::from_millis(300));
        let start = Instant::now();
        debouncer.schedule("q", start);
        assert_eq!(debouncer.due(start + Duration::from_millis(299)), None);
        assert_eq!(
            debouncer.due(start + Duration::from_millis(300)),
            Some("q".to_string())
        );
    }

    #[test]
    fn test_cancel_drops_pending() {
        let mut debouncer = Debouncer::default();
        let start = Instant::now();
        debouncer.schedule("q", start);
        assert!(debouncer.is_pending());
        debouncer.cancel();
        assert!(!debouncer.is_pending());
        assert_eq!(debouncer.due(start + SEARCH_DEBOUNCE * 2), None);
    }
}
