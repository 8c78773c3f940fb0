use std::time::{Duration, Instant};

/// What the caller should do after a visibility event or a poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Advance the cursor and fetch the next page.
    Fire,
    /// Waiting for the debounce window to pass.
    Armed,
    Ignored,
}

/// Watches the last rendered row and turns its visibility into next-page
/// fetches.
///
/// Only one row is observed at a time, and only its entry into the viewport
/// counts: a row that stays on screen across frames triggers once. Visibility
/// events are dropped while a fetch is in flight; nothing is queued.
#[derive(Debug)]
pub struct FetchController {
    debounce: Duration,
    observed: Option<String>,
    in_view: bool,
    armed_at: Option<Instant>,
}

impl FetchController {
    pub fn new(debounce: Duration) -> Self {
        Self {
            debounce,
            observed: None,
            in_view: false,
            armed_at: None,
        }
    }

    /// A row is the sentinel iff it is the last rendered row and more pages
    /// remain.
    pub fn is_sentinel(index: usize, rendered: usize, has_more: bool) -> bool {
        has_more && rendered > 0 && index + 1 == rendered
    }

    /// Register a rendered row. When it is the sentinel, it replaces the
    /// previously observed row.
    pub fn attach(&mut self, index: usize, rendered: usize, has_more: bool, key: &str) {
        if !Self::is_sentinel(index, rendered, has_more) {
            return;
        }
        if self.observed.as_deref() != Some(key) {
            tracing::trace!(row = index, key, "observing sentinel row");
            self.observed = Some(key.to_string());
            self.in_view = false;
            self.armed_at = None;
        }
    }

    /// Stop observing. Used when the list has no sentinel (empty, or no more
    /// pages).
    pub fn release(&mut self) {
        self.observed = None;
        self.in_view = false;
        self.armed_at = None;
    }

    /// The observed row left the viewport. Its next appearance counts again.
    pub fn sentinel_hidden(&mut self) {
        self.in_view = false;
    }

    #[cfg(test)]
    pub fn observed(&self) -> Option<&str> {
        self.observed.as_deref()
    }

    /// The row identified by `key` is on screen. Only the first report after
    /// it came into view can arm the trigger; later ones just poll.
    pub fn sentinel_visible(&mut self, key: &str, in_flight: bool, now: Instant) -> Trigger {
        if self.observed.as_deref() != Some(key) {
            return Trigger::Ignored;
        }
        if self.in_view {
            return self.poll(in_flight, now);
        }
        self.in_view = true;
        if in_flight {
            return Trigger::Ignored;
        }
        if self.armed_at.is_none() {
            self.armed_at = Some(now);
        }
        self.poll(in_flight, now)
    }

    /// Fire an armed trigger once the debounce window has elapsed.
    pub fn poll(&mut self, in_flight: bool, now: Instant) -> Trigger {
        let Some(armed_at) = self.armed_at else {
            return Trigger::Ignored;
        };
        if in_flight {
            self.armed_at = None;
            return Trigger::Ignored;
        }
        if now.saturating_duration_since(armed_at) >= self.debounce {
            self.armed_at = None;
            Trigger::Fire
        } else {
            Trigger::Armed
        }
    }
}
