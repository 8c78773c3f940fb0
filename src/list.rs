use std::time::{Duration, Instant};

use crate::cursor::Cursor;
use crate::error::Result;
use crate::feed::{Completion, Feed, FetchTicket, LoadMode};
use crate::refresh::RefreshCoordinator;
use crate::scroll::{FetchController, Trigger};
use crate::types::{MediaPage, MediaRecord};

/// Window of table rows currently on screen, as reported by the render pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub offset: usize,
    pub height: usize,
}

impl Viewport {
    pub fn rows(&self, rendered: usize) -> std::ops::Range<usize> {
        let start = self.offset.min(rendered);
        let end = self.offset.saturating_add(self.height).min(rendered);
        start..end
    }
}

/// The infinite-scroll media list.
///
/// Owns every piece of list state. Operations that need a page from the
/// service return a [`FetchTicket`]; the owner runs the fetch and hands the
/// result back through [`MediaList::complete`].
#[derive(Debug)]
pub struct MediaList {
    feed: Feed,
    cursor: Cursor,
    controller: FetchController,
    refresh: RefreshCoordinator,
    page_size: u32,
    selected: usize,
}

impl MediaList {
    pub fn new(page_size: u32, debounce: Duration) -> Self {
        Self {
            feed: Feed::default(),
            cursor: Cursor::default(),
            controller: FetchController::new(debounce),
            refresh: RefreshCoordinator::default(),
            page_size: page_size.max(1),
            selected: 0,
        }
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn records(&self) -> &[MediaRecord] {
        self.feed.records()
    }

    pub fn has_more(&self) -> bool {
        self.cursor.has_more()
    }

    pub fn is_loading(&self) -> bool {
        self.feed.is_loading()
    }

    pub fn error(&self) -> Option<&str> {
        self.feed.error()
    }

    pub fn page(&self) -> u32 {
        self.cursor.page()
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_record(&self) -> Option<&MediaRecord> {
        self.records().get(self.selected)
    }

    /// First load of page 1. Only the first call issues a fetch.
    pub fn mount(&mut self) -> Option<FetchTicket> {
        if self.refresh.is_mounted() {
            return None;
        }
        self.refresh.mark_mounted();
        Some(self.feed.begin(1, LoadMode::Replace))
    }

    /// Register the rows on screen with the fetch controller.
    pub fn attach_rows(&mut self, viewport: Viewport) {
        let rendered = self.records().len();
        let has_more = self.has_more();

        if rendered == 0 || !has_more {
            self.controller.release();
            return;
        }

        for index in viewport.rows(rendered) {
            let key = &self.feed.records()[index].id;
            self.controller.attach(index, rendered, has_more, key);
        }
    }

    /// Row `index` entered the viewport.
    pub fn row_visible(&mut self, index: usize, now: Instant) -> Option<FetchTicket> {
        let key = self.records().get(index)?.id.clone();
        let trigger = self
            .controller
            .sentinel_visible(&key, self.feed.is_loading(), now);
        self.on_trigger(trigger)
    }

    /// Feed one render pass worth of visibility into the list. The sentinel
    /// triggers when it comes into view, not on every frame it stays there.
    pub fn observe(&mut self, viewport: Viewport, now: Instant) -> Option<FetchTicket> {
        self.attach_rows(viewport);
        let rendered = self.records().len();
        match viewport.rows(rendered).last() {
            Some(last) if FetchController::is_sentinel(last, rendered, self.has_more()) => {
                self.row_visible(last, now)
            }
            _ => {
                self.controller.sentinel_hidden();
                None
            }
        }
    }

    /// Fire a debounced trigger whose window has passed.
    pub fn tick(&mut self, now: Instant) -> Option<FetchTicket> {
        let trigger = self.controller.poll(self.feed.is_loading(), now);
        self.on_trigger(trigger)
    }

    fn on_trigger(&mut self, trigger: Trigger) -> Option<FetchTicket> {
        match trigger {
            Trigger::Fire => self.load_next(),
            Trigger::Armed | Trigger::Ignored => None,
        }
    }

    fn load_next(&mut self) -> Option<FetchTicket> {
        if self.feed.is_loading() || !self.cursor.has_more() {
            return None;
        }
        let page = self.cursor.advance();
        tracing::debug!(page, "loading next page");
        Some(self.feed.begin(page, LoadMode::Append))
    }

    /// Reload if the app's refresh token changed since the last call.
    pub fn sync_refresh(&mut self, token: u64) -> Option<FetchTicket> {
        if self.refresh.observe(token) {
            tracing::debug!(token, "refresh requested");
            Some(self.reload())
        } else {
            None
        }
    }

    /// Drop everything and load page 1 again. Any fetch still in flight is
    /// discarded when it lands.
    pub fn reload(&mut self) -> FetchTicket {
        self.refresh.mark_mounted();
        self.feed.reset();
        self.cursor.reset();
        self.controller.release();
        self.selected = 0;
        tracing::debug!(generation = self.feed.generation(), "list reset");
        self.feed.begin(1, LoadMode::Replace)
    }

    pub fn complete(&mut self, ticket: FetchTicket, result: Result<MediaPage>) -> Completion {
        let outcome = self.feed.complete(ticket, result);
        match outcome {
            Completion::Applied { has_more } => {
                self.cursor.set_has_more(has_more);
                if !has_more {
                    self.controller.release();
                }
                self.clamp_selection();
            }
            Completion::Failed => {
                // let the next scroll retry the same page
                if ticket.mode == LoadMode::Append && self.cursor.page() == ticket.page {
                    self.cursor.retreat();
                }
            }
            Completion::Stale => {}
        }
        outcome
    }

    fn clamp_selection(&mut self) {
        self.selected = self.selected.min(self.records().len().saturating_sub(1));
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.records().len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn page_down(&mut self, rows: usize) {
        self.selected = self.selected.saturating_add(rows);
        self.clamp_selection();
    }

    pub fn page_up(&mut self, rows: usize) {
        self.selected = self.selected.saturating_sub(rows);
    }

    pub fn go_top(&mut self) {
        self.selected = 0;
    }

    pub fn go_bottom(&mut self) {
        self.selected = self.records().len().saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MarqueeError;
    use crate::feed::tests::page_of;

    fn list() -> MediaList {
        MediaList::new(10, Duration::ZERO)
    }

    /// Scroll the last row into view.
    fn scroll_to_end(list: &mut MediaList) -> Option<FetchTicket> {
        let len = list.records().len();
        let viewport = Viewport {
            offset: len.saturating_sub(5),
            height: 5,
        };
        list.observe(viewport, Instant::now())
    }

    #[test]
    fn viewport_rows_are_clamped() {
        let viewport = Viewport {
            offset: 8,
            height: 5,
        };
        assert_eq!(viewport.rows(10), 8..10);
        assert_eq!(viewport.rows(3), 3..3);
    }

    #[test]
    fn mount_loads_first_page_once() {
        let mut list = list();
        let ticket = list.mount().unwrap();
        assert_eq!(ticket.page, 1);
        assert_eq!(ticket.mode, LoadMode::Replace);
        assert!(list.is_loading());
        assert!(list.mount().is_none());
    }

    #[test]
    fn three_page_scroll_scenario() {
        let mut list = list();
        let t = list.mount().unwrap();
        list.complete(t, Ok(page_of(0..10, 1, 3)));
        assert_eq!(list.records().len(), 10);
        assert!(list.has_more());

        let t = scroll_to_end(&mut list).unwrap();
        assert_eq!((t.page, t.mode), (2, LoadMode::Append));
        list.complete(t, Ok(page_of(10..20, 2, 3)));
        assert_eq!(list.records().len(), 20);
        assert!(list.has_more());

        let t = scroll_to_end(&mut list).unwrap();
        assert_eq!(t.page, 3);
        list.complete(t, Ok(page_of(20..25, 3, 3)));
        assert_eq!(list.records().len(), 25);
        assert!(!list.has_more());

        assert!(scroll_to_end(&mut list).is_none());
        assert!(list.tick(Instant::now()).is_none());
        assert_eq!(list.page(), 3);
    }

    #[test]
    fn scrolling_while_loading_does_nothing() {
        let mut list = list();
        let t = list.mount().unwrap();
        list.complete(t, Ok(page_of(0..10, 1, 3)));

        let pending = scroll_to_end(&mut list).unwrap();
        for _ in 0..10 {
            assert!(scroll_to_end(&mut list).is_none());
        }
        assert_eq!(list.page(), 2);
        list.complete(pending, Ok(page_of(10..20, 2, 3)));
        assert_eq!(list.records().len(), 20);
    }

    #[test]
    fn rows_off_the_end_do_not_trigger() {
        let mut list = list();
        let t = list.mount().unwrap();
        list.complete(t, Ok(page_of(0..10, 1, 3)));
        let top = Viewport {
            offset: 0,
            height: 5,
        };
        assert!(list.observe(top, Instant::now()).is_none());
        assert!(list.row_visible(4, Instant::now()).is_none());
    }

    #[test]
    fn debounced_trigger_fires_on_tick() {
        let mut list = MediaList::new(10, Duration::from_millis(200));
        let t = list.mount().unwrap();
        list.complete(t, Ok(page_of(0..10, 1, 3)));

        let start = Instant::now();
        let bottom = Viewport {
            offset: 5,
            height: 5,
        };
        assert!(list.observe(bottom, start).is_none());
        assert!(list
            .observe(bottom, start + Duration::from_millis(50))
            .is_none());
        assert!(list.tick(start + Duration::from_millis(100)).is_none());

        let t = list.tick(start + Duration::from_millis(200)).unwrap();
        assert_eq!(t.page, 2);
        assert!(list.tick(start + Duration::from_millis(400)).is_none());
    }

    #[test]
    fn failed_append_keeps_records_and_allows_retry() {
        let mut list = list();
        let t = list.mount().unwrap();
        list.complete(t, Ok(page_of(0..10, 1, 3)));

        let t = scroll_to_end(&mut list).unwrap();
        let outcome = list.complete(t, Err(MarqueeError::Request("Bad Gateway".into())));
        assert_eq!(outcome, Completion::Failed);
        assert_eq!(list.records().len(), 10);
        assert!(!list.is_loading());
        assert!(list.has_more());
        assert_eq!(list.error(), Some("Failed to load entries: Bad Gateway"));

        // staying at the bottom does not retry on its own
        assert!(scroll_to_end(&mut list).is_none());

        let top = Viewport {
            offset: 0,
            height: 5,
        };
        assert!(list.observe(top, Instant::now()).is_none());
        let retry = scroll_to_end(&mut list).unwrap();
        assert_eq!(retry.page, 2);
    }

    #[test]
    fn failing_sentinel_parked_on_screen_fetches_once() {
        let mut list = MediaList::new(10, Duration::from_millis(200));
        let t = list.mount().unwrap();
        list.complete(t, Ok(page_of(0..10, 1, 3)));

        let bottom = Viewport {
            offset: 5,
            height: 5,
        };
        let start = Instant::now();
        let mut fetches = 0;
        for frame in 0..300u64 {
            let now = start + Duration::from_millis(16 * frame);
            let ticket = list.observe(bottom, now).or_else(|| list.tick(now));
            if let Some(ticket) = ticket {
                fetches += 1;
                list.complete(
                    ticket,
                    Err(MarqueeError::Request("Service Unavailable".into())),
                );
            }
        }
        assert_eq!(fetches, 1);
        assert_eq!(
            list.error(),
            Some("Failed to load entries: Service Unavailable")
        );
        assert_eq!(list.page(), 1);

        // reload is the way out
        let t = list.reload();
        assert_eq!((t.page, t.mode), (1, LoadMode::Replace));
    }

    #[test]
    fn refresh_token_change_reloads_page_one() {
        let mut list = list();
        let t = list.mount().unwrap();
        list.complete(t, Ok(page_of(0..10, 1, 3)));
        let t = scroll_to_end(&mut list).unwrap();
        list.complete(t, Ok(page_of(10..20, 2, 3)));
        list.page_down(15);

        assert!(list.sync_refresh(0).is_none());
        let t = list.sync_refresh(1).unwrap();
        assert_eq!((t.page, t.mode), (1, LoadMode::Replace));
        assert!(list.records().is_empty());
        assert_eq!(list.page(), 1);
        assert_eq!(list.selected(), 0);
        assert!(list.sync_refresh(1).is_none());

        list.complete(t, Ok(page_of(100..109, 1, 1)));
        assert_eq!(list.records().len(), 9);
        assert_eq!(list.records()[0].id, "m100");
        assert!(!list.has_more());
    }

    #[test]
    fn refresh_before_mount_is_ignored() {
        let mut list = list();
        assert!(list.sync_refresh(3).is_none());
        assert!(list.mount().is_some());
    }

    #[test]
    fn stale_append_after_refresh_is_discarded() {
        let mut list = list();
        let t = list.mount().unwrap();
        list.complete(t, Ok(page_of(0..10, 1, 3)));

        let append = scroll_to_end(&mut list).unwrap();
        let replace = list.sync_refresh(1).unwrap();

        // the replace lands first, then the old append
        list.complete(replace, Ok(page_of(50..60, 1, 2)));
        let outcome = list.complete(append, Ok(page_of(10..20, 2, 3)));

        assert_eq!(outcome, Completion::Stale);
        assert_eq!(list.records().len(), 10);
        assert_eq!(list.records()[0].id, "m50");
        assert_eq!(list.page(), 1);
        assert!(list.has_more());
    }

    #[test]
    fn stale_append_does_not_clear_loading() {
        let mut list = list();
        let t = list.mount().unwrap();
        list.complete(t, Ok(page_of(0..10, 1, 3)));

        let append = scroll_to_end(&mut list).unwrap();
        let replace = list.reload();
        list.complete(append, Ok(page_of(10..20, 2, 3)));
        assert!(list.is_loading());
        assert!(list.records().is_empty());

        list.complete(replace, Ok(page_of(0..10, 1, 3)));
        assert!(!list.is_loading());
    }

    #[test]
    fn accumulated_length_is_sum_of_pages() {
        let mut list = MediaList::new(4, Duration::ZERO);
        let sizes = [4usize, 4, 4, 2];
        let mut start = 0;
        let mut ticket = list.mount();
        for (i, size) in sizes.iter().enumerate() {
            let t = ticket.take().unwrap();
            let page = i as u32 + 1;
            list.complete(t, Ok(page_of(start..start + size, page, 4)));
            start += size;
            assert_eq!(list.records().len(), start);
            ticket = scroll_to_end(&mut list);
        }
        assert!(ticket.is_none());
        let ids: Vec<_> = list.records().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids.first(), Some(&"m0"));
        assert_eq!(ids.last(), Some(&"m13"));
    }

    #[test]
    fn empty_first_page_has_no_sentinel() {
        let mut list = list();
        let t = list.mount().unwrap();
        list.complete(t, Ok(page_of(0..0, 1, 0)));
        assert!(!list.has_more());
        assert!(list
            .observe(Viewport { offset: 0, height: 10 }, Instant::now())
            .is_none());
    }

    #[test]
    fn selection_stays_in_bounds() {
        let mut list = list();
        list.select_next();
        assert_eq!(list.selected(), 0);

        let t = list.mount().unwrap();
        list.complete(t, Ok(page_of(0..10, 1, 1)));
        list.go_bottom();
        assert_eq!(list.selected(), 9);
        list.select_next();
        assert_eq!(list.selected(), 9);
        list.page_up(4);
        assert_eq!(list.selected(), 5);
        list.page_down(100);
        assert_eq!(list.selected(), 9);
        list.go_top();
        list.select_prev();
        assert_eq!(list.selected_record().map(|r| r.id.as_str()), Some("m0"));
    }
}
