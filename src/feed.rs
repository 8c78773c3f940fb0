use crate::error::Result;
use crate::types::{MediaPage, MediaRecord};

/// Whether fetched records extend or overwrite the accumulated list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMode {
    Append,
    Replace,
}

/// A page fetch issued by the feed. The result must be handed back to
/// [`Feed::complete`] together with the ticket it was issued under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub page: u32,
    pub mode: LoadMode,
    pub generation: u64,
}

/// Outcome of handing a fetch result back to the feed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Records were applied; carries the recomputed has-more flag.
    Applied { has_more: bool },
    /// The fetch failed; records are untouched and the error is set.
    Failed,
    /// The ticket belongs to a generation that has since been reset.
    Stale,
}

/// Accumulated records of the list plus the loading/error flags.
#[derive(Debug, Default)]
pub struct Feed {
    records: Vec<MediaRecord>,
    loading: bool,
    error: Option<String>,
    generation: u64,
}

impl Feed {
    pub fn records(&self) -> &[MediaRecord] {
        &self.records
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Start loading `page`. Marks the feed as loading and clears any previous
    /// error.
    pub fn begin(&mut self, page: u32, mode: LoadMode) -> FetchTicket {
        self.loading = true;
        self.error = None;
        FetchTicket {
            page: page.max(1),
            mode,
            generation: self.generation,
        }
    }

    /// Drop all records and invalidate every ticket issued so far.
    pub fn reset(&mut self) {
        self.records.clear();
        self.generation += 1;
    }

    pub fn complete(&mut self, ticket: FetchTicket, result: Result<MediaPage>) -> Completion {
        if ticket.generation != self.generation {
            tracing::warn!(
                page = ticket.page,
                generation = ticket.generation,
                current = self.generation,
                "discarding stale page"
            );
            return Completion::Stale;
        }

        self.loading = false;

        match result {
            Ok(page) => {
                let has_more = page.has_more();
                tracing::debug!(
                    page = page.page,
                    page_size = page.page_size,
                    total_pages = page.total_pages,
                    total_records = page.total_records,
                    count = page.records.len(),
                    mode = ?ticket.mode,
                    "page loaded"
                );
                match ticket.mode {
                    LoadMode::Replace => self.records = page.records,
                    LoadMode::Append => self.records.extend(page.records),
                }
                Completion::Applied { has_more }
            }
            Err(e) => {
                tracing::warn!(page = ticket.page, error = %e, "failed to load page");
                self.error = Some(format!("Failed to load entries: {}", e));
                Completion::Failed
            }
        }
    }
}
