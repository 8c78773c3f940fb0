/// Page cursor for the infinite-scroll list.
///
/// Pure state: the caller decides when advancing is allowed (not loading and
/// `has_more`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    page: u32,
    has_more: bool,
}

impl Default for Cursor {
    fn default() -> Self {
        Self {
            page: 1,
            has_more: true,
        }
    }
}

impl Cursor {
    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn set_has_more(&mut self, has_more: bool) {
        self.has_more = has_more;
    }

    /// Move to the next page and return it.
    pub fn advance(&mut self) -> u32 {
        self.page += 1;
        self.page
    }

    /// Undo an advance whose fetch failed. Never goes below page 1.
    pub fn retreat(&mut self) {
        self.page = self.page.saturating_sub(1).max(1);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
