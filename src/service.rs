use std::path::Path;

use async_trait::async_trait;

use crate::error::{MarqueeError, Result};
use crate::types::{MediaDraft, MediaPage, MediaRecord};

/// Remote store of catalog entries
#[async_trait]
pub trait MediaService: Send + Sync + std::fmt::Debug {
    async fn fetch_page(&self, page: u32, page_size: u32) -> Result<MediaPage>;
    async fn create(&self, draft: &MediaDraft) -> Result<MediaRecord>;
    async fn update(&self, id: &str, draft: &MediaDraft) -> Result<MediaRecord>;
    async fn delete(&self, id: &str) -> Result<()>;

    /// Upload a poster image and return the URL it is served from.
    async fn upload_poster(&self, _path: &Path) -> Result<String> {
        Err(MarqueeError::Request(
            "Poster upload is not configured".into(),
        ))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Mutex;

    use super::*;

    /// In-memory service holding a sorted collection
    #[derive(Debug, Default)]
    pub(crate) struct MemoryService {
        pub records: Mutex<Vec<MediaRecord>>,
        pub next_id: Mutex<u64>,
        pub fail_fetch: Mutex<bool>,
    }

    impl MemoryService {
        pub(crate) fn with_records(records: Vec<MediaRecord>) -> Self {
            let service = Self::default();
            *service.next_id.lock().unwrap() = records.len() as u64;
            *service.records.lock().unwrap() = records;
            service
        }
    }

    fn to_record(id: String, draft: &MediaDraft) -> MediaRecord {
        MediaRecord {
            id,
            title: draft.title.clone(),
            category: draft.category,
            director: draft.director.clone(),
            budget: draft.budget.clone(),
            location: draft.location.clone(),
            duration: draft.duration.clone(),
            release_info: draft.release_info.clone(),
            poster_url: Some(draft.poster_url.clone()).filter(|u| !u.is_empty()),
        }
    }

    #[async_trait]
    impl MediaService for MemoryService {
        async fn fetch_page(&self, page: u32, page_size: u32) -> Result<MediaPage> {
            if *self.fail_fetch.lock().unwrap() {
                return Err(MarqueeError::Request("Internal Server Error".into()));
            }
            let records = self.records.lock().unwrap();
            let size = page_size.max(1) as usize;
            let total = records.len();
            let start = (page.max(1) as usize - 1) * size;
            let slice = records.iter().skip(start).take(size).cloned().collect();
            Ok(MediaPage {
                records: slice,
                page,
                page_size,
                total_records: total as u64,
                total_pages: total.div_ceil(size) as u32,
            })
        }

        async fn create(&self, draft: &MediaDraft) -> Result<MediaRecord> {
            let mut next = self.next_id.lock().unwrap();
            *next += 1;
            let record = to_record(format!("new{}", next), draft);
            self.records.lock().unwrap().insert(0, record.clone());
            Ok(record)
        }

        async fn update(&self, id: &str, draft: &MediaDraft) -> Result<MediaRecord> {
            let mut records = self.records.lock().unwrap();
            let slot = records
                .iter_mut()
                .find(|r| r.id == id)
                .ok_or_else(|| MarqueeError::Request("Media not found".into()))?;
            *slot = to_record(id.to_string(), draft);
            Ok(slot.clone())
        }

        async fn delete(&self, id: &str) -> Result<()> {
            let mut records = self.records.lock().unwrap();
            let before = records.len();
            records.retain(|r| r.id != id);
            if records.len() == before {
                return Err(MarqueeError::Request("Media not found".into()));
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn upload_is_unsupported_by_default() {
        let service = MemoryService::default();
        let err = service
            .upload_poster(Path::new("poster.png"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Poster upload is not configured");
    }
}
