use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Category {
    #[default]
    Movie,
    #[serde(rename = "TV Show")]
    TvShow,
}

impl Category {
    pub fn toggle(self) -> Self {
        match self {
            Category::Movie => Category::TvShow,
            Category::TvShow => Category::Movie,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Movie => write!(f, "Movie"),
            Category::TvShow => write!(f, "TV Show"),
        }
    }
}

/// A catalog entry as stored by the media service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaRecord {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub category: Category,
    pub director: String,
    pub budget: String,
    pub location: String,
    pub duration: String,
    #[serde(rename = "yearTime")]
    pub release_info: String,
    #[serde(rename = "imageUrl", default, skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
}

/// Body of create and update calls: a record without its id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaDraft {
    pub title: String,
    #[serde(rename = "type")]
    pub category: Category,
    pub director: String,
    pub budget: String,
    pub location: String,
    pub duration: String,
    #[serde(rename = "yearTime")]
    pub release_info: String,
    #[serde(rename = "imageUrl")]
    pub poster_url: String,
}

impl MediaDraft {
    /// Check required fields, returning the message for the first one missing.
    pub fn validate(&self) -> Result<(), String> {
        let required = [
            ("Title", &self.title),
            ("Director", &self.director),
            ("Budget", &self.budget),
            ("Location", &self.location),
            ("Duration", &self.duration),
            ("Year/Time", &self.release_info),
        ];

        for (label, value) in required {
            if value.trim().is_empty() {
                return Err(format!("{} is required", label));
            }
        }
        Ok(())
    }
}

impl From<&MediaRecord> for MediaDraft {
    fn from(record: &MediaRecord) -> Self {
        Self {
            title: record.title.clone(),
            category: record.category,
            director: record.director.clone(),
            budget: record.budget.clone(),
            location: record.location.clone(),
            duration: record.duration.clone(),
            release_info: record.release_info.clone(),
            poster_url: record.poster_url.clone().unwrap_or_default(),
        }
    }
}

/// One page of records plus the pagination metadata reported with it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaPage {
    pub records: Vec<MediaRecord>,
    /// 1-based
    pub page: u32,
    pub page_size: u32,
    pub total_records: u64,
    pub total_pages: u32,
}

impl MediaPage {
    /// An empty page, or one at or past the last page, ends the scroll.
    pub fn has_more(&self) -> bool {
        !self.records.is_empty() && self.page < self.total_pages
    }
}

/// Paged response as sent over the wire
#[derive(Debug, Deserialize)]
pub(crate) struct WirePage {
    #[serde(alias = "records")]
    pub data: Vec<MediaRecord>,
    pub meta: WireMeta,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireMeta {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u32,
}

impl From<WirePage> for MediaPage {
    fn from(wire: WirePage) -> Self {
        Self {
            records: wire.data,
            page: wire.meta.page,
            page_size: wire.meta.limit,
            total_records: wire.meta.total,
            total_pages: wire.meta.total_pages,
        }
    }
}
