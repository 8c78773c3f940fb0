use std::path::Path;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::{MarqueeError, Result};
use crate::service::MediaService;
use crate::types::{MediaDraft, MediaPage, MediaRecord, WirePage};

const MEDIA: &str = "media service";

/// Where posters are uploaded, and the key the upload endpoint expects
#[derive(Debug, Clone)]
pub struct UploadTarget {
    pub url: String,
    pub api_key: String,
}

/// Media service spoken to over its JSON REST API
pub struct HttpMediaService {
    client: Client,
    base_url: String,
    upload: Option<UploadTarget>,
}

impl std::fmt::Debug for HttpMediaService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpMediaService")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

#[derive(Deserialize)]
struct UploadResponse {
    url: Option<String>,
    secure_url: Option<String>,
}

impl HttpMediaService {
    pub fn new(base_url: &str, upload: Option<UploadTarget>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            upload,
        }
    }

    fn media_url(&self) -> String {
        format!("{}/media", self.base_url)
    }

    fn item_url(&self, id: &str) -> String {
        format!("{}/{}", self.media_url(), urlencoding::encode(id))
    }

    /// Send `request` and decode its JSON body. `endpoint` names the remote
    /// side in failure logs.
    async fn send_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        endpoint: &str,
    ) -> Result<T> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        expect_success(status, &body, endpoint)?;
        decode(&body)
    }
}

/// Turn a non-success status into a `Request` error. The message comes from
/// the body's `message` field when there is one, else from the status. The
/// body of a successful response is not looked at.
fn expect_success(status: StatusCode, body: &str, endpoint: &str) -> Result<()> {
    if status.is_success() {
        return Ok(());
    }
    let message = error_message(status, body);
    tracing::warn!(%status, %message, endpoint, "request failed");
    Err(MarqueeError::Request(message))
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T> {
    serde_json::from_str(body)
        .map_err(|e| MarqueeError::Request(format!("Unexpected response: {}", e)))
}

fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.is_empty())
        .or_else(|| status.canonical_reason().map(str::to_string))
        .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16()))
}

#[async_trait]
impl MediaService for HttpMediaService {
    async fn fetch_page(&self, page: u32, page_size: u32) -> Result<MediaPage> {
        tracing::debug!(page, page_size, "fetching media page");
        let request = self
            .client
            .get(self.media_url())
            .query(&[("page", page), ("limit", page_size)]);
        let wire: WirePage = self.send_json(request, MEDIA).await?;
        Ok(wire.into())
    }

    async fn create(&self, draft: &MediaDraft) -> Result<MediaRecord> {
        let request = self.client.post(self.media_url()).json(draft);
        let record: MediaRecord = self.send_json(request, MEDIA).await?;
        tracing::info!(id = %record.id, "media created");
        Ok(record)
    }

    async fn update(&self, id: &str, draft: &MediaDraft) -> Result<MediaRecord> {
        let request = self.client.put(self.item_url(id)).json(draft);
        let record = self.send_json(request, MEDIA).await?;
        tracing::info!(id, "media updated");
        Ok(record)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let response = self.client.delete(self.item_url(id)).send().await?;
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        expect_success(status, &body, MEDIA)?;
        tracing::info!(id, "media deleted");
        Ok(())
    }

    async fn upload_poster(&self, path: &Path) -> Result<String> {
        let Some(target) = &self.upload else {
            return Err(MarqueeError::Request(
                "Poster upload is not configured".into(),
            ));
        };

        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "poster".to_string());

        let form = reqwest::multipart::Form::new()
            .text("api_key", target.api_key.clone())
            .part(
                "file",
                reqwest::multipart::Part::bytes(bytes).file_name(file_name),
            );

        let request = self.client.post(&target.url).multipart(form);
        let uploaded: UploadResponse = self.send_json(request, "poster upload").await?;
        let url = uploaded.secure_url.or(uploaded.url).ok_or_else(|| {
            MarqueeError::Request("Upload response did not include a URL".into())
        })?;
        tracing::info!(%url, "poster uploaded");
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_field_wins() {
        let msg = error_message(
            StatusCode::BAD_REQUEST,
            r#"{"message":"Title must be unique"}"#,
        );
        assert_eq!(msg, "Title must be unique");
    }

    #[test]
    fn falls_back_to_status_text() {
        assert_eq!(
            error_message(StatusCode::NOT_FOUND, "<html>nope</html>"),
            "Not Found"
        );
        assert_eq!(
            error_message(StatusCode::INTERNAL_SERVER_ERROR, r#"{"message":""}"#),
            "Internal Server Error"
        );
    }

    #[test]
    fn unknown_status_gets_generic_message() {
        let status = StatusCode::from_u16(599).unwrap();
        assert_eq!(error_message(status, ""), "Request failed with status 599");
    }

    #[test]
    fn page_body_without_meta_is_unexpected() {
        let err = decode::<WirePage>(r#"{"data":[]}"#).unwrap_err();
        assert!(matches!(err, MarqueeError::Request(_)));
        assert!(err.to_string().starts_with("Unexpected response: "));
    }

    #[test]
    fn record_with_unknown_type_is_unexpected() {
        let body = r#"{"id":"1","title":"Serial","type":"Podcast","director":"",
            "budget":"","location":"","duration":"","yearTime":""}"#;
        let err = decode::<MediaRecord>(body).unwrap_err();
        assert!(err.to_string().starts_with("Unexpected response: "));
    }

    #[test]
    fn page_body_decodes() {
        let body = r#"{"data":[],"meta":{"page":1,"limit":10,"total":0,"totalPages":0}}"#;
        let page = MediaPage::from(decode::<WirePage>(body).unwrap());
        assert!(page.records.is_empty());
        assert!(!page.has_more());
    }

    #[test]
    fn delete_accepts_any_success_body() {
        assert!(expect_success(StatusCode::NO_CONTENT, "", MEDIA).is_ok());
        assert!(expect_success(StatusCode::OK, "deleted", MEDIA).is_ok());
    }

    #[test]
    fn failed_status_carries_body_message() {
        let err = expect_success(
            StatusCode::NOT_FOUND,
            r#"{"message":"Media not found"}"#,
            MEDIA,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Media not found");
    }

    #[test]
    fn urls_are_built_from_base() {
        let service = HttpMediaService::new("http://localhost:3000/api/", None);
        assert_eq!(service.media_url(), "http://localhost:3000/api/media");
        assert_eq!(
            service.item_url("a b/c"),
            "http://localhost:3000/api/media/a%20b%2Fc"
        );
    }

    #[tokio::test]
    async fn upload_without_target_fails() {
        let service = HttpMediaService::new("http://localhost", None);
        let err = service
            .upload_poster(Path::new("/tmp/poster.png"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Poster upload is not configured");
    }
}
