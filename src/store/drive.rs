//! Google Drive implementation of [`BlobStore`].
//!
//! Uses the Drive v3 REST API directly:
//!
//! - create: multipart upload (`uploadType=multipart`) of JSON metadata + PNG body
//! - list: `files.list` with a `q` search expression, following `nextPageToken`
//! - delete: `files.delete` by file id

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

use super::oauth::{OAuthCredentials, TokenProvider, DEFAULT_TOKEN_URL};
use super::{BlobStore, ListQuery, ObjectMetadata, RemoteObject, StoredObject};
use crate::error::StoreError;

/// Default Drive REST API base.
pub const DEFAULT_API_BASE: &str = "https://www.googleapis.com";

/// Default Drive media upload base.
pub const DEFAULT_UPLOAD_BASE: &str = "https://www.googleapis.com/upload";

const MULTIPART_BOUNDARY: &str = "doodle_gallery_part_4f8a1c2e9b7d";

const LIST_FIELDS: &str = "nextPageToken, files(id, name, webViewLink)";

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FileMetadata<'a> {
    name: &'a str,
    parents: &'a [String],
    mime_type: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DriveFile {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    web_view_link: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileList {
    #[serde(default)]
    files: Vec<DriveFile>,
    #[serde(default)]
    next_page_token: Option<String>,
}

impl DriveFile {
    fn view_link(&self) -> String {
        self.web_view_link
            .clone()
            .unwrap_or_else(|| format!("https://drive.google.com/file/d/{}/view", self.id))
    }
}

// =============================================================================
// Query Helpers
// =============================================================================

/// Escape a value for use inside a single-quoted Drive query string.
pub fn escape_query_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

/// Build the Drive `q` expression for a [`ListQuery`].
pub fn build_list_query(query: &ListQuery) -> String {
    let mut q = format!(
        "'{}' in parents and trashed = false",
        escape_query_value(&query.folder_id)
    );
    if let Some(ref name) = query.name {
        q.push_str(&format!(" and name = '{}'", escape_query_value(name)));
    }
    q
}

/// Pick a multipart boundary that does not occur in `body`.
fn multipart_boundary(body: &[u8]) -> String {
    let occurs = |boundary: &str| {
        body.windows(boundary.len())
            .any(|window| window == boundary.as_bytes())
    };

    let mut boundary = MULTIPART_BOUNDARY.to_string();
    let mut attempt: u32 = 0;
    while occurs(&boundary) {
        attempt += 1;
        boundary = format!("{}_{}", MULTIPART_BOUNDARY, attempt);
    }
    boundary
}

/// Build a `multipart/related` upload body.
///
/// Returns the body and the matching `Content-Type` header value. The
/// boundary is chosen so it never appears inside the PNG bytes.
pub fn build_multipart_body(
    metadata: &ObjectMetadata,
    body: &[u8],
) -> Result<(Vec<u8>, String), StoreError> {
    let json = serde_json::to_vec(&FileMetadata {
        name: &metadata.name,
        parents: &metadata.parents,
        mime_type: &metadata.mime_type,
    })
    .map_err(|e| StoreError::Decode(e.to_string()))?;

    let boundary = multipart_boundary(body);

    let mut out = Vec::with_capacity(json.len() + body.len() + 256);
    out.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
    out.extend_from_slice(b"Content-Type: application/json; charset=UTF-8\r\n\r\n");
    out.extend_from_slice(&json);
    out.extend_from_slice(format!("\r\n--{}\r\n", boundary).as_bytes());
    out.extend_from_slice(format!("Content-Type: {}\r\n\r\n", metadata.mime_type).as_bytes());
    out.extend_from_slice(body);
    out.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());

    let content_type = format!("multipart/related; boundary={}", boundary);
    Ok((out, content_type))
}

// =============================================================================
// DriveStore
// =============================================================================

/// Endpoints used by [`DriveStore`]. Overridable for testing.
#[derive(Debug, Clone)]
pub struct DriveEndpoints {
    pub api_base: String,
    pub upload_base: String,
    pub token_url: String,
}

impl Default for DriveEndpoints {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            upload_base: DEFAULT_UPLOAD_BASE.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
        }
    }
}

/// Google Drive backed blob store.
pub struct DriveStore {
    http: reqwest::Client,
    tokens: TokenProvider,
    api_base: String,
    upload_base: String,
}

impl DriveStore {
    /// Create a store against the public Google endpoints.
    pub fn new(credentials: OAuthCredentials) -> Result<Self, StoreError> {
        Self::with_endpoints(credentials, DriveEndpoints::default())
    }

    /// Create a store against custom endpoints.
    pub fn with_endpoints(
        credentials: OAuthCredentials,
        endpoints: DriveEndpoints,
    ) -> Result<Self, StoreError> {
        for base in [&endpoints.api_base, &endpoints.upload_base, &endpoints.token_url] {
            Url::parse(base)
                .map_err(|e| StoreError::Request(format!("invalid endpoint '{}': {}", base, e)))?;
        }

        let http = reqwest::Client::builder()
            .user_agent(concat!("doodle-gallery/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| StoreError::Request(e.to_string()))?;

        let tokens = TokenProvider::with_token_url(http.clone(), credentials, endpoints.token_url);

        Ok(Self {
            http,
            tokens,
            api_base: endpoints.api_base.trim_end_matches('/').to_string(),
            upload_base: endpoints.upload_base.trim_end_matches('/').to_string(),
        })
    }

    fn files_url(&self) -> String {
        format!("{}/drive/v3/files", self.api_base)
    }

    /// Send an authorized request and return the body of a successful response.
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<String, StoreError> {
        let token = self.tokens.access_token().await?;

        let response = request
            .bearer_auth(&token)
            .send()
            .await
            .map_err(|e| StoreError::Request(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| StoreError::Request(e.to_string()))?;

        if status == StatusCode::UNAUTHORIZED {
            warn!("Drive rejected the access token; it will be refreshed on the next request");
            self.tokens.invalidate(&token).await;
        }

        if !status.is_success() {
            return Err(StoreError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }
}

#[async_trait]
impl BlobStore for DriveStore {
    async fn create(
        &self,
        metadata: ObjectMetadata,
        body: Bytes,
    ) -> Result<StoredObject, StoreError> {
        let (payload, content_type) = build_multipart_body(&metadata, &body)?;

        let request = self
            .http
            .post(format!("{}/drive/v3/files", self.upload_base))
            .query(&[("uploadType", "multipart"), ("fields", "id,webViewLink")])
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(payload);

        let text = self.send(request).await?;
        let file: DriveFile =
            serde_json::from_str(&text).map_err(|e| StoreError::Decode(e.to_string()))?;

        debug!(id = %file.id, name = %metadata.name, "Uploaded file to Drive");

        Ok(StoredObject {
            view_link: file.view_link(),
            id: file.id,
        })
    }

    async fn list(&self, query: ListQuery) -> Result<Vec<RemoteObject>, StoreError> {
        let q = build_list_query(&query);
        let mut objects = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut params = vec![
                ("q", q.clone()),
                ("fields", LIST_FIELDS.to_string()),
                ("orderBy", "createdTime".to_string()),
                ("pageSize", "1000".to_string()),
            ];
            if let Some(token) = page_token.take() {
                params.push(("pageToken", token));
            }

            let request = self.http.get(self.files_url()).query(&params);
            let text = self.send(request).await?;
            let page: FileList =
                serde_json::from_str(&text).map_err(|e| StoreError::Decode(e.to_string()))?;

            objects.extend(page.files.into_iter().map(|f| RemoteObject {
                view_link: f.view_link(),
                id: f.id,
                name: f.name,
            }));

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        debug!(count = objects.len(), query = %q, "Listed Drive files");
        Ok(objects)
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let url = format!("{}/{}", self.files_url(), urlencoding::encode(id));
        self.send(self.http.delete(url)).await?;
        debug!(id = %id, "Deleted Drive file");
        Ok(())
    }
}
