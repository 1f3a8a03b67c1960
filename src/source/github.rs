//! GitHub contents API client
//!
//! Lists directories and reads files through
//! `GET /repos/{owner}/{name}/contents/{path}`.

use std::time::Duration;

use reqwest::{header, Client as ReqwestClient, RequestBuilder, StatusCode};
use serde::Deserialize;
use tracing::{debug, error, instrument};
use url::Url;

use super::{ContentSource, DirectoryEntry, EntryKind, SourceError};
use crate::repository::RepositoryReference;

/// Default timeout for HTTP requests in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Public GitHub REST endpoint
const DEFAULT_BASE_URL: &str = "https://api.github.com";

/// Media type for JSON listings
const JSON_MEDIA_TYPE: &str = "application/vnd.github+json";

/// Media type asking for the file body itself instead of base64 JSON
const RAW_MEDIA_TYPE: &str = "application/vnd.github.raw+json";

/// One item of a contents listing
#[derive(Debug, Deserialize)]
struct ContentItem {
    name: String,
    path: String,
    #[serde(rename = "type")]
    item_type: String,
    #[serde(default)]
    size: Option<u64>,
}

impl From<ContentItem> for DirectoryEntry {
    fn from(item: ContentItem) -> Self {
        let kind = if item.item_type == "dir" {
            EntryKind::Directory
        } else {
            EntryKind::File
        };
        DirectoryEntry {
            name: item.name,
            path: item.path,
            kind,
            size: match kind {
                EntryKind::File => item.size,
                EntryKind::Directory => None,
            },
        }
    }
}

/// Content source backed by the GitHub REST API
#[derive(Clone)]
pub struct GitHubSource {
    /// The underlying reqwest client
    client: ReqwestClient,

    /// Base URL for API requests
    base_url: Url,

    /// Optional token sent as a bearer credential
    token: Option<String>,
}

impl GitHubSource {
    /// Create a client for api.github.com
    pub fn new(token: Option<String>) -> Result<Self, SourceError> {
        Self::with_base_url(DEFAULT_BASE_URL, token)
    }

    /// Create a client for a custom API endpoint (GitHub Enterprise, tests)
    pub fn with_base_url(
        base_url: impl Into<String>,
        token: Option<String>,
    ) -> Result<Self, SourceError> {
        let client = ReqwestClient::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .user_agent(concat!("repo-digest/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let base_url = Url::parse(&base_url.into())
            .map_err(|e| SourceError::Other(format!("Invalid URL: {}", e)))?;
        if base_url.cannot_be_a_base() {
            return Err(SourceError::Other(format!("Invalid base URL: {}", base_url)));
        }

        Ok(Self {
            client,
            base_url,
            token: token.filter(|t| !t.is_empty()),
        })
    }

    /// Build the contents URL for a path in the repository.
    ///
    /// Each path component is pushed as its own segment so names containing
    /// `#`, `?`, `%` or spaces are percent-encoded.
    fn contents_url(&self, repo: &RepositoryReference, path: &str) -> Result<Url, SourceError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| SourceError::Other(format!("Invalid base URL: {}", self.base_url)))?
            .pop_if_empty()
            .extend(["repos", repo.owner.as_str(), repo.name.as_str(), "contents"])
            .extend(path.trim_start_matches('/').split('/'));
        Ok(url)
    }

    /// Prepare a GET request with the given media type
    fn request(&self, url: Url, media_type: &str) -> RequestBuilder {
        let mut request = self
            .client
            .get(url)
            .header(header::ACCEPT, media_type)
            .header("X-GitHub-Api-Version", "2022-11-28");

        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        request
    }

    /// Send a request, mapping error statuses to `SourceError`
    async fn execute_request(
        &self,
        request: RequestBuilder,
        path: &str,
    ) -> Result<reqwest::Response, SourceError> {
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let message = response.text().await.unwrap_or_default();
        error!("GitHub API error for {:?}: {} - {}", path, status, message);

        match status {
            StatusCode::NOT_FOUND => Err(SourceError::NotFound(path.to_string())),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(SourceError::Auth(format!("{} - {}", status, message)))
            }
            _ => Err(SourceError::Api {
                status_code: status.as_u16(),
                message,
            }),
        }
    }
}

impl ContentSource for GitHubSource {
    #[instrument(skip(self), level = "debug")]
    async fn list_directory(
        &self,
        repo: &RepositoryReference,
        path: &str,
    ) -> Result<Vec<DirectoryEntry>, SourceError> {
        let url = self.contents_url(repo, path)?;
        debug!("Listing {}", url);

        let response = self
            .execute_request(self.request(url, JSON_MEDIA_TYPE), path)
            .await?;
        let body = response.text().await?;

        let items: Vec<ContentItem> = serde_json::from_str(&body).map_err(|e| {
            error!("Failed to parse listing: {}", e);
            SourceError::UnexpectedResponse(format!("{:?} is not a directory listing: {}", path, e))
        })?;

        Ok(items.into_iter().map(DirectoryEntry::from).collect())
    }

    #[instrument(skip(self), level = "debug")]
    async fn read_file(
        &self,
        repo: &RepositoryReference,
        path: &str,
    ) -> Result<String, SourceError> {
        let url = self.contents_url(repo, path)?;
        debug!("Reading {}", url);

        let response = self
            .execute_request(self.request(url, RAW_MEDIA_TYPE), path)
            .await?;
        let bytes = response.bytes().await?;

        String::from_utf8(bytes.to_vec())
            .map_err(|e| SourceError::Decode(format!("{}: {}", path, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    fn repo() -> RepositoryReference {
        RepositoryReference {
            owner: "acme".to_string(),
            name: "widget".to_string(),
        }
    }

    #[tokio::test]
    async fn test_list_directory_preserves_order_and_kinds() {
        let mut server = Server::new_async().await;
        let mock_server = server
            .mock("GET", "/repos/acme/widget/contents/src")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[
                    {"name": "zeta.go", "path": "src/zeta.go", "type": "file", "size": 120},
                    {"name": "alpha", "path": "src/alpha", "type": "dir", "size": 0},
                    {"name": "vendor", "path": "src/vendor", "type": "submodule"}
                ]"#,
            )
            .expect(1)
            .create_async()
            .await;

        let source = GitHubSource::with_base_url(server.url(), None).unwrap();
        let entries = source.list_directory(&repo(), "src").await.unwrap();

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0], DirectoryEntry::file("zeta.go", "src/zeta.go", Some(120)));
        assert_eq!(entries[1], DirectoryEntry::directory("alpha", "src/alpha"));
        assert_eq!(entries[2].kind, EntryKind::File);

        mock_server.assert_async().await;
    }

    #[tokio::test]
    async fn test_token_is_sent_as_bearer() {
        let mut server = Server::new_async().await;
        let mock_server = server
            .mock("GET", "/repos/acme/widget/contents/")
            .match_header("authorization", "Bearer secret-token")
            .with_status(200)
            .with_body("[]")
            .expect(1)
            .create_async()
            .await;

        let source =
            GitHubSource::with_base_url(server.url(), Some("secret-token".to_string())).unwrap();
        let entries = source.list_directory(&repo(), "").await.unwrap();
        assert!(entries.is_empty());

        mock_server.assert_async().await;
    }

    #[tokio::test]
    async fn test_read_file_returns_raw_text() {
        let mut server = Server::new_async().await;
        let mock_server = server
            .mock("GET", "/repos/acme/widget/contents/README.md")
            .match_header("accept", RAW_MEDIA_TYPE)
            .with_status(200)
            .with_body("# Widget\n\nDoes widget things.\n")
            .create_async()
            .await;

        let source = GitHubSource::with_base_url(server.url(), None).unwrap();
        let text = source.read_file(&repo(), "README.md").await.unwrap();
        assert_eq!(text, "# Widget\n\nDoes widget things.\n");

        mock_server.assert_async().await;
    }

    #[tokio::test]
    async fn test_read_file_rejects_binary_content() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/repos/acme/widget/contents/logo.png")
            .with_status(200)
            .with_body(vec![0x89, 0x50, 0xff, 0xfe, 0x00])
            .create_async()
            .await;

        let source = GitHubSource::with_base_url(server.url(), None).unwrap();
        let result = source.read_file(&repo(), "logo.png").await;
        assert!(matches!(result, Err(SourceError::Decode(_))));
    }

    #[tokio::test]
    async fn test_error_statuses() {
        let mut server = Server::new_async().await;
        let _missing = server
            .mock("GET", "/repos/acme/widget/contents/missing")
            .with_status(404)
            .with_body(r#"{"message": "Not Found"}"#)
            .create_async()
            .await;
        let _forbidden = server
            .mock("GET", "/repos/acme/widget/contents/private")
            .with_status(403)
            .with_body(r#"{"message": "API rate limit exceeded"}"#)
            .create_async()
            .await;
        let _broken = server
            .mock("GET", "/repos/acme/widget/contents/broken")
            .with_status(502)
            .with_body("Bad Gateway")
            .create_async()
            .await;

        let source = GitHubSource::with_base_url(server.url(), None).unwrap();
        assert!(matches!(
            source.list_directory(&repo(), "missing").await,
            Err(SourceError::NotFound(_))
        ));
        assert!(matches!(
            source.list_directory(&repo(), "private").await,
            Err(SourceError::Auth(_))
        ));
        assert!(matches!(
            source.read_file(&repo(), "broken").await,
            Err(SourceError::Api { status_code: 502, .. })
        ));
    }

    #[tokio::test]
    async fn test_special_characters_in_paths_are_encoded() {
        let mut server = Server::new_async().await;
        let listing = server
            .mock("GET", "/repos/acme/widget/contents/docs%23old")
            .with_status(200)
            .with_body(r#"[{"name": "what?.py", "path": "docs#old/what?.py", "type": "file", "size": 9}]"#)
            .expect(1)
            .create_async()
            .await;
        let question = server
            .mock("GET", "/repos/acme/widget/contents/docs%23old/what%3F.py")
            .with_status(200)
            .with_body("print(1)\n")
            .expect(1)
            .create_async()
            .await;
        let percent = server
            .mock("GET", "/repos/acme/widget/contents/100%25.go")
            .with_status(200)
            .with_body("package full")
            .expect(1)
            .create_async()
            .await;
        let space = server
            .mock("GET", "/repos/acme/widget/contents/my%20notes/run%20me.js")
            .with_status(200)
            .with_body("run()")
            .expect(1)
            .create_async()
            .await;

        let source = GitHubSource::with_base_url(server.url(), None).unwrap();
        let entries = source.list_directory(&repo(), "docs#old").await.unwrap();
        assert_eq!(entries[0].path, "docs#old/what?.py");
        assert_eq!(
            source.read_file(&repo(), &entries[0].path).await.unwrap(),
            "print(1)\n"
        );
        assert_eq!(source.read_file(&repo(), "100%.go").await.unwrap(), "package full");
        assert_eq!(
            source.read_file(&repo(), "my notes/run me.js").await.unwrap(),
            "run()"
        );

        listing.assert_async().await;
        question.assert_async().await;
        percent.assert_async().await;
        space.assert_async().await;
    }

    #[tokio::test]
    async fn test_base_url_path_is_kept() {
        let mut server = Server::new_async().await;
        let mock_server = server
            .mock("GET", "/api/v3/repos/acme/widget/contents/main.go")
            .with_status(200)
            .with_body("package main")
            .expect(1)
            .create_async()
            .await;

        let source =
            GitHubSource::with_base_url(format!("{}/api/v3/", server.url()), None).unwrap();
        assert_eq!(source.read_file(&repo(), "main.go").await.unwrap(), "package main");

        mock_server.assert_async().await;
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        assert!(matches!(
            GitHubSource::with_base_url("not a url", None),
            Err(SourceError::Other(_))
        ));
    }

    #[tokio::test]
    async fn test_listing_a_file_is_unexpected() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/repos/acme/widget/contents/main.go")
            .with_status(200)
            .with_body(r#"{"name": "main.go", "path": "main.go", "type": "file"}"#)
            .create_async()
            .await;

        let source = GitHubSource::with_base_url(server.url(), None).unwrap();
        let result = source.list_directory(&repo(), "main.go").await;
        assert!(matches!(result, Err(SourceError::UnexpectedResponse(_))));
    }
}
