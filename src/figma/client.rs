//! Figma REST API client for fetching file documents.

use reqwest::{Client, StatusCode, Url};

use super::types::validate_file_key;
use super::{MAX_RETRIES, RETRY_DELAY};
use crate::error::{AppError, Result};

/// Header carrying a Figma personal access token.
const TOKEN_HEADER: &str = "X-Figma-Token";

/// Client for the Figma REST API.
#[derive(Clone)]
pub struct FigmaClient {
    http_client: Client,
    token: String,
    base_url: Url,
}

impl FigmaClient {
    /// Create a new Figma client.
    pub fn new(token: String, base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into();
        let parsed = Url::parse(&base_url).map_err(|e| {
            AppError::BadRequest(format!("invalid Figma API URL '{}': {}", base_url, e))
        })?;
        if parsed.cannot_be_a_base() {
            return Err(AppError::BadRequest(format!(
                "invalid Figma API URL '{}'",
                base_url
            )));
        }

        let http_client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http_client,
            token,
            base_url: parsed,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// `{base}/v1/files/{key}` with the key as a single escaped path segment.
    fn file_url(&self, key: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| AppError::Internal("Figma API URL cannot have a path".to_string()))?
            .pop_if_empty()
            .extend(["v1", "files", key]);
        Ok(url)
    }

    /// Fetch the full document of a file (`GET /v1/files/{key}`).
    /// Retries up to 3 times with 1 second delay on 429 rate limit errors.
    pub async fn fetch_file(&self, key: &str) -> Result<serde_json::Value> {
        validate_file_key(key)?;
        let url = self.file_url(key)?;
        tracing::info!("Fetching Figma file '{}'", key);

        for attempt in 0..=MAX_RETRIES {
            let response = self
                .http_client
                .get(url.clone())
                .header(TOKEN_HEADER, &self.token)
                .send()
                .await?;

            let status = response.status();

            if status == StatusCode::TOO_MANY_REQUESTS {
                if attempt < MAX_RETRIES {
                    tracing::warn!(
                        "Rate limited (429) fetching '{}', waiting {}s before retry (attempt {}/{})",
                        key,
                        RETRY_DELAY.as_secs(),
                        attempt + 1,
                        MAX_RETRIES
                    );
                    tokio::time::sleep(RETRY_DELAY).await;
                    continue;
                } else {
                    tracing::error!(
                        "Rate limited (429) after {} retries fetching '{}', giving up",
                        MAX_RETRIES,
                        key
                    );
                    return Err(AppError::FigmaApi {
                        status: status.as_u16(),
                        message: "rate limited".to_string(),
                    });
                }
            }

            if !status.is_success() {
                let text = response.text().await.unwrap_or_default();
                return Err(AppError::FigmaApi {
                    status: status.as_u16(),
                    message: error_message(&text).unwrap_or_else(|| status.to_string()),
                });
            }

            let doc: serde_json::Value = response.json().await?;
            tracing::debug!("Fetched Figma file '{}'", key);
            return Ok(doc);
        }

        unreachable!()
    }
}

/// Pull the `err` / `message` field out of a Figma error body.
fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("err")
        .or_else(|| value.get("message"))
        .and_then(|m| m.as_str())
        .map(str::to_string)
}

impl std::fmt::Debug for FigmaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FigmaClient")
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message() {
        assert_eq!(
            error_message(r#"{"status":404,"err":"Not found"}"#).as_deref(),
            Some("Not found")
        );
        assert_eq!(
            error_message(r#"{"message":"Invalid token"}"#).as_deref(),
            Some("Invalid token")
        );
        assert_eq!(error_message("<html>"), None);
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client = FigmaClient::new("t".to_string(), "http://localhost:1/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:1");
        assert_eq!(
            client.file_url("abc123").unwrap().as_str(),
            "http://localhost:1/v1/files/abc123"
        );
    }

    #[test]
    fn test_file_url_keeps_base_path() {
        let client = FigmaClient::new("t".to_string(), "http://localhost:1/figma").unwrap();
        assert_eq!(
            client.file_url("abc123").unwrap().as_str(),
            "http://localhost:1/figma/v1/files/abc123"
        );
    }

    #[test]
    fn test_file_url_escapes_key() {
        let client = FigmaClient::new("t".to_string(), "http://localhost:1").unwrap();
        let url = client.file_url("a?b/c").unwrap();
        assert_eq!(url.as_str(), "http://localhost:1/v1/files/a%3Fb%2Fc");
        assert_eq!(url.query(), None);
    }

    #[test]
    fn test_invalid_base_url() {
        let err = FigmaClient::new("t".to_string(), "not a url").unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_fetch_rejects_unsafe_key_before_request() {
        // Port 1 is never contacted: validation fails first.
        let client = FigmaClient::new("t".to_string(), "http://127.0.0.1:1").unwrap();
        for key in ["abc123?depth=1", "..", "a/b"] {
            let err = client.fetch_file(key).await.unwrap_err();
            assert!(matches!(err, AppError::BadRequest(_)), "key {:?}", key);
        }
    }
}
