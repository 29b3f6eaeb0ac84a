// stylist-client/src/http.rs
// HTTP transport shared by the public API and the admin client

use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::join_url;
use crate::{ClientConfig, ClientError, ClientResult};

/// FastAPI-style error body: `{"detail": "..."}` or `{"detail": [...]}`
#[derive(serde::Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

/// HTTP client for making requests to the stylist backend
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: Option<String>,
    token: Option<String>,
}

impl HttpClient {
    /// Create a new HTTP client from configuration
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            token: None,
        })
    }

    /// Set the bearer token
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    pub fn is_configured(&self) -> bool {
        self.base_url.is_some()
    }

    fn url(&self, path: &str) -> ClientResult<String> {
        let base = self.base_url.as_deref().ok_or(ClientError::NotConfigured)?;
        Ok(join_url(base, path))
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn send(&self, req: RequestBuilder) -> ClientResult<reqwest::Response> {
        self.authorize(req).send().await.map_err(|e| {
            if e.is_timeout() {
                ClientError::Timeout
            } else {
                ClientError::Http(e)
            }
        })
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let url = self.url(path)?;
        tracing::debug!(%url, "GET");
        let response = self.send(self.client.get(&url)).await?;
        Self::handle_response(response).await
    }

    /// Make a GET request with a query string
    pub async fn get_query<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> ClientResult<T> {
        let url = self.url(path)?;
        tracing::debug!(%url, "GET");
        let response = self.send(self.client.get(&url).query(query)).await?;
        Self::handle_response(response).await
    }

    /// Make a POST request with JSON body
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let url = self.url(path)?;
        tracing::debug!(%url, "POST");
        let response = self.send(self.client.post(&url).json(body)).await?;
        Self::handle_response(response).await
    }

    /// Make a POST request without body
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let url = self.url(path)?;
        tracing::debug!(%url, "POST");
        let response = self.send(self.client.post(&url)).await?;
        Self::handle_response(response).await
    }

    /// Make a PATCH request with JSON body
    pub async fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let url = self.url(path)?;
        tracing::debug!(%url, "PATCH");
        let response = self.send(self.client.patch(&url).json(body)).await?;
        Self::handle_response(response).await
    }

    /// Make a DELETE request; the body (usually 204) is ignored
    pub async fn delete(&self, path: &str) -> ClientResult<()> {
        let url = self.url(path)?;
        tracing::debug!(%url, "DELETE");
        let response = self.send(self.client.delete(&url)).await?;
        Self::check_status(response).await.map(|_| ())
    }

    /// Make a multipart POST request
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> ClientResult<T> {
        let url = self.url(path)?;
        tracing::debug!(%url, "POST multipart");
        let response = self.send(self.client.post(&url).multipart(form)).await?;
        Self::handle_response(response).await
    }

    /// Handle the HTTP response
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let response = Self::check_status(response).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| {
            ClientError::InvalidResponse(format!(
                "{e}: {}",
                String::from_utf8_lossy(&bytes[..bytes.len().min(200)])
            ))
        })
    }

    async fn check_status(response: reqwest::Response) -> ClientResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let message = error_message(&text, status);
        tracing::warn!(status = status.as_u16(), %message, "Backend returned an error");

        Err(match status {
            StatusCode::UNAUTHORIZED => ClientError::Unauthorized,
            StatusCode::NOT_FOUND => ClientError::NotFound(message),
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                ClientError::Validation(message)
            }
            StatusCode::CONFLICT => ClientError::Conflict(message),
            _ => ClientError::Api {
                status: status.as_u16(),
                message,
            },
        })
    }
}

/// Pull `detail` out of an error body, falling back to the raw text
fn error_message(text: &str, status: StatusCode) -> String {
    match serde_json::from_str::<ErrorBody>(text) {
        Ok(ErrorBody {
            detail: serde_json::Value::String(s),
        }) => s,
        Ok(ErrorBody { detail }) => detail.to_string(),
        Err(_) if text.trim().is_empty() => status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string(),
        Err(_) => text.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_is_unwrapped() {
        assert_eq!(
            error_message(r#"{"detail":"Job not found"}"#, StatusCode::NOT_FOUND),
            "Job not found"
        );
        assert_eq!(
            error_message("", StatusCode::BAD_GATEWAY),
            "Bad Gateway"
        );
        assert_eq!(
            error_message("upstream exploded", StatusCode::INTERNAL_SERVER_ERROR),
            "upstream exploded"
        );
        assert!(error_message(r#"{"detail":[{"loc":["body"]}]}"#, StatusCode::UNPROCESSABLE_ENTITY)
            .contains("loc"));
    }

    #[tokio::test]
    async fn unconfigured_client_fails_fast() {
        let client = HttpClient::new(&ClientConfig::unconfigured()).unwrap();
        let err = client.get::<serde_json::Value>("/catalog").await.unwrap_err();
        assert!(matches!(err, ClientError::NotConfigured));
    }
}
