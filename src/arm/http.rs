//! HTTP utilities for ARM REST API calls

use reqwest::{Client, Method};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Sanitize response body for logging
/// Truncates long responses and strips non-printable characters
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        // The cut must land on a char boundary; error bodies can carry
        // localized, multi-byte text
        let mut end = MAX_LOG_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!(
            "{}... [truncated, {} bytes total]",
            &body[..end],
            body.len()
        )
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// Errors from calls to the management API.
///
/// `Remote` carries the remote status and body verbatim so handlers can
/// pass them through; nothing here retries or translates status codes.
#[derive(Debug, Error)]
pub enum ArmError {
    #[error("management API request failed with status {status}")]
    Remote { status: u16, body: Value },

    #[error("failed to reach the management API: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("failed to parse management API response: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("invalid management API URL: {0}")]
    Url(#[from] url::ParseError),
}

/// HTTP client wrapper for ARM API calls
#[derive(Clone)]
pub struct ArmHttpClient {
    client: Client,
}

impl ArmHttpClient {
    /// Create a new HTTP client with a per-call timeout.
    pub fn new(timeout: Duration) -> Result<Self, ArmError> {
        let client = Client::builder()
            .user_agent(concat!("armsweep/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self { client })
    }

    /// Issue a request and decode the JSON body.
    ///
    /// Returns the status and body on 2xx; any other status surfaces as
    /// [`ArmError::Remote`] with the remote body preserved. Empty bodies
    /// decode to `Value::Null`.
    pub async fn request(
        &self,
        method: Method,
        url: &str,
        token: &str,
        body: Option<&Value>,
    ) -> Result<(u16, Value), ArmError> {
        tracing::debug!("{} {}", method, url);

        let mut request = self.client.request(method, url).bearer_auth(token);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            // Security: Only log sanitized/truncated error body to avoid leaking sensitive data
            tracing::error!("ARM API error: {} - {}", status, sanitize_for_log(&text));
            let body = serde_json::from_str(&text).unwrap_or(Value::String(text));
            return Err(ArmError::Remote {
                status: status.as_u16(),
                body,
            });
        }

        if text.is_empty() {
            return Ok((status.as_u16(), Value::Null));
        }

        let value = serde_json::from_str(&text).map_err(ArmError::InvalidJson)?;
        Ok((status.as_u16(), value))
    }
}

impl ArmError {
    /// Remote status code, if this error carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ArmError::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The `error.message` field of an ARM error body, falling back to the
    /// error's own display form. This is what per-item batch outcomes show.
    pub fn detail_message(&self) -> String {
        if let ArmError::Remote { body, .. } = self {
            if let Some(message) = body
                .pointer("/error/message")
                .and_then(|v| v.as_str())
            {
                return message.to_string();
            }
        }
        self.to_string()
    }
}
