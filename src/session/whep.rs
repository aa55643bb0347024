//! WHEP offer/answer exchange

use async_trait::async_trait;

use crate::error::NegotiationError;

/// Content type of WHEP offer and answer bodies
pub const SDP_CONTENT_TYPE: &str = "application/sdp";

/// Carries a local offer to a WHEP endpoint and returns the answer
#[async_trait]
pub trait WhepTransport: Send + Sync {
    async fn exchange(&self, url: &str, offer: &str) -> Result<String, NegotiationError>;
}

/// WHEP over HTTP
///
/// POSTs the offer with `Content-Type: application/sdp`. Any non-success
/// status, or a success with an empty body, is a negotiation failure.
#[derive(Debug, Clone, Default)]
pub struct HttpWhepTransport {
    client: reqwest::Client,
}

impl HttpWhepTransport {
    /// Create a transport with a default HTTP client
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transport with a caller-configured HTTP client
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl WhepTransport for HttpWhepTransport {
    async fn exchange(&self, url: &str, offer: &str) -> Result<String, NegotiationError> {
        tracing::debug!(url = %url, offer_len = offer.len(), "Sending WHEP offer");

        let response = self
            .client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, SDP_CONTENT_TYPE)
            .body(offer.to_string())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(NegotiationError::Status(status.as_u16()));
        }

        let answer = response.text().await?;
        if answer.trim().is_empty() {
            return Err(NegotiationError::EmptyAnswer);
        }

        tracing::debug!(url = %url, status = status.as_u16(), answer_len = answer.len(), "WHEP answer received");
        Ok(answer)
    }
}
