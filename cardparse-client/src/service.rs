use async_trait::async_trait;
use cardparse_core::{ParsedResult, SubmitError};
use tracing::{debug, info};

use crate::request::ParseRequest;
use crate::response::interpret;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:5001/parse";

/// The remote statement parser, seen from the client.
#[async_trait]
pub trait ParseService: Send + Sync {
    async fn parse(&self, request: ParseRequest) -> Result<ParsedResult, SubmitError>;
}

/// Multipart POST to a fixed endpoint. One attempt, no timeout.
#[derive(Debug, Clone)]
pub struct HttpParseService {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpParseService {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl Default for HttpParseService {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT)
    }
}

#[async_trait]
impl ParseService for HttpParseService {
    async fn parse(&self, request: ParseRequest) -> Result<ParsedResult, SubmitError> {
        let bank = request.bank;
        let size = request.file.len();
        let form = request.into_form().map_err(SubmitError::transport)?;

        debug!(endpoint = %self.endpoint, %bank, size, "sending statement");
        let resp = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                debug!(endpoint = %self.endpoint, error = %e, "parse request failed");
                SubmitError::transport(e)
            })?;

        let status = resp.status();
        let body = resp.bytes().await.map_err(SubmitError::transport)?;
        info!(%status, bytes = body.len(), "parser responded");

        interpret(status, &body)
    }
}
