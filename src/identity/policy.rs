// Copyright (c) 2025 - Cowboy AI, Inc.
//! Policy Document Retrieval
//!
//! Fetches managed-policy documents from `http(s)://` or `file://` sources
//! and parses them as JSON objects. Documents are never interpreted beyond
//! that structural check.
//!
//! # Failure Modes
//!
//! - [`PolicyFetchError::MalformedUrl`]: configuration error, the source reference is unusable
//! - [`PolicyFetchError::Transport`] / [`PolicyFetchError::Status`]: retrieval failed
//! - [`PolicyFetchError::Parse`]: retrieved bytes are not a JSON object
//!
//! None of them is retried.

use async_trait::async_trait;
use futures::future::try_join_all;
use reqwest::{Client, Url};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

use crate::domain::PolicyDocument;

/// Policy retrieval failure
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PolicyFetchError {
    #[error("{url} is malformed: {reason}")]
    MalformedUrl { url: String, reason: String },

    #[error("Failed to download policy from {url}: {message}")]
    Transport { url: String, message: String },

    #[error("Failed to download policy from {url}: server returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Policy from {url} is not a valid policy document: {message}")]
    Parse { url: String, message: String },

    #[error("No policy document was fetched from {url}")]
    Missing { url: String },

    #[error("Failed to create HTTP client: {0}")]
    Client(String),
}

impl PolicyFetchError {
    /// Whether the failure is a configuration problem rather than a retrieval one
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::MalformedUrl { .. } | Self::Client(_))
    }

    /// Source the failure relates to, if any
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::MalformedUrl { url, .. }
            | Self::Transport { url, .. }
            | Self::Status { url, .. }
            | Self::Parse { url, .. }
            | Self::Missing { url } => Some(url),
            Self::Client(_) => None,
        }
    }
}

/// Remote document source
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    /// Fetch and parse the document at `url`
    async fn fetch(&self, url: &str) -> Result<PolicyDocument, PolicyFetchError>;
}

#[async_trait]
impl<T: DocumentFetcher + ?Sized> DocumentFetcher for Arc<T> {
    async fn fetch(&self, url: &str) -> Result<PolicyDocument, PolicyFetchError> {
        (**self).fetch(url).await
    }
}

/// Parse a raw body into a policy document
pub fn parse_document(url: &str, body: &str) -> Result<PolicyDocument, PolicyFetchError> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| PolicyFetchError::Parse {
            url: url.to_string(),
            message: e.to_string(),
        })?;
    PolicyDocument::from_json(value).map_err(|e| PolicyFetchError::Parse {
        url: url.to_string(),
        message: e.to_string(),
    })
}

/// Parse and check a policy source reference
pub fn parse_source(url: &str) -> Result<Url, PolicyFetchError> {
    let parsed = Url::parse(url).map_err(|e| PolicyFetchError::MalformedUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    match parsed.scheme() {
        "http" | "https" | "file" => Ok(parsed),
        other => Err(PolicyFetchError::MalformedUrl {
            url: url.to_string(),
            reason: format!("unsupported scheme {other:?}"),
        }),
    }
}

/// Fetches documents over HTTP(S), or from disk for `file://` sources
#[derive(Debug, Clone)]
pub struct HttpDocumentFetcher {
    client: Client,
}

impl HttpDocumentFetcher {
    pub fn new(timeout: Duration) -> Result<Self, PolicyFetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PolicyFetchError::Client(e.to_string()))?;
        Ok(Self { client })
    }

    async fn fetch_http(&self, url: Url, raw: &str) -> Result<String, PolicyFetchError> {
        let transport = |e: reqwest::Error| PolicyFetchError::Transport {
            url: raw.to_string(),
            message: e.to_string(),
        };

        let response = self.client.get(url).send().await.map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(PolicyFetchError::Status {
                url: raw.to_string(),
                status: status.as_u16(),
            });
        }
        response.text().await.map_err(transport)
    }

    async fn fetch_file(&self, url: Url, raw: &str) -> Result<String, PolicyFetchError> {
        let path = url.to_file_path().map_err(|()| PolicyFetchError::MalformedUrl {
            url: raw.to_string(),
            reason: "not a local file path".to_string(),
        })?;
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| PolicyFetchError::Transport {
                url: raw.to_string(),
                message: e.to_string(),
            })
    }
}

#[async_trait]
impl DocumentFetcher for HttpDocumentFetcher {
    async fn fetch(&self, url: &str) -> Result<PolicyDocument, PolicyFetchError> {
        let parsed = parse_source(url)?;
        let body = if parsed.scheme() == "file" {
            self.fetch_file(parsed, url).await?
        } else {
            self.fetch_http(parsed, url).await?
        };
        let document = parse_document(url, &body)?;
        debug!(url, bytes = body.len(), "Fetched policy document");
        Ok(document)
    }
}

/// Fetch every distinct source once, concurrently
///
/// The first failure aborts the whole batch.
pub async fn fetch_policy_documents<'a, F>(
    fetcher: &F,
    urls: impl IntoIterator<Item = &'a str>,
) -> Result<BTreeMap<String, PolicyDocument>, PolicyFetchError>
where
    F: DocumentFetcher + ?Sized,
{
    let distinct: BTreeSet<&str> = urls.into_iter().collect();
    if distinct.is_empty() {
        return Ok(BTreeMap::new());
    }

    let documents = try_join_all(distinct.iter().map(|url| async move {
        let document = fetcher.fetch(url).await?;
        Ok::<_, PolicyFetchError>((url.to_string(), document))
    }))
    .await?;

    info!(count = documents.len(), "Fetched policy documents");
    Ok(documents.into_iter().collect())
}
