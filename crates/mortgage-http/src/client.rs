//! reqwest-backed [`RemoteCollectionClient`]
//!
//! Routes, relative to the configured base URL:
//!
//! | Operation | Request | Success body |
//! |-----------|---------|--------------|
//! | list   | `GET /{collection}`         | `{"mortgages": [...]}` |
//! | create | `POST /{collection}`        | receipt with `mortgage_id` |
//! | update | `PUT /{collection}/{id}`    | receipt with `mortgage_id` |
//! | delete | `DELETE /{collection}/{id}` | `{"message": ...}` |
//!
//! A 404 on an item route maps to `ClientError::NotFound`; any other non-2xx
//! status maps to `ClientError::Rejected` with the body's `detail`.

use crate::error::HttpSetupError;
use crate::wire::{error_detail, ListResponse, MutationReceipt};
use async_trait::async_trait;
use mortgage_core::{ClientError, RemoteCollectionClient, RemoteConfig};
use mortgage_schema::{PersistedRecord, RecordId, TypedRecord};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, instrument, warn};
use url::Url;

/// Attribute holding the risk score a mutation receipt reports
pub const RISK_SCORE_ATTRIBUTE: &str = "individual_risk_score";

/// HTTP client for the record collection
#[derive(Debug, Clone)]
pub struct HttpCollectionClient {
    client: Client,
    collection_url: Url,
}

impl HttpCollectionClient {
    /// Create client from remote settings
    ///
    /// # Errors
    /// `HttpSetupError` for an unusable base URL or collection name, or if
    /// the underlying client cannot be built.
    pub fn new(config: &RemoteConfig) -> Result<Self, HttpSetupError> {
        let collection_url = collection_url(&config.base_url, &config.collection)?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("mortgage-editor/", env!("CARGO_PKG_VERSION")))
            .build()?;
        debug!(url = %collection_url, "http collection client ready");
        Ok(Self {
            client,
            collection_url,
        })
    }

    /// Collection endpoint
    #[inline]
    #[must_use]
    pub fn collection_url(&self) -> &Url {
        &self.collection_url
    }

    fn item_url(&self, id: RecordId) -> Url {
        let mut url = self.collection_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(&id.to_string());
        }
        url
    }

    fn receipt_record(receipt: MutationReceipt, record: &TypedRecord) -> PersistedRecord {
        if let Some(message) = &receipt.message {
            debug!(id = receipt.mortgage_id, %message, "store receipt");
        }
        let stored = PersistedRecord::from_typed(RecordId(receipt.mortgage_id), record);
        match receipt.individual_risk_score {
            Some(score) => stored.with_attribute(RISK_SCORE_ATTRIBUTE, score),
            None => stored,
        }
    }
}

fn collection_url(base: &str, collection: &str) -> Result<Url, HttpSetupError> {
    let collection = collection.trim_matches('/');
    if collection.is_empty() || collection.contains('/') {
        return Err(HttpSetupError::InvalidCollection(collection.to_string()));
    }

    let mut url = Url::parse(base).map_err(|source| HttpSetupError::InvalidBaseUrl {
        url: base.to_string(),
        source,
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(HttpSetupError::UnsupportedScheme(url.scheme().to_string()));
    }

    // keep any path prefix on the base, e.g. `/api`
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.join(collection)
        .map_err(|source| HttpSetupError::InvalidBaseUrl {
            url: base.to_string(),
            source,
        })
}

fn transport(err: &reqwest::Error) -> ClientError {
    if err.is_timeout() {
        ClientError::Transport(format!("request timed out: {err}"))
    } else {
        ClientError::Transport(err.to_string())
    }
}

/// Map non-2xx statuses; `item` is the record an item route addressed
async fn check_status(response: Response, item: Option<RecordId>) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if let (StatusCode::NOT_FOUND, Some(id)) = (status, item) {
        return Err(ClientError::NotFound(id));
    }

    let body = response.text().await.unwrap_or_default();
    let message = error_detail(&body);
    warn!(status = status.as_u16(), %message, "store rejected request");
    Err(ClientError::Rejected {
        status: status.as_u16(),
        message,
    })
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let bytes = response.bytes().await.map_err(|e| transport(&e))?;
    serde_json::from_slice(&bytes).map_err(|e| ClientError::InvalidResponse(e.to_string()))
}

#[async_trait]
impl RemoteCollectionClient for HttpCollectionClient {
    #[instrument(skip(self), fields(url = %self.collection_url))]
    async fn list(&self) -> Result<Vec<PersistedRecord>, ClientError> {
        let response = self
            .client
            .get(self.collection_url.clone())
            .send()
            .await
            .map_err(|e| transport(&e))?;
        let body: ListResponse = decode(check_status(response, None).await?).await?;
        debug!(count = body.mortgages.len(), "fetched records");
        Ok(body.mortgages)
    }

    #[instrument(skip(self, record), fields(url = %self.collection_url))]
    async fn create(&self, record: &TypedRecord) -> Result<PersistedRecord, ClientError> {
        let response = self
            .client
            .post(self.collection_url.clone())
            .json(&record.to_json_map())
            .send()
            .await
            .map_err(|e| transport(&e))?;
        let receipt: MutationReceipt = decode(check_status(response, None).await?).await?;
        Ok(Self::receipt_record(receipt, record))
    }

    #[instrument(skip(self, record))]
    async fn update(
        &self,
        id: RecordId,
        record: &TypedRecord,
    ) -> Result<PersistedRecord, ClientError> {
        let response = self
            .client
            .put(self.item_url(id))
            .json(&record.to_json_map())
            .send()
            .await
            .map_err(|e| transport(&e))?;
        let receipt: MutationReceipt = decode(check_status(response, Some(id)).await?).await?;
        if receipt.mortgage_id != id.get() {
            warn!(expected = %id, got = receipt.mortgage_id, "receipt names another record");
        }
        Ok(Self::receipt_record(receipt, record))
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: RecordId) -> Result<(), ClientError> {
        let response = self
            .client
            .delete(self.item_url(id))
            .send()
            .await
            .map_err(|e| transport(&e))?;
        check_status(response, Some(id)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(base: &str) -> RemoteConfig {
        RemoteConfig {
            base_url: base.to_string(),
            ..RemoteConfig::default()
        }
    }

    #[test]
    fn urls_from_base() {
        let client = HttpCollectionClient::new(&config("http://localhost:8000")).unwrap();
        assert_eq!(client.collection_url().as_str(), "http://localhost:8000/mortgages");
        assert_eq!(
            client.item_url(RecordId(5)).as_str(),
            "http://localhost:8000/mortgages/5"
        );
    }

    #[test]
    fn base_path_prefix_is_kept() {
        let client = HttpCollectionClient::new(&config("https://example.test/api")).unwrap();
        assert_eq!(
            client.collection_url().as_str(),
            "https://example.test/api/mortgages"
        );
    }

    #[test]
    fn bad_base_urls_rejected() {
        assert!(matches!(
            HttpCollectionClient::new(&config("not a url")),
            Err(HttpSetupError::InvalidBaseUrl { .. })
        ));
        assert!(matches!(
            HttpCollectionClient::new(&config("ftp://example.test")),
            Err(HttpSetupError::UnsupportedScheme(_))
        ));

        let bad = RemoteConfig {
            collection: "a/b".to_string(),
            ..RemoteConfig::default()
        };
        assert!(matches!(
            HttpCollectionClient::new(&bad),
            Err(HttpSetupError::InvalidCollection(_))
        ));
    }
}
