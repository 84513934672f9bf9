//! JSON bodies of the collection API

use mortgage_schema::PersistedRecord;
use serde::Deserialize;
use serde_json::Value;

/// `GET /{collection}`
#[derive(Debug, Deserialize)]
pub(crate) struct ListResponse {
    pub(crate) mortgages: Vec<PersistedRecord>,
}

/// `POST /{collection}` and `PUT /{collection}/{id}`
///
/// The store answers mutations with a receipt, not the stored record.
#[derive(Debug, Deserialize)]
pub(crate) struct MutationReceipt {
    #[serde(default)]
    pub(crate) message: Option<String>,
    pub(crate) mortgage_id: u64,
    #[serde(default)]
    pub(crate) individual_risk_score: Option<Value>,
}

/// Error body, `{"detail": ...}`
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Value,
}

/// Human-readable detail from an error response body
pub(crate) fn error_detail(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            detail: Value::String(text),
        }) => text,
        Ok(ErrorBody { detail }) => detail.to_string(),
        Err(_) if body.trim().is_empty() => "no detail".to_string(),
        Err(_) => body.trim().to_string(),
    }
}
