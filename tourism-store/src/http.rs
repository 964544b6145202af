use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};
use crate::error::StoreError;

pub type StoreResult<T> = Result<T, StoreError>;

const GENERIC_FAILURE: &str = "API request failed";

/// JSON client for one upstream service.
///
/// Any non-2xx response is a terminal `UpstreamRequestFailed`; there are no
/// retries.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    pub async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> StoreResult<T> {
        self.send(self.http.get(self.url(endpoint))).await
    }

    pub async fn get_query<T: DeserializeOwned>(&self, endpoint: &str, query: &[(&str, String)]) -> StoreResult<T> {
        self.send(self.http.get(self.url(endpoint)).query(query)).await
    }

    /// `GET` that maps 404 to `None`
    pub async fn get_optional<T: DeserializeOwned>(&self, endpoint: &str) -> StoreResult<Option<T>> {
        match self.get_json(endpoint).await {
            Ok(value) => Ok(Some(value)),
            Err(StoreError::UpstreamRequestFailed { status: 404, .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(&self, endpoint: &str, body: &B) -> StoreResult<T> {
        self.send(self.http.post(self.url(endpoint)).json(body)).await
    }

    pub async fn put_json<B: Serialize + ?Sized, T: DeserializeOwned>(&self, endpoint: &str, body: &B) -> StoreResult<T> {
        self.send(self.http.put(self.url(endpoint)).json(body)).await
    }

    pub async fn post_form<T: DeserializeOwned>(&self, endpoint: &str, fields: &[(&str, &str)]) -> StoreResult<T> {
        self.send(self.http.post(self.url(endpoint)).form(fields)).await
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> StoreResult<T> {
        let request = match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();
        let url = response.url().to_string();
        let body = response.text().await?;

        if !status.is_success() {
            warn!("{} returned {}", url, status);
            return Err(upstream_error(status, &body));
        }
        debug!("{} returned {}", url, status);
        decode_body(status, &body)
    }
}

/// Failure for a non-2xx response, using the server's `detail` when present
pub fn upstream_error(status: StatusCode, body: &str) -> StoreError {
    StoreError::UpstreamRequestFailed {
        status: status.as_u16(),
        detail: extract_detail(body),
    }
}

pub fn extract_detail(body: &str) -> String {
    let parsed: serde_json::Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(_) => return GENERIC_FAILURE.to_string(),
    };
    match parsed.get("detail") {
        Some(serde_json::Value::String(s)) if !s.is_empty() => s.clone(),
        // Validation errors carry a list of field problems
        Some(serde_json::Value::Null) | None => GENERIC_FAILURE.to_string(),
        Some(other) => other.to_string(),
    }
}

/// 204 and empty bodies decode as JSON `null`
fn decode_body<T: DeserializeOwned>(status: StatusCode, body: &str) -> StoreResult<T> {
    let body = if status == StatusCode::NO_CONTENT || body.trim().is_empty() {
        "null"
    } else {
        body
    };
    serde_json::from_str(body).map_err(|e| StoreError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_from_json_body() {
        assert_eq!(extract_detail(r#"{"detail": "Booking not found"}"#), "Booking not found");
    }

    #[test]
    fn test_generic_detail() {
        assert_eq!(extract_detail("<html>Bad Gateway</html>"), GENERIC_FAILURE);
        assert_eq!(extract_detail(r#"{"message": "nope"}"#), GENERIC_FAILURE);
        assert_eq!(extract_detail(""), GENERIC_FAILURE);
    }

    #[test]
    fn test_structured_detail_is_kept() {
        let detail = extract_detail(r#"{"detail": [{"loc": ["body", "name"], "msg": "field required"}]}"#);
        assert!(detail.contains("field required"));
    }

    #[test]
    fn test_upstream_error_status() {
        match upstream_error(StatusCode::CONFLICT, r#"{"detail": "Slug taken"}"#) {
            StoreError::UpstreamRequestFailed { status, detail } => {
                assert_eq!(status, 409);
                assert_eq!(detail, "Slug taken");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_empty_body_decodes_as_null() {
        let value: Option<serde_json::Value> = decode_body(StatusCode::NO_CONTENT, "").unwrap();
        assert!(value.is_none());
        let value: serde_json::Value = decode_body(StatusCode::OK, r#"{"ok": true}"#).unwrap();
        assert_eq!(value["ok"], true);
        assert!(decode_body::<u32>(StatusCode::OK, "not json").is_err());
    }

    #[test]
    fn test_url_joins_base() {
        let client = ApiClient::new("http://localhost:8004/api/v1/");
        assert_eq!(client.url("/bookings/"), "http://localhost:8004/api/v1/bookings/");
    }
}
