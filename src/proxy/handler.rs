//! Request handling for the Gemini relay

use axum::{
    body::Bytes,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use super::server::AppState;
use super::streaming::relay_streaming_response;

/// Relays one inbound request to the upstream Generative Language API.
///
/// The inbound body and query string pass through verbatim; the only
/// rewrites are the upstream base URL and the injected `key` parameter.
pub struct GeminiRelay {
    state: AppState,
}

impl GeminiRelay {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// True when the upstream call must be relayed chunk-by-chunk
    fn is_streaming_request(path: &str, params: &[(String, String)]) -> bool {
        path.contains("streamGenerateContent")
            || params
                .iter()
                .any(|(name, value)| name == "alt" && value == "sse")
    }

    /// Decode the inbound query string, dropping any caller-supplied `key`
    fn inbound_params(query: Option<&str>) -> Vec<(String, String)> {
        let Some(query) = query else {
            return Vec::new();
        };
        url::form_urlencoded::parse(query.as_bytes())
            .map(|(name, value)| (name.into_owned(), value.into_owned()))
            .filter(|(name, _)| name != "key")
            .collect()
    }

    /// Handle one relay request
    pub async fn relay(&self, path: &str, query: Option<&str>, body: Bytes) -> Response {
        let Some(api_key) = self.state.config.upstream.api_key.clone() else {
            tracing::error!("relay request rejected: GOOGLE_API_KEY not configured");
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "GOOGLE_API_KEY not configured on backend.",
            );
        };

        let mut params = Self::inbound_params(query);
        let is_streaming = Self::is_streaming_request(path, &params);
        params.push(("key".to_string(), api_key.expose().to_string()));

        // the sub-path already carries "v1beta/models/...", only the base is ours
        let target_url = format!("{}/{}", self.state.config.upstream.base_url(), path);

        tracing::debug!(path = %path, streaming = is_streaming, "relaying request upstream");

        let upstream_request = self
            .state
            .http_client
            .post(&target_url)
            .query(&params)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body);

        let upstream_response = match upstream_request.send().await {
            Ok(resp) => resp,
            Err(e) => {
                // render without the URL so the injected key stays out of
                // the message
                let e = e.without_url();
                let status = if e.is_timeout() {
                    StatusCode::GATEWAY_TIMEOUT
                } else {
                    StatusCode::BAD_GATEWAY
                };
                tracing::error!(error = %e, "upstream request failed");
                return error_response(status, &format!("Upstream request failed: {}", e));
            }
        };

        if is_streaming {
            relay_streaming_response(upstream_response)
        } else {
            relay_buffered_response(upstream_response).await
        }
    }
}

/// Buffer the upstream body and return it as JSON, status preserved
async fn relay_buffered_response(upstream_response: reqwest::Response) -> Response {
    let status = upstream_response.status();

    let body = match upstream_response.bytes().await {
        Ok(bytes) => bytes,
        Err(e) => {
            let e = e.without_url();
            tracing::error!(error = %e, "failed to read upstream response");
            return error_response(
                StatusCode::BAD_GATEWAY,
                &format!("Failed to read upstream response: {}", e),
            );
        }
    };

    match serde_json::from_slice::<serde_json::Value>(&body) {
        Ok(value) => (status, Json(value)).into_response(),
        Err(_) => {
            tracing::error!(
                status = %status,
                body_size = body.len(),
                "upstream returned non-JSON payload"
            );
            error_response(StatusCode::BAD_GATEWAY, "Upstream returned a non-JSON response")
        }
    }
}

/// FastAPI-style error body; the frontend reads the `detail` field
fn error_response(status: StatusCode, detail: &str) -> Response {
    (status, Json(json!({ "detail": detail }))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn test_streaming_detected_from_path() {
        assert!(GeminiRelay::is_streaming_request(
            "v1beta/models/gemini-3-pro-preview:streamGenerateContent",
            &[]
        ));
        assert!(!GeminiRelay::is_streaming_request(
            "v1beta/models/gemini-3-pro-preview:generateContent",
            &[]
        ));
    }

    #[test]
    fn test_streaming_detected_from_query() {
        assert!(GeminiRelay::is_streaming_request(
            "v1beta/models/x:generateContent",
            &params(&[("alt", "sse")])
        ));
        assert!(!GeminiRelay::is_streaming_request(
            "v1beta/models/x:generateContent",
            &params(&[("alt", "json")])
        ));
    }

    #[test]
    fn test_inbound_params_preserved() {
        let decoded = GeminiRelay::inbound_params(Some("alt=sse&foo=a%20b"));
        assert_eq!(
            decoded,
            params(&[("alt", "sse"), ("foo", "a b")])
        );
    }

    #[test]
    fn test_inbound_params_drop_caller_key() {
        let decoded = GeminiRelay::inbound_params(Some("key=attacker&alt=sse"));
        assert_eq!(decoded, params(&[("alt", "sse")]));
    }

    #[test]
    fn test_inbound_params_empty_query() {
        assert!(GeminiRelay::inbound_params(None).is_empty());
        assert!(GeminiRelay::inbound_params(Some("")).is_empty());
    }
}
