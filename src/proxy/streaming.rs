//! Chunk-by-chunk relay of streaming upstream responses

use axum::{
    body::Body,
    http::header,
    response::{IntoResponse, Response},
};
use futures::StreamExt;

/// Relay a streaming upstream body to the caller as it arrives.
///
/// Each chunk is forwarded the moment it is read; the body is never
/// accumulated. When the caller disconnects, axum drops the body and the
/// upstream stream with it, which releases the upstream connection.
pub fn relay_streaming_response(upstream_response: reqwest::Response) -> Response {
    let status = upstream_response.status();

    let stream = upstream_response.bytes_stream().map(|chunk| {
        chunk.map_err(|e| {
            let e = e.without_url();
            tracing::error!(error = %e, "error reading upstream stream chunk");
            std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
        })
    });

    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from_stream(stream))
        .unwrap()
        .into_response()
}
