//! HTTP middleware: request correlation and HTTP metrics.
//!
//! The layer extracts the `X-Request-ID` header if present, otherwise
//! generates a UUID v7 (time-sortable), and injects it into a tracing span so
//! all log entries for the request correlate. On completion it records:
//! - `http_requests_total`: counter by method, path, status bucket
//! - `http_request_duration_seconds`: histogram by method, path

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;

use axum::http::{HeaderMap, Request, Response};
use pin_project_lite::pin_project;
use tower::{Layer, Service};
use tracing::{info_span, Span};
use uuid::Uuid;

/// Newtype wrapper for request correlation IDs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

impl RequestId {
    /// Create a new request ID from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a new UUID v7 request ID.
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Get the request ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for RequestId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for RequestId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Extract the request ID from headers or generate a new UUID v7.
///
/// Looks for the `X-Request-ID` header (case-insensitive). If not present or
/// empty, generates a new UUID v7.
pub fn extract_or_generate_request_id(headers: &HeaderMap) -> RequestId {
    headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
        .map(RequestId::from)
        .unwrap_or_else(RequestId::generate)
}

/// Normalize a request path for metric labels.
///
/// Strips the query string to keep the label cardinality bounded.
pub fn normalize_path(path: &str) -> &str {
    path.split('?').next().unwrap_or(path)
}

/// Convert HTTP status code to bucket label: "2xx", "3xx", "4xx", "5xx".
fn status_bucket(status: u16) -> &'static str {
    match status {
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        500..=599 => "5xx",
        _ => "other",
    }
}

/// Tower layer for request correlation and HTTP metrics.
#[derive(Debug, Clone)]
pub struct RequestTrackingLayer;

impl<S> Layer<S> for RequestTrackingLayer {
    type Service = RequestTracking<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestTracking { inner }
    }
}

/// Middleware service wrapping each request in a correlated span and
/// recording HTTP metrics on completion.
#[derive(Debug, Clone)]
pub struct RequestTracking<S> {
    inner: S,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for RequestTracking<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send,
    ReqBody: http_body::Body + Send + 'static,
    ResBody: http_body::Body + Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = TrackedFuture<S::Future>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        let start = Instant::now();

        let method = req.method().to_string();
        let path = normalize_path(req.uri().path()).to_string();
        let request_id = extract_or_generate_request_id(req.headers());

        let span = info_span!(
            "request",
            request_id = %request_id,
            method = %method,
            path = %path,
        );

        {
            let _enter = span.enter();
            tracing::info!("handling request");
        }

        let future = self.inner.call(req);

        TrackedFuture {
            inner: future,
            start,
            method,
            path,
            span,
        }
    }
}

pin_project! {
    /// Future wrapper that records metrics on completion.
    pub struct TrackedFuture<F> {
        #[pin]
        inner: F,
        start: Instant,
        method: String,
        path: String,
        span: Span,
    }
}

impl<F, ResBody, E> Future for TrackedFuture<F>
where
    F: Future<Output = Result<Response<ResBody>, E>>,
    ResBody: http_body::Body,
{
    type Output = F::Output;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let _enter = this.span.enter();

        match this.inner.poll(cx) {
            Poll::Pending => Poll::Pending,
            Poll::Ready(result) => {
                let duration = this.start.elapsed();
                let duration_secs = duration.as_secs_f64();
                let latency_ms = duration_secs * 1000.0;

                match &result {
                    Ok(response) => {
                        let status = response.status().as_u16();

                        metrics::counter!(
                            "http_requests_total",
                            "method" => this.method.clone(),
                            "path" => this.path.clone(),
                            "status" => status_bucket(status)
                        )
                        .increment(1);

                        metrics::histogram!(
                            "http_request_duration_seconds",
                            "method" => this.method.clone(),
                            "path" => this.path.clone()
                        )
                        .record(duration_secs);

                        tracing::info!(
                            status = status,
                            latency_ms = latency_ms,
                            "request completed"
                        );
                    }
                    Err(_) => {
                        metrics::counter!(
                            "http_requests_total",
                            "method" => this.method.clone(),
                            "path" => this.path.clone(),
                            "status" => "5xx"
                        )
                        .increment(1);

                        metrics::histogram!(
                            "http_request_duration_seconds",
                            "method" => this.method.clone(),
                            "path" => this.path.clone()
                        )
                        .record(duration_secs);

                        tracing::error!(latency_ms = latency_ms, "request failed");
                    }
                }

                Poll::Ready(result)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn request_id_generate_is_unique() {
        let id1 = RequestId::generate();
        let id2 = RequestId::generate();

        assert_ne!(id1, id2);
        assert_eq!(id1.as_str().len(), 36);
        assert!(id1.as_str().contains('-'));
    }

    #[test]
    fn extract_request_id_from_header() {
        let mut headers = HeaderMap::new();
        headers.insert("x-request-id", HeaderValue::from_static("test-123"));

        let id = extract_or_generate_request_id(&headers);
        assert_eq!(id.as_str(), "test-123");
    }

    #[test]
    fn extract_request_id_generates_when_missing() {
        let headers = HeaderMap::new();
        let id = extract_or_generate_request_id(&headers);
        assert_eq!(id.as_str().len(), 36);
    }

    #[test]
    fn extract_request_id_generates_when_empty() {
        let mut headers = HeaderMap::new();
        headers.insert("x-request-id", HeaderValue::from_static(""));

        let id = extract_or_generate_request_id(&headers);
        assert_eq!(id.as_str().len(), 36);
    }

    #[test]
    fn normalize_path_strips_query() {
        assert_eq!(normalize_path("/mapcode/codes"), "/mapcode/codes");
        assert_eq!(
            normalize_path("/mapcode/codes/52.3,4.9?precision=2"),
            "/mapcode/codes/52.3,4.9"
        );
        assert_eq!(normalize_path("/"), "/");
    }

    #[test]
    fn status_buckets() {
        assert_eq!(status_bucket(200), "2xx");
        assert_eq!(status_bucket(301), "3xx");
        assert_eq!(status_bucket(403), "4xx");
        assert_eq!(status_bucket(404), "4xx");
        assert_eq!(status_bucket(500), "5xx");
    }
}
