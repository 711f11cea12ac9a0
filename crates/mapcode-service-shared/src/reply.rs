//! Reply encoding: JSON by default, XML on request.
//!
//! Every non-metrics endpoint honors the `Accept` header and also exists in
//! `/xml/...` and `/json/...` forced-format variants, so handlers produce a
//! [`Reply`] carrying the negotiated [`ReplyFormat`] instead of returning
//! `Json` directly.

use axum::{
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::ProblemDetails;

/// Wire format of a successful reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReplyFormat {
    #[default]
    Json,
    Xml,
}

impl ReplyFormat {
    /// Negotiate the format from the `Accept` header. Anything that does not
    /// ask for XML gets JSON.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let accept = headers
            .get(header::ACCEPT)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        if accept.contains("application/xml") || accept.contains("text/xml") {
            ReplyFormat::Xml
        } else {
            ReplyFormat::Json
        }
    }

    /// MIME type for this format.
    pub fn content_type(&self) -> &'static str {
        match self {
            ReplyFormat::Json => "application/json",
            ReplyFormat::Xml => "application/xml",
        }
    }
}

/// A successful reply in the negotiated format.
///
/// The XML root element name comes from the payload's serde container rename,
/// so each DTO declares its own root (`mapcode`, `territories`, ...).
#[derive(Debug, Clone)]
pub struct Reply<T> {
    format: ReplyFormat,
    payload: T,
}

impl<T: Serialize> Reply<T> {
    /// Wrap a payload for the given format.
    pub fn new(format: ReplyFormat, payload: T) -> Self {
        Self { format, payload }
    }
}

impl<T: Serialize> IntoResponse for Reply<T> {
    fn into_response(self) -> Response {
        match self.format {
            ReplyFormat::Json => Json(self.payload).into_response(),
            ReplyFormat::Xml => match quick_xml::se::to_string(&self.payload) {
                Ok(body) => (
                    StatusCode::OK,
                    [(
                        header::CONTENT_TYPE,
                        HeaderValue::from_static("application/xml"),
                    )],
                    body,
                )
                    .into_response(),
                Err(err) => {
                    tracing::error!(error = %err, "xml serialization failed");
                    ProblemDetails::internal_error("Failed to serialize XML response", "")
                        .into_response()
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize)]
    #[serde(rename = "version", rename_all = "camelCase")]
    struct VersionPayload {
        version: String,
    }

    fn headers_with_accept(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn default_format_is_json() {
        assert_eq!(ReplyFormat::from_headers(&HeaderMap::new()), ReplyFormat::Json);
        assert_eq!(
            ReplyFormat::from_headers(&headers_with_accept("application/json")),
            ReplyFormat::Json
        );
        assert_eq!(
            ReplyFormat::from_headers(&headers_with_accept("*/*")),
            ReplyFormat::Json
        );
    }

    #[test]
    fn accept_xml_selects_xml() {
        assert_eq!(
            ReplyFormat::from_headers(&headers_with_accept("application/xml")),
            ReplyFormat::Xml
        );
        assert_eq!(
            ReplyFormat::from_headers(&headers_with_accept("text/xml, application/json;q=0.5")),
            ReplyFormat::Xml
        );
    }

    #[test]
    fn xml_root_comes_from_container_rename() {
        let payload = VersionPayload {
            version: "2.4.11".to_string(),
        };
        let xml = quick_xml::se::to_string(&payload).unwrap();
        assert_eq!(xml, "<version><version>2.4.11</version></version>");
    }
}
