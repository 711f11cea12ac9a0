//! Reply format selection for handlers.
//!
//! The `/mapcode/xml/...` and `/mapcode/json/...` route trees carry a
//! [`ForcedFormat`] request extension inserted by a `map_request` layer; the
//! [`Format`] extractor prefers it and falls back to `Accept` negotiation.

use axum::extract::{FromRequestParts, Request};
use axum::http::request::Parts;

use mapcode_service_shared::ReplyFormat;

/// Request extension marking a forced-format route tree.
#[derive(Debug, Clone, Copy)]
pub struct ForcedFormat(pub ReplyFormat);

/// The reply format a handler should use.
#[derive(Debug, Clone, Copy)]
pub struct Format(pub ReplyFormat);

impl<S: Send + Sync> FromRequestParts<S> for Format {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(ForcedFormat(format)) = parts.extensions.get::<ForcedFormat>() {
            return Ok(Format(*format));
        }
        Ok(Format(ReplyFormat::from_headers(&parts.headers)))
    }
}

/// `map_request` layer fn for the `/mapcode/xml/...` tree.
pub async fn force_xml(mut request: Request) -> Request {
    request
        .extensions_mut()
        .insert(ForcedFormat(ReplyFormat::Xml));
    request
}

/// `map_request` layer fn for the `/mapcode/json/...` tree.
pub async fn force_json(mut request: Request) -> Request {
    request
        .extensions_mut()
        .insert(ForcedFormat(ReplyFormat::Json));
    request
}
