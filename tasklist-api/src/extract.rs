/// Request extractors with API-shaped rejections
///
/// Axum's stock `Json` and `Query` reject malformed input with plain-text
/// 400/415/422 responses. These wrappers route the rejection through
/// [`ApiError`] so clients always get the JSON error body and a 400.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::ApiError;

/// JSON request body
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Query string parameters
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);
