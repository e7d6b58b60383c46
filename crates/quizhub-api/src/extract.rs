//! Request extractors that report failures as `ApiError`.

use axum::extract::FromRequest;

use crate::error::ApiError;

/// `axum::Json` whose rejections become 400 `{error, code}` bodies instead of
/// axum's plain-text 4xx responses.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct AppJson<T>(pub T);
