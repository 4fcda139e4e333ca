use axum::extract::FromRequest;

use crate::error::AppError;

/// `axum::Json` with rejections rendered through `AppError`, so a body with
/// a wrongly typed field is a 400 in the usual error envelope.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);
