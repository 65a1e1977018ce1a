//! Extractors whose rejections come back as `QuizError`, so malformed bodies,
//! query strings and paths get the same `{"error": ..}` JSON as other failures.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::QuizError;

#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(QuizError))]
pub struct ApiJson<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(QuizError))]
pub struct ApiQuery<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(QuizError))]
pub struct ApiPath<T>(pub T);
