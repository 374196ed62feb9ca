//! Экстракторы axum с ошибками в формате сервиса.
//!
//! Стандартные `Json`, `Query` и `Path` отвечают на кривой запрос обычным
//! текстом. Эти обёртки превращают отказ в `ServiceError::InvalidRequest`,
//! поэтому клиент всегда получает `{"error": "invalid_request", ...}`.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::ServiceError;

#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ServiceError))]
pub struct ApiJson<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ServiceError))]
pub struct ApiQuery<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ServiceError))]
pub struct ApiPath<T>(pub T);
