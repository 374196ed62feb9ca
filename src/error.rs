//! error.rs
//!
//! Единая таксономия ошибок сервиса.
//!
//! Каждая ошибка относится к одному из трёх классов:
//! - **Precondition**: неверные ссылки и данные запроса, обнаруживаются до любой записи;
//! - **Contention**: ожидаемый исход гонки (место уже продано, экран занят);
//! - **Fault**: внутренний сбой (таймаут, ошибка БД). Детали наружу не отдаются.

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Precondition,
    Contention,
    Fault,
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("invalid multiplex id")]
    InvalidMultiplex,

    #[error("invalid screen number")]
    InvalidScreen,

    #[error("movie doesn't exist")]
    MovieNotFound,

    #[error("booking not found")]
    BookingNotFound,

    #[error("unauthorized")]
    Unauthorized,

    #[error("forbidden")]
    Forbidden,

    #[error("user exists for the given email")]
    UserExists,

    #[error("overlapping show times")]
    ScheduleConflict,

    #[error("seats not available")]
    SeatsUnavailable,

    #[error("cannot generate invoice")]
    InvoiceUnavailable,

    #[error("cannot cancel booking")]
    CancellationFailed,

    #[error("database round trip timed out")]
    Timeout,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("password hash error: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::InvalidRequest(_)
            | ServiceError::InvalidMultiplex
            | ServiceError::InvalidScreen
            | ServiceError::MovieNotFound
            | ServiceError::BookingNotFound
            | ServiceError::Unauthorized
            | ServiceError::Forbidden => ErrorKind::Precondition,
            ServiceError::UserExists
            | ServiceError::ScheduleConflict
            | ServiceError::SeatsUnavailable => ErrorKind::Contention,
            ServiceError::InvoiceUnavailable
            | ServiceError::CancellationFailed
            | ServiceError::Timeout
            | ServiceError::Database(_)
            | ServiceError::Token(_)
            | ServiceError::PasswordHash(_) => ErrorKind::Fault,
        }
    }

    /// Стабильный идентификатор ошибки для клиента.
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::InvalidRequest(_) => "invalid_request",
            ServiceError::InvalidMultiplex => "invalid_multiplex",
            ServiceError::InvalidScreen => "invalid_screen",
            ServiceError::MovieNotFound => "movie_not_found",
            ServiceError::BookingNotFound => "booking_not_found",
            ServiceError::Unauthorized => "unauthorized",
            ServiceError::Forbidden => "forbidden",
            ServiceError::UserExists => "user_exists",
            ServiceError::ScheduleConflict => "schedule_conflict",
            ServiceError::SeatsUnavailable => "seats_unavailable",
            _ => "internal_error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ServiceError::InvalidRequest(_)
            | ServiceError::InvalidMultiplex
            | ServiceError::InvalidScreen => StatusCode::BAD_REQUEST,
            ServiceError::MovieNotFound | ServiceError::BookingNotFound => StatusCode::NOT_FOUND,
            ServiceError::Unauthorized => StatusCode::UNAUTHORIZED,
            ServiceError::Forbidden => StatusCode::FORBIDDEN,
            ServiceError::UserExists
            | ServiceError::ScheduleConflict
            | ServiceError::SeatsUnavailable => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn is_fault(&self) -> bool {
        self.kind() == ErrorKind::Fault
    }

    pub fn is_unique_violation(&self) -> bool {
        matches!(self, ServiceError::Database(sqlx::Error::Database(db)) if db.is_unique_violation())
    }

    fn public_message(&self) -> String {
        match self {
            ServiceError::InvalidRequest(msg) => msg.clone(),
            ServiceError::InvalidMultiplex => "Мультиплекс не найден".to_string(),
            ServiceError::InvalidScreen => "Экран с таким номером не найден".to_string(),
            ServiceError::MovieNotFound => "Фильм не найден".to_string(),
            ServiceError::BookingNotFound => "Бронирование не найдено".to_string(),
            ServiceError::Unauthorized => "Требуется авторизация".to_string(),
            ServiceError::Forbidden => "Недостаточно прав".to_string(),
            ServiceError::UserExists => "Пользователь с таким email уже существует".to_string(),
            ServiceError::ScheduleConflict => "Сеанс пересекается с другим сеансом на этом экране".to_string(),
            ServiceError::SeatsUnavailable => "Места недоступны".to_string(),
            _ => "Внутренняя ошибка сервера".to_string(),
        }
    }
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ServiceError::InvalidRequest(errors.to_string())
    }
}

// Отказы экстракторов axum - это ошибки запроса клиента
impl From<JsonRejection> for ServiceError {
    fn from(rejection: JsonRejection) -> Self {
        ServiceError::InvalidRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ServiceError {
    fn from(rejection: QueryRejection) -> Self {
        ServiceError::InvalidRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ServiceError {
    fn from(rejection: PathRejection) -> Self {
        ServiceError::InvalidRequest(rejection.body_text())
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        if self.is_fault() {
            tracing::error!("internal error: {:?}", self);
        }
        let body = json!({
            "error": self.code(),
            "message": self.public_message(),
        });
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contention_errors_map_to_conflict() {
        for err in [ServiceError::SeatsUnavailable, ServiceError::ScheduleConflict] {
            assert_eq!(err.kind(), ErrorKind::Contention);
            assert_eq!(err.status(), StatusCode::CONFLICT);
        }
        assert_eq!(ServiceError::SeatsUnavailable.code(), "seats_unavailable");
        assert_eq!(ServiceError::ScheduleConflict.code(), "schedule_conflict");
    }

    #[test]
    fn preconditions_have_specific_codes() {
        assert_eq!(ServiceError::InvalidMultiplex.code(), "invalid_multiplex");
        assert_eq!(ServiceError::InvalidScreen.code(), "invalid_screen");
        assert_eq!(ServiceError::MovieNotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ServiceError::InvalidRequest("x".into()).kind(),
            ErrorKind::Precondition
        );
    }

    #[test]
    fn faults_are_opaque() {
        let faults = [
            ServiceError::Timeout,
            ServiceError::InvoiceUnavailable,
            ServiceError::CancellationFailed,
            ServiceError::Database(sqlx::Error::RowNotFound),
        ];
        for err in faults {
            assert!(err.is_fault());
            assert_eq!(err.code(), "internal_error");
            assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(err.public_message(), "Внутренняя ошибка сервера");
        }
    }

    #[test]
    fn response_carries_status_code() {
        let response = ServiceError::SeatsUnavailable.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
