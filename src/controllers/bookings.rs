use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    controllers::extract::ApiJson,
    error::ServiceError,
    middleware::AuthUser,
    AppState,
};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/bookings", get(get_user_bookings).post(create_booking))
        .route("/bookings/cancel", patch(cancel_booking))
}

/* ---------- BOOKINGS ---------- */

// POST /api/bookings
#[derive(Debug, Deserialize)]
struct CreateBookingRequest {
    seats: Vec<i64>,
}

async fn create_booking(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ApiJson(req): ApiJson<CreateBookingRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    // email покупателя берём только из токена
    let invoice = state.bookings.book(&req.seats, &user.email).await?;
    Ok((StatusCode::CREATED, Json(invoice)))
}

// GET /api/bookings
async fn get_user_bookings(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<impl IntoResponse, ServiceError> {
    let bookings = state.bookings.bookings_for(&user.email).await?;
    Ok((StatusCode::OK, Json(bookings)))
}

// PATCH /api/bookings/cancel
#[derive(Debug, Deserialize)]
struct CancelBookingRequest {
    booking_id: i64,
}

async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    ApiJson(req): ApiJson<CancelBookingRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    if req.booking_id <= 0 {
        return Err(ServiceError::InvalidRequest("booking_id должен быть > 0".to_string()));
    }

    // проверка владельца; admin может отменить любую бронь
    if !user.is_admin() {
        let owner = state
            .bookings
            .booking_owner(req.booking_id)
            .await?
            .ok_or(ServiceError::BookingNotFound)?;
        if owner != user.email {
            return Err(ServiceError::Forbidden);
        }
    }

    state.bookings.cancel(req.booking_id).await?;

    Ok((StatusCode::OK, Json(serde_json::json!({"message": "Бронь успешно отменена"}))))
}
