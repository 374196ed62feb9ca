use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::{
    controllers::extract::{ApiJson, ApiPath, ApiQuery},
    error::ServiceError,
    middleware::AdminUser,
    models::{NewShow, SeatStatus, ShowWindow},
    AppState,
};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/multiplexes/{id}/shows", get(shows_by_multiplex).post(create_show))
        .route("/shows", get(shows_by_movie))
        .route("/shows/{id}/seats", get(list_seats))
}

/* ---------- helpers ---------- */

pub(crate) fn parse_date(value: &str) -> Result<NaiveDate, ServiceError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| ServiceError::InvalidRequest("invalid date format".to_string()))
}

// 18:00, 18:00:00 или 6:00PM
pub(crate) fn parse_time(value: &str) -> Result<NaiveTime, ServiceError> {
    let value = value.trim();
    ["%H:%M:%S", "%H:%M", "%I:%M%p", "%I:%M %p"]
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(value, fmt).ok())
        .ok_or_else(|| ServiceError::InvalidRequest(format!("invalid time format: {}", value)))
}

/* ---------- SHOWS ---------- */

// POST /api/multiplexes/{id}/shows
#[derive(Debug, Deserialize, Validate)]
struct CreateShowRequest {
    date: String,
    start_time: String,
    end_time: String,
    #[validate(range(min = 1))]
    screen: i32,
    #[validate(length(min = 1))]
    movie: String,
    #[validate(range(min = 0))]
    seat_price: Option<i32>,
}

impl CreateShowRequest {
    fn into_new_show(self, multiplex_id: i64) -> Result<NewShow, ServiceError> {
        let window = ShowWindow::new(parse_time(&self.start_time)?, parse_time(&self.end_time)?)?;
        Ok(NewShow {
            date: parse_date(&self.date)?,
            window,
            screen_number: self.screen,
            movie_title: self.movie.trim().to_string(),
            multiplex_id,
            seat_price: self.seat_price,
        })
    }
}

#[derive(Debug, Serialize)]
struct CreateShowResponse {
    show_id: i64,
}

async fn create_show(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    ApiPath(multiplex_id): ApiPath<i64>,
    ApiJson(req): ApiJson<CreateShowRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    if multiplex_id <= 0 {
        return Err(ServiceError::InvalidMultiplex);
    }
    req.validate()?;
    let show = req.into_new_show(multiplex_id)?;

    let show_id = state.bookings.add_show(&show).await?;
    Ok((StatusCode::CREATED, Json(CreateShowResponse { show_id })))
}

// GET /api/multiplexes/{id}/shows?date=YYYY-MM-DD
#[derive(Debug, Deserialize)]
struct DateQuery {
    date: String,
}

async fn shows_by_multiplex(
    State(state): State<Arc<AppState>>,
    ApiPath(multiplex_id): ApiPath<i64>,
    ApiQuery(params): ApiQuery<DateQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let date = parse_date(&params.date)?;
    let shows = state.catalog.shows_by_multiplex_and_date(multiplex_id, date).await?;
    Ok((StatusCode::OK, Json(shows)))
}

// GET /api/shows?title=&city=&date=
#[derive(Debug, Deserialize)]
struct MovieShowsQuery {
    title: String,
    city: String,
    date: String,
}

async fn shows_by_movie(
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<MovieShowsQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let date = parse_date(&params.date)?;
    let shows = state
        .catalog
        .shows_by_movie_and_date(params.title.trim(), params.city.trim(), date)
        .await?;
    Ok((StatusCode::OK, Json(shows)))
}

/* ---------- SEATS ---------- */

#[derive(Debug, Serialize)]
struct SeatResponse {
    seat_id: i64,
    seat_number: i32,
    price: i32,
    status: SeatStatus,
}

// GET /api/shows/{id}/seats
async fn list_seats(
    State(state): State<Arc<AppState>>,
    ApiPath(show_id): ApiPath<i64>,
) -> Result<impl IntoResponse, ServiceError> {
    if show_id <= 0 {
        return Err(ServiceError::InvalidRequest("show_id должен быть > 0".to_string()));
    }

    let seats = state.bookings.list_seats(show_id).await?;
    let payload: Vec<SeatResponse> = seats
        .into_iter()
        .map(|s| SeatResponse {
            seat_id: s.seat_id,
            seat_number: s.seat_number,
            price: s.price,
            status: s.status,
        })
        .collect();

    Ok((StatusCode::OK, Json(payload)))
}
