//! catalog.rs
//!
//! Маршруты справочников: города, мультиплексы, экраны, фильмы.
//! Изменения доступны только администратору, чтение - всем.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

use crate::{
    controllers::{
        extract::{ApiJson, ApiPath, ApiQuery},
        shows::parse_date,
    },
    error::ServiceError,
    middleware::AdminUser,
    models::catalog::{NewLocation, NewMovie, NewMultiplex, NewScreen},
    AppState,
};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/locations", post(add_location))
        .route("/multiplexes", get(multiplexes_by_city).post(add_multiplex))
        .route("/multiplexes/{id}/screens", post(add_screen))
        .route("/movies", get(upcoming_movies).post(add_movie))
        .route("/movies/{title}", get(movie_by_title))
}

// POST /api/locations
async fn add_location(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    ApiJson(req): ApiJson<NewLocation>,
) -> Result<impl IntoResponse, ServiceError> {
    req.validate()?;
    let location_id = state.catalog.add_location(&req).await?;
    Ok((StatusCode::CREATED, Json(json!({ "location_id": location_id }))))
}

// POST /api/multiplexes
async fn add_multiplex(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    ApiJson(req): ApiJson<NewMultiplex>,
) -> Result<impl IntoResponse, ServiceError> {
    req.validate()?;
    let multiplex_id = state.catalog.add_multiplex(&req).await?;
    state.cache.invalidate_multiplexes(&req.city).await;
    Ok((StatusCode::CREATED, Json(json!({ "multiplex_id": multiplex_id }))))
}

// GET /api/multiplexes?city=
#[derive(Debug, Deserialize)]
struct CityQuery {
    city: String,
}

async fn multiplexes_by_city(
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<CityQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let city = params.city.trim();
    if city.is_empty() {
        return Err(ServiceError::InvalidRequest("city обязателен".to_string()));
    }
    let multiplexes = state.cache.multiplexes_in_city(city).await?;
    Ok((StatusCode::OK, Json(multiplexes)))
}

// POST /api/multiplexes/{id}/screens
async fn add_screen(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    ApiPath(multiplex_id): ApiPath<i64>,
    ApiJson(req): ApiJson<NewScreen>,
) -> Result<impl IntoResponse, ServiceError> {
    if multiplex_id <= 0 {
        return Err(ServiceError::InvalidMultiplex);
    }
    req.validate()?;
    let screen_id = state.catalog.add_screen(multiplex_id, &req).await?;
    Ok((StatusCode::CREATED, Json(json!({ "screen_id": screen_id }))))
}

// POST /api/movies
async fn add_movie(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    ApiJson(req): ApiJson<NewMovie>,
) -> Result<impl IntoResponse, ServiceError> {
    req.validate()?;
    let movie_id = state.catalog.add_movie(&req).await?;
    state.cache.invalidate_movies().await;
    Ok((StatusCode::CREATED, Json(json!({ "movie_id": movie_id }))))
}

// GET /api/movies?date=YYYY-MM-DD (по умолчанию - сегодня)
#[derive(Debug, Deserialize)]
struct UpcomingQuery {
    date: Option<String>,
}

async fn upcoming_movies(
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<UpcomingQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let from = match params.date.as_deref() {
        Some(date) => parse_date(date)?,
        None => chrono::Utc::now().date_naive(),
    };
    let movies = state.cache.upcoming_movies(from).await?;
    Ok((StatusCode::OK, Json(movies)))
}

// GET /api/movies/{title}
async fn movie_by_title(
    State(state): State<Arc<AppState>>,
    ApiPath(title): ApiPath<String>,
) -> Result<impl IntoResponse, ServiceError> {
    let movie = state.catalog.movie_by_title(title.trim()).await?;
    Ok((StatusCode::OK, Json(movie)))
}
