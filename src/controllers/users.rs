use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

use crate::{
    controllers::extract::{ApiJson, ApiPath},
    error::ServiceError,
    models::user::{Credentials, LoginResponse, NewUser, ROLE_ADMIN, ROLE_USER},
    AppState,
};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/signup/{role}", post(signup))
        .route("/login", post(login))
}

// POST /api/signup/{role}
async fn signup(
    State(state): State<Arc<AppState>>,
    ApiPath(role): ApiPath<String>,
    ApiJson(req): ApiJson<NewUser>,
) -> Result<impl IntoResponse, ServiceError> {
    match role.as_str() {
        ROLE_USER => {}
        ROLE_ADMIN if state.config.features.allow_admin_signup => {}
        ROLE_ADMIN => return Err(ServiceError::Forbidden),
        _ => return Err(ServiceError::InvalidRequest(format!("unknown role: {}", role))),
    }
    req.validate()?;

    let user_id = state.accounts.register(&req, &role).await?;
    Ok((StatusCode::CREATED, Json(json!({ "user_id": user_id }))))
}

// POST /api/login
async fn login(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<Credentials>,
) -> Result<impl IntoResponse, ServiceError> {
    req.validate()?;
    let token = state.accounts.login(&req).await?;
    Ok((
        StatusCode::OK,
        Json(LoginResponse {
            token,
            message: "Successfully logged in".to_string(),
        }),
    ))
}
