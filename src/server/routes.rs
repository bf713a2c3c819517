use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use tracing::{info, instrument};

use super::{error::AppError, state::AppState};
use crate::models::{
    LoginRequest, LoginResponse, QuoteSeries, RegisterRequest, RegisterResponse,
};

/// `POST /api/login`
#[instrument(skip_all)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AppError> {
    let Json(request) = payload.map_err(|e| AppError::MalformedPayload(e.body_text()))?;

    let user = state
        .users
        .authenticate(&request.username, &request.password)
        .await
        .map_err(AppError::Login)?;

    Ok(Json(LoginResponse {
        user_id: user.id,
        username: user.username,
        firstname: user.first_name,
        lastname: user.last_name,
        stocks: user.holdings,
    }))
}

/// `POST /api/register`
#[instrument(skip_all)]
pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<RegisterResponse>, AppError> {
    let Json(request) = payload.map_err(|e| AppError::MalformedPayload(e.body_text()))?;

    let id = state
        .users
        .register(
            &request.username,
            &request.password,
            &request.firstname,
            &request.lastname,
        )
        .await
        .map_err(AppError::Register)?;

    Ok(Json(RegisterResponse { id }))
}

/// `GET /api/monthly/:symbol`
#[instrument(skip(state))]
pub async fn monthly_handler(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
) -> Result<Json<QuoteSeries>, AppError> {
    let series = state.quotes.fetch_monthly(&symbol).await?;

    info!(months = series.len(), "Serving monthly series");
    Ok(Json(series))
}
