use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};

use spark_types::api::{Claims, SubscribeRequest};

use crate::{ApiError, AppState, run_blocking};

/// POST /auth/subscriptions: buy a premium package for one month.
pub async fn subscribe(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    payload: Result<Json<SubscribeRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;

    let core = state.core.clone();
    let subscription =
        run_blocking(move || core.purchase(claims.sub, req.premium_package_id)).await?;

    Ok((StatusCode::CREATED, Json(subscription)))
}

/// GET /auth/subscriptions: the caller's active subscription and package.
pub async fn get_subscription(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let core = state.core.clone();
    let subscription = run_blocking(move || core.active_subscription(claims.sub)).await?;

    Ok(Json(subscription))
}
