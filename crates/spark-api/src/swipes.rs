use axum::{Extension, Json, extract::{State, rejection::JsonRejection}, response::IntoResponse};

use spark_types::api::{Claims, SwipeRequest, SwipeResponse};

use crate::{ApiError, AppState, run_blocking};

/// POST /auth/swipes: like or pass on another user.
pub async fn swipe(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    payload: Result<Json<SwipeRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;

    let core = state.core.clone();
    run_blocking(move || core.record_swipe(claims.sub, req.swiped_user_id, req.swipe_type)).await?;

    Ok(Json(SwipeResponse { success: true }))
}
