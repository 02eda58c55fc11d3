use axum::{Extension, Json, extract::State, response::IntoResponse};

use spark_types::api::{Claims, MatchesResponse};

use crate::{ApiError, AppState, run_blocking};

/// GET /auth/matches: everyone the caller liked who liked them back.
pub async fn get_matches(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let core = state.core.clone();
    let matches = run_blocking(move || core.find_matches(claims.sub)).await?;

    Ok(Json(MatchesResponse { matches }))
}
