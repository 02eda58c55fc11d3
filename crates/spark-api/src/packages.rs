use axum::{Json, extract::State, response::IntoResponse};

use spark_core::subscription::package_response;

use crate::{ApiError, AppState, run_blocking};

/// GET /packages: the premium catalog, cheapest first.
pub async fn list_packages(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let core = state.core.clone();
    let rows = run_blocking(move || core.db().list_packages()).await?;

    let packages = rows
        .into_iter()
        .map(package_response)
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(Json(packages))
}
