use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{DecodingKey, Validation, decode};
use spark_core::CoreError;
use spark_types::api::Claims;

use crate::{ApiError, AppState, run_blocking};

/// Extract and validate JWT from Authorization header, then make sure the
/// user behind it still exists. Handlers read the `Claims` extension.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(ApiError::MissingToken)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(ApiError::InvalidToken)?;

    let claims = decode_token(&state.jwt_secret, token)?;

    let core = state.core.clone();
    let user_id = claims.sub.to_string();
    let user = run_blocking(move || core.db().get_user_by_id(&user_id)).await?;
    if user.is_none() {
        return Err(CoreError::NotFound("User").into());
    }

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

pub fn decode_token(secret: &str, token: &str) -> Result<Claims, ApiError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| ApiError::InvalidToken)?;

    Ok(token_data.claims)
}
