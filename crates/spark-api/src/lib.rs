pub mod auth;
pub mod error;
pub mod matches;
pub mod middleware;
pub mod packages;
pub mod subscriptions;
pub mod swipes;

use std::sync::Arc;

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{get, post},
};
use spark_core::Core;
use tracing::error;

pub use error::ApiError;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub core: Arc<Core>,
    pub jwt_secret: String,
}

/// All routes, with state applied. Transport layers (CORS, tracing) are
/// added by the server.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/", get(index))
        .route("/users", post(auth::register))
        .route("/login", post(auth::login))
        .route("/packages", get(packages::list_packages))
        .with_state(state.clone());

    let protected_routes = Router::new()
        .route("/auth/swipes", post(swipes::swipe))
        .route(
            "/auth/subscriptions",
            post(subscriptions::subscribe).get(subscriptions::get_subscription),
        )
        .route("/auth/matches", get(matches::get_matches))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::require_auth,
        ))
        .with_state(state);

    Router::new().merge(public_routes).merge(protected_routes)
}

async fn index() -> &'static str {
    "Hello Spark!"
}

/// Run blocking DB work off the async runtime.
pub(crate) async fn run_blocking<F, T, E>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: Into<ApiError> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::from(anyhow::anyhow!("blocking task failed"))
        })?
        .map_err(Into::into)
}
