pub mod enrich;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// /enrich                 POST  synchronous batch enrichment
/// /enrich/background      POST  fire-and-forget batch enrichment
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/enrich", enrich::router())
}
