//! Route definitions for phone enrichment.
//!
//! Mounted at `/enrich` by `api_routes()`.
//!
//! ```text
//! POST   /                  -> enrich (synchronous)
//! POST   /background        -> enrich_background (202, supervised job)
//! ```

use axum::routing::post;
use axum::Router;

use crate::handlers::enrich;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(enrich::enrich))
        .route("/background", post(enrich::enrich_background))
}
