//! HTTP Router Module
//!
//! Turns `GET <prefix>/student_no=<no>` (or `?student_no=<no>`) into a call on
//! the store bound to `<prefix>` and renders the result as JSON.
//!
//! ## Request flow
//! 1. **Resolve**: The path is matched against the bound prefixes in `AppContext`.
//! 2. **Validate**: Only `GET` is accepted; the student number must be non-blank.
//! 3. **Dispatch**: The bound store's `get_by_id` is awaited.
//! 4. **Respond**: 200 record, 404 not found, 500 on store failure.
//!
//! Lookup routes are served from the fallback so one handler sees every prefix;
//! `/health` and the grid member protocol are ordinary routes.

pub mod extract;
pub mod handlers;

use axum::{Router, routing::any};

use crate::context::AppContext;
use crate::grid::member_router;
use handlers::{handle_health, handle_lookup};

pub const CACHE_PREFIX: &str = "/nosql-lab-rd";
pub const GRID_PREFIX: &str = "/nosql-lab-hz";
pub const DOCUMENT_PREFIX: &str = "/nosql-lab-mon";
pub const HEALTH_PATH: &str = "/health";

pub fn create_app(ctx: AppContext) -> Router {
    let member = ctx.grid_member().cloned();

    let app = Router::new()
        .route(HEALTH_PATH, any(handle_health))
        .fallback(handle_lookup)
        .with_state(ctx);

    match member {
        Some(map) => app.merge(member_router(map)),
        None => app,
    }
}
