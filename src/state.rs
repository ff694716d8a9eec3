//! Shared application state passed to all handlers via axum's `State` extractor.

use crate::{db::DbPool, services::jwt::JwtService};

/// Everything a request handler needs beyond the request itself:
/// the database pool and the session token signer.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub jwt: JwtService,
}
