pub mod error;
pub mod routes;

use axum::Router;

use crate::AppState;

pub use error::ApiError;

pub fn router() -> Router<AppState> {
    routes::build_router()
}
