use crate::state::AppState;
use axum::Router;

pub mod client;
pub mod handlers;
pub mod scale;
pub mod types;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::nutrition_routes())
}
