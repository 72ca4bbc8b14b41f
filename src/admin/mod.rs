use axum::Router;

use crate::state::AppState;

mod dto;
pub mod handlers;
pub mod upload;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
