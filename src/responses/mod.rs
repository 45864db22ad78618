use crate::state::AppState;
use axum::Router;

pub mod columns;
mod dto;
pub mod handlers;
pub mod repo;
pub mod service;

pub fn router() -> Router<AppState> {
    handlers::router()
}
