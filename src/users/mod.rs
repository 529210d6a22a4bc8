pub mod dto;
pub mod error;
pub mod handlers;
pub mod query;
pub mod repo;
pub mod repo_types;
pub mod services;

use crate::state::AppState;
use axum::Router;

pub use error::UserError;
pub use services::UserService;

pub fn router() -> Router<AppState> {
    handlers::user_routes()
}
