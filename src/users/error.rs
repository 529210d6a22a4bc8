use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::users::query::QueryError;

#[derive(Debug, Error)]
pub enum UserError {
    /// The statement could not be built. Always a bug, never retried.
    #[error(transparent)]
    Construction(#[from] QueryError),

    #[error("user {0} not found")]
    NotFound(i64),

    /// The store rejected the statement or could not be reached.
    #[error("database error: {0}")]
    Persistence(#[from] sqlx::Error),

    /// The round trip did not finish before the configured deadline.
    #[error("database round trip exceeded {0:?}")]
    Timeout(Duration),
}

impl UserError {
    pub fn is_persistence(&self) -> bool {
        matches!(self, Self::Persistence(_) | Self::Timeout(_))
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            Self::Construction(_) | Self::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        let status = self.status();
        // store details are already logged by the service
        let message = match &self {
            Self::NotFound(_) | Self::Timeout(_) => self.to_string(),
            Self::Construction(_) | Self::Persistence(_) => "internal error".to_string(),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
