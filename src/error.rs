use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Error taxonomy for the REST surface. Every handler failure maps onto one
/// of these variants; internal causes are logged server-side and never
/// leaked in the response body.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthenticated(&'static str),

    #[error("Forbidden")]
    Forbidden,

    #[error("{0}")]
    NotFound(&'static str),

    #[error("{0}")]
    Conflict(&'static str),

    /// A required secret is absent. Surfaces lazily at call time, not at
    /// startup.
    #[error("{0}")]
    Configuration(&'static str),

    #[error("{0}")]
    UpstreamAuth(&'static str),

    #[error("Nutrition provider request failed with status {0}")]
    Upstream(u16),

    #[error("Nutrition provider is unreachable")]
    UpstreamTransport(#[from] reqwest::Error),

    #[error("Internal Server Error")]
    Internal(anyhow::Error),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Configuration(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::UpstreamAuth(_) | Self::Upstream(_) | Self::UpstreamTransport(_) => {
                StatusCode::BAD_GATEWAY
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = ?self, %status, "request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_the_taxonomy() {
        assert_eq!(
            ApiError::Validation("bad".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Unauthenticated("no token").status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            ApiError::NotFound("Meal not found").status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Conflict("User already exists").status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::Configuration("missing key").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::UpstreamAuth("rejected").status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(ApiError::Upstream(500).status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn internal_error_hides_the_cause() {
        let err = ApiError::from(anyhow::anyhow!("secret database detail"));
        assert_eq!(err.to_string(), "Internal Server Error");
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
