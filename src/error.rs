use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Application error taxonomy.
///
/// Every fallible service call returns one of these; the [`IntoResponse`]
/// impl below is the single place where errors are translated into HTTP
/// status codes and a `{"detail": ...}` JSON body.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Unknown username or failed password verification.
    #[error("Incorrect username or password")]
    InvalidCredentials,

    /// Missing, malformed, tampered or expired session token. All token
    /// failure modes collapse into this one variant.
    #[error("Could not validate credentials")]
    Unauthenticated,

    /// Caller is authenticated but lacks the required role.
    #[error("Admin privileges required")]
    Forbidden,

    #[error("{0} not found")]
    NotFound(&'static str),

    /// Export requested against an empty store.
    #[error("No data to export")]
    NoData,

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    InvalidFormat(String),

    /// An admin may never delete their own account.
    #[error("Users cannot delete their own account")]
    SelfDeletion,

    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self {
            ApiError::InvalidCredentials | ApiError::Unauthenticated => {
                (StatusCode::UNAUTHORIZED, self.to_string())
            }
            ApiError::Forbidden => (StatusCode::FORBIDDEN, self.to_string()),
            ApiError::NotFound(_) | ApiError::NoData => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::Conflict(_)
            | ApiError::InvalidFormat(_)
            | ApiError::SelfDeletion
            | ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::Database(err) => classify_sqlx_error(err),
            ApiError::Internal(err) => {
                tracing::error!(error = %err, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = axum::Json(json!({ "detail": detail }));
        if status == StatusCode::UNAUTHORIZED {
            return (status, [(header::WWW_AUTHENTICATE, "Bearer")], body).into_response();
        }
        (status, body).into_response()
    }
}

fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, String) {
    match err {
        sqlx::Error::RowNotFound => (StatusCode::NOT_FOUND, "Resource not found".to_string()),
        // 23505: unique violation, the database-level backstop behind the
        // username uniqueness check.
        sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => (
            StatusCode::BAD_REQUEST,
            "Duplicate value violates a unique constraint".to_string(),
        ),
        other => {
            tracing::error!(error = %other, "database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An internal error occurred".to_string(),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taxonomy_maps_to_expected_status_codes() {
        assert_eq!(
            ApiError::InvalidCredentials.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Forbidden.into_response().status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::NotFound("User").into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(ApiError::NoData.into_response().status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::Conflict("taken".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::SelfDeletion.into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::InvalidFormat("File must be a CSV".into())
                .into_response()
                .status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn unauthenticated_carries_bearer_challenge() {
        let response = ApiError::Unauthenticated.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );
    }
}
