//! Request extractors.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::StatusCode;
use kassa_shared::types::UserId;
use std::str::FromStr;

use crate::response::ApiError;

/// Header carrying the acting user's id, set by the auth gateway in front of
/// this service.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The acting user, taken from the `x-user-id` header.
#[derive(Debug, Clone, Copy)]
pub struct ActorId(pub UserId);

impl<S> FromRequestParts<S> for ActorId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                ApiError::new(
                    StatusCode::UNAUTHORIZED,
                    "MISSING_USER_ID",
                    "Missing x-user-id header",
                )
            })?;

        let user_id = UserId::from_str(value).map_err(|_| {
            ApiError::new(
                StatusCode::UNAUTHORIZED,
                "INVALID_USER_ID",
                "x-user-id header is not a valid UUID",
            )
        })?;

        Ok(Self(user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::USER_ID_HEADER;
    use crate::{create_router, AppState};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use sea_orm::DatabaseConnection;
    use std::sync::Arc;
    use uuid::Uuid;

    fn test_router() -> axum::Router {
        create_router(AppState {
            db: Arc::new(DatabaseConnection::default()),
        })
    }

    fn entries_uri() -> String {
        format!("/api/v1/tenants/{}/journal-entries", Uuid::new_v4())
    }

    async fn error_code(response: axum::response::Response) -> String {
        let body = response.into_body().collect().await.expect("body").to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).expect("json body");
        json["error"].as_str().expect("error code").to_string()
    }

    #[tokio::test]
    async fn test_missing_user_id_header_is_unauthorized() {
        use tower::ServiceExt;

        let response = test_router()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(entries_uri())
                    .header("content-type", "application/json")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(error_code(response).await, "MISSING_USER_ID");
    }

    #[tokio::test]
    async fn test_malformed_user_id_header_is_unauthorized() {
        use tower::ServiceExt;

        let response = test_router()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(entries_uri())
                    .header(USER_ID_HEADER, "not-a-uuid")
                    .header("content-type", "application/json")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(error_code(response).await, "INVALID_USER_ID");
    }
}
