use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::{
    state::AppState,
    users::{
        dto::{CreateUserRequest, CreateUserResponse, GetUserResponse, UpdateUserRequest},
        error::UserError,
        query::{InsertUser, UpdateUser},
    },
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(create_user))
        .route(
            "/users/:id",
            get(get_user).patch(update_user).delete(delete_user),
        )
}

#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<CreateUserResponse>), UserError> {
    let id = state
        .users
        .create(InsertUser {
            name: &payload.name,
            email: &payload.email,
            password: &payload.password,
            role: payload.role,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(CreateUserResponse { id })))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<GetUserResponse>, UserError> {
    let user = state.users.get(id).await?;
    Ok(Json(user.into()))
}

#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<StatusCode, UserError> {
    state
        .users
        .update(
            id,
            UpdateUser {
                name: payload.name.as_deref(),
                email: payload.email.as_deref(),
            },
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, UserError> {
    state.users.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Method, Request},
    };
    use tower::ServiceExt;

    use super::*;
    use crate::users::{
        repo_types::UserRole,
        services::testing::{row, Reply, ScriptedExecutor},
    };

    fn app(executor: &Arc<ScriptedExecutor>) -> Router {
        user_routes().with_state(AppState::with_executor(executor.clone()))
    }

    fn json_request(method: Method, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(res: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn create_returns_created_with_id() {
        let executor = ScriptedExecutor::new([Reply::Id(1)]);
        let res = app(&executor)
            .oneshot(json_request(
                Method::POST,
                "/users",
                serde_json::json!({
                    "name": "Ann",
                    "email": "a@x.com",
                    "password": "p",
                    "password_confirm": "p",
                    "role": "USER"
                }),
            ))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::CREATED);
        assert_eq!(body_json(res).await, serde_json::json!({ "id": 1 }));
    }

    #[tokio::test]
    async fn get_omits_password_and_absent_updated_at() {
        let executor = ScriptedExecutor::new([Reply::User(Some(row(1, false)))]);
        let res = app(&executor)
            .oneshot(Request::get("/users/1").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        let body = body_json(res).await;
        assert_eq!(body["name"], "Ann");
        assert_eq!(body["role"], "USER");
        assert_eq!(body["created_at"], "2024-01-01T10:00:00Z");
        assert!(body.get("updated_at").is_none());
        assert!(body.get("password").is_none());
    }

    #[tokio::test]
    async fn get_missing_user_is_404() {
        let executor = ScriptedExecutor::new([Reply::User(None)]);
        let res = app(&executor)
            .oneshot(Request::get("/users/7").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(res).await["error"], "user 7 not found");
    }

    #[tokio::test]
    async fn update_ignores_role_and_returns_no_content() {
        let executor = ScriptedExecutor::new([Reply::Affected(1)]);
        let res = app(&executor)
            .oneshot(json_request(
                Method::PATCH,
                "/users/1",
                serde_json::json!({ "email": "new@x.com", "role": "ADMIN" }),
            ))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::NO_CONTENT);
        let sql = executor.statements();
        assert!(sql[0].contains("user_email"));
        assert!(!sql[0].contains("user_role"));
        assert!(!sql[0].contains("user_name"));
    }

    #[tokio::test]
    async fn delete_store_failure_hides_details() {
        let executor = ScriptedExecutor::new([Reply::Fail]);
        let res = app(&executor)
            .oneshot(
                Request::builder()
                    .method(Method::DELETE)
                    .uri("/users/1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(res).await["error"], "internal error");
    }

    #[test]
    fn update_request_fields_are_optional() {
        let req: UpdateUserRequest = serde_json::from_str("{}").unwrap();
        assert!(req.name.is_none() && req.email.is_none());
        let req: UpdateUserRequest = serde_json::from_str(r#"{"role":"ADMIN"}"#).unwrap();
        assert_eq!(req.role, Some(UserRole::Admin));
    }
}
