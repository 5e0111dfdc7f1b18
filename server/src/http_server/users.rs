use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use super::{ApiError, AppState};
use crate::users::{NewUser, User};

/// POST /users
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<NewUser>, JsonRejection>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let Json(new_user) =
        payload.map_err(|e| ApiError::bad_request("User validation failed!", e.body_text()))?;

    let user = state.users.create_user(new_user).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /users/:id
pub async fn get_user(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<User>, ApiError> {
    let Path(id) = id.map_err(|e| ApiError::bad_request("Invalid user id.", e.body_text()))?;
    Ok(Json(state.users.get_user(id).await?))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::json;

    #[tokio::test]
    async fn test_create_and_fetch_user() {
        let app = router();

        let request = json_request(
            "POST",
            "/users",
            json!({"name": "Ana", "email": "ana@example.com", "google_sub": "109876"}),
        );
        let (status, created) = send_json(app.clone(), request).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["email"], "ana@example.com");
        assert_eq!(created["google_sub"], "109876");

        let id = created["id"].as_str().unwrap();
        let request = Request::get(format!("/users/{}", id))
            .body(Body::empty())
            .unwrap();
        let (status, fetched) = send_json(app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_create_user_duplicate_email() {
        let app = router();
        let body = json!({"name": "Ana", "email": "ana@example.com"});

        let (status, _) = send_json(app.clone(), json_request("POST", "/users", body.clone())).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, response) = send_json(app, json_request("POST", "/users", body)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(response["message"], "User already exists.");
    }

    #[tokio::test]
    async fn test_create_user_invalid() {
        let request = json_request("POST", "/users", json!({"name": "Ana", "email": "nope"}));
        let (status, body) = send_json(router(), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "User validation failed!");

        let request = json_request("POST", "/users", json!({"name": "Ana"}));
        let (status, _) = send_json(router(), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_get_user_not_found() {
        let request = Request::get(format!("/users/{}", uuid::Uuid::new_v4()))
            .body(Body::empty())
            .unwrap();
        let (status, _) = send_json(router(), request).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let request = Request::get("/users/not-a-uuid").body(Body::empty()).unwrap();
        let (status, _) = send_json(router(), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
