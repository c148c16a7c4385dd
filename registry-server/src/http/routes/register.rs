//! Registration endpoint

use std::sync::Arc;

use axum::extract::State;
use axum::{routing::post, Json, Router};
use serde::Serialize;

use crate::http::error::ApiError;
use crate::http::extractors::RegistrationBody;
use crate::http::server::AppState;

pub const SUCCESS_MESSAGE: &str = "Registration successful!";

/// Successful registration response
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub success: bool,
    pub message: &'static str,
    #[serde(rename = "studentId")]
    pub student_id: String,
}

/// POST /register - validate and persist one registration
async fn register(
    State(state): State<Arc<AppState>>,
    RegistrationBody(form): RegistrationBody,
) -> Result<Json<RegisterResponse>, ApiError> {
    tracing::info!(payload = ?form, "Received registration data");

    // Nothing touches storage until the required fields are present
    let registration = form.validate()?;
    let id = state.store.insert(&registration).await?;

    tracing::info!(id, student_id = %registration.student_id, "Registration inserted");

    Ok(Json(RegisterResponse {
        success: true,
        message: SUCCESS_MESSAGE,
        student_id: registration.student_id,
    }))
}

/// Registration routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/register", post(register))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::db::{DbError, MemoryRegistrationStore, RegistrationStore, StoredRegistration};
    use crate::models::Registration;

    /// Store whose every call fails like an unreachable or misconfigured database
    struct BrokenStore;

    #[async_trait]
    impl RegistrationStore for BrokenStore {
        async fn insert(&self, _: &Registration) -> Result<u64, DbError> {
            Err(DbError::Persistence {
                message: "Table 'student_db.registrations' doesn't exist".into(),
            })
        }

        async fn find_by_student_id(&self, _: &str) -> Result<Option<StoredRegistration>, DbError> {
            Ok(None)
        }

        async fn count(&self) -> Result<u64, DbError> {
            Ok(0)
        }

        async fn ping(&self) -> Result<(), DbError> {
            Ok(())
        }
    }

    fn app(store: Arc<dyn RegistrationStore>) -> Router {
        router().with_state(Arc::new(AppState::new(store)))
    }

    async fn submit(app: Router, content_type: &str, body: &str) -> (StatusCode, Value) {
        let req = Request::builder()
            .method("POST")
            .uri("/register")
            .header("content-type", content_type)
            .body(Body::from(body.to_owned()))
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), 4096).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn valid_registration_succeeds() {
        let store = Arc::new(MemoryRegistrationStore::default());
        let (status, body) = submit(
            app(store.clone()),
            "application/json",
            r#"{"name":"Ann","email":"ann@x.com","student_id":"S1"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"success": true, "message": "Registration successful!", "studentId": "S1"})
        );
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn empty_name_is_rejected_without_insert() {
        let store = Arc::new(MemoryRegistrationStore::default());
        let (status, body) = submit(
            app(store.clone()),
            "application/json",
            r#"{"name":"","email":"ann@x.com","student_id":"S1"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({"success": false, "message": "Name, email, and student ID are required"})
        );
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn form_encoded_registration_succeeds() {
        let store = Arc::new(MemoryRegistrationStore::default());
        let (status, body) = submit(
            app(store.clone()),
            "application/x-www-form-urlencoded",
            "name=Ann&email=ann%40x.com&student_id=S9&age=20&languages=en%2Cfr",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["studentId"], "S9");

        let stored = store.find_by_student_id("S9").await.unwrap().unwrap();
        assert_eq!(stored.registration.age.as_deref(), Some("20"));
        assert_eq!(stored.registration.languages.as_deref(), Some("en,fr"));
    }

    #[tokio::test]
    async fn empty_json_body_fails_validation() {
        let store = Arc::new(MemoryRegistrationStore::default());
        let (status, body) = submit(app(store.clone()), "application/json", "").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({"success": false, "message": "Name, email, and student ID are required"})
        );
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn repeated_language_keys_are_stored_joined() {
        let store = Arc::new(MemoryRegistrationStore::default());
        let (status, body) = submit(
            app(store.clone()),
            "application/x-www-form-urlencoded",
            "name=Ann&email=a%40x&student_id=S1&languages=en&languages=fr",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["studentId"], "S1");

        let stored = store.find_by_student_id("S1").await.unwrap().unwrap();
        assert_eq!(stored.registration.languages.as_deref(), Some("en,fr"));
    }

    #[tokio::test]
    async fn storage_failure_exposes_message() {
        let (status, body) = submit(
            app(Arc::new(BrokenStore)),
            "application/json",
            r#"{"name":"Ann","email":"ann@x.com","student_id":"S1"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            json!({
                "success": false,
                "message": "Database operation failed",
                "error": "Table 'student_db.registrations' doesn't exist"
            })
        );
    }

    #[tokio::test]
    async fn missing_content_type_fails_validation() {
        let req = Request::builder()
            .method("POST")
            .uri("/register")
            .body(Body::from("name=Ann"))
            .unwrap();
        let resp = app(Arc::new(MemoryRegistrationStore::default()))
            .oneshot(req)
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn malformed_json_is_internal_error() {
        let (status, body) = submit(
            app(Arc::new(MemoryRegistrationStore::default())),
            "application/json",
            r#"{"name": "Ann""#,
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"success": false, "message": "Internal server error"}));
    }
}
