use std::time::Duration;

use axum::{
    http::{header, Method, StatusCode},
    routing::get,
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    handlers::{
        health::{healthz, livez},
        records,
    },
    state::AppState,
};

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState) -> Router {
    // CORS configuration for API endpoints
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    // API routes with CORS
    let api_routes = Router::new()
        .nest("/auths", records::routes(state.auths.clone()))
        .nest("/notifications", records::routes(state.notifications.clone()))
        .nest("/reservations", records::routes(state.reservations.clone()))
        .layer(cors);

    // Main application router
    Router::new()
        .route("/livez", get(livez))
        .route("/healthz", get(healthz))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(10),
        ))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, response::Response};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn body_json(response: Response) -> Value {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    fn json_request(method: &str, uri: &str, payload: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(payload.to_string()))
            .unwrap()
    }

    fn empty_request(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    fn reservation_payload() -> Value {
        json!({
            "customerEmail": "ana@example.com",
            "date": "2024-06-20",
            "time": "20:30",
            "numberOfPeople": 4
        })
    }

    #[tokio::test]
    async fn test_livez() {
        let app = create_app(AppState::for_tests());

        let response = app.oneshot(empty_request("GET", "/livez")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_list_reservations_empty() {
        let app = create_app(AppState::for_tests());

        let response = app
            .oneshot(empty_request("GET", "/api/reservations"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!([]));
    }

    #[tokio::test]
    async fn test_create_and_get_reservation() {
        let app = create_app(AppState::for_tests());

        // Create a reservation
        let response = app
            .clone()
            .oneshot(json_request("POST", "/api/reservations", reservation_payload()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let created = body_json(response).await;
        assert_eq!(created["customerEmail"], "ana@example.com");
        assert_eq!(created["status"], "pending");
        assert_eq!(created["numberOfPeople"], 4);
        assert!(created["createdAt"].is_string());

        // Get the reservation
        let id = created["id"].as_str().unwrap();
        let response = app
            .oneshot(empty_request("GET", &format!("/api/reservations/{id}")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, created);
    }

    #[tokio::test]
    async fn test_create_with_missing_fields() {
        let app = create_app(AppState::for_tests());

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/reservations",
                json!({ "customerEmail": "ana@example.com", "time": "" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({
                "error": "Incomplete data",
                "missingFields": ["date", "time", "numberOfPeople"]
            })
        );
    }

    #[tokio::test]
    async fn test_create_with_invalid_field() {
        let app = create_app(AppState::for_tests());
        let mut payload = reservation_payload();
        payload["numberOfPeople"] = json!(0);

        let response = app
            .oneshot(json_request("POST", "/api/reservations", payload))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "Validation error");
    }

    #[tokio::test]
    async fn test_get_nonexistent_record() {
        let app = create_app(AppState::for_tests());

        let response = app
            .oneshot(empty_request(
                "GET",
                "/api/notifications/00000000-0000-0000-0000-000000000000",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_json(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn test_update_and_delete_notification() {
        let app = create_app(AppState::for_tests());

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/notifications",
                json!({ "userId": "user-1", "title": "Welcome", "message": "Hello" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let id = body_json(response).await["id"].as_str().unwrap().to_string();
        let uri = format!("/api/notifications/{id}");

        let response = app
            .clone()
            .oneshot(json_request("PUT", &uri, json!({ "status": "read" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "read");

        // The read reflects the update
        let response = app.clone().oneshot(empty_request("GET", &uri)).await.unwrap();
        assert_eq!(body_json(response).await["status"], "read");

        let response = app
            .clone()
            .oneshot(empty_request("DELETE", &uri))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["title"], "Welcome");

        let response = app.clone().oneshot(empty_request("GET", &uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app
            .oneshot(empty_request("GET", "/api/notifications"))
            .await
            .unwrap();
        assert_eq!(body_json(response).await, json!([]));
    }

    #[tokio::test]
    async fn test_update_nonexistent_record() {
        let app = create_app(AppState::for_tests());

        let response = app
            .oneshot(json_request(
                "PUT",
                "/api/auths/00000000-0000-0000-0000-000000000000",
                json!({ "email": "new@example.com" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_auth_listing_is_invalidated_by_create() {
        let app = create_app(AppState::for_tests());

        // Warm the collection cache
        let response = app
            .clone()
            .oneshot(empty_request("GET", "/api/auths"))
            .await
            .unwrap();
        assert_eq!(body_json(response).await, json!([]));

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/auths",
                json!({ "username": "ana", "password": "secret", "email": "ana@example.com" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .oneshot(empty_request("GET", "/api/auths"))
            .await
            .unwrap();
        let listing = body_json(response).await;
        assert_eq!(listing.as_array().map(Vec::len), Some(1));
        assert_eq!(listing[0]["username"], "ana");
    }

    #[tokio::test]
    async fn test_healthz_reports_cache_stats() {
        let state = AppState::for_tests();
        let app = create_app(state);

        let response = app
            .clone()
            .oneshot(empty_request("GET", "/api/auths"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let response = app
            .clone()
            .oneshot(empty_request("GET", "/api/auths"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app.oneshot(empty_request("GET", "/healthz")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let health = body_json(response).await;
        assert_eq!(health["status"], "ok");
        assert_eq!(health["cache"]["auth"]["hits"], 1);
        assert_eq!(health["cache"]["auth"]["misses"], 1);
        assert_eq!(health["cache"]["auth"]["hitRatio"], 0.5);
        assert!(health["cache"]["reservation"]["hitRatio"].is_null());
    }

    #[tokio::test]
    async fn test_create_duplicate_auth_conflicts() {
        let app = create_app(AppState::for_tests());
        let payload = json!({ "username": "ana", "password": "secret", "email": "ana@example.com" });

        let response = app
            .clone()
            .oneshot(json_request("POST", "/api/auths", payload.clone()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .clone()
            .oneshot(json_request("POST", "/api/auths", payload))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(
            body_json(response).await["error"],
            "AuthRecord already exists: username ana"
        );

        let response = app
            .oneshot(empty_request("GET", "/api/auths"))
            .await
            .unwrap();
        assert_eq!(body_json(response).await.as_array().map(Vec::len), Some(1));
    }
}
