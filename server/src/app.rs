use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;

use crate::routes;
use crate::state::AppState;

pub(crate) fn build_app(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/regions",
            axum::routing::get(routes::api::get_regions).post(routes::api::append_regions),
        )
        .route(
            "/api/regions/{x}/{y}",
            axum::routing::delete(routes::api::delete_region),
        )
        .route("/api/health", axum::routing::get(routes::api::health))
        .route("/api/metrics", axum::routing::get(routes::api::metrics))
        .layer(CompressionLayer::new())
        // The grid client is served from a different origin than the API.
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use super::build_app;
    use crate::state::AppState;

    fn test_state() -> AppState {
        AppState::new(PathBuf::from("data/regions-test.json"))
    }

    #[tokio::test]
    async fn unknown_routes_fall_through_to_not_found() {
        let response = build_app(test_state())
            .oneshot(
                Request::builder()
                    .uri("/api/unknown")
                    .body(Body::empty())
                    .expect("build request"),
            )
            .await
            .expect("route request");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn preflight_requests_are_answered_permissively() {
        let response = build_app(test_state())
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/api/regions")
                    .header("origin", "http://localhost:5173")
                    .header("access-control-request-method", "GET")
                    .body(Body::empty())
                    .expect("build request"),
            )
            .await
            .expect("route request");

        assert!(response.headers().contains_key("access-control-allow-origin"));
    }
}
