mod common;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use colegio::config::rate_limit::RateLimitConfig;
use common::{TEST_PASSWORD, create_test_user, setup_test_app_with_rate_limit};
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;

/// One auth request per client, two general requests.
fn strict_rate_limit_config() -> RateLimitConfig {
    RateLimitConfig {
        general_per_second: 60,
        general_burst_size: 2,
        auth_per_second: 60,
        auth_burst_size: 1,
    }
}

fn login_request(ip: &str, email: &str, password: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-forwarded-for", ip)
        .body(Body::from(
            serde_json::to_vec(&json!({ "email": email, "password": password })).unwrap(),
        ))
        .unwrap()
}

async fn status_of(app: &Router, request: Request<Body>) -> StatusCode {
    app.clone().oneshot(request).await.unwrap().status()
}

#[sqlx::test(migrations = "./migrations")]
async fn test_auth_rate_limit_exceeded(pool: PgPool) {
    let app = setup_test_app_with_rate_limit(pool, strict_rate_limit_config());

    let first = login_request("192.168.1.100", "nadie@colegio.com", "secreto123");
    assert_eq!(status_of(&app, first).await, StatusCode::NOT_FOUND);

    let second = login_request("192.168.1.100", "nadie@colegio.com", "secreto123");
    assert_eq!(status_of(&app, second).await, StatusCode::TOO_MANY_REQUESTS);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_different_ips_have_separate_limits(pool: PgPool) {
    let app = setup_test_app_with_rate_limit(pool, strict_rate_limit_config());

    let first = login_request("10.0.0.1", "nadie@colegio.com", "secreto123");
    assert_eq!(status_of(&app, first).await, StatusCode::NOT_FOUND);

    let second = login_request("10.0.0.2", "nadie@colegio.com", "secreto123");
    assert_eq!(status_of(&app, second).await, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_successful_login_still_counts(pool: PgPool) {
    let estudiante = create_test_user(&pool, "estudiante", true).await;
    let app = setup_test_app_with_rate_limit(pool, strict_rate_limit_config());

    let first = login_request("203.0.113.50", &estudiante.email, TEST_PASSWORD);
    assert_eq!(status_of(&app, first).await, StatusCode::OK);

    let second = login_request("203.0.113.50", &estudiante.email, TEST_PASSWORD);
    assert_eq!(status_of(&app, second).await, StatusCode::TOO_MANY_REQUESTS);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_health_is_outside_general_limit(pool: PgPool) {
    let app = setup_test_app_with_rate_limit(pool, strict_rate_limit_config());

    let health = || {
        Request::builder()
            .uri("/")
            .header("x-forwarded-for", "172.16.0.1")
            .body(Body::empty())
            .unwrap()
    };
    for _ in 0..3 {
        assert_eq!(status_of(&app, health()).await, StatusCode::OK);
    }

    let ping = || {
        Request::builder()
            .uri("/api/auth/ping")
            .header("x-forwarded-for", "172.16.0.1")
            .body(Body::empty())
            .unwrap()
    };
    assert_eq!(status_of(&app, ping()).await, StatusCode::UNAUTHORIZED);
    assert_eq!(status_of(&app, ping()).await, StatusCode::UNAUTHORIZED);
    assert_eq!(status_of(&app, ping()).await, StatusCode::TOO_MANY_REQUESTS);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_default_general_limit_allows_page_bursts(pool: PgPool) {
    let app = setup_test_app_with_rate_limit(pool, RateLimitConfig::default());

    for _ in 0..50 {
        let request = Request::builder()
            .uri("/api/auth/ping")
            .header("x-forwarded-for", "198.51.100.7")
            .body(Body::empty())
            .unwrap();
        assert_eq!(status_of(&app, request).await, StatusCode::UNAUTHORIZED);
    }
}
