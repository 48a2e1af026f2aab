#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, Response, StatusCode, header};
use colegio::colegio_auth::create_access_token;
use colegio::colegio_core::hash_password;
use colegio::colegio_models::UserRole;
use colegio::config::cors::CorsConfig;
use colegio::config::jwt::JwtConfig;
use colegio::config::rate_limit::RateLimitConfig;
use colegio::router::init_router;
use colegio::state::AppState;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

pub const TEST_PASSWORD: &str = "secreto123";

pub struct TestUser {
    pub id: Uuid,
    pub email: String,
    pub password: String,
    pub role: String,
    pub token: String,
}

pub fn jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "integration-test-secret-at-least-32-chars".to_string(),
        access_token_expiry: 3600,
    }
}

/// Limits high enough that no functional test trips them.
pub fn relaxed_rate_limit_config() -> RateLimitConfig {
    RateLimitConfig {
        general_per_second: 1,
        general_burst_size: 10_000,
        auth_per_second: 1,
        auth_burst_size: 10_000,
    }
}

pub fn setup_test_app_with_rate_limit(pool: PgPool, rate_limit_config: RateLimitConfig) -> Router {
    dotenvy::dotenv().ok();
    let state = AppState {
        db: pool,
        jwt_config: jwt_config(),
        cors_config: CorsConfig::from_list("http://localhost:5173"),
        rate_limit_config,
    };
    init_router(state)
}

pub fn setup_test_app(pool: PgPool) -> Router {
    setup_test_app_with_rate_limit(pool, relaxed_rate_limit_config())
}

pub fn generate_unique_email(prefix: &str) -> String {
    format!("{}-{}@colegio.com", prefix, Uuid::new_v4().simple())
}

/// Inserts a user directly and signs a token for it.
pub async fn create_test_user(pool: &PgPool, role: &str, validated: bool) -> TestUser {
    let email = generate_unique_email(role);
    let hashed = hash_password(TEST_PASSWORD).unwrap();

    let id: Uuid = sqlx::query_scalar(
        "INSERT INTO users (nombre, email, password, role, is_validated)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING id",
    )
    .bind(format!("Usuario {}", role))
    .bind(&email)
    .bind(&hashed)
    .bind(role.parse::<UserRole>().unwrap())
    .bind(validated)
    .fetch_one(pool)
    .await
    .unwrap();

    let token = create_access_token(id, &email, role, validated, &jwt_config()).unwrap();

    TestUser {
        id,
        email,
        password: TEST_PASSWORD.to_string(),
        role: role.to_string(),
        token,
    }
}

pub fn build_request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn read_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap_or(Value::Null)
}

/// Sends one request through a freshly built router.
pub async fn send(
    pool: &PgPool,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let response = send_raw(pool, method, uri, token, body).await;
    let status = response.status();
    (status, read_json(response).await)
}

pub async fn send_raw(
    pool: &PgPool,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response<Body> {
    setup_test_app(pool.clone())
        .oneshot(build_request(method, uri, token, body))
        .await
        .unwrap()
}

pub async fn create_curso(pool: &PgPool, docente: &TestUser, seccion: &str) -> Uuid {
    let (status, body) = send(
        pool,
        Method::POST,
        "/api/docente/cursos",
        Some(&docente.token),
        Some(serde_json::json!({
            "nombre": "Primer año",
            "anioAcademico": 2025,
            "anioEstudiantil": 1,
            "seccion": seccion,
            "materias": ["Matemáticas", "Historia"]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body["curso"]["id"].as_str().unwrap().parse().unwrap()
}

pub async fn create_clase(pool: &PgPool, admin: &TestUser, docente_id: Uuid, curso_id: Uuid) -> Uuid {
    let (status, body) = send(
        pool,
        Method::POST,
        "/api/clases",
        Some(&admin.token),
        Some(serde_json::json!({
            "nombre": "Álgebra",
            "docenteId": docente_id,
            "cursoId": curso_id,
            "materia": "Matemáticas",
            "horario": { "dia": "Lunes", "horaInicio": "08:00", "horaFin": "09:30" }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body["clase"]["id"].as_str().unwrap().parse().unwrap()
}

pub async fn enroll_in_curso(pool: &PgPool, curso_id: Uuid, estudiante_id: Uuid) {
    sqlx::query("INSERT INTO curso_estudiantes (curso_id, estudiante_id) VALUES ($1, $2)")
        .bind(curso_id)
        .bind(estudiante_id)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn enroll_in_clase(pool: &PgPool, clase_id: Uuid, estudiante_id: Uuid) {
    sqlx::query("INSERT INTO clase_estudiantes (clase_id, estudiante_id) VALUES ($1, $2)")
        .bind(clase_id)
        .bind(estudiante_id)
        .execute(pool)
        .await
        .unwrap();
}

pub fn next_week() -> String {
    (chrono::Utc::now() + chrono::Duration::days(7))
        .format("%Y-%m-%d")
        .to_string()
}

/// Inserts an actividad directly, bypassing the due date check.
pub async fn insert_actividad(
    pool: &PgPool,
    docente_id: Uuid,
    curso_id: Uuid,
    clase_id: Option<Uuid>,
    fecha_entrega: chrono::DateTime<chrono::Utc>,
) -> Uuid {
    sqlx::query_scalar(
        "INSERT INTO actividades (titulo, tipo, fecha_entrega, ponderacion, materia, lapso,
                                  curso_id, clase_id, docente_id)
         VALUES ('Informe de laboratorio', 'tarea', $1, 20, 'Física', 'Lapso 2', $2, $3, $4)
         RETURNING id",
    )
    .bind(fecha_entrega)
    .bind(curso_id)
    .bind(clase_id)
    .bind(docente_id)
    .fetch_one(pool)
    .await
    .unwrap()
}
