mod common;

use axum::http::{Method, StatusCode};
use common::{create_test_user, send};
use sqlx::PgPool;
use uuid::Uuid;

async fn insert_notificacion(pool: &PgPool, usuario_id: Uuid, titulo: &str, leido: bool) -> Uuid {
    sqlx::query_scalar(
        "INSERT INTO notificaciones (usuario_id, titulo, mensaje, tipo, leido)
         VALUES ($1, $2, 'Mensaje de prueba', 'general', $3)
         RETURNING id",
    )
    .bind(usuario_id)
    .bind(titulo)
    .bind(leido)
    .fetch_one(pool)
    .await
    .unwrap()
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_notificaciones(pool: PgPool) {
    let estudiante = create_test_user(&pool, "estudiante", true).await;
    let otro = create_test_user(&pool, "estudiante", true).await;
    insert_notificacion(&pool, estudiante.id, "Primera", true).await;
    insert_notificacion(&pool, estudiante.id, "Segunda", false).await;
    insert_notificacion(&pool, estudiante.id, "Tercera", false).await;
    insert_notificacion(&pool, otro.id, "Ajena", false).await;

    let (status, body) = send(
        &pool,
        Method::GET,
        "/api/notificaciones",
        Some(&estudiante.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["notificaciones"].as_array().unwrap().len(), 3);
    assert_eq!(body["noLeidas"], 2);
    assert_eq!(body["meta"]["total"], 3);

    let (_, body) = send(
        &pool,
        Method::GET,
        "/api/notificaciones?leido=false",
        Some(&estudiante.token),
        None,
    )
    .await;
    assert_eq!(body["notificaciones"].as_array().unwrap().len(), 2);
    assert_eq!(body["noLeidas"], 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_list_notificaciones_paginated(pool: PgPool) {
    let docente = create_test_user(&pool, "docente", true).await;
    for i in 0..5 {
        insert_notificacion(&pool, docente.id, &format!("Aviso {}", i), false).await;
    }

    let (status, body) = send(
        &pool,
        Method::GET,
        "/api/notificaciones?limit=2&page=3",
        Some(&docente.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["notificaciones"].as_array().unwrap().len(), 1);
    assert_eq!(body["meta"]["totalPages"], 3);
    assert_eq!(body["meta"]["hasMore"], false);

    let (status, body) = send(
        &pool,
        Method::GET,
        "/api/notificaciones?limit=muchas",
        Some(&docente.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Parámetros de consulta inválidos");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_marcar_leida(pool: PgPool) {
    let estudiante = create_test_user(&pool, "estudiante", true).await;
    let otro = create_test_user(&pool, "estudiante", true).await;
    let id = insert_notificacion(&pool, estudiante.id, "Nueva nota", false).await;
    let uri = format!("/api/notificaciones/{}/leida", id);

    let (status, body) = send(&pool, Method::PATCH, &uri, Some(&otro.token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Notificación no encontrada");

    let (status, body) = send(&pool, Method::PATCH, &uri, Some(&estudiante.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["msg"], "Notificación marcada como leída");
    assert_eq!(body["notificacion"]["leido"], true);

    let (status, body) = send(
        &pool,
        Method::PATCH,
        "/api/notificaciones/abc/leida",
        Some(&estudiante.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "ID inválido");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_marcar_todas_leidas(pool: PgPool) {
    let admin = create_test_user(&pool, "admin", true).await;
    insert_notificacion(&pool, admin.id, "Uno", false).await;
    insert_notificacion(&pool, admin.id, "Dos", false).await;
    insert_notificacion(&pool, admin.id, "Tres", true).await;

    let (status, body) = send(
        &pool,
        Method::PATCH,
        "/api/notificaciones/leidas",
        Some(&admin.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["actualizadas"], 2);
    assert_eq!(body["msg"], "2 notificaciones marcadas como leídas");

    let (_, body) = send(
        &pool,
        Method::GET,
        "/api/notificaciones",
        Some(&admin.token),
        None,
    )
    .await;
    assert_eq!(body["noLeidas"], 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_notificaciones_require_token(pool: PgPool) {
    let (status, _) = send(&pool, Method::GET, "/api/notificaciones", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
