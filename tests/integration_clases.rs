mod common;

use axum::http::{Method, StatusCode};
use common::{create_clase, create_curso, create_test_user, enroll_in_clase, send};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

#[sqlx::test(migrations = "./migrations")]
async fn test_create_clase(pool: PgPool) {
    let admin = create_test_user(&pool, "admin", true).await;
    let docente = create_test_user(&pool, "docente", true).await;
    let curso_id = create_curso(&pool, &docente, "A").await;

    let (status, body) = send(
        &pool,
        Method::POST,
        "/api/clases",
        Some(&admin.token),
        Some(json!({
            "nombre": "Geometría",
            "docenteId": docente.id,
            "cursoId": curso_id,
            "materia": "Matemáticas",
            "horario": { "dia": "Martes" }
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["msg"], "Clase creada correctamente");
    let clase = &body["clase"];
    assert_eq!(clase["horario"]["dia"], "Martes");
    assert_eq!(clase["docente"]["id"], docente.id.to_string());
    assert_eq!(clase["curso"]["id"], curso_id.to_string());
    assert!(clase["estudiantes"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_clase_errors(pool: PgPool) {
    let admin = create_test_user(&pool, "admin", true).await;
    let docente = create_test_user(&pool, "docente", true).await;
    let curso_id = create_curso(&pool, &docente, "A").await;

    let (status, body) = send(
        &pool,
        Method::POST,
        "/api/clases",
        Some(&admin.token),
        Some(json!({ "nombre": "Sin curso", "docenteId": docente.id, "materia": "Arte" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "Nombre, docente, curso, horario y materia son obligatorios"
    );

    let (status, body) = send(
        &pool,
        Method::POST,
        "/api/clases",
        Some(&admin.token),
        Some(json!({
            "nombre": "Docente fantasma",
            "docenteId": Uuid::new_v4(),
            "cursoId": curso_id,
            "materia": "Arte"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Docente no encontrado");

    let (status, _) = send(
        &pool,
        Method::POST,
        "/api/clases",
        Some(&docente.token),
        Some(json!({
            "nombre": "Sin permiso",
            "docenteId": docente.id,
            "cursoId": curso_id,
            "materia": "Arte"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_clase_listings(pool: PgPool) {
    let admin = create_test_user(&pool, "admin", true).await;
    let docente = create_test_user(&pool, "docente", true).await;
    let otro = create_test_user(&pool, "docente", true).await;
    let estudiante = create_test_user(&pool, "estudiante", true).await;
    let curso_id = create_curso(&pool, &docente, "A").await;
    let clase_id = create_clase(&pool, &admin, docente.id, curso_id).await;
    create_clase(&pool, &admin, otro.id, curso_id).await;
    enroll_in_clase(&pool, clase_id, estudiante.id).await;

    let (status, body) = send(&pool, Method::GET, "/api/clases", Some(&admin.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 2);

    let (status, body) = send(
        &pool,
        Method::GET,
        "/api/clases/enriquecidas",
        Some(&admin.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["clases"].as_array().unwrap().len(), 2);

    let (status, body) =
        send(&pool, Method::GET, "/api/docente/clases", Some(&docente.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert_eq!(body["clases"][0]["id"], clase_id.to_string());
    assert_eq!(body["clases"][0]["cantidadEstudiantes"], 1);

    let (status, body) = send(
        &pool,
        Method::GET,
        "/api/estudiante/clases",
        Some(&estudiante.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);

    let (status, _) = send(
        &pool,
        Method::GET,
        "/api/estudiante/clases",
        Some(&docente.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_estudiantes_disponibles(pool: PgPool) {
    let docente = create_test_user(&pool, "docente", true).await;
    let valido = create_test_user(&pool, "estudiante", true).await;
    create_test_user(&pool, "estudiante", false).await;

    let (status, body) = send(
        &pool,
        Method::GET,
        "/api/docente/estudiantes",
        Some(&docente.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert_eq!(body["estudiantes"][0]["id"], valido.id.to_string());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_asignar_estudiantes_clase(pool: PgPool) {
    let admin = create_test_user(&pool, "admin", true).await;
    let docente = create_test_user(&pool, "docente", true).await;
    let otro = create_test_user(&pool, "docente", true).await;
    let estudiante = create_test_user(&pool, "estudiante", true).await;
    let curso_id = create_curso(&pool, &docente, "A").await;
    let clase_id = create_clase(&pool, &admin, docente.id, curso_id).await;

    let payload = json!({ "claseId": clase_id, "estudiantesIds": [estudiante.id] });

    let (status, body) = send(
        &pool,
        Method::POST,
        "/api/docente/clases/asignar-estudiantes",
        Some(&otro.token),
        Some(payload.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "No tienes permiso para modificar esta clase");

    let (status, body) = send(
        &pool,
        Method::POST,
        "/api/clases/asignar-estudiantes",
        Some(&docente.token),
        Some(payload.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["msg"], "Estudiantes asignados correctamente (1)");
    assert_eq!(body["clase"]["estudiantes"][0]["id"], estudiante.id.to_string());

    let (status, body) = send(
        &pool,
        Method::POST,
        "/api/clases/asignar-estudiantes",
        Some(&docente.token),
        Some(payload),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["msg"],
        "Todos los estudiantes ya estaban asignados o no son válidos"
    );
    assert_eq!(body["asignados"], 0);
    assert_eq!(body["clase"]["id"], clase_id.to_string());
    assert_eq!(body["clase"]["estudiantes"].as_array().unwrap().len(), 1);

    let (status, _) = send(
        &pool,
        Method::POST,
        "/api/clases/asignar-estudiantes",
        Some(&docente.token),
        Some(json!({ "claseId": clase_id })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_get_update_delete_clase(pool: PgPool) {
    let admin = create_test_user(&pool, "admin", true).await;
    let docente = create_test_user(&pool, "docente", true).await;
    let curso_id = create_curso(&pool, &docente, "A").await;
    let clase_id = create_clase(&pool, &admin, docente.id, curso_id).await;
    let uri = format!("/api/clases/{}", clase_id);

    let (status, body) = send(&pool, Method::GET, &uri, Some(&admin.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["clase"]["nombre"], "Álgebra");

    let (status, body) = send(
        &pool,
        Method::PUT,
        &uri,
        Some(&admin.token),
        Some(json!({ "horario": { "horaFin": "10:00" }, "activo": false })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["clase"]["horario"]["dia"], "Lunes");
    assert_eq!(body["clase"]["horario"]["horaFin"], "10:00");
    assert_eq!(body["clase"]["activo"], false);

    let (status, body) = send(&pool, Method::DELETE, &uri, Some(&admin.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["msg"], "Clase eliminada correctamente");

    let (status, body) = send(&pool, Method::GET, &uri, Some(&admin.token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Clase no encontrada");
}
