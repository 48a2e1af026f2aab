//! Row builders for service tests.

use chrono::{DateTime, Duration, Utc};
use colegio_auth::Claims;
use colegio_models::UserRole;
use sqlx::PgPool;
use uuid::Uuid;

use crate::middleware::auth::AuthUser;

pub async fn insert_user(pool: &PgPool, role: UserRole, validated: bool) -> Uuid {
    let email = format!("{}-{}@colegio.test", role, Uuid::new_v4());
    sqlx::query_scalar(
        "INSERT INTO users (nombre, email, password, role, is_validated)
         VALUES ($1, $2, 'x', $3, $4) RETURNING id",
    )
    .bind(format!("Usuario {}", role))
    .bind(email)
    .bind(role)
    .bind(validated)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn insert_curso(pool: &PgPool, docente_id: Option<Uuid>) -> Uuid {
    let nombre = format!("Curso {}", Uuid::new_v4());
    sqlx::query_scalar(
        "INSERT INTO cursos (nombre, anio_academico, anio_estudiantil, seccion, docente_id)
         VALUES ($1, 2025, 3, 'A', $2) RETURNING id",
    )
    .bind(nombre)
    .bind(docente_id)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn enroll_in_curso(pool: &PgPool, curso_id: Uuid, estudiante_id: Uuid) {
    sqlx::query("INSERT INTO curso_estudiantes (curso_id, estudiante_id) VALUES ($1, $2)")
        .bind(curso_id)
        .bind(estudiante_id)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn insert_clase(pool: &PgPool, docente_id: Uuid, curso_id: Uuid) -> Uuid {
    sqlx::query_scalar(
        "INSERT INTO clases (nombre, docente_id, curso_id, materia)
         VALUES ('Álgebra', $1, $2, 'Matemáticas') RETURNING id",
    )
    .bind(docente_id)
    .bind(curso_id)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn enroll_in_clase(pool: &PgPool, clase_id: Uuid, estudiante_id: Uuid) {
    sqlx::query("INSERT INTO clase_estudiantes (clase_id, estudiante_id) VALUES ($1, $2)")
        .bind(clase_id)
        .bind(estudiante_id)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn insert_actividad(
    pool: &PgPool,
    docente_id: Uuid,
    curso_id: Uuid,
    clase_id: Option<Uuid>,
    fecha_entrega: DateTime<Utc>,
) -> Uuid {
    sqlx::query_scalar(
        "INSERT INTO actividades (titulo, tipo, fecha_entrega, ponderacion, materia, lapso,
                                  curso_id, clase_id, docente_id)
         VALUES ('Guía 1', 'tarea', $1, 10, 'Matemáticas', 'Lapso 1', $2, $3, $4)
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

pub fn next_week() -> DateTime<Utc> {
    Utc::now() + Duration::days(7)
}

pub fn auth_user(user_id: Uuid, role: UserRole) -> AuthUser {
    AuthUser(Claims {
        sub: user_id.to_string(),
        email: format!("{}@colegio.test", user_id),
        role: role.as_str().to_string(),
        is_validated: true,
        exp: 9999999999,
        iat: 1234567890,
    })
}
