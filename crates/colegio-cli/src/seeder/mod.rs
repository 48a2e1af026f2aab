//! Database seeding for development and manual testing.
//!
//! Every seeded docente and estudiante is validated and shares the password
//! [`SEED_PASSWORD`]; their emails end in `@example.com` so that
//! [`clear_all`] can find them again.

pub mod cursos;
pub mod models;
pub mod users;

use colegio_core::hash_password;
use colegio_models::UserRole;
use sqlx::PgPool;
use std::time::Instant;

pub use models::SeedConfig;

pub const SEED_PASSWORD: &str = "password123";

/// Accounts created by `seed-admins`: (nombre, email, password).
pub const DEFAULT_ADMINS: [(&str, &str, &str); 2] = [
    ("Administrador", "admin@colegio.com", "admin123"),
    ("Administrador 2", "admin2@colegio.com", "admin456"),
];

fn hash(password: &str) -> Result<String, Box<dyn std::error::Error>> {
    hash_password(password)
        .map_err(|e| format!("Failed to hash password: {}", e.error).into())
}

/// Creates a validated admin account.
pub async fn create_admin(
    db: &PgPool,
    nombre: &str,
    email: &str,
    password: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let password_hash = hash(password)?;
    match users::insert_admin(db, nombre, email, &password_hash).await? {
        Some(_) => Ok(()),
        None => Err("User with this email already exists".into()),
    }
}

/// Inserts [`DEFAULT_ADMINS`] that do not exist yet; returns how many were created.
pub async fn seed_default_admins(db: &PgPool) -> Result<usize, Box<dyn std::error::Error>> {
    let mut created = 0;
    for (nombre, email, password) in DEFAULT_ADMINS {
        let password_hash = hash(password)?;
        if users::insert_admin(db, nombre, email, &password_hash)
            .await?
            .is_some()
        {
            println!("   ✓ {} created", email);
            created += 1;
        } else {
            println!("   • {} already exists", email);
        }
    }
    Ok(created)
}

/// Seeds docentes, estudiantes, cursos and clases.
pub async fn seed_all(db: &PgPool, config: SeedConfig) -> Result<(), Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🌱 Seeding database...\n");

    let password_hash = hash(SEED_PASSWORD)?;

    let docente_ids =
        users::seed_users(db, config.docentes, UserRole::Docente, &password_hash).await?;
    let estudiante_ids =
        users::seed_users(db, config.estudiantes, UserRole::Estudiante, &password_hash).await?;

    let cursos = cursos::seed_cursos(db, &config, &docente_ids, &estudiante_ids).await?;
    cursos::seed_clases(db, &cursos, config.clases_por_curso).await?;

    println!("\n✅ Seeding finished in {:?}", start_time.elapsed());
    println!("   Seeded accounts use the password '{}'", SEED_PASSWORD);

    Ok(())
}

/// Removes seeded cursos and users. Admins are kept.
pub async fn clear_all(db: &PgPool) -> Result<(), Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🧹 Clearing seeded data...\n");

    cursos::clear_cursos(db).await?;
    users::clear_users(db).await?;

    println!("\n✅ Cleared seeded data in {:?}", start_time.elapsed());
    Ok(())
}
