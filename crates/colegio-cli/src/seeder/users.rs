//! User seeding functionality.
//!
//! Generates fake docentes and estudiantes and inserts them in batches.

use colegio_models::UserRole;
use fake::Fake;
use fake::faker::name::en::*;
use rayon::prelude::*;
use sqlx::{PgPool, Postgres, Transaction};
use std::time::Instant;
use uuid::Uuid;

use super::models::UserSeed;

pub const SEED_EMAIL_DOMAIN: &str = "example.com";

/// Generates validated users of one role in parallel
pub fn generate_users(count: usize, role: UserRole, password_hash: &str) -> Vec<UserSeed> {
    (0..count)
        .into_par_iter()
        .map(|idx| generate_user(role, idx, password_hash))
        .collect()
}

fn generate_user(role: UserRole, idx: usize, password_hash: &str) -> UserSeed {
    let first_name: String = FirstName().fake();
    let last_name: String = LastName().fake();

    let email = format!(
        "{}.{}+{}{}@{}",
        sanitize(&first_name),
        sanitize(&last_name),
        role.as_str(),
        idx,
        SEED_EMAIL_DOMAIN
    );

    UserSeed {
        nombre: format!("{} {}", first_name, last_name),
        email,
        password_hash: password_hash.to_string(),
        role,
    }
}

fn sanitize(part: &str) -> String {
    part.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_lowercase()
}

/// Seeds users of one role into the database
pub async fn seed_users(
    db: &PgPool,
    count: usize,
    role: UserRole,
    password_hash: &str,
) -> Result<Vec<Uuid>, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    let icon = match role {
        UserRole::Docente => "👩‍🏫",
        UserRole::Estudiante => "🎓",
        UserRole::Admin => "🛡️",
    };
    println!("{} Seeding {} {}s...", icon, count, role);

    let users = generate_users(count, role, password_hash);
    let ids = insert_users_batch(db, &users).await?;

    println!(
        "   ✓ Inserted {} {}s in {:?}",
        ids.len(),
        role,
        start_time.elapsed()
    );

    Ok(ids)
}

/// Inserts users in batches inside one transaction
pub async fn insert_users_batch(
    db: &PgPool,
    users: &[UserSeed],
) -> Result<Vec<Uuid>, Box<dyn std::error::Error>> {
    let mut tx = db.begin().await?;

    // 4 params per user
    const BATCH_SIZE: usize = 1000;

    let mut all_ids = Vec::with_capacity(users.len());
    for chunk in users.chunks(BATCH_SIZE) {
        all_ids.extend(insert_users_chunk(&mut tx, chunk).await?);
    }

    tx.commit().await?;
    Ok(all_ids)
}

async fn insert_users_chunk(
    tx: &mut Transaction<'_, Postgres>,
    users: &[UserSeed],
) -> Result<Vec<Uuid>, Box<dyn std::error::Error>> {
    if users.is_empty() {
        return Ok(Vec::new());
    }

    let mut query =
        String::from("INSERT INTO users (nombre, email, password, role, is_validated) VALUES ");

    for (i, _) in users.iter().enumerate() {
        if i > 0 {
            query.push_str(", ");
        }
        let param_idx = i * 4;
        query.push_str(&format!(
            "(${}, ${}, ${}, ${}, TRUE)",
            param_idx + 1,
            param_idx + 2,
            param_idx + 3,
            param_idx + 4
        ));
    }

    query.push_str(" ON CONFLICT (email) DO NOTHING RETURNING id");

    let mut q = sqlx::query_scalar(&query);
    for user in users {
        q = q
            .bind(&user.nombre)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.role);
    }

    let ids: Vec<Uuid> = q.fetch_all(&mut **tx).await?;
    Ok(ids)
}

/// Inserts a validated admin, returning `None` when the email is taken
pub async fn insert_admin(
    db: &PgPool,
    nombre: &str,
    email: &str,
    password_hash: &str,
) -> Result<Option<Uuid>, sqlx::Error> {
    sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO users (nombre, email, password, role, is_validated)
         VALUES ($1, $2, $3, 'admin', TRUE)
         ON CONFLICT (email) DO NOTHING
         RETURNING id",
    )
    .bind(nombre)
    .bind(email.trim().to_lowercase())
    .bind(password_hash)
    .fetch_optional(db)
    .await
}

/// Clears seeded users; cascades to their cursos, clases and entregas
pub async fn clear_users(db: &PgPool) -> Result<u64, Box<dyn std::error::Error>> {
    let start_time = Instant::now();
    println!("🗑️  Clearing seeded users...");

    let result = sqlx::query("DELETE FROM users WHERE email LIKE $1 AND role <> 'admin'")
        .bind(format!("%@{}", SEED_EMAIL_DOMAIN))
        .execute(db)
        .await?
        .rows_affected();

    println!(
        "   ✓ Deleted {} users in {:?}",
        result,
        start_time.elapsed()
    );

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_emails_are_unique_and_seeded() {
        let users = generate_users(50, UserRole::Estudiante, "hash");
        assert_eq!(users.len(), 50);

        let mut emails: Vec<&str> = users.iter().map(|u| u.email.as_str()).collect();
        emails.sort();
        emails.dedup();
        assert_eq!(emails.len(), 50);
        assert!(users.iter().all(|u| u.email.ends_with("@example.com")));
        assert!(users.iter().all(|u| u.role == UserRole::Estudiante));
    }

    #[test]
    fn test_sanitize_strips_symbols() {
        assert_eq!(sanitize("O'Connor"), "oconnor");
        assert_eq!(sanitize("Anne-Marie"), "annemarie");
    }
}
