use sqlx::PgPool;
use uuid::Uuid;
use crate::models::User;

/// Look up a user by the email the identity provider verified, creating the
/// row on first sign-in. New accounts start as plain users; staff is granted
/// out of band.
pub async fn upsert_by_email(pool: &PgPool, email: &str) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (email)
        VALUES ($1)
        ON CONFLICT (email) DO UPDATE SET email = EXCLUDED.email
        RETURNING *
        "#,
    )
    .bind(email)
    .fetch_one(pool)
    .await
}

pub async fn fetch_by_id(pool: &PgPool, user_id: Uuid) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

pub async fn fetch_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await
}
