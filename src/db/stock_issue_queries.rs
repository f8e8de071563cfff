use sqlx::PgPool;
use crate::models::StockIssue;

pub async fn fetch_by_code(pool: &PgPool, code: &str) -> Result<Option<StockIssue>, sqlx::Error> {
    sqlx::query_as::<_, StockIssue>("SELECT * FROM stock_issues WHERE code = $1")
        .bind(code)
        .fetch_optional(pool)
        .await
}

pub async fn fetch_by_codes(
    pool: &PgPool,
    codes: &[String],
) -> Result<Vec<StockIssue>, sqlx::Error> {
    if codes.is_empty() {
        return Ok(Vec::new());
    }

    sqlx::query_as::<_, StockIssue>(
        "SELECT * FROM stock_issues WHERE code = ANY($1) ORDER BY code ASC",
    )
    .bind(codes)
    .fetch_all(pool)
    .await
}

pub async fn fetch_all_codes(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
    let rows: Vec<(String,)> = sqlx::query_as("SELECT code FROM stock_issues ORDER BY code ASC")
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(|(code,)| code).collect())
}

/// Free-text search over code and (legal-type-stripped) name.
pub async fn search(
    pool: &PgPool,
    query: &str,
    limit: i64,
    offset: i64,
) -> Result<Vec<StockIssue>, sqlx::Error> {
    let pattern = format!("%{}%", query);
    sqlx::query_as::<_, StockIssue>(
        r#"
        SELECT * FROM stock_issues
        WHERE code ILIKE $1 OR name ILIKE $1
        ORDER BY code ASC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(&pattern)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

pub async fn count_matching(pool: &PgPool, query: &str) -> Result<i64, sqlx::Error> {
    let pattern = format!("%{}%", query);
    let (count,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM stock_issues WHERE code ILIKE $1 OR name ILIKE $1",
    )
    .bind(&pattern)
    .fetch_one(pool)
    .await?;
    Ok(count)
}

pub async fn upsert(pool: &PgPool, code: &str, name: &str) -> Result<StockIssue, sqlx::Error> {
    sqlx::query_as::<_, StockIssue>(
        r#"
        INSERT INTO stock_issues (code, name)
        VALUES ($1, $2)
        ON CONFLICT (code) DO UPDATE SET name = EXCLUDED.name
        RETURNING *
        "#,
    )
    .bind(code)
    .bind(name)
    .fetch_one(pool)
    .await
}
