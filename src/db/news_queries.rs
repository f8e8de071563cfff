use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::models::{Article, CreateGroupEventRequest, GroupEvent, UpdateGroupEventRequest};

// ==============================================================================
// Articles
// ==============================================================================

pub async fn fetch_articles(
    pool: &PgPool,
    codes: &[String],
    query: Option<&str>,
    limit: i64,
    offset: i64,
) -> Result<Vec<Article>, sqlx::Error> {
    let mut builder: QueryBuilder<Postgres> =
        QueryBuilder::new("SELECT * FROM articles WHERE 1=1");

    if !codes.is_empty() {
        builder.push(" AND stock_issue_code = ANY(");
        builder.push_bind(codes.to_vec());
        builder.push(")");
    }
    if let Some(q) = query {
        builder.push(" AND title ILIKE ");
        builder.push_bind(format!("%{}%", q));
    }

    builder.push(" ORDER BY published_at DESC LIMIT ");
    builder.push_bind(limit);
    builder.push(" OFFSET ");
    builder.push_bind(offset);

    builder.build_query_as::<Article>().fetch_all(pool).await
}

// ==============================================================================
// Group Events
// ==============================================================================

pub async fn fetch_group_events(
    pool: &PgPool,
    group_id: Uuid,
    codes: &[String],
) -> Result<Vec<GroupEvent>, sqlx::Error> {
    let mut builder: QueryBuilder<Postgres> =
        QueryBuilder::new("SELECT * FROM group_events WHERE group_id = ");
    builder.push_bind(group_id);

    if !codes.is_empty() {
        builder.push(" AND stock_issue_code = ANY(");
        builder.push_bind(codes.to_vec());
        builder.push(")");
    }

    builder.push(" ORDER BY date DESC");

    builder.build_query_as::<GroupEvent>().fetch_all(pool).await
}

pub async fn fetch_group_event(
    pool: &PgPool,
    group_id: Uuid,
    event_id: Uuid,
) -> Result<Option<GroupEvent>, sqlx::Error> {
    sqlx::query_as::<_, GroupEvent>(
        "SELECT * FROM group_events WHERE id = $2 AND group_id = $1",
    )
    .bind(group_id)
    .bind(event_id)
    .fetch_optional(pool)
    .await
}

pub async fn create_group_event(
    pool: &PgPool,
    group_id: Uuid,
    req: &CreateGroupEventRequest,
) -> Result<GroupEvent, sqlx::Error> {
    sqlx::query_as::<_, GroupEvent>(
        r#"
        INSERT INTO group_events (group_id, stock_issue_code, event_type_code, memo, date)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(group_id)
    .bind(&req.stock_issue_code)
    .bind(&req.event_type_code)
    .bind(&req.memo)
    .bind(req.date)
    .fetch_one(pool)
    .await
}

pub async fn update_group_event(
    pool: &PgPool,
    group_id: Uuid,
    event_id: Uuid,
    req: &UpdateGroupEventRequest,
) -> Result<GroupEvent, sqlx::Error> {
    sqlx::query_as::<_, GroupEvent>(
        r#"
        UPDATE group_events
        SET event_type_code = COALESCE($3, event_type_code),
            memo = COALESCE($4, memo),
            date = COALESCE($5, date),
            updated_at = NOW()
        WHERE id = $2 AND group_id = $1
        RETURNING *
        "#,
    )
    .bind(group_id)
    .bind(event_id)
    .bind(&req.event_type_code)
    .bind(&req.memo)
    .bind(req.date)
    .fetch_one(pool)
    .await
}

pub async fn delete_group_event(
    pool: &PgPool,
    group_id: Uuid,
    event_id: Uuid,
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM group_events WHERE id = $2 AND group_id = $1")
        .bind(group_id)
        .bind(event_id)
        .execute(pool)
        .await?;
    Ok(())
}
