use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{CompareList, CompareListItem, CompareListItemDetail};

// ==============================================================================
// Compare List CRUD Operations
// ==============================================================================

pub async fn create_list(
    pool: &PgPool,
    group_id: Uuid,
    name: &str,
) -> Result<CompareList, sqlx::Error> {
    sqlx::query_as::<_, CompareList>(
        r#"
        INSERT INTO compare_lists (group_id, name)
        VALUES ($1, $2)
        RETURNING *
        "#,
    )
    .bind(group_id)
    .bind(name)
    .fetch_one(pool)
    .await
}

pub async fn fetch_list(
    pool: &PgPool,
    group_id: Uuid,
    list_id: Uuid,
) -> Result<Option<CompareList>, sqlx::Error> {
    sqlx::query_as::<_, CompareList>(
        "SELECT * FROM compare_lists WHERE id = $2 AND group_id = $1",
    )
    .bind(group_id)
    .bind(list_id)
    .fetch_optional(pool)
    .await
}

pub async fn fetch_lists_for_group(
    pool: &PgPool,
    group_id: Uuid,
) -> Result<Vec<CompareList>, sqlx::Error> {
    sqlx::query_as::<_, CompareList>(
        "SELECT * FROM compare_lists WHERE group_id = $1 ORDER BY name ASC",
    )
    .bind(group_id)
    .fetch_all(pool)
    .await
}

pub async fn rename_list(
    pool: &PgPool,
    group_id: Uuid,
    list_id: Uuid,
    name: &str,
) -> Result<CompareList, sqlx::Error> {
    sqlx::query_as::<_, CompareList>(
        r#"
        UPDATE compare_lists SET name = $3, updated_at = NOW()
        WHERE id = $2 AND group_id = $1
        RETURNING *
        "#,
    )
    .bind(group_id)
    .bind(list_id)
    .bind(name)
    .fetch_one(pool)
    .await
}

pub async fn delete_list(
    pool: &PgPool,
    group_id: Uuid,
    list_id: Uuid,
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM compare_lists WHERE id = $2 AND group_id = $1")
        .bind(group_id)
        .bind(list_id)
        .execute(pool)
        .await?;
    Ok(())
}

// ==============================================================================
// Compare List Items
// ==============================================================================

pub async fn fetch_items(
    pool: &PgPool,
    list_id: Uuid,
) -> Result<Vec<CompareListItemDetail>, sqlx::Error> {
    sqlx::query_as::<_, CompareListItemDetail>(
        r#"
        SELECT i.id, i.compare_list_id, i.stock_issue_code, s.name AS stock_issue_name,
               i.created_at
        FROM compare_list_items i
        JOIN stock_issues s ON s.code = i.stock_issue_code
        WHERE i.compare_list_id = $1
        ORDER BY i.stock_issue_code ASC
        "#,
    )
    .bind(list_id)
    .fetch_all(pool)
    .await
}

pub async fn add_item(
    pool: &PgPool,
    list_id: Uuid,
    stock_issue_code: &str,
) -> Result<CompareListItem, sqlx::Error> {
    sqlx::query_as::<_, CompareListItem>(
        r#"
        INSERT INTO compare_list_items (compare_list_id, stock_issue_code)
        VALUES ($1, $2)
        RETURNING *
        "#,
    )
    .bind(list_id)
    .bind(stock_issue_code)
    .fetch_one(pool)
    .await
}

pub async fn remove_item(
    pool: &PgPool,
    list_id: Uuid,
    item_id: Uuid,
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM compare_list_items WHERE id = $2 AND compare_list_id = $1")
        .bind(list_id)
        .bind(item_id)
        .execute(pool)
        .await?;
    Ok(())
}
