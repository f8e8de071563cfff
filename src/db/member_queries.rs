use sqlx::PgPool;
use uuid::Uuid;
use crate::models::{GroupMember, GroupMemberDetail};

pub async fn fetch_members(
    pool: &PgPool,
    group_id: Uuid,
) -> Result<Vec<GroupMemberDetail>, sqlx::Error> {
    sqlx::query_as::<_, GroupMemberDetail>(
        r#"
        SELECT m.id, m.group_id, m.user_id, u.email, u.display_name, m.is_owner, m.created_at
        FROM group_members m
        JOIN users u ON u.id = m.user_id
        WHERE m.group_id = $1
        ORDER BY m.is_owner DESC, u.email ASC
        "#,
    )
    .bind(group_id)
    .fetch_all(pool)
    .await
}

pub async fn fetch_membership(
    pool: &PgPool,
    group_id: Uuid,
    user_id: Uuid,
) -> Result<Option<GroupMember>, sqlx::Error> {
    sqlx::query_as::<_, GroupMember>(
        "SELECT * FROM group_members WHERE group_id = $1 AND user_id = $2",
    )
    .bind(group_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

pub async fn add_member(
    pool: &PgPool,
    group_id: Uuid,
    user_id: Uuid,
    is_owner: bool,
) -> Result<GroupMember, sqlx::Error> {
    sqlx::query_as::<_, GroupMember>(
        r#"
        INSERT INTO group_members (group_id, user_id, is_owner)
        VALUES ($1, $2, $3)
        RETURNING *
        "#,
    )
    .bind(group_id)
    .bind(user_id)
    .bind(is_owner)
    .fetch_one(pool)
    .await
}

pub async fn update_member(
    pool: &PgPool,
    group_id: Uuid,
    member_id: Uuid,
    is_owner: bool,
) -> Result<GroupMember, sqlx::Error> {
    sqlx::query_as::<_, GroupMember>(
        r#"
        UPDATE group_members SET is_owner = $3
        WHERE id = $2 AND group_id = $1
        RETURNING *
        "#,
    )
    .bind(group_id)
    .bind(member_id)
    .bind(is_owner)
    .fetch_one(pool)
    .await
}

pub async fn remove_member(
    pool: &PgPool,
    group_id: Uuid,
    member_id: Uuid,
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM group_members WHERE id = $2 AND group_id = $1")
        .bind(group_id)
        .bind(member_id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn count_members(pool: &PgPool, group_id: Uuid) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM group_members WHERE group_id = $1")
            .bind(group_id)
            .fetch_one(pool)
            .await?;
    Ok(count)
}
