use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;
use crate::models::{CreateGroupRequest, Group, UpdateGroupRequest};

// ==============================================================================
// Group CRUD Operations
// ==============================================================================

pub async fn create_group(pool: &PgPool, req: &CreateGroupRequest) -> Result<Group, sqlx::Error> {
    sqlx::query_as::<_, Group>(
        r#"
        INSERT INTO groups (name, group_type, plan, max_users, start_at, expire_at,
                            stock_issue_code, settlement_month, memo)
        VALUES ($1,
                COALESCE($2, 'listed'),
                COALESCE($3, 'trial'),
                COALESCE($4, 10),
                $5, $6, $7, $8, $9)
        RETURNING *
        "#,
    )
    .bind(&req.name)
    .bind(&req.group_type)
    .bind(&req.plan)
    .bind(req.max_users)
    .bind(req.start_at)
    .bind(req.expire_at)
    .bind(&req.stock_issue_code)
    .bind(req.settlement_month)
    .bind(&req.memo)
    .fetch_one(pool)
    .await
}

pub async fn fetch_group(pool: &PgPool, group_id: Uuid) -> Result<Option<Group>, sqlx::Error> {
    sqlx::query_as::<_, Group>("SELECT * FROM groups WHERE id = $1")
        .bind(group_id)
        .fetch_optional(pool)
        .await
}

pub async fn fetch_all_groups(pool: &PgPool) -> Result<Vec<Group>, sqlx::Error> {
    sqlx::query_as::<_, Group>("SELECT * FROM groups ORDER BY name ASC")
        .fetch_all(pool)
        .await
}

pub async fn fetch_groups_for_user(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<Group>, sqlx::Error> {
    sqlx::query_as::<_, Group>(
        r#"
        SELECT g.* FROM groups g
        JOIN group_members m ON m.group_id = g.id
        WHERE m.user_id = $1
        ORDER BY g.name ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub async fn update_group(
    pool: &PgPool,
    group_id: Uuid,
    req: &UpdateGroupRequest,
) -> Result<Group, sqlx::Error> {
    let mut query_builder: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE groups SET ");

    let mut separated = query_builder.separated(", ");
    let mut has_updates = false;

    if let Some(name) = &req.name {
        separated.push("name = ");
        separated.push_bind_unseparated(name);
        has_updates = true;
    }
    if let Some(group_type) = &req.group_type {
        separated.push("group_type = ");
        separated.push_bind_unseparated(group_type);
        has_updates = true;
    }
    if let Some(plan) = &req.plan {
        separated.push("plan = ");
        separated.push_bind_unseparated(plan);
        has_updates = true;
    }
    if let Some(max_users) = req.max_users {
        separated.push("max_users = ");
        separated.push_bind_unseparated(max_users);
        has_updates = true;
    }
    if let Some(start_at) = req.start_at {
        separated.push("start_at = ");
        separated.push_bind_unseparated(start_at);
        has_updates = true;
    }
    if let Some(expire_at) = req.expire_at {
        separated.push("expire_at = ");
        separated.push_bind_unseparated(expire_at);
        has_updates = true;
    }
    if let Some(code) = &req.stock_issue_code {
        separated.push("stock_issue_code = ");
        separated.push_bind_unseparated(code);
        has_updates = true;
    }
    if let Some(month) = req.settlement_month {
        separated.push("settlement_month = ");
        separated.push_bind_unseparated(month);
        has_updates = true;
    }
    if let Some(memo) = &req.memo {
        separated.push("memo = ");
        separated.push_bind_unseparated(memo);
        has_updates = true;
    }

    if !has_updates {
        return sqlx::query_as::<_, Group>("SELECT * FROM groups WHERE id = $1")
            .bind(group_id)
            .fetch_one(pool)
            .await;
    }

    query_builder.push(", updated_at = NOW() WHERE id = ");
    query_builder.push_bind(group_id);
    query_builder.push(" RETURNING *");

    query_builder
        .build_query_as::<Group>()
        .fetch_one(pool)
        .await
}

pub async fn delete_group(pool: &PgPool, group_id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM groups WHERE id = $1")
        .bind(group_id)
        .execute(pool)
        .await?;
    Ok(())
}
