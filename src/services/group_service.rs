use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::db::member_queries;
use crate::errors::AppError;
use crate::models::{AccountRole, Group, GroupResponse, GroupRole, UpdateGroupRequest};
use crate::services::permissions::{self, GroupField};

/// Derive the caller's role within one group: staff from the account role,
/// owner/member from the membership row, out_group otherwise.
pub async fn resolve_role(
    pool: &PgPool,
    user: &AuthUser,
    group_id: Uuid,
) -> Result<GroupRole, AppError> {
    if user.role == AccountRole::Staff {
        return Ok(GroupRole::Staff);
    }

    match member_queries::fetch_membership(pool, group_id, user.user_id).await? {
        Some(membership) if membership.is_owner => Ok(GroupRole::Owner),
        Some(_) => Ok(GroupRole::Member),
        None => Ok(GroupRole::OutGroup),
    }
}

/// Like `resolve_role`, but out_group callers are rejected outright.
pub async fn require_membership(
    pool: &PgPool,
    user: &AuthUser,
    group_id: Uuid,
) -> Result<GroupRole, AppError> {
    let role = resolve_role(pool, user, group_id).await?;
    if role == GroupRole::OutGroup {
        return Err(AppError::Forbidden("Not a member of this group".to_string()));
    }
    Ok(role)
}

/// Shape a group row for one caller, stripping fields the role may not see.
pub fn to_response(group: Group, role: GroupRole) -> GroupResponse {
    let memo = if permissions::is_visible(GroupField::Memo, role) {
        group.memo
    } else {
        None
    };

    GroupResponse {
        id: group.id,
        name: group.name,
        group_type: group.group_type,
        plan: group.plan,
        max_users: group.max_users,
        start_at: group.start_at,
        expire_at: group.expire_at,
        stock_issue_code: group.stock_issue_code,
        settlement_month: group.settlement_month,
        memo,
        role,
        created_at: group.created_at,
        updated_at: group.updated_at,
    }
}

/// Reject an update that touches any field the caller's role cannot edit.
pub fn authorize_update(req: &UpdateGroupRequest, role: GroupRole) -> Result<(), AppError> {
    for (field, name) in requested_fields(req) {
        if !permissions::can_edit(field, role) {
            return Err(AppError::Forbidden(format!(
                "Role may not edit field '{}'",
                name
            )));
        }
    }
    Ok(())
}

fn requested_fields(req: &UpdateGroupRequest) -> Vec<(GroupField, &'static str)> {
    let mut fields = Vec::new();
    if req.name.is_some() {
        fields.push((GroupField::Name, "name"));
    }
    if req.group_type.is_some() {
        fields.push((GroupField::GroupType, "group_type"));
    }
    if req.plan.is_some() {
        fields.push((GroupField::Plan, "plan"));
    }
    if req.max_users.is_some() {
        fields.push((GroupField::MaxUsers, "max_users"));
    }
    if req.start_at.is_some() {
        fields.push((GroupField::StartAt, "start_at"));
    }
    if req.expire_at.is_some() {
        fields.push((GroupField::ExpireAt, "expire_at"));
    }
    if req.stock_issue_code.is_some() {
        fields.push((GroupField::StockIssueCode, "stock_issue_code"));
    }
    if req.settlement_month.is_some() {
        fields.push((GroupField::SettlementMonth, "settlement_month"));
    }
    if req.memo.is_some() {
        fields.push((GroupField::Memo, "memo"));
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn group(memo: Option<&str>) -> Group {
        Group {
            id: Uuid::new_v4(),
            name: "Example Holdings".to_string(),
            group_type: "listed".to_string(),
            plan: "trial".to_string(),
            max_users: 10,
            start_at: None,
            expire_at: None,
            stock_issue_code: Some("7203".to_string()),
            settlement_month: Some(3),
            memo: memo.map(|m| m.to_string()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_memo_stripped_for_non_staff() {
        let response = to_response(group(Some("internal note")), GroupRole::Owner);
        assert!(response.memo.is_none());

        let response = to_response(group(Some("internal note")), GroupRole::Staff);
        assert_eq!(response.memo.as_deref(), Some("internal note"));
    }

    #[test]
    fn test_owner_may_update_company_fields_only() {
        let req = UpdateGroupRequest {
            stock_issue_code: Some("6758".to_string()),
            settlement_month: Some(12),
            ..Default::default()
        };
        assert!(authorize_update(&req, GroupRole::Owner).is_ok());

        let req = UpdateGroupRequest {
            plan: Some("premium".to_string()),
            ..Default::default()
        };
        assert!(authorize_update(&req, GroupRole::Owner).is_err());
    }

    #[test]
    fn test_member_update_rejected() {
        let req = UpdateGroupRequest {
            group_type: Some("unlisted".to_string()),
            ..Default::default()
        };
        assert!(authorize_update(&req, GroupRole::Member).is_err());
    }

    #[test]
    fn test_empty_update_is_allowed_for_any_role() {
        let req = UpdateGroupRequest::default();
        assert!(authorize_update(&req, GroupRole::Member).is_ok());
    }
}
