use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// ==============================================================================
// Users
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountRole {
    Staff,
    User,
}

impl AccountRole {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "staff" => Some(AccountRole::Staff),
            "user" => Some(AccountRole::User),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AccountRole::Staff => "staff",
            AccountRole::User => "user",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub display_name: Option<String>,
    pub account_role: String,
    pub created_at: DateTime<Utc>,
}

// ==============================================================================
// Groups
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Group {
    pub id: Uuid,
    pub name: String,
    pub group_type: String,
    pub plan: String,
    pub max_users: i32,
    pub start_at: Option<NaiveDate>,
    pub expire_at: Option<NaiveDate>,
    pub stock_issue_code: Option<String>,
    pub settlement_month: Option<i32>,
    pub memo: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateGroupRequest {
    pub name: String,
    pub group_type: Option<String>,
    pub plan: Option<String>,
    pub max_users: Option<i32>,
    pub start_at: Option<NaiveDate>,
    pub expire_at: Option<NaiveDate>,
    pub stock_issue_code: Option<String>,
    pub settlement_month: Option<i32>,
    pub memo: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateGroupRequest {
    pub name: Option<String>,
    pub group_type: Option<String>,
    pub plan: Option<String>,
    pub max_users: Option<i32>,
    pub start_at: Option<NaiveDate>,
    pub expire_at: Option<NaiveDate>,
    pub stock_issue_code: Option<String>,
    pub settlement_month: Option<i32>,
    pub memo: Option<String>,
}

/// Group as shown to a caller. Fields the caller's role may not see are
/// stripped before serialization (memo is staff-only).
#[derive(Debug, Clone, Serialize)]
pub struct GroupResponse {
    pub id: Uuid,
    pub name: String,
    pub group_type: String,
    pub plan: String,
    pub max_users: i32,
    pub start_at: Option<NaiveDate>,
    pub expire_at: Option<NaiveDate>,
    pub stock_issue_code: Option<String>,
    pub settlement_month: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    pub role: GroupRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ==============================================================================
// Membership and roles
// ==============================================================================

/// The caller's role within one group. Staff comes from the account role;
/// owner/member from the membership row; everything else is out_group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupRole {
    Staff,
    Owner,
    Member,
    OutGroup,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GroupMember {
    pub id: Uuid,
    pub group_id: Uuid,
    pub user_id: Uuid,
    pub is_owner: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct GroupMemberDetail {
    pub id: Uuid,
    pub group_id: Uuid,
    pub user_id: Uuid,
    pub email: String,
    pub display_name: Option<String>,
    pub is_owner: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddGroupMemberRequest {
    pub email: String,
    pub is_owner: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateGroupMemberRequest {
    pub is_owner: bool,
}
