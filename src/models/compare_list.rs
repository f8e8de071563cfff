use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// ==============================================================================
// Compare List Models
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CompareList {
    pub id: Uuid,
    pub group_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCompareListRequest {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCompareListRequest {
    pub name: String,
}

// ==============================================================================
// Compare List Item Models
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CompareListItem {
    pub id: Uuid,
    pub compare_list_id: Uuid,
    pub stock_issue_code: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CompareListItemDetail {
    pub id: Uuid,
    pub compare_list_id: Uuid,
    pub stock_issue_code: String,
    pub stock_issue_name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddCompareListItemRequest {
    pub stock_issue_code: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompareListDetailResponse {
    pub id: Uuid,
    pub group_id: Uuid,
    pub name: String,
    pub items: Vec<CompareListItemDetail>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
