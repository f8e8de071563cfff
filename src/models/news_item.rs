use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// ==============================================================================
// Article / Group Event rows
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Article {
    pub id: Uuid,
    pub stock_issue_code: String,
    pub title: String,
    pub published_at: DateTime<Utc>,
    pub path: Option<String>,
    pub source_code: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct GroupEvent {
    pub id: Uuid,
    pub group_id: Uuid,
    pub stock_issue_code: String,
    pub event_type_code: String,
    pub memo: String,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateGroupEventRequest {
    pub stock_issue_code: String,
    pub event_type_code: String,
    pub memo: String,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateGroupEventRequest {
    pub event_type_code: Option<String>,
    pub memo: Option<String>,
    pub date: Option<NaiveDate>,
}

// ==============================================================================
// Article sources and categories
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArticleSource {
    Tanshin,
    Yuuhou,
    NewsNikkei,
    NewsPrtimes,
    Other,
}

impl ArticleSource {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "tanshin" => Some(ArticleSource::Tanshin),
            "yuuhou" => Some(ArticleSource::Yuuhou),
            "news_nikkei" => Some(ArticleSource::NewsNikkei),
            "news_prtimes" => Some(ArticleSource::NewsPrtimes),
            "other" => Some(ArticleSource::Other),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ArticleSource::Tanshin => "tanshin",
            ArticleSource::Yuuhou => "yuuhou",
            ArticleSource::NewsNikkei => "news_nikkei",
            ArticleSource::NewsPrtimes => "news_prtimes",
            ArticleSource::Other => "other",
        }
    }

    /// Press coverage counts as news; disclosures and filings as IR.
    pub fn category(&self) -> NewsCategory {
        match self {
            ArticleSource::NewsNikkei | ArticleSource::NewsPrtimes => NewsCategory::News,
            ArticleSource::Tanshin | ArticleSource::Yuuhou | ArticleSource::Other => {
                NewsCategory::Ir
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NewsCategory {
    News,
    Ir,
    GroupEvent,
}

impl NewsCategory {
    pub fn marker_color(&self) -> &'static str {
        match self {
            NewsCategory::News => "#0091EA",
            NewsCategory::Ir => "#9E9D24",
            NewsCategory::GroupEvent => "#EEFF41",
        }
    }
}

// ==============================================================================
// Merged feed item
// ==============================================================================

/// Price-history-derived significance statistics for one news item. All four
/// are fractions (0.034 = +3.4%); a score whose inputs are missing is 0.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct ImpactScores {
    pub roc1d: f64,
    pub roc5d: f64,
    pub stock_impact: f64,
    pub volume_impact: f64,
}

/// One entry of the merged news/IR/event feed shown under the chart and
/// pinned onto it as markers.
#[derive(Debug, Clone, Serialize)]
pub struct NewsItem {
    pub id: Uuid,
    pub category: NewsCategory,
    pub type_code: String,
    pub stock_issue_code: String,
    pub timestamp: DateTime<Utc>,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_ref: Option<String>,
    pub status: ImpactScores,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewsQueryParams {
    /// Comma-joined instrument codes to restrict the feed to.
    pub codes: Option<String>,
    pub q: Option<String>,
    pub page: Option<i64>,
}
