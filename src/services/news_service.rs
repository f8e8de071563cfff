use std::collections::HashMap;

use chrono::NaiveTime;
use sqlx::PgPool;
use tracing::error;
use uuid::Uuid;

use crate::db::{news_queries, price_queries};
use crate::errors::AppError;
use crate::models::{Article, ArticleSource, GroupEvent, NewsCategory, NewsItem, PriceRecord};
use crate::services::impact_service;

pub const ARTICLE_PAGE_SIZE: i64 = 50;

/// The merged news/IR/event feed for a group, restricted to `codes` when
/// non-empty, with impact statistics computed from each instrument's price
/// history. Ordered by timestamp ascending, matching the chart's x-axis.
pub async fn fetch_news_items(
    pool: &PgPool,
    group_id: Uuid,
    codes: &[String],
    query: Option<&str>,
    page: i64,
) -> Result<Vec<NewsItem>, AppError> {
    let offset = (page.max(1) - 1) * ARTICLE_PAGE_SIZE;

    let articles = news_queries::fetch_articles(pool, codes, query, ARTICLE_PAGE_SIZE, offset)
        .await
        .map_err(|e| {
            error!("Failed to fetch articles for group {}: {}", group_id, e);
            AppError::Db(e)
        })?;

    let events = news_queries::fetch_group_events(pool, group_id, codes)
        .await
        .map_err(|e| {
            error!("Failed to fetch group events for group {}: {}", group_id, e);
            AppError::Db(e)
        })?;

    // One price-history load per involved instrument feeds every score.
    let mut involved: Vec<String> = articles
        .iter()
        .map(|a| a.stock_issue_code.clone())
        .chain(events.iter().map(|e| e.stock_issue_code.clone()))
        .collect();
    involved.sort();
    involved.dedup();

    let histories = price_queries::fetch_all_batch(pool, &involved).await?;

    let mut items: Vec<NewsItem> = articles
        .into_iter()
        .map(|a| article_to_item(a, &histories))
        .chain(events.into_iter().map(|e| event_to_item(e, &histories)))
        .collect();

    items.sort_by_key(|item| item.timestamp);

    Ok(items)
}

fn scores_for(
    histories: &HashMap<String, Vec<PriceRecord>>,
    code: &str,
    date: chrono::NaiveDate,
) -> crate::models::ImpactScores {
    histories
        .get(code)
        .map(|records| impact_service::impact_scores(records, date))
        .unwrap_or_default()
}

fn article_to_item(article: Article, histories: &HashMap<String, Vec<PriceRecord>>) -> NewsItem {
    let category = ArticleSource::parse(&article.source_code)
        .map(|source| source.category())
        .unwrap_or(NewsCategory::Ir);
    let status = scores_for(
        histories,
        &article.stock_issue_code,
        article.published_at.date_naive(),
    );

    NewsItem {
        id: article.id,
        category,
        type_code: article.source_code,
        stock_issue_code: article.stock_issue_code,
        timestamp: article.published_at,
        description: article.title,
        source_ref: article.path,
        status,
    }
}

fn event_to_item(event: GroupEvent, histories: &HashMap<String, Vec<PriceRecord>>) -> NewsItem {
    let status = scores_for(histories, &event.stock_issue_code, event.date);

    NewsItem {
        id: event.id,
        category: NewsCategory::GroupEvent,
        type_code: event.event_type_code,
        stock_issue_code: event.stock_issue_code,
        timestamp: event.date.and_time(NaiveTime::MIN).and_utc(),
        description: event.memo,
        source_ref: None,
        status,
    }
}
