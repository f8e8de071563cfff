use anyhow::Context;
use futures::future::join_all;
use tracing::{info, warn};

use crate::db::stock_issue_queries;
use crate::services::derived_stats_service;
use crate::services::scheduler::JobContext;

#[derive(Debug, Clone, Copy, Default)]
pub struct JobSummary {
    pub updated: usize,
    pub failed: usize,
}

/// Nightly pass: recompute turnover and the moving averages for every known
/// instrument. A failing instrument is logged and skipped, not fatal.
pub async fn refresh_all_derived_stats(context: JobContext) -> anyhow::Result<JobSummary> {
    let codes = stock_issue_queries::fetch_all_codes(&context.pool)
        .await
        .context("listing instrument codes for derived-stats refresh")?;
    info!("📊 Refreshing derived stats for {} instruments", codes.len());

    let results = join_all(
        codes
            .iter()
            .map(|code| derived_stats_service::refresh_for_code(&context.pool, code)),
    )
    .await;

    let mut summary = JobSummary::default();
    for (code, result) in codes.iter().zip(results) {
        match result {
            Ok(_) => summary.updated += 1,
            Err(e) => {
                warn!("⚠️ Derived stats failed for {}: {}", code, e);
                summary.failed += 1;
            }
        }
    }

    Ok(summary)
}
