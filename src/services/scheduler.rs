use std::sync::Arc;

use sqlx::PgPool;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info};

use crate::errors::AppError;
use crate::jobs::derived_stats_job;

// Context passed to job functions
#[derive(Clone)]
pub struct JobContext {
    pub pool: Arc<PgPool>,
}

pub struct JobSchedulerService {
    scheduler: JobScheduler,
    context: JobContext,
}

impl JobSchedulerService {
    pub async fn new(pool: Arc<PgPool>) -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::External(format!("Failed to create scheduler: {}", e)))?;

        Ok(Self {
            scheduler,
            context: JobContext { pool },
        })
    }

    /// Start all scheduled jobs
    pub async fn start(&mut self) -> Result<(), AppError> {
        info!("🚀 Starting job scheduler...");

        // Runs after the feed has delivered the previous session's prices
        // (format: sec min hour day month weekday)
        self.schedule_job(
            "0 30 2 * * *",
            "refresh_derived_stats",
            "Daily at 2:30 AM",
            derived_stats_job::refresh_all_derived_stats,
        )
        .await?;

        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::External(format!("Failed to start scheduler: {}", e)))?;

        info!("✅ Job scheduler started successfully");
        Ok(())
    }

    async fn schedule_job<F, Fut>(
        &mut self,
        schedule: &str,
        job_name: &'static str,
        description: &str,
        job_fn: F,
    ) -> Result<(), AppError>
    where
        F: Fn(JobContext) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = anyhow::Result<derived_stats_job::JobSummary>>
            + Send
            + 'static,
    {
        let context = self.context.clone();
        let job_fn = Arc::new(job_fn);

        let job = Job::new_async(schedule, move |_uuid, _l| {
            let context = context.clone();
            let job_fn = job_fn.clone();
            Box::pin(async move {
                match job_fn(context).await {
                    Ok(summary) => {
                        info!(
                            "✅ Job {} finished: {} updated, {} failed",
                            job_name, summary.updated, summary.failed
                        );
                    }
                    Err(e) => error!("✗ Job {} failed: {}", job_name, e),
                }
            })
        })
        .map_err(|e| AppError::External(format!("Failed to create job {}: {}", job_name, e)))?;

        self.scheduler
            .add(job)
            .await
            .map_err(|e| AppError::External(format!("Failed to add job {}: {}", job_name, e)))?;

        info!("📅 Scheduled: {} - {} [cron: {}]", job_name, description, schedule);
        Ok(())
    }
}
