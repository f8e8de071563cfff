pub(crate) mod derived_stats_job;
