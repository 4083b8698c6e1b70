//! The `sync` command: full Tour API crawl for date & travel places.
//!
//! Tasks run strictly sequentially, in construction order, to respect the
//! upstream's rate limits and keep failure accounting simple. A single
//! task's failure is logged and counted, never fatal; only a run with zero
//! successful writes and at least one error (or an error escaping the task
//! loop) is reported as failed.

mod log;
mod tasks;

use std::time::Instant;

use lovetrip_core::{derive_course_summary, AppConfig, CourseType, NewPlace};
use lovetrip_db::{BatchReport, RetryPolicy, SyncRunOutcome};
use lovetrip_tourapi::{transform_item, TourApiClient};

use self::log::RunLog;
use self::tasks::{build_task_list, SyncTask};

/// Last N transcript lines persisted with the run record.
const RUN_LOG_TAIL: usize = 100;

/// Aggregate counters threaded through the task loop.
#[derive(Debug, Default, Clone, Copy)]
struct SyncTotals {
    inserted: u64,
    updated: u64,
    errors: u64,
    date_places: u64,
    travel_places: u64,
}

impl SyncTotals {
    fn record(&mut self, category: CourseType, report: BatchReport) {
        self.inserted = self.inserted.saturating_add(report.inserted);
        self.updated = self.updated.saturating_add(report.updated);
        self.errors = self.errors.saturating_add(report.errors);

        let written = report.inserted.saturating_add(report.updated);
        match category {
            CourseType::Date => self.date_places = self.date_places.saturating_add(written),
            CourseType::Travel => self.travel_places = self.travel_places.saturating_add(written),
        }
    }

    fn written(&self) -> u64 {
        self.inserted.saturating_add(self.updated)
    }

    /// Partial success is success; only a run with zero successful writes
    /// and at least one error counts as failed.
    fn is_failure(&self) -> bool {
        self.written() == 0 && self.errors > 0
    }

    fn outcome(&self, duration_seconds: f64, logs: Vec<String>) -> SyncRunOutcome {
        SyncRunOutcome {
            items_inserted: i32::try_from(self.inserted).unwrap_or(i32::MAX),
            items_updated: i32::try_from(self.updated).unwrap_or(i32::MAX),
            items_errors: i32::try_from(self.errors).unwrap_or(i32::MAX),
            duration_seconds,
            logs,
        }
    }
}

/// Prints the task plan without touching the network or the database.
pub(crate) fn print_task_plan() {
    let all_tasks = build_task_list();
    let date_count = all_tasks
        .iter()
        .filter(|t| t.category == CourseType::Date)
        .count();
    println!(
        "dry-run: would execute {} tasks ({} date, {} travel) across {} regions",
        all_tasks.len(),
        date_count,
        all_tasks.len() - date_count,
        lovetrip_core::AREAS.len()
    );
    for task in &all_tasks {
        println!(
            "  {:<6} area {:>2} ({}) type {:>2} ({})",
            task.category.as_str(),
            task.area.code,
            task.area.name,
            task.content_type.code(),
            task.content_type.name_ko()
        );
    }
}

/// Runs the full sync: build the task list, crawl every task sequentially,
/// and bookend the run with a `sync_runs` record.
///
/// Run bookkeeping is best-effort: a failure to write the run record is
/// logged and never blocks the sync itself.
///
/// # Errors
///
/// Returns an error if the API key is missing, the client cannot be built,
/// or the run ends with errors and no successful writes. Individual task
/// failures are logged and counted, not propagated.
pub(crate) async fn run_sync(pool: &sqlx::PgPool, config: &AppConfig) -> anyhow::Result<()> {
    let service_key = config
        .tour_api_key
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("TOUR_API_KEY is not set; cannot run sync"))?;

    let client = TourApiClient::new(
        &config.tour_api_base_url,
        service_key,
        config.crawler_request_timeout_secs,
        config.crawler_throttle_delay_ms,
    )
    .map_err(|e| anyhow::anyhow!("failed to build Tour API client: {e}"))?;

    let policy = RetryPolicy::new(
        config.crawler_max_attempts,
        config.crawler_retry_backoff_base_ms,
    );
    let all_tasks = build_task_list();

    let run_id = match lovetrip_db::create_sync_run(pool, "cli").await {
        Ok(run) => Some(run.id),
        Err(e) => {
            tracing::error!(
                error = %e,
                "failed to record sync run start; continuing without a run record"
            );
            None
        }
    };

    let mut run_log = RunLog::default();
    run_log.info(format!(
        "tour sync started: {} tasks over {} regions",
        all_tasks.len(),
        lovetrip_core::AREAS.len()
    ));

    let started = Instant::now();
    let mut totals = SyncTotals::default();

    for (index, task) in all_tasks.iter().enumerate() {
        log_task_header(&mut run_log, task, index, all_tasks.len(), started);

        match sync_task(pool, &client, config, &policy, task, &mut run_log).await {
            Ok(report) => {
                totals.record(task.category, report);
                run_log.info(format!(
                    "cumulative: inserted {}, updated {}, errors {}",
                    totals.inserted, totals.updated, totals.errors
                ));
            }
            Err(e) => {
                run_log.error(format!(
                    "task failed (area {}, type {}): {e:#}",
                    task.area.code,
                    task.content_type.code()
                ));
                totals.errors = totals.errors.saturating_add(1);
            }
        }
    }

    let duration_seconds = started.elapsed().as_secs_f64();
    run_log.success(format!(
        "sync finished in {duration_seconds:.1}s: inserted {}, updated {}, errors {}; \
         date places {}, travel places {}",
        totals.inserted, totals.updated, totals.errors, totals.date_places, totals.travel_places
    ));

    let outcome = totals.outcome(duration_seconds, run_log.tail(RUN_LOG_TAIL));
    if totals.is_failure() {
        finalize_run(
            pool,
            run_id,
            &outcome,
            Some("no records written and errors occurred"),
        )
        .await;
        anyhow::bail!(
            "sync finished with {} errors and no successful writes",
            totals.errors
        );
    }

    finalize_run(pool, run_id, &outcome, None).await;
    Ok(())
}

/// Crawls one (region, content type, category) task: fetch all pages,
/// transform, tag with the task's category, refresh the course summary, and
/// batch-upsert in chunks.
async fn sync_task(
    pool: &sqlx::PgPool,
    client: &TourApiClient,
    config: &AppConfig,
    policy: &RetryPolicy,
    task: &SyncTask,
    run_log: &mut RunLog,
) -> anyhow::Result<BatchReport> {
    let items = client
        .fetch_all_pages(
            Some(task.area.code),
            Some(task.content_type.code()),
            config.crawler_max_pages,
        )
        .await;

    if items.is_empty() {
        run_log.warning(format!(
            "no data for {} / {}; skipping",
            task.area.name,
            task.content_type.name_ko()
        ));
        return Ok(BatchReport::default());
    }
    run_log.success(format!(
        "{} places fetched for {} / {}",
        items.len(),
        task.area.name,
        task.content_type.name_ko()
    ));

    let mut places: Vec<NewPlace> = items.iter().map(transform_item).collect();
    apply_task_category(&mut places, task.category);

    if let Some(summary) = derive_course_summary(
        task.area.name,
        task.category,
        &places,
        Some(task.area.code),
        None,
    ) {
        lovetrip_db::upsert_course_summary(pool, &summary).await?;
        run_log.info(format!(
            "course summary refreshed: {} ({} places)",
            summary.id, summary.place_count
        ));
    }

    let mut report = BatchReport::default();
    let batch_size = config.crawler_batch_size.max(1);
    let total_batches = places.len().div_ceil(batch_size);
    for (batch_index, chunk) in places.chunks(batch_size).enumerate() {
        run_log.progress(format!(
            "batch {}/{} ({} items)",
            batch_index + 1,
            total_batches,
            chunk.len()
        ));
        let batch = lovetrip_db::upsert_places_batch(pool, chunk, policy).await;
        run_log.success(format!(
            "inserted {}, updated {}, errors {}",
            batch.inserted, batch.updated, batch.errors
        ));
        report.absorb(batch);
    }

    Ok(report)
}

/// Ensures every place carries the task's category: covers Etc items the
/// transform left untagged and tops up places whose inferred set did not
/// already include it.
fn apply_task_category(places: &mut [NewPlace], category: CourseType) {
    for place in places {
        if !place.course_types.contains(&category) {
            place.course_types.push(category);
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn log_task_header(
    run_log: &mut RunLog,
    task: &SyncTask,
    index: usize,
    total: usize,
    started: Instant,
) {
    let percent = ((index + 1) as f64 / total as f64) * 100.0;
    run_log.progress(format!(
        "[{}/{}] {percent:.1}% {} / {} ({})",
        index + 1,
        total,
        task.area.name,
        task.content_type.name_ko(),
        task.category.label_ko()
    ));

    if index > 0 {
        let elapsed = started.elapsed().as_secs_f64();
        let avg_per_task = elapsed / index as f64;
        let remaining_min = (avg_per_task * (total - index) as f64 / 60.0).ceil();
        run_log.info(format!("estimated {remaining_min:.0} min remaining"));
    }
}

/// Finalizes the run record on a best-effort basis; bookkeeping failures are
/// logged and swallowed so they never surface as a sync failure.
async fn finalize_run(
    pool: &sqlx::PgPool,
    run_id: Option<i64>,
    outcome: &SyncRunOutcome,
    error: Option<&str>,
) {
    let Some(id) = run_id else { return };
    let result = match error {
        Some(message) => lovetrip_db::fail_sync_run(pool, id, outcome, message).await,
        None => lovetrip_db::complete_sync_run(pool, id, outcome).await,
    };
    if let Err(e) = result {
        tracing::error!(run_id = id, error = %e, "failed to finalize sync run record");
    }
}

#[cfg(test)]
#[path = "sync_test.rs"]
mod tests;
