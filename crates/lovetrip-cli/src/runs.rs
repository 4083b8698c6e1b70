//! The `runs` command: recent sync run history.

/// Prints a table of the most recent sync runs.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub(crate) async fn run_list_runs(pool: &sqlx::PgPool, limit: i64) -> anyhow::Result<()> {
    let runs = lovetrip_db::list_sync_runs(pool, limit).await?;

    if runs.is_empty() {
        println!("no sync runs recorded yet; run `sync` first");
        return Ok(());
    }

    let header = format!(
        "{:<21}{:<11}{:>9}{:>9}{:>8}{:>10}",
        "STARTED", "STATUS", "INSERTED", "UPDATED", "ERRORS", "DURATION"
    );
    println!("{header}");
    for run in &runs {
        let started = run.started_at.format("%Y-%m-%d %H:%M:%S").to_string();
        let duration = run
            .duration_seconds
            .map_or_else(|| "-".to_string(), |secs| format!("{secs:.1}s"));
        println!(
            "{:<21}{:<11}{:>9}{:>9}{:>8}{:>10}",
            started, run.status, run.items_inserted, run.items_updated, run.items_errors, duration
        );
    }

    Ok(())
}
