//! Write operations for the `course_summaries` table.
//!
//! Summaries are a write-through cache keyed by the synthetic id; re-running
//! a sync for the same (region, course type) refreshes the row in place.

use lovetrip_core::CourseSummary;
use sqlx::PgPool;

use crate::DbError;

/// Inserts or refreshes the summary row for its synthetic id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
pub async fn upsert_course_summary(pool: &PgPool, summary: &CourseSummary) -> Result<(), DbError> {
    sqlx::query(
        "INSERT INTO course_summaries \
             (id, title, region, course_type, description, image_url, \
              place_count, area_code, sigungu_code) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
         ON CONFLICT (id) DO UPDATE SET \
             title        = EXCLUDED.title, \
             region       = EXCLUDED.region, \
             course_type  = EXCLUDED.course_type, \
             description  = EXCLUDED.description, \
             image_url    = EXCLUDED.image_url, \
             place_count  = EXCLUDED.place_count, \
             area_code    = EXCLUDED.area_code, \
             sigungu_code = EXCLUDED.sigungu_code, \
             updated_at   = NOW()",
    )
    .bind(&summary.id)
    .bind(&summary.title)
    .bind(&summary.region)
    .bind(summary.course_type.as_str())
    .bind(&summary.description)
    .bind(&summary.image_url)
    .bind(summary.place_count)
    .bind(summary.area_code)
    .bind(summary.sigungu_code)
    .execute(pool)
    .await?;

    Ok(())
}
