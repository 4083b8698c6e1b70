//! Write operations for the `places` table.
//!
//! Deduplication is keyed on `tour_content_id`: a place re-observed on a
//! later run updates in place and never duplicates. The pipeline never
//! deletes rows; deletion is out of scope.

use std::time::Duration;

use lovetrip_core::NewPlace;
use sqlx::PgPool;

use crate::retry::{retry_with_backoff, RetryPolicy};
use crate::DbError;

/// After this many consecutive failed records the batch pauses before
/// continuing, so a systemic outage does not produce thousands of rapid-fire
/// failed retries in a tight loop.
const CONSECUTIVE_ERROR_PAUSE_THRESHOLD: u32 = 10;
const CONSECUTIVE_ERROR_PAUSE: Duration = Duration::from_secs(5);

/// Courtesy delay between successive records, applied after every non-final
/// item to avoid hammering the store.
const INTER_ITEM_DELAY: Duration = Duration::from_millis(50);

/// Running counts for one batch of upserts.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchReport {
    pub inserted: u64,
    pub updated: u64,
    pub errors: u64,
}

impl BatchReport {
    /// Folds another report into this one.
    pub fn absorb(&mut self, other: BatchReport) {
        self.inserted = self.inserted.saturating_add(other.inserted);
        self.updated = self.updated.saturating_add(other.updated);
        self.errors = self.errors.saturating_add(other.errors);
    }
}

/// Tracks consecutive failures and decides when the batch must cool down.
#[derive(Debug, Default)]
struct FailureStreak {
    consecutive: u32,
}

impl FailureStreak {
    /// Records one failure; returns the cooldown to apply when the streak
    /// reaches the threshold. The counter resets when the pause fires.
    fn record_failure(&mut self) -> Option<Duration> {
        self.consecutive += 1;
        if self.consecutive >= CONSECUTIVE_ERROR_PAUSE_THRESHOLD {
            self.consecutive = 0;
            Some(CONSECUTIVE_ERROR_PAUSE)
        } else {
            None
        }
    }

    fn reset(&mut self) {
        self.consecutive = 0;
    }
}

/// Inserts or updates one place keyed by `tour_content_id`.
///
/// Looks the record up first, then updates or inserts. If the insert loses a
/// race with a concurrent writer (unique violation on `tour_content_id`), the
/// record is re-queried and updated instead of surfacing the conflict.
///
/// Returns `(id, is_new)`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if a query fails, or [`DbError::NotFound`] if
/// the conflict fallback cannot find the row that just won the race.
pub async fn upsert_place(pool: &PgPool, place: &NewPlace) -> Result<(i64, bool), DbError> {
    if let Some(id) = find_place_id(pool, &place.tour_content_id).await? {
        update_place(pool, id, place).await?;
        return Ok((id, false));
    }

    match insert_place(pool, place).await {
        Ok(id) => Ok((id, true)),
        Err(DbError::Sqlx(sqlx::Error::Database(db_err))) if db_err.is_unique_violation() => {
            // Lost the insert race; the row exists now, so update it.
            let id = find_place_id(pool, &place.tour_content_id)
                .await?
                .ok_or(DbError::NotFound)?;
            update_place(pool, id, place).await?;
            Ok((id, false))
        }
        Err(err) => Err(err),
    }
}

/// [`upsert_place`] wrapped in the transient-failure retry policy.
///
/// # Errors
///
/// Returns the final error once the attempt budget is exhausted, or
/// immediately for non-transient failures.
pub async fn upsert_place_with_retry(
    pool: &PgPool,
    place: &NewPlace,
    policy: &RetryPolicy,
) -> Result<(i64, bool), DbError> {
    retry_with_backoff(policy, || upsert_place(pool, place)).await
}

/// Upserts a batch of places sequentially, counting outcomes per record.
///
/// Per-item failures are logged and counted, never propagated: the returned
/// [`BatchReport`] is the only failure signal. Records are processed one at a
/// time, in order, to bound load on the store; 10 consecutive failures
/// trigger a 5 second cooldown before the loop continues.
pub async fn upsert_places_batch(
    pool: &PgPool,
    places: &[NewPlace],
    policy: &RetryPolicy,
) -> BatchReport {
    let mut report = BatchReport::default();
    let mut streak = FailureStreak::default();

    for (idx, place) in places.iter().enumerate() {
        match upsert_place_with_retry(pool, place, policy).await {
            Ok((_, true)) => {
                report.inserted += 1;
                streak.reset();
            }
            Ok((_, false)) => {
                report.updated += 1;
                streak.reset();
            }
            Err(err) => {
                report.errors += 1;
                tracing::error!(
                    tour_content_id = %place.tour_content_id,
                    error = %err,
                    "failed to upsert place"
                );
                if let Some(pause) = streak.record_failure() {
                    tracing::warn!(
                        threshold = CONSECUTIVE_ERROR_PAUSE_THRESHOLD,
                        pause_secs = pause.as_secs(),
                        "consecutive upsert failures; pausing before continuing"
                    );
                    tokio::time::sleep(pause).await;
                }
            }
        }

        if idx + 1 < places.len() {
            tokio::time::sleep(INTER_ITEM_DELAY).await;
        }
    }

    report
}

async fn find_place_id(pool: &PgPool, tour_content_id: &str) -> Result<Option<i64>, DbError> {
    let id = sqlx::query_scalar::<_, i64>("SELECT id FROM places WHERE tour_content_id = $1")
        .bind(tour_content_id)
        .fetch_optional(pool)
        .await?;
    Ok(id)
}

fn course_types_vec(place: &NewPlace) -> Vec<String> {
    place
        .course_types
        .iter()
        .map(|c| c.as_str().to_owned())
        .collect()
}

async fn insert_place(pool: &PgPool, place: &NewPlace) -> Result<i64, DbError> {
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO places \
             (tour_content_id, tour_content_type_id, name, lat, lng, category, \
              rating, price_level, description, image_url, image_url2, address, \
              phone, opening_hours, homepage, zipcode, overview, area_code, \
              sigungu_code, category1, category2, category3, map_level, \
              course_types, created_time, modified_time) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, \
                 $15, $16, $17, $18, $19, $20, $21, $22, $23, $24, $25, $26) \
         RETURNING id",
    )
    .bind(&place.tour_content_id)
    .bind(place.tour_content_type_id)
    .bind(&place.name)
    .bind(place.lat)
    .bind(place.lng)
    .bind(place.category.as_str())
    .bind(place.rating)
    .bind(place.price_level)
    .bind(&place.description)
    .bind(&place.image_url)
    .bind(&place.image_url2)
    .bind(&place.address)
    .bind(&place.phone)
    .bind(&place.opening_hours)
    .bind(&place.homepage)
    .bind(&place.zipcode)
    .bind(&place.overview)
    .bind(place.area_code)
    .bind(place.sigungu_code)
    .bind(&place.category1)
    .bind(&place.category2)
    .bind(&place.category3)
    .bind(place.map_level)
    .bind(course_types_vec(place))
    .bind(place.created_time)
    .bind(place.modified_time)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

async fn update_place(pool: &PgPool, id: i64, place: &NewPlace) -> Result<(), DbError> {
    sqlx::query(
        "UPDATE places SET \
             tour_content_type_id = $1, \
             name          = $2, \
             lat           = $3, \
             lng           = $4, \
             category      = $5, \
             rating        = $6, \
             price_level   = $7, \
             description   = $8, \
             image_url     = $9, \
             image_url2    = $10, \
             address       = $11, \
             phone         = $12, \
             opening_hours = $13, \
             homepage      = $14, \
             zipcode       = $15, \
             overview      = $16, \
             area_code     = $17, \
             sigungu_code  = $18, \
             category1     = $19, \
             category2     = $20, \
             category3     = $21, \
             map_level     = $22, \
             course_types  = $23, \
             created_time  = $24, \
             modified_time = $25, \
             updated_at    = NOW() \
         WHERE id = $26",
    )
    .bind(place.tour_content_type_id)
    .bind(&place.name)
    .bind(place.lat)
    .bind(place.lng)
    .bind(place.category.as_str())
    .bind(place.rating)
    .bind(place.price_level)
    .bind(&place.description)
    .bind(&place.image_url)
    .bind(&place.image_url2)
    .bind(&place.address)
    .bind(&place.phone)
    .bind(&place.opening_hours)
    .bind(&place.homepage)
    .bind(&place.zipcode)
    .bind(&place.overview)
    .bind(place.area_code)
    .bind(place.sigungu_code)
    .bind(&place.category1)
    .bind(&place.category2)
    .bind(&place.category3)
    .bind(place.map_level)
    .bind(course_types_vec(place))
    .bind(place.created_time)
    .bind(place.modified_time)
    .bind(id)
    .execute(pool)
    .await?;

    Ok(())
}
