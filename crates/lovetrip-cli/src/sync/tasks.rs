//! Task-list construction for a full sync.

use lovetrip_core::{Area, ContentType, CourseType, AREAS};

/// Content types crawled for date courses.
pub(crate) const DATE_CONTENT_TYPES: &[ContentType] = &[
    ContentType::Restaurant,
    ContentType::Shopping,
    ContentType::CulturalFacility,
];

/// Content types crawled for travel courses.
pub(crate) const TRAVEL_CONTENT_TYPES: &[ContentType] = &[
    ContentType::TouristSpot,
    ContentType::CulturalFacility,
    ContentType::LeisureSports,
    ContentType::Accommodation,
    ContentType::TravelCourse,
    ContentType::Festival,
];

/// One unit of crawl work: a (region, content type, category) triple.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SyncTask {
    pub area: Area,
    pub content_type: ContentType,
    pub category: CourseType,
}

/// Builds the full task list: every region crossed with the date content
/// types, then every region crossed with the travel content types.
///
/// Content types relevant to both categories (cultural facilities) appear
/// once under each, producing two fetch passes over overlapping upstream
/// data. The duplication is deliberate: the category drives the course-type
/// tagging and the per-(region, category) summary, so each pass is distinct
/// work.
pub(crate) fn build_task_list() -> Vec<SyncTask> {
    let date_tasks = AREAS.iter().flat_map(|area| {
        DATE_CONTENT_TYPES.iter().map(move |content_type| SyncTask {
            area: *area,
            content_type: *content_type,
            category: CourseType::Date,
        })
    });
    let travel_tasks = AREAS.iter().flat_map(|area| {
        TRAVEL_CONTENT_TYPES
            .iter()
            .map(move |content_type| SyncTask {
                area: *area,
                content_type: *content_type,
                category: CourseType::Travel,
            })
    });
    date_tasks.chain(travel_tasks).collect()
}
