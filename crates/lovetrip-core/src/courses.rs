//! Derivation of per-(region, course type) summaries from a batch of places.
//!
//! A summary is descriptive metadata only: it can always be recomputed from
//! the places table, so the persistence layer treats it as a write-through
//! cache keyed by the synthetic id.

use serde::{Deserialize, Serialize};

use crate::places::{CourseType, NewPlace};

/// Aggregate descriptive record for one (region, course type) group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseSummary {
    /// Synthetic id: `{course_type}-{region}-{area_code|unknown}`,
    /// lowercased, spaces replaced with hyphens.
    pub id: String,
    pub title: String,
    pub region: String,
    pub course_type: CourseType,
    pub description: String,
    pub image_url: Option<String>,
    pub place_count: i32,
    pub area_code: Option<i32>,
    pub sigungu_code: Option<i32>,
}

/// Builds the summary for one group of places believed to share a region and
/// course type. Returns `None` when the group is empty.
///
/// The representative image is the first place in the group that carries one;
/// `place_count` is a snapshot of this run's group size, not a live count.
#[must_use]
pub fn derive_course_summary(
    region: &str,
    course_type: CourseType,
    places: &[NewPlace],
    area_code: Option<i32>,
    sigungu_code: Option<i32>,
) -> Option<CourseSummary> {
    if places.is_empty() {
        return None;
    }

    let labels = distinct_category_labels(places);
    let title = format!("{region} {} 코스", course_type.label_ko());
    let description = format!(
        "{region}의 추천 {} 명소: {}",
        course_type.label_ko(),
        labels.join(", ")
    );
    let image_url = places.iter().find_map(|p| p.image_url.clone());
    let place_count = i32::try_from(places.len()).unwrap_or(i32::MAX);

    Some(CourseSummary {
        id: summary_id(region, course_type, area_code),
        title,
        region: region.to_owned(),
        course_type,
        description,
        image_url,
        place_count,
        area_code,
        sigungu_code,
    })
}

fn summary_id(region: &str, course_type: CourseType, area_code: Option<i32>) -> String {
    let area = area_code.map_or_else(|| "unknown".to_owned(), |c| c.to_string());
    format!("{}-{region}-{area}", course_type.as_str())
        .to_lowercase()
        .replace(' ', "-")
}

/// Distinct category labels present in the group, in order of first appearance.
fn distinct_category_labels(places: &[NewPlace]) -> Vec<&'static str> {
    let mut labels: Vec<&'static str> = Vec::new();
    for place in places {
        let label = place.category.label_ko();
        if !labels.contains(&label) {
            labels.push(label);
        }
    }
    labels
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::places::PlaceCategory;

    fn make_place(content_id: &str, category: PlaceCategory, image: Option<&str>) -> NewPlace {
        NewPlace {
            tour_content_id: content_id.to_owned(),
            tour_content_type_id: 39,
            name: format!("place {content_id}"),
            lat: 37.5,
            lng: 127.0,
            category,
            rating: 0.0,
            price_level: 0,
            description: None,
            image_url: image.map(str::to_owned),
            image_url2: None,
            address: None,
            phone: None,
            opening_hours: None,
            homepage: None,
            zipcode: None,
            overview: None,
            area_code: Some(1),
            sigungu_code: None,
            category1: None,
            category2: None,
            category3: None,
            map_level: None,
            course_types: vec![CourseType::Date],
            created_time: None,
            modified_time: None,
        }
    }

    #[test]
    fn empty_group_yields_no_summary() {
        assert!(derive_course_summary("서울", CourseType::Date, &[], Some(1), None).is_none());
    }

    #[test]
    fn summary_id_includes_type_region_and_area() {
        let places = vec![make_place("100", PlaceCategory::Food, None)];
        let summary =
            derive_course_summary("서울", CourseType::Date, &places, Some(1), None).unwrap();
        assert_eq!(summary.id, "date-서울-1");
    }

    #[test]
    fn summary_id_uses_unknown_without_area_code() {
        let places = vec![make_place("100", PlaceCategory::Food, None)];
        let summary = derive_course_summary("서울", CourseType::Travel, &places, None, None).unwrap();
        assert_eq!(summary.id, "travel-서울-unknown");
    }

    #[test]
    fn summary_id_hyphenates_spaces() {
        let places = vec![make_place("100", PlaceCategory::Food, None)];
        let summary =
            derive_course_summary("New Region", CourseType::Date, &places, Some(7), None).unwrap();
        assert_eq!(summary.id, "date-new-region-7");
    }

    #[test]
    fn representative_image_is_first_non_null() {
        let places = vec![
            make_place("1", PlaceCategory::Food, None),
            make_place("2", PlaceCategory::Food, Some("https://img.example/2.jpg")),
            make_place("3", PlaceCategory::Food, Some("https://img.example/3.jpg")),
        ];
        let summary =
            derive_course_summary("서울", CourseType::Date, &places, Some(1), None).unwrap();
        assert_eq!(
            summary.image_url.as_deref(),
            Some("https://img.example/2.jpg")
        );
    }

    #[test]
    fn description_lists_distinct_categories_once() {
        let places = vec![
            make_place("1", PlaceCategory::Food, None),
            make_place("2", PlaceCategory::Museum, None),
            make_place("3", PlaceCategory::Food, None),
        ];
        let summary =
            derive_course_summary("서울", CourseType::Date, &places, Some(1), None).unwrap();
        assert_eq!(summary.place_count, 3);
        assert!(summary.description.contains("음식점"));
        assert!(summary.description.contains("문화시설"));
        assert_eq!(summary.description.matches("음식점").count(), 1);
    }

    #[test]
    fn title_follows_course_type() {
        let places = vec![make_place("1", PlaceCategory::View, None)];
        let travel =
            derive_course_summary("제주", CourseType::Travel, &places, Some(39), None).unwrap();
        assert_eq!(travel.title, "제주 여행 코스");
        let date = derive_course_summary("제주", CourseType::Date, &places, Some(39), None).unwrap();
        assert_eq!(date.title, "제주 데이트 코스");
    }
}
