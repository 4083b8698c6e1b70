//! Domain types for crawled places: category tags, course types, and the
//! normalized record the persistence layer writes.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Category tag assigned to a place, derived from the Tour API content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlaceCategory {
    Cafe,
    Food,
    View,
    Museum,
    Etc,
}

impl PlaceCategory {
    /// Wire/database form of the tag.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PlaceCategory::Cafe => "CAFE",
            PlaceCategory::Food => "FOOD",
            PlaceCategory::View => "VIEW",
            PlaceCategory::Museum => "MUSEUM",
            PlaceCategory::Etc => "ETC",
        }
    }

    /// Korean display label, used in derived course descriptions.
    #[must_use]
    pub fn label_ko(self) -> &'static str {
        match self {
            PlaceCategory::Cafe => "카페",
            PlaceCategory::Food => "음식점",
            PlaceCategory::View => "관광지",
            PlaceCategory::Museum => "문화시설",
            PlaceCategory::Etc => "기타",
        }
    }

    /// Maps a Tour API content type code to a category tag.
    ///
    /// Unmapped codes (festivals, travel courses, leisure sports,
    /// accommodation, shopping, and anything the upstream adds later)
    /// fall through to [`PlaceCategory::Etc`].
    #[must_use]
    pub fn from_content_type_code(code: i32) -> Self {
        match code {
            12 => PlaceCategory::View,
            14 => PlaceCategory::Museum,
            39 => PlaceCategory::Food,
            _ => PlaceCategory::Etc,
        }
    }
}

/// Which kind of itinerary a place suits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CourseType {
    Date,
    Travel,
}

impl CourseType {
    /// Wire/database form of the tag.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            CourseType::Date => "date",
            CourseType::Travel => "travel",
        }
    }

    /// Korean display label.
    #[must_use]
    pub fn label_ko(self) -> &'static str {
        match self {
            CourseType::Date => "데이트",
            CourseType::Travel => "여행",
        }
    }
}

/// Coarse category codes used by the Tour API (`contentTypeId`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    TouristSpot,
    CulturalFacility,
    Festival,
    TravelCourse,
    LeisureSports,
    Accommodation,
    Shopping,
    Restaurant,
}

impl ContentType {
    /// Numeric code as sent on the wire.
    #[must_use]
    pub fn code(self) -> i32 {
        match self {
            ContentType::TouristSpot => 12,
            ContentType::CulturalFacility => 14,
            ContentType::Festival => 15,
            ContentType::TravelCourse => 25,
            ContentType::LeisureSports => 28,
            ContentType::Accommodation => 32,
            ContentType::Shopping => 38,
            ContentType::Restaurant => 39,
        }
    }

    /// Parses a numeric content type code. Returns `None` for codes the
    /// upstream documents but this pipeline does not crawl.
    #[must_use]
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            12 => Some(ContentType::TouristSpot),
            14 => Some(ContentType::CulturalFacility),
            15 => Some(ContentType::Festival),
            25 => Some(ContentType::TravelCourse),
            28 => Some(ContentType::LeisureSports),
            32 => Some(ContentType::Accommodation),
            38 => Some(ContentType::Shopping),
            39 => Some(ContentType::Restaurant),
            _ => None,
        }
    }

    /// Korean name as shown in progress output.
    #[must_use]
    pub fn name_ko(self) -> &'static str {
        match self {
            ContentType::TouristSpot => "관광지",
            ContentType::CulturalFacility => "문화시설",
            ContentType::Festival => "축제공연행사",
            ContentType::TravelCourse => "여행코스",
            ContentType::LeisureSports => "레포츠",
            ContentType::Accommodation => "숙박",
            ContentType::Shopping => "쇼핑",
            ContentType::Restaurant => "음식점",
        }
    }
}

/// Infers which course types a place suits from its category tag and the
/// upstream content type code.
///
/// An `Etc` place with no other signal yields an empty set; the sync
/// orchestrator assigns the current task's category to those explicitly.
#[must_use]
pub fn infer_course_types(category: PlaceCategory, content_type_code: i32) -> Vec<CourseType> {
    let content = ContentType::from_code(content_type_code);

    let both = matches!(category, PlaceCategory::Museum)
        || matches!(content, Some(ContentType::CulturalFacility));
    let date = both
        || matches!(category, PlaceCategory::Cafe | PlaceCategory::Food)
        || matches!(content, Some(ContentType::Shopping));
    let travel = both
        || matches!(category, PlaceCategory::View)
        || matches!(
            content,
            Some(
                ContentType::TravelCourse
                    | ContentType::LeisureSports
                    | ContentType::Accommodation
            )
        );

    let mut types = Vec::new();
    if date {
        types.push(CourseType::Date);
    }
    if travel {
        types.push(CourseType::Travel);
    }
    types
}

/// A normalized place ready for database persistence.
///
/// `tour_content_id` is the external identity; the store deduplicates on it.
/// `lat`/`lng` are `0.0` when the upstream omits coordinates; consumers
/// filter on nonzero coordinates themselves, matching upstream convention.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPlace {
    pub tour_content_id: String,
    pub tour_content_type_id: i32,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub category: PlaceCategory,
    pub rating: f64,
    pub price_level: i32,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub image_url2: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub opening_hours: Option<String>,
    pub homepage: Option<String>,
    pub zipcode: Option<String>,
    pub overview: Option<String>,
    pub area_code: Option<i32>,
    pub sigungu_code: Option<i32>,
    pub category1: Option<String>,
    pub category2: Option<String>,
    pub category3: Option<String>,
    pub map_level: Option<i32>,
    pub course_types: Vec<CourseType>,
    pub created_time: Option<NaiveDateTime>,
    pub modified_time: Option<NaiveDateTime>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_mapping_known_codes() {
        assert_eq!(
            PlaceCategory::from_content_type_code(12),
            PlaceCategory::View
        );
        assert_eq!(
            PlaceCategory::from_content_type_code(14),
            PlaceCategory::Museum
        );
        assert_eq!(
            PlaceCategory::from_content_type_code(39),
            PlaceCategory::Food
        );
    }

    #[test]
    fn category_mapping_defaults_to_etc() {
        for code in [15, 25, 28, 32, 38, 0, 99] {
            assert_eq!(
                PlaceCategory::from_content_type_code(code),
                PlaceCategory::Etc,
                "code {code} should map to Etc"
            );
        }
    }

    #[test]
    fn restaurant_infers_date_only() {
        let category = PlaceCategory::from_content_type_code(39);
        let types = infer_course_types(category, 39);
        assert_eq!(types, vec![CourseType::Date]);
    }

    #[test]
    fn tourist_spot_infers_travel_only() {
        let category = PlaceCategory::from_content_type_code(12);
        let types = infer_course_types(category, 12);
        assert_eq!(types, vec![CourseType::Travel]);
    }

    #[test]
    fn cultural_facility_infers_both() {
        let category = PlaceCategory::from_content_type_code(14);
        let types = infer_course_types(category, 14);
        assert_eq!(types, vec![CourseType::Date, CourseType::Travel]);
    }

    #[test]
    fn shopping_infers_date() {
        let category = PlaceCategory::from_content_type_code(38);
        let types = infer_course_types(category, 38);
        assert_eq!(types, vec![CourseType::Date]);
    }

    #[test]
    fn accommodation_and_travel_course_infer_travel() {
        for code in [25, 28, 32] {
            let category = PlaceCategory::from_content_type_code(code);
            let types = infer_course_types(category, code);
            assert_eq!(types, vec![CourseType::Travel], "code {code}");
        }
    }

    #[test]
    fn festival_infers_nothing() {
        let category = PlaceCategory::from_content_type_code(15);
        assert!(infer_course_types(category, 15).is_empty());
    }

    #[test]
    fn content_type_code_round_trip() {
        for content in [
            ContentType::TouristSpot,
            ContentType::CulturalFacility,
            ContentType::Festival,
            ContentType::TravelCourse,
            ContentType::LeisureSports,
            ContentType::Accommodation,
            ContentType::Shopping,
            ContentType::Restaurant,
        ] {
            assert_eq!(ContentType::from_code(content.code()), Some(content));
        }
        assert_eq!(ContentType::from_code(99), None);
    }
}
