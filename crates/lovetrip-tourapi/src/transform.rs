//! Normalization from raw Tour API items to [`lovetrip_core::NewPlace`].
//!
//! The mapping is deterministic and infallible: anything unparseable degrades
//! to a default (or `None` with a warning) rather than failing the batch.

use chrono::{NaiveDate, NaiveDateTime};
use lovetrip_core::{infer_course_types, NewPlace, PlaceCategory};

use crate::types::TourApiItem;

/// Maps one upstream item into the internal place schema.
///
/// The Tour API has no ratings or price levels, so both default to zero.
/// Course types are inferred from the category tag and content type; an item
/// with no signal gets an empty set for the orchestrator to fill in.
#[must_use]
pub fn transform_item(item: &TourApiItem) -> NewPlace {
    let content_type_code = item.content_type_id.parse::<i32>().unwrap_or(0);
    let category = PlaceCategory::from_content_type_code(content_type_code);
    let course_types = infer_course_types(category, content_type_code);

    NewPlace {
        tour_content_id: item.content_id.clone(),
        tour_content_type_id: content_type_code,
        name: item.title.clone(),
        // Upstream omits or zeroes coordinates for some listings; 0.0 is
        // preserved as-is so consumers can apply their own nonzero filter.
        lat: parse_coordinate(item.map_y.as_deref()),
        lng: parse_coordinate(item.map_x.as_deref()),
        category,
        rating: 0.0,
        price_level: 0,
        description: None,
        image_url: non_empty(item.first_image.as_deref()),
        image_url2: non_empty(item.first_image2.as_deref()),
        address: join_nonempty(&[item.addr1.as_deref(), item.addr2.as_deref()], " "),
        phone: non_empty(item.tel.as_deref()),
        opening_hours: join_nonempty(
            &[item.use_time.as_deref(), item.rest_date.as_deref()],
            " / ",
        ),
        homepage: non_empty(item.homepage.as_deref()),
        zipcode: non_empty(item.zipcode.as_deref()),
        overview: non_empty(item.overview.as_deref()),
        area_code: parse_code(item.area_code.as_deref()),
        sigungu_code: parse_code(item.sigungu_code.as_deref()),
        category1: non_empty(item.cat1.as_deref()),
        category2: non_empty(item.cat2.as_deref()),
        category3: non_empty(item.cat3.as_deref()),
        map_level: parse_code(item.map_level.as_deref()),
        course_types,
        created_time: parse_optional_date(item.created_time.as_deref(), "createdtime", item),
        modified_time: parse_optional_date(item.modified_time.as_deref(), "modifiedtime", item),
    }
}

/// Parses the upstream's compact `YYYYMMDDHHmmss` timestamp.
///
/// The input must be exactly 14 ASCII digits with an in-range month, day,
/// hour, minute, and second; anything else yields `None`.
#[must_use]
pub fn parse_tour_api_date(raw: &str) -> Option<NaiveDateTime> {
    if raw.len() != 14 || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year: i32 = raw[0..4].parse().ok()?;
    let month: u32 = raw[4..6].parse().ok()?;
    let day: u32 = raw[6..8].parse().ok()?;
    let hour: u32 = raw[8..10].parse().ok()?;
    let minute: u32 = raw[10..12].parse().ok()?;
    let second: u32 = raw[12..14].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, second)
}

fn parse_optional_date(raw: Option<&str>, field: &str, item: &TourApiItem) -> Option<NaiveDateTime> {
    let raw = raw?;
    if raw.is_empty() {
        return None;
    }
    let parsed = parse_tour_api_date(raw);
    if parsed.is_none() {
        tracing::warn!(
            content_id = %item.content_id,
            field,
            value = raw,
            "malformed compact timestamp; storing null"
        );
    }
    parsed
}

fn parse_coordinate(raw: Option<&str>) -> f64 {
    raw.and_then(|s| s.parse::<f64>().ok()).unwrap_or(0.0)
}

fn parse_code(raw: Option<&str>) -> Option<i32> {
    raw.and_then(|s| s.parse::<i32>().ok())
}

fn non_empty(raw: Option<&str>) -> Option<String> {
    raw.filter(|s| !s.is_empty()).map(str::to_owned)
}

/// Joins the non-empty parts with `sep`; `None` when every part is absent.
fn join_nonempty(parts: &[Option<&str>], sep: &str) -> Option<String> {
    let present: Vec<&str> = parts
        .iter()
        .copied()
        .flatten()
        .filter(|s| !s.is_empty())
        .collect();
    if present.is_empty() {
        None
    } else {
        Some(present.join(sep))
    }
}

#[cfg(test)]
mod tests {
    use lovetrip_core::CourseType;

    use super::*;

    fn base_item(content_id: &str, content_type_id: &str) -> TourApiItem {
        TourApiItem {
            content_id: content_id.to_owned(),
            content_type_id: content_type_id.to_owned(),
            title: "테스트 장소".to_owned(),
            addr1: None,
            addr2: None,
            area_code: None,
            sigungu_code: None,
            map_x: None,
            map_y: None,
            tel: None,
            first_image: None,
            first_image2: None,
            homepage: None,
            zipcode: None,
            overview: None,
            cat1: None,
            cat2: None,
            cat3: None,
            map_level: None,
            created_time: None,
            modified_time: None,
            use_time: None,
            rest_date: None,
        }
    }

    #[test]
    fn parse_tour_api_date_valid() {
        let parsed = parse_tour_api_date("20240115093000").expect("should parse");
        assert_eq!(
            parsed.format("%Y-%m-%d %H:%M:%S").to_string(),
            "2024-01-15 09:30:00"
        );
    }

    #[test]
    fn parse_tour_api_date_wrong_length() {
        assert_eq!(parse_tour_api_date("2024011509300"), None);
        assert_eq!(parse_tour_api_date("202401150930000"), None);
        assert_eq!(parse_tour_api_date(""), None);
    }

    #[test]
    fn parse_tour_api_date_out_of_range_components() {
        assert_eq!(parse_tour_api_date("20241315000000"), None, "month 13");
        assert_eq!(parse_tour_api_date("20240132000000"), None, "day 32");
        assert_eq!(parse_tour_api_date("20240115240000"), None, "hour 24");
        assert_eq!(parse_tour_api_date("20240115096000"), None, "minute 60");
        assert_eq!(parse_tour_api_date("20240115093060"), None, "second 60");
    }

    #[test]
    fn parse_tour_api_date_non_digit() {
        assert_eq!(parse_tour_api_date("2024-01-15 0930"), None);
    }

    #[test]
    fn restaurant_gets_date_course_type() {
        let item = base_item("100", "39");
        let place = transform_item(&item);
        assert_eq!(place.category, PlaceCategory::Food);
        assert_eq!(place.course_types, vec![CourseType::Date]);
    }

    #[test]
    fn cultural_facility_gets_both_course_types() {
        let item = base_item("200", "14");
        let place = transform_item(&item);
        assert_eq!(place.category, PlaceCategory::Museum);
        assert_eq!(
            place.course_types,
            vec![CourseType::Date, CourseType::Travel]
        );
    }

    #[test]
    fn festival_gets_no_course_types() {
        let item = base_item("300", "15");
        let place = transform_item(&item);
        assert_eq!(place.category, PlaceCategory::Etc);
        assert!(place.course_types.is_empty());
    }

    #[test]
    fn missing_coordinates_stay_zero() {
        let item = base_item("400", "12");
        let place = transform_item(&item);
        assert!((place.lat - 0.0).abs() < f64::EPSILON);
        assert!((place.lng - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn coordinates_are_parsed_from_strings() {
        let mut item = base_item("400", "12");
        item.map_x = Some("126.9779692".to_owned());
        item.map_y = Some("37.5662952".to_owned());
        let place = transform_item(&item);
        assert!((place.lng - 126.977_969_2).abs() < 1e-9);
        assert!((place.lat - 37.566_295_2).abs() < 1e-9);
    }

    #[test]
    fn address_joins_both_lines() {
        let mut item = base_item("500", "39");
        item.addr1 = Some("서울특별시 중구 명동길 14".to_owned());
        item.addr2 = Some("2층".to_owned());
        let place = transform_item(&item);
        assert_eq!(
            place.address.as_deref(),
            Some("서울특별시 중구 명동길 14 2층")
        );
    }

    #[test]
    fn address_is_none_when_both_lines_absent() {
        let item = base_item("500", "39");
        assert_eq!(transform_item(&item).address, None);
    }

    #[test]
    fn address_drops_empty_parts() {
        let mut item = base_item("500", "39");
        item.addr1 = Some("서울특별시 중구".to_owned());
        item.addr2 = Some(String::new());
        let place = transform_item(&item);
        assert_eq!(place.address.as_deref(), Some("서울특별시 중구"));
    }

    #[test]
    fn opening_hours_join_usetime_and_restdate() {
        let mut item = base_item("600", "12");
        item.use_time = Some("09:00~18:00".to_owned());
        item.rest_date = Some("매주 월요일".to_owned());
        let place = transform_item(&item);
        assert_eq!(
            place.opening_hours.as_deref(),
            Some("09:00~18:00 / 매주 월요일")
        );
    }

    #[test]
    fn empty_image_url_becomes_none() {
        let mut item = base_item("700", "12");
        item.first_image = Some(String::new());
        let place = transform_item(&item);
        assert_eq!(place.image_url, None);
    }

    #[test]
    fn unknown_content_type_defaults_to_etc() {
        let item = base_item("800", "not-a-number");
        let place = transform_item(&item);
        assert_eq!(place.tour_content_type_id, 0);
        assert_eq!(place.category, PlaceCategory::Etc);
        assert!(place.course_types.is_empty());
    }

    #[test]
    fn timestamps_are_parsed_and_malformed_ones_dropped() {
        let mut item = base_item("900", "12");
        item.created_time = Some("20240115093000".to_owned());
        item.modified_time = Some("20249999999999".to_owned());
        let place = transform_item(&item);
        assert!(place.created_time.is_some());
        assert!(place.modified_time.is_none());
    }
}
