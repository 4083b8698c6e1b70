//! Tour API response types.
//!
//! The API wraps every response in `{"response": {"header": ..., "body": ...}}`
//! with a string `resultCode` in the header. All item fields arrive as strings,
//! including coordinates, codes, and timestamps.

use serde::Deserialize;

/// Top-level envelope for all Tour API responses.
#[derive(Debug, Deserialize)]
pub struct TourApiResponse {
    pub response: ResponseEnvelope,
}

#[derive(Debug, Deserialize)]
pub struct ResponseEnvelope {
    pub header: ResponseHeader,
    pub body: ResponseBody,
}

/// Result code and message. `"0000"` means success; anything else is an
/// upstream error the client maps to a typed failure.
#[derive(Debug, Deserialize)]
pub struct ResponseHeader {
    #[serde(rename = "resultCode")]
    pub result_code: String,
    #[serde(rename = "resultMsg")]
    pub result_msg: String,
}

#[derive(Debug, Deserialize)]
pub struct ResponseBody {
    /// `items.item` is a single object for one row and an array for many; a
    /// page with no rows arrives as the empty string instead of an object.
    /// Kept as raw JSON so the client can unwrap each shape individually.
    #[serde(default)]
    pub items: Option<serde_json::Value>,
    #[serde(rename = "numOfRows", default)]
    pub num_of_rows: Option<i64>,
    #[serde(rename = "pageNo", default)]
    pub page_no: Option<i64>,
    #[serde(rename = "totalCount", default)]
    pub total_count: Option<i64>,
}

/// One listing from `areaBasedList1` or `detailInfo1`.
#[derive(Debug, Clone, Deserialize)]
pub struct TourApiItem {
    #[serde(rename = "contentid")]
    pub content_id: String,
    #[serde(rename = "contenttypeid")]
    pub content_type_id: String,
    pub title: String,
    #[serde(default)]
    pub addr1: Option<String>,
    #[serde(default)]
    pub addr2: Option<String>,
    #[serde(rename = "areacode", default)]
    pub area_code: Option<String>,
    #[serde(rename = "sigungucode", default)]
    pub sigungu_code: Option<String>,
    #[serde(rename = "mapx", default)]
    pub map_x: Option<String>,
    #[serde(rename = "mapy", default)]
    pub map_y: Option<String>,
    #[serde(default)]
    pub tel: Option<String>,
    #[serde(rename = "firstimage", default)]
    pub first_image: Option<String>,
    #[serde(rename = "firstimage2", default)]
    pub first_image2: Option<String>,
    #[serde(default)]
    pub homepage: Option<String>,
    #[serde(default)]
    pub zipcode: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub cat1: Option<String>,
    #[serde(default)]
    pub cat2: Option<String>,
    #[serde(default)]
    pub cat3: Option<String>,
    #[serde(rename = "mlevel", default)]
    pub map_level: Option<String>,
    #[serde(rename = "createdtime", default)]
    pub created_time: Option<String>,
    #[serde(rename = "modifiedtime", default)]
    pub modified_time: Option<String>,
    /// Operating hours, present on detail responses for some content types.
    #[serde(rename = "usetime", default)]
    pub use_time: Option<String>,
    /// Closed days, paired with `usetime` on detail responses.
    #[serde(rename = "restdate", default)]
    pub rest_date: Option<String>,
}
