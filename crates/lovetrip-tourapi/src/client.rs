//! HTTP client for the Korean Tour API.
//!
//! Wraps `reqwest` with envelope validation, result-code error mapping, and a
//! post-request courtesy throttle. Use [`TourApiClient::new`] with the
//! configured base URL, or point it at a mock server in tests.

use std::time::Duration;

use reqwest::{Client, Url};
use serde_json::Value;

use crate::error::TourApiError;
use crate::types::{TourApiItem, TourApiResponse};

const DEFAULT_NUM_OF_ROWS: u32 = 100;

/// Query parameters for one `areaBasedList1` page.
#[derive(Debug, Clone, Copy, Default)]
pub struct PageQuery {
    pub area_code: Option<i32>,
    pub sigungu_code: Option<i32>,
    pub content_type_id: Option<i32>,
    /// Rows per page; defaults to 100.
    pub num_of_rows: Option<u32>,
    /// 1-based page number; defaults to 1.
    pub page_no: Option<u32>,
}

/// Client for the Tour API `KorService` endpoints.
///
/// The throttle delay is awaited after every request, success or failure. It
/// is a courtesy toward the upstream's rate limits, not a retry or resilience
/// mechanism, and it is never skipped.
pub struct TourApiClient {
    client: Client,
    service_key: String,
    list_url: Url,
    detail_url: Url,
    throttle: Duration,
}

impl TourApiClient {
    /// Creates a client for the given base URL (e.g.
    /// `https://apis.data.go.kr/B551011/KorService1`).
    ///
    /// # Errors
    ///
    /// Returns [`TourApiError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`TourApiError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn new(
        base_url: &str,
        service_key: &str,
        timeout_secs: u64,
        throttle_delay_ms: u64,
    ) -> Result<Self, TourApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("lovetrip/0.1 (tour-sync)")
            .build()?;

        // Normalise: ensure the base URL ends with exactly one slash so that
        // join() appends the endpoint instead of replacing the last path
        // segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let invalid = |e: &dyn std::fmt::Display| TourApiError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        };
        let base = Url::parse(&normalised).map_err(|e| invalid(&e))?;
        let list_url = base.join("areaBasedList1").map_err(|e| invalid(&e))?;
        let detail_url = base.join("detailInfo1").map_err(|e| invalid(&e))?;

        Ok(Self {
            client,
            service_key: service_key.to_owned(),
            list_url,
            detail_url,
            throttle: Duration::from_millis(throttle_delay_ms),
        })
    }

    /// Fetches one page of area-based listings.
    ///
    /// Returns the validated items for that page; an empty vec means the
    /// upstream has no more data for these filters.
    ///
    /// # Errors
    ///
    /// - [`TourApiError::InvalidServiceKey`] on result code 0003.
    /// - [`TourApiError::QuotaExceeded`] on result codes 0005/0006.
    /// - [`TourApiError::Api`] on any other non-"0000" result code.
    /// - [`TourApiError::Http`] on network failure.
    /// - [`TourApiError::Deserialize`] if the body is not the expected shape.
    pub async fn area_based_list(&self, query: PageQuery) -> Result<Vec<TourApiItem>, TourApiError> {
        let result = self.fetch_list_page(query).await;
        self.apply_throttle().await;
        result
    }

    /// Fetches detail fields for a single listing.
    ///
    /// Returns `None` when the upstream has no record for the id.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`TourApiClient::area_based_list`].
    pub async fn detail_info(
        &self,
        content_id: &str,
        content_type_id: i32,
    ) -> Result<Option<TourApiItem>, TourApiError> {
        let extra = [
            ("contentId", content_id.to_owned()),
            ("contentTypeId", content_type_id.to_string()),
        ];
        let url = self.build_url(&self.detail_url, &extra);
        let result = self.request_envelope(&url).await;
        self.apply_throttle().await;
        Ok(Self::unwrap_items(result?).into_iter().next())
    }

    /// Fetches every page for the given filters until a page comes back empty
    /// or `max_pages` is reached.
    ///
    /// Best effort: a page-level error halts pagination early and returns
    /// whatever was accumulated, with a warning. Failed pages are not retried.
    pub async fn fetch_all_pages(
        &self,
        area_code: Option<i32>,
        content_type_id: Option<i32>,
        max_pages: u32,
    ) -> Vec<TourApiItem> {
        let mut all_items: Vec<TourApiItem> = Vec::new();
        let mut page_no = 1u32;

        loop {
            if page_no > max_pages {
                tracing::warn!(
                    max_pages,
                    collected = all_items.len(),
                    "page cap reached; halting pagination"
                );
                break;
            }

            let query = PageQuery {
                area_code,
                content_type_id,
                page_no: Some(page_no),
                ..PageQuery::default()
            };
            match self.area_based_list(query).await {
                Ok(items) if items.is_empty() => break,
                Ok(items) => {
                    all_items.extend(items);
                    tracing::debug!(page_no, total = all_items.len(), "fetched page");
                    page_no += 1;
                }
                Err(e) => {
                    tracing::warn!(
                        page_no,
                        collected = all_items.len(),
                        error = %e,
                        "page fetch failed; keeping items collected so far"
                    );
                    break;
                }
            }
        }

        all_items
    }

    async fn fetch_list_page(&self, query: PageQuery) -> Result<Vec<TourApiItem>, TourApiError> {
        let mut extra: Vec<(&str, String)> = vec![
            (
                "numOfRows",
                query.num_of_rows.unwrap_or(DEFAULT_NUM_OF_ROWS).to_string(),
            ),
            ("pageNo", query.page_no.unwrap_or(1).to_string()),
        ];
        if let Some(area) = query.area_code {
            extra.push(("areaCode", area.to_string()));
        }
        if let Some(sigungu) = query.sigungu_code {
            extra.push(("sigunguCode", sigungu.to_string()));
        }
        if let Some(content) = query.content_type_id {
            extra.push(("contentTypeId", content.to_string()));
        }

        let url = self.build_url(&self.list_url, &extra);
        let envelope = self.request_envelope(&url).await?;
        Ok(Self::unwrap_items(envelope))
    }

    async fn apply_throttle(&self) {
        if !self.throttle.is_zero() {
            tokio::time::sleep(self.throttle).await;
        }
    }

    /// Builds the full request URL with percent-encoded query parameters.
    /// `serviceKey` leads, matching the upstream's documented examples.
    fn build_url(&self, endpoint: &Url, extra: &[(&str, String)]) -> Url {
        let mut url = endpoint.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("serviceKey", &self.service_key);
            for (k, v) in extra {
                pairs.append_pair(k, v);
            }
            pairs.append_pair("MobileOS", "ETC");
            pairs.append_pair("MobileApp", "LoveTrip");
            pairs.append_pair("_type", "json");
        }
        url
    }

    /// Sends a GET request, checks the envelope's result code, and parses the
    /// response into [`TourApiResponse`].
    ///
    /// The result code is checked before the HTTP status: the upstream reports
    /// most failures (bad key, quota) inside a 200 envelope.
    async fn request_envelope(&self, url: &Url) -> Result<TourApiResponse, TourApiError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        let body = response.text().await?;

        let json: Value = serde_json::from_str(&body).map_err(|e| TourApiError::Deserialize {
            context: redact_service_key(url),
            source: e,
        })?;
        Self::check_result_code(&json)?;

        if !status.is_success() {
            return Err(TourApiError::UnexpectedStatus {
                status: status.as_u16(),
                url: redact_service_key(url),
            });
        }

        serde_json::from_value(json).map_err(|e| TourApiError::Deserialize {
            context: redact_service_key(url),
            source: e,
        })
    }

    /// Checks `response.header.resultCode` and maps non-"0000" codes to typed
    /// errors, so callers can tell a dead key from an exhausted quota.
    fn check_result_code(body: &Value) -> Result<(), TourApiError> {
        let Some(header) = body.pointer("/response/header") else {
            return Ok(());
        };
        let code = header
            .get("resultCode")
            .and_then(Value::as_str)
            .unwrap_or("0000");
        if code == "0000" {
            return Ok(());
        }

        let upstream_msg = header
            .get("resultMsg")
            .and_then(Value::as_str)
            .unwrap_or("")
            .to_owned();
        let message = match result_code_description(code) {
            Some(desc) if upstream_msg.is_empty() => desc.to_owned(),
            Some(desc) => format!("{desc} ({upstream_msg})"),
            None if upstream_msg.is_empty() => "unknown error".to_owned(),
            None => upstream_msg,
        };

        match code {
            "0003" => Err(TourApiError::InvalidServiceKey(message)),
            "0005" | "0006" => Err(TourApiError::QuotaExceeded {
                code: code.to_owned(),
                message,
            }),
            _ => Err(TourApiError::Api {
                code: code.to_owned(),
                message,
            }),
        }
    }

    /// Unwraps `body.items.item` into a list, tolerating the upstream's three
    /// shapes: an array of items, a single bare item, and an empty string on
    /// pages with no rows. Items that fail validation are skipped with a
    /// warning; one malformed row never aborts the page.
    fn unwrap_items(envelope: TourApiResponse) -> Vec<TourApiItem> {
        let Some(mut items) = envelope.response.body.items else {
            return Vec::new();
        };
        let Some(item) = items.get_mut("item").map(Value::take) else {
            return Vec::new();
        };

        let raw = match item {
            Value::Array(values) => values,
            other => vec![other],
        };

        raw.into_iter()
            .filter_map(|value| match serde_json::from_value::<TourApiItem>(value) {
                Ok(item) => Some(item),
                Err(e) => {
                    tracing::warn!(error = %e, "skipping upstream item that failed validation");
                    None
                }
            })
            .collect()
    }
}

/// Renders a request URL with the service key masked, for logs and errors.
fn redact_service_key(url: &Url) -> String {
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == "serviceKey" {
                "***".to_owned()
            } else {
                v.into_owned()
            };
            (k.into_owned(), v)
        })
        .collect();

    let mut redacted = url.clone();
    {
        let mut q = redacted.query_pairs_mut();
        q.clear();
        for (k, v) in &pairs {
            q.append_pair(k, v);
        }
    }
    redacted.to_string()
}

/// Known Tour API result codes and their documented meanings.
fn result_code_description(code: &str) -> Option<&'static str> {
    match code {
        "0001" => Some("필수 파라미터 누락"),
        "0002" => Some("파라미터 형식 오류"),
        "0003" => Some("인증키 오류"),
        "0004" => Some("서비스 오류"),
        "0005" => Some("일일 트래픽 초과"),
        "0006" => Some("월간 트래픽 초과"),
        _ => None,
    }
}
