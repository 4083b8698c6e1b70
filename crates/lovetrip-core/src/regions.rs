//! Fixed national list of Tour API area codes.

/// An administrative region the crawler iterates over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Area {
    pub code: i32,
    pub name: &'static str,
}

/// All regions covered by a full sync, in crawl order.
#[rustfmt::skip]
pub const AREAS: &[Area] = &[
    Area { code: 1,  name: "서울" },
    Area { code: 2,  name: "인천" },
    Area { code: 31, name: "경기" },
    Area { code: 32, name: "강원" },
    Area { code: 33, name: "충북" },
    Area { code: 34, name: "충남" },
    Area { code: 35, name: "경북" },
    Area { code: 36, name: "경남" },
    Area { code: 37, name: "전북" },
    Area { code: 38, name: "전남" },
    Area { code: 39, name: "제주" },
];

/// Looks up the Korean name for an area code.
#[must_use]
pub fn area_name(code: i32) -> Option<&'static str> {
    AREAS.iter().find(|a| a.code == code).map(|a| a.name)
}
