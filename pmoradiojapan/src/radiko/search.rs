//! Keyword search over radiko programs
//!
//! `{api}/v3/api/program/search` answers JSON; each hit carries its times
//! as `YYYY-MM-DD HH:MM:SS`, normalized here to [`Timestamp`].

use crate::error::Result;
use crate::models::ProgramInfo;
use crate::timefmt::Timestamp;
use crate::transport::{decode_json, Transport};
use md5::{Digest, Md5};
use serde::Deserialize;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

/// Hits per page the web player asks for
const ROW_LIMIT: &str = "12";

/// Time range searched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchFilter {
    /// Already aired, playable through timefree
    #[default]
    Past,
    Today,
    Future,
}

impl SearchFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchFilter::Past => "past",
            SearchFilter::Today => "today",
            SearchFilter::Future => "future",
        }
    }
}

impl fmt::Display for SearchFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    #[serde(default)]
    title: String,
    station_id: String,
    start_time: String,
    end_time: String,
    #[serde(default)]
    performer: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    info: Option<String>,
    #[serde(default)]
    img: Option<String>,
    #[serde(default)]
    program_url: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Random session identifier in the web player's format (MD5 hex)
pub fn generate_uid() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    let seed = rand::random::<f64>() * 1_000_000_000.0;

    let mut hasher = Md5::new();
    hasher.update(format!("{}{}", seed, millis).as_bytes());
    hex::encode(hasher.finalize())
}

/// Decodes a search response
///
/// A hit whose times cannot be normalized fails the whole response.
pub fn parse_search(body: &str, area_id: &str) -> Result<Vec<ProgramInfo>> {
    let response: SearchResponse = decode_json(body)?;
    response
        .data
        .into_iter()
        .map(|hit| -> Result<ProgramInfo> {
            Ok(ProgramInfo {
                start_time: Timestamp::normalize(&hit.start_time)?,
                end_time: Timestamp::normalize(&hit.end_time)?,
                title: hit.title.trim().to_string(),
                station_id: hit.station_id,
                area_id: area_id.to_string(),
                performer: non_empty(hit.performer),
                description: non_empty(hit.description),
                info: non_empty(hit.info),
                image_url: non_empty(hit.img),
                info_url: non_empty(hit.program_url),
            })
        })
        .collect()
}

pub fn search(
    transport: &Transport,
    api_base: &str,
    keyword: &str,
    filter: SearchFilter,
    area_id: &str,
) -> Result<Vec<ProgramInfo>> {
    let url = format!("{}/v3/api/program/search", api_base.trim_end_matches('/'));
    let uid = generate_uid();
    let params = [
        ("key", keyword),
        ("filter", filter.as_str()),
        ("start_day", ""),
        ("end_day", ""),
        ("area_id", area_id),
        ("region_id", ""),
        ("cul_area_id", area_id),
        ("page_idx", "0"),
        ("uid", uid.as_str()),
        ("row_limit", ROW_LIMIT),
        ("app_id", "pc"),
        ("action_id", "0"),
    ];

    let body = transport.fetch_text(&url, &params, &[])?;
    let programs = parse_search(&body, area_id)?;
    debug!(
        "search {:?} ({}) in {}: {} hits",
        keyword,
        filter,
        area_id,
        programs.len()
    );
    Ok(programs)
}
