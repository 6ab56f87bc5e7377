//! Data models for NHK radio APIs
//!
//! Three families of documents:
//! - on-demand catalog JSON (`new_arrivals.json`, `corners-{date}.json`,
//!   `{site}-{corner}.json`)
//! - the live stream area table (`config_web.xml`)
//! - program guide JSON (`pg/now`, `pg/info`)

use crate::error::{Error, Result};
use crate::models::ProgramInfo;
use crate::timefmt::Timestamp;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Channels
// ============================================================================

/// NHK radio channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NhkChannel {
    /// ラジオ第1
    R1,
    /// ラジオ第2
    R2,
    /// NHK-FM
    Fm,
}

impl NhkChannel {
    /// Service code used by the program guide API
    pub fn service_code(&self) -> &'static str {
        match self {
            NhkChannel::R1 => "r1",
            NhkChannel::R2 => "r2",
            NhkChannel::Fm => "r3",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            NhkChannel::R1 => "NHKラジオ第1",
            NhkChannel::R2 => "NHKラジオ第2",
            NhkChannel::Fm => "NHK-FM",
        }
    }
}

impl fmt::Display for NhkChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NhkChannel::R1 => f.write_str("NHK1"),
            NhkChannel::R2 => f.write_str("NHK2"),
            NhkChannel::Fm => f.write_str("FM"),
        }
    }
}

impl FromStr for NhkChannel {
    type Err = Error;

    /// Accepts `NHK1`/`NHK2`/`FM` and the service codes `r1`/`r2`/`r3`
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NHK1" | "R1" => Ok(NhkChannel::R1),
            "NHK2" | "R2" => Ok(NhkChannel::R2),
            "FM" | "R3" => Ok(NhkChannel::Fm),
            _ => Err(Error::Configuration(format!("unknown NHK channel: {}", s))),
        }
    }
}

/// Entry of the now-on-air triplet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Timing {
    Previous,
    #[default]
    Present,
    Following,
}

// ============================================================================
// On-demand catalog
// ============================================================================

/// A program ("corner") listed in the on-demand catalog
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Corner {
    #[serde(default)]
    pub title: String,
    /// Broadcasting channel, e.g. "NHK-FM" or "R1,FM"
    #[serde(default)]
    pub radio_broadcast: Option<String>,
    #[serde(default)]
    pub corner_name: Option<String>,
    /// Free text, e.g. "2026年1月18日(日)放送"
    #[serde(default)]
    pub onair_date: Option<String>,
    #[serde(default)]
    pub started_at: Option<String>,
    #[serde(default)]
    pub series_site_id: Option<String>,
    #[serde(default)]
    pub corner_site_id: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
}

/// `new_arrivals.json` and `corners-{date}.json`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CornerList {
    #[serde(default)]
    pub onair_date: Option<String>,
    #[serde(default)]
    pub corners: Vec<Corner>,
}

/// One episode of a series, available until `closed_at`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Episode {
    #[serde(default)]
    pub program_title: String,
    #[serde(default)]
    pub program_sub_title: Option<String>,
    #[serde(default)]
    pub onair_date: Option<String>,
    #[serde(default)]
    pub closed_at: Option<String>,
    #[serde(default)]
    pub stream_url: Option<String>,
}

/// `{site_id}-{corner_site_id}.json`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Series {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub series_site_id: Option<String>,
    #[serde(default)]
    pub corner_site_id: Option<String>,
    #[serde(default)]
    pub radio_broadcast: Option<String>,
    /// Free text, e.g. "毎週日曜 午後11:30"
    #[serde(default)]
    pub schedule: Option<String>,
    #[serde(default)]
    pub series_description: Option<String>,
    #[serde(default)]
    pub episodes: Vec<Episode>,
}

/// Flattened series/episode view handed to a recorder
///
/// Broadcaster dates are kept as the text NHK publishes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecordingInfo {
    pub title: String,
    pub program_title: String,
    pub onair_date: String,
    pub closed_at: String,
    pub stream_url: String,
}

impl Series {
    /// One entry per episode
    pub fn recording_info(&self) -> Vec<RecordingInfo> {
        self.episodes
            .iter()
            .map(|episode| RecordingInfo {
                title: self.title.clone(),
                program_title: episode.program_title.clone(),
                onair_date: episode.onair_date.clone().unwrap_or_default(),
                closed_at: episode.closed_at.clone().unwrap_or_default(),
                stream_url: episode.stream_url.clone().unwrap_or_default(),
            })
            .collect()
    }
}

// ============================================================================
// Live stream area table
// ============================================================================

#[derive(Debug, Deserialize)]
pub(crate) struct RadioConfigXml {
    pub stream_url: StreamUrlXml,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StreamUrlXml {
    #[serde(default)]
    pub data: Vec<NhkArea>,
}

/// Live HLS endpoints for one broadcast area
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NhkArea {
    /// Romanized area name, e.g. "tokyo"
    pub area: String,
    #[serde(default)]
    pub areajp: Option<String>,
    /// Program guide area code, e.g. "130"
    #[serde(default)]
    pub areakey: Option<String>,
    #[serde(default)]
    pub r1hls: Option<String>,
    #[serde(default)]
    pub r2hls: Option<String>,
    #[serde(default)]
    pub fmhls: Option<String>,
}

impl NhkArea {
    pub fn stream_for(&self, channel: NhkChannel) -> Option<&str> {
        let url = match channel {
            NhkChannel::R1 => &self.r1hls,
            NhkChannel::R2 => &self.r2hls,
            NhkChannel::Fm => &self.fmhls,
        };
        url.as_deref().map(str::trim).filter(|u| !u.is_empty())
    }
}

// ============================================================================
// Program guide
// ============================================================================

#[derive(Debug, Deserialize)]
pub(crate) struct NowOnAirResponse {
    #[serde(default)]
    pub nowonair_list: Option<HashMap<String, NowOnAirEntry>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NowOnAirEntry {
    #[serde(default)]
    pub previous: Option<ProgramRef>,
    #[serde(default)]
    pub present: Option<ProgramRef>,
    #[serde(default)]
    pub following: Option<ProgramRef>,
}

impl NowOnAirEntry {
    pub fn pick(&self, timing: Timing) -> Option<&ProgramRef> {
        match timing {
            Timing::Previous => self.previous.as_ref(),
            Timing::Present => self.present.as_ref(),
            Timing::Following => self.following.as_ref(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProgramRef {
    #[serde(default)]
    pub id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProgramInfoResponse {
    #[serde(default)]
    pub list: HashMap<String, Vec<GuideProgram>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GuideProgram {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub act: Option<String>,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub program_logo: Option<Logo>,
    #[serde(default)]
    pub program_url: Option<String>,
    #[serde(default)]
    pub service: Option<GuideService>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GuideService {
    #[serde(default)]
    pub logo_s: Option<Logo>,
    #[serde(default)]
    pub logo_m: Option<Logo>,
    #[serde(default)]
    pub logo_l: Option<Logo>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Logo {
    #[serde(default)]
    pub url: Option<String>,
}

fn absolute_url(url: &str) -> String {
    if url.starts_with("//") {
        format!("https:{}", url)
    } else {
        url.to_string()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl GuideProgram {
    /// Program logo, else the largest service logo
    fn logo_url(&self) -> Option<String> {
        let service_logos = self
            .service
            .iter()
            .flat_map(|s| [&s.logo_l, &s.logo_m, &s.logo_s]);
        std::iter::once(&self.program_logo)
            .chain(service_logos)
            .filter_map(|logo| logo.as_ref()?.url.as_deref())
            .map(str::trim)
            .find(|url| !url.is_empty())
            .map(absolute_url)
    }

    pub fn into_program(self, service_code: &str, area_code: &str) -> Result<ProgramInfo> {
        let image_url = self.logo_url();
        Ok(ProgramInfo {
            title: self.title.trim().to_string(),
            station_id: service_code.to_string(),
            area_id: area_code.to_string(),
            start_time: Timestamp::normalize(&self.start_time)?,
            end_time: Timestamp::normalize(&self.end_time)?,
            performer: non_empty(self.act),
            description: non_empty(self.subtitle),
            info: non_empty(self.content),
            image_url,
            info_url: non_empty(self.program_url).map(|u| absolute_url(&u)),
        })
    }
}
