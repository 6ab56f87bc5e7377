//! Program schedules and time-window selection
//!
//! Schedule documents share one shape across the daily, weekly and
//! area-wide "now" endpoints:
//!
//! ```xml
//! <radiko>
//!   <stations>
//!     <station id="TBS">
//!       <name>TBSラジオ</name>
//!       <progs>
//!         <date>20260120</date>
//!         <prog ft="20260120130000" to="20260120131500" dur="900">
//!           <title>ニュース</title>
//!           <pfm>…</pfm>
//!         </prog>
//!       </progs>
//!     </station>
//!   </stations>
//! </radiko>
//! ```

use crate::error::Result;
use crate::models::ProgramInfo;
use crate::timefmt::{yyyymmdd, Timestamp};
use crate::transport::{decode_xml, Transport};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct ScheduleDoc {
    #[serde(default)]
    stations: Option<StationsXml>,
    /// Some documents put stations directly under the root
    #[serde(default)]
    station: Vec<StationXml>,
}

#[derive(Debug, Deserialize)]
struct StationsXml {
    #[serde(default)]
    station: Vec<StationXml>,
}

#[derive(Debug, Deserialize)]
struct StationXml {
    #[serde(rename = "@id")]
    id: String,
    #[serde(default)]
    progs: Vec<ProgsXml>,
}

#[derive(Debug, Deserialize)]
struct ProgsXml {
    #[serde(default)]
    prog: Vec<ProgXml>,
}

#[derive(Debug, Deserialize)]
struct ProgXml {
    #[serde(rename = "@ft")]
    ft: String,
    #[serde(rename = "@to")]
    to: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    desc: Option<String>,
    #[serde(default)]
    info: Option<String>,
    #[serde(default)]
    pfm: Option<String>,
    #[serde(default)]
    img: Option<String>,
}

impl ProgXml {
    fn into_program(self, station_id: &str, area_id: &str) -> Result<ProgramInfo> {
        Ok(ProgramInfo {
            title: self.title.map(|t| t.trim().to_string()).unwrap_or_default(),
            station_id: station_id.to_string(),
            area_id: area_id.to_string(),
            start_time: Timestamp::parse_canonical(&self.ft)?,
            end_time: Timestamp::parse_canonical(&self.to)?,
            performer: non_empty(self.pfm),
            description: non_empty(self.desc),
            info: non_empty(self.info),
            image_url: non_empty(self.img),
            info_url: non_empty(self.url),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// What to look up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum When {
    /// Current wall-clock time in JST
    Now,
    At(Timestamp),
    /// The station's whole weekly schedule
    Weekly,
}

/// Result of [`fetch_program`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgramLookup {
    /// Entry covering the instant, if any
    Entry(Option<ProgramInfo>),
    Week(Vec<ProgramInfo>),
}

impl ProgramLookup {
    pub fn into_entry(self) -> Option<ProgramInfo> {
        match self {
            ProgramLookup::Entry(entry) => entry,
            ProgramLookup::Week(_) => None,
        }
    }

    pub fn into_week(self) -> Vec<ProgramInfo> {
        match self {
            ProgramLookup::Entry(entry) => entry.into_iter().collect(),
            ProgramLookup::Week(week) => week,
        }
    }
}

pub fn date_url(api_base: &str, date: NaiveDate, station_id: &str) -> String {
    format!(
        "{}/v3/program/station/date/{}/{}.xml",
        api_base.trim_end_matches('/'),
        yyyymmdd(date),
        station_id
    )
}

pub fn weekly_url(api_base: &str, station_id: &str) -> String {
    format!(
        "{}/v3/program/station/weekly/{}.xml",
        api_base.trim_end_matches('/'),
        station_id
    )
}

pub fn area_now_url(api_base: &str, area_id: &str) -> String {
    format!(
        "{}/v3/program/now/{}.xml",
        api_base.trim_end_matches('/'),
        area_id
    )
}

/// Parses a schedule document into programs, in document order
///
/// With `station_id` set, other stations in the document are skipped. A
/// `prog` with a malformed `ft`/`to` fails the whole document.
pub fn parse_schedule(
    body: &str,
    station_id: Option<&str>,
    area_id: &str,
) -> Result<Vec<ProgramInfo>> {
    let doc: ScheduleDoc = decode_xml(body)?;
    let stations = doc
        .stations
        .map(|s| s.station)
        .unwrap_or_default()
        .into_iter()
        .chain(doc.station);

    let mut programs = Vec::new();
    for station in stations {
        if station_id.is_some_and(|wanted| wanted != station.id) {
            continue;
        }
        for progs in station.progs {
            for prog in progs.prog {
                programs.push(prog.into_program(&station.id, area_id)?);
            }
        }
    }
    Ok(programs)
}

/// Entry whose `[start_time, end_time)` window contains `instant`
pub fn select_program(programs: &[ProgramInfo], instant: &Timestamp) -> Option<ProgramInfo> {
    programs.iter().find(|p| p.covers(instant)).cloned()
}

/// All programs of one broadcast day (05:00 to 29:00)
pub fn fetch_day(
    transport: &Transport,
    api_base: &str,
    station_id: &str,
    date: NaiveDate,
    area_id: &str,
) -> Result<Vec<ProgramInfo>> {
    let url = date_url(api_base, date, station_id);
    let body = transport.fetch_text(&url, &[], &[])?;
    parse_schedule(&body, Some(station_id), area_id)
}

pub fn fetch_program(
    transport: &Transport,
    api_base: &str,
    station_id: &str,
    when: When,
    area_id: &str,
) -> Result<ProgramLookup> {
    let instant = match when {
        When::Now => Timestamp::now(),
        When::At(instant) => instant,
        When::Weekly => {
            let url = weekly_url(api_base, station_id);
            let body = transport.fetch_text(&url, &[], &[])?;
            let week = parse_schedule(&body, Some(station_id), area_id)?;
            debug!("{}: {} programs this week", station_id, week.len());
            return Ok(ProgramLookup::Week(week));
        }
    };

    let programs = fetch_day(
        transport,
        api_base,
        station_id,
        instant.broadcast_date(),
        area_id,
    )?;
    let entry = select_program(&programs, &instant);
    match &entry {
        Some(p) => debug!(
            "{} at {}: {} ({}-{})",
            station_id,
            instant,
            p.title,
            p.start_time.hhmm(),
            p.end_time.hhmm()
        ),
        None => debug!("{} at {}: no program", station_id, instant),
    }
    Ok(ProgramLookup::Entry(entry))
}

/// Programs currently on air for every station of an area
pub fn fetch_area_now(transport: &Transport, api_base: &str, area_id: &str) -> Result<Vec<ProgramInfo>> {
    let url = area_now_url(api_base, area_id);
    let body = transport.fetch_text(&url, &[], &[])?;
    parse_schedule(&body, None, area_id)
}
