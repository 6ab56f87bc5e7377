//! Data models shared by the radiko and NHK clients
//!
//! Values here are immutable once built and safe to share between threads.

use crate::timefmt::Timestamp;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// radiko session
// ============================================================================

/// Authenticated radiko session
///
/// Only produced by a complete two-stage handshake. The area is the one the
/// service assigned, never one supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    auth_token: String,
    area_id: String,
    obtained_at: DateTime<Utc>,
}

impl Session {
    pub(crate) fn new(auth_token: String, area_id: String) -> Self {
        Self {
            auth_token,
            area_id,
            obtained_at: Utc::now(),
        }
    }

    pub fn auth_token(&self) -> &str {
        &self.auth_token
    }

    /// Area assigned by the service (e.g. `JP13`)
    pub fn area_id(&self) -> &str {
        &self.area_id
    }

    pub fn obtained_at(&self) -> DateTime<Utc> {
        self.obtained_at
    }
}

// ============================================================================
// Stations
// ============================================================================

/// A radiko station
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Station {
    /// Station identifier (e.g. "TBS", "QRR")
    pub id: String,
    /// Display name (e.g. "TBSラジオ")
    pub name: String,
    pub ascii_name: Option<String>,
    /// Station web page
    pub href: Option<String>,
}

impl Station {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ascii_name: None,
            href: None,
        }
    }
}

/// Stations broadcasting in one area, in document order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaCatalog {
    pub area_id: String,
    pub stations: Vec<Station>,
}

impl AreaCatalog {
    pub fn contains(&self, station_id: &str) -> bool {
        self.stations.iter().any(|s| s.id == station_id)
    }

    pub fn get(&self, station_id: &str) -> Option<&Station> {
        self.stations.iter().find(|s| s.id == station_id)
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }
}

// ============================================================================
// Programs
// ============================================================================

/// One scheduled program, normalized across services
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramInfo {
    pub title: String,
    /// Station (radiko) or service (NHK) identifier
    pub station_id: String,
    pub area_id: String,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub performer: Option<String>,
    pub description: Option<String>,
    pub info: Option<String>,
    pub image_url: Option<String>,
    pub info_url: Option<String>,
}

impl ProgramInfo {
    pub fn duration(&self) -> Duration {
        self.start_time.until(&self.end_time)
    }

    pub fn duration_minutes(&self) -> i64 {
        self.duration().num_minutes()
    }

    /// True when `instant` falls in `[start_time, end_time)`
    pub fn covers(&self, instant: &Timestamp) -> bool {
        self.start_time <= *instant && *instant < self.end_time
    }
}

// ============================================================================
// Streams
// ============================================================================

/// A playable stream locator plus what the capture process must send with it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedStream {
    pub url: String,
    pub auth_token: String,
    pub area_id: String,
}

impl ResolvedStream {
    pub(crate) fn for_session(url: String, session: &Session) -> Self {
        Self {
            url,
            auth_token: session.auth_token().to_string(),
            area_id: session.area_id().to_string(),
        }
    }

    /// Header the capture process must send when fetching `url`
    pub fn auth_header(&self) -> (&'static str, &str) {
        ("X-Radiko-AuthToken", &self.auth_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn program(start: &str, end: &str) -> ProgramInfo {
        ProgramInfo {
            title: "ニュース".into(),
            station_id: "TBS".into(),
            area_id: "JP13".into(),
            start_time: start.parse().unwrap(),
            end_time: end.parse().unwrap(),
            performer: None,
            description: None,
            info: None,
            image_url: None,
            info_url: None,
        }
    }

    #[test]
    fn test_program_duration() {
        assert_eq!(
            program("20260120130000", "20260120131500").duration_minutes(),
            15
        );
        assert_eq!(
            program("20260120235000", "20260121001000").duration_minutes(),
            20
        );
    }

    #[test]
    fn test_program_covers_half_open() {
        let p = program("20260120130000", "20260120131500");
        assert!(p.covers(&"20260120130000".parse().unwrap()));
        assert!(p.covers(&"20260120131459".parse().unwrap()));
        assert!(!p.covers(&"20260120131500".parse().unwrap()));
        assert!(!p.covers(&"20260120125959".parse().unwrap()));
    }

    #[test]
    fn test_catalog_lookup() {
        let catalog = AreaCatalog {
            area_id: "JP13".into(),
            stations: vec![Station::new("TBS", "TBSラジオ"), Station::new("QRR", "文化放送")],
        };
        assert!(catalog.contains("QRR"));
        assert!(!catalog.contains("ABC"));
        assert_eq!(catalog.get("TBS").map(|s| s.name.as_str()), Some("TBSラジオ"));
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_stream_carries_session() {
        let session = Session::new("token".into(), "JP13".into());
        let stream = ResolvedStream::for_session("https://x/chunklist.m3u8".into(), &session);
        assert_eq!(stream.area_id, "JP13");
        assert_eq!(stream.auth_header(), ("X-Radiko-AuthToken", "token"));
    }
}
