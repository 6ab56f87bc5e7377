//! Per-area station catalogs
//!
//! `{api}/v3/station/list/{area}.xml` lists the stations of one area:
//!
//! ```xml
//! <stations area_id="JP13" area_name="TOKYO JAPAN">
//!   <station>
//!     <id>TBS</id>
//!     <name>TBSラジオ</name>
//!     <ascii_name>TBS RADIO</ascii_name>
//!     <href>https://www.tbsradio.jp/</href>
//!   </station>
//! </stations>
//! ```

use crate::error::Result;
use crate::models::{AreaCatalog, Station};
use crate::transport::{decode_xml, Transport};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

#[derive(Debug, Deserialize)]
struct StationListDoc {
    #[serde(rename = "station", default)]
    stations: Vec<StationXml>,
}

#[derive(Debug, Deserialize)]
struct StationXml {
    id: String,
    name: String,
    #[serde(default)]
    ascii_name: Option<String>,
    #[serde(default)]
    href: Option<String>,
}

impl From<StationXml> for Station {
    fn from(xml: StationXml) -> Self {
        Station {
            id: xml.id.trim().to_string(),
            name: xml.name.trim().to_string(),
            ascii_name: non_empty(xml.ascii_name),
            href: non_empty(xml.href),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn station_list_url(api_base: &str, area_id: &str) -> String {
    format!(
        "{}/v3/station/list/{}.xml",
        api_base.trim_end_matches('/'),
        area_id
    )
}

/// Parses a station list document, keeping document order
pub fn parse_station_list(area_id: &str, body: &str) -> Result<AreaCatalog> {
    let doc: StationListDoc = decode_xml(body)?;
    Ok(AreaCatalog {
        area_id: area_id.to_string(),
        stations: doc.stations.into_iter().map(Station::from).collect(),
    })
}

pub fn fetch_station_list(transport: &Transport, api_base: &str, area_id: &str) -> Result<AreaCatalog> {
    let url = station_list_url(api_base, area_id);
    let body = transport.fetch_text(&url, &[], &[])?;
    let catalog = parse_station_list(area_id, &body)?;
    debug!("area {}: {} stations", area_id, catalog.len());
    Ok(catalog)
}

/// Lazily filled `area → catalog` map, valid for one run
///
/// The lock is only taken to read or insert; fetching happens outside it, so
/// two threads asking for the same missing area may both fetch and the first
/// insert wins.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    areas: Arc<Mutex<HashMap<String, Arc<AreaCatalog>>>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Arc<AreaCatalog>>> {
        self.areas.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn cached(&self, area_id: &str) -> Option<Arc<AreaCatalog>> {
        self.lock().get(area_id).cloned()
    }

    /// Returns the cached catalog or runs `fetch` and caches its result
    ///
    /// Failed fetches are not cached.
    pub fn get_or_fetch<F>(&self, area_id: &str, fetch: F) -> Result<Arc<AreaCatalog>>
    where
        F: FnOnce() -> Result<AreaCatalog>,
    {
        if let Some(catalog) = self.cached(area_id) {
            return Ok(catalog);
        }

        let fetched = Arc::new(fetch()?);
        let mut areas = self.lock();
        Ok(areas
            .entry(area_id.to_string())
            .or_insert(fetched)
            .clone())
    }

    /// Area identifiers currently cached
    pub fn areas(&self) -> Vec<String> {
        let mut areas: Vec<String> = self.lock().keys().cloned().collect();
        areas.sort();
        areas
    }
}
