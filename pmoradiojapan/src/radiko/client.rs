//! radiko client
//!
//! # Example
//!
//! ```no_run
//! use pmoradiojapan::RadikoClient;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = RadikoClient::new()?;
//!
//!     // Authenticate, check the station, resolve its stream and program
//!     let resolution = client.resolve_live("TBS")?;
//!     println!("area:   {}", resolution.session.area_id());
//!     println!("stream: {}", resolution.stream.url);
//!     if let Some(program) = &resolution.program {
//!         println!("now:    {} ({} min)", program.title, program.duration_minutes());
//!     }
//!
//!     Ok(())
//! }
//! ```

use super::auth::Authenticator;
use super::catalog::{fetch_station_list, Catalog};
use super::partial_key::AUTH_KEY;
use super::program::{self, ProgramLookup, When};
use super::search::{self, SearchFilter};
use super::stream;
use crate::error::{Error, Result};
use crate::models::{AreaCatalog, ProgramInfo, ResolvedStream, Session};
use crate::timefmt::Timestamp;
use crate::transport::{HttpSettings, Transport};
use chrono::NaiveDate;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Default radiko API base URL
pub const DEFAULT_API_BASE: &str = "https://radiko.jp";

/// Default live stream host
pub const DEFAULT_STREAM_BASE: &str = "https://f-radiko.smartstream.ne.jp";

/// Area used when the caller names none (Tokyo)
pub const DEFAULT_AREA_ID: &str = "JP13";

/// Everything the capture process needs to record a live station
#[derive(Debug, Clone)]
pub struct Resolution {
    pub session: Session,
    pub stream: ResolvedStream,
    /// Program on air when the stream was resolved
    pub program: Option<ProgramInfo>,
}

/// radiko client
///
/// Cloning is cheap and clones share the station catalog cache.
#[derive(Debug, Clone)]
pub struct RadikoClient {
    transport: Transport,
    api_base: String,
    stream_base: String,
    default_area: String,
    auth_key: Arc<[u8]>,
    catalog: Catalog,
}

impl RadikoClient {
    /// Create a new client with default settings
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    pub fn builder() -> RadikoClientBuilder {
        RadikoClientBuilder::default()
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Area used by [`stations`](Self::stations),
    /// [`default_area_now`](Self::default_area_now) and
    /// [`search_default_area`](Self::search_default_area)
    pub fn default_area(&self) -> &str {
        &self.default_area
    }

    pub fn settings(&self) -> &HttpSettings {
        self.transport.settings()
    }

    /// Stations already fetched during this run
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    // ========================================================================
    // Authentication
    // ========================================================================

    /// Runs the two-stage handshake and returns a fresh session
    pub fn authenticate(&self) -> Result<Session> {
        Authenticator::new(&self.transport, &self.api_base, &self.auth_key).authenticate()
    }

    // ========================================================================
    // Stations
    // ========================================================================

    /// Station list of an area, fetched once per run
    pub fn station_list(&self, area_id: &str) -> Result<Arc<AreaCatalog>> {
        self.catalog.get_or_fetch(area_id, || {
            fetch_station_list(&self.transport, &self.api_base, area_id)
        })
    }

    /// Station list of the default area
    pub fn stations(&self) -> Result<Arc<AreaCatalog>> {
        self.station_list(&self.default_area)
    }

    /// Station list of the session's area
    pub fn session_stations(&self, session: &Session) -> Result<Arc<AreaCatalog>> {
        self.station_list(session.area_id())
    }

    /// `false` when the list was fetched and the station is not in it
    pub fn is_station_available(&self, station_id: &str, area_id: &str) -> Result<bool> {
        Ok(self.station_list(area_id)?.contains(station_id))
    }

    pub fn is_station_available_for(&self, station_id: &str, session: &Session) -> Result<bool> {
        self.is_station_available(station_id, session.area_id())
    }

    /// Display name of a station in an area
    pub fn station_name(&self, station_id: &str, area_id: &str) -> Result<Option<String>> {
        Ok(self
            .station_list(area_id)?
            .get(station_id)
            .map(|s| s.name.clone()))
    }

    // ========================================================================
    // Streams
    // ========================================================================

    pub fn stream_url(&self, station_id: &str, session: &Session) -> Result<ResolvedStream> {
        stream::resolve_live(&self.transport, &self.stream_base, station_id, session)
    }

    /// Timefree playlist for a past window `[ft, to)`
    pub fn timefree_stream(
        &self,
        station_id: &str,
        ft: &Timestamp,
        to: &Timestamp,
        session: &Session,
    ) -> Result<ResolvedStream> {
        stream::timefree_playlist(&self.api_base, station_id, ft, to, session)
    }

    // ========================================================================
    // Programs
    // ========================================================================

    pub fn fetch_program(&self, station_id: &str, when: When, area_id: &str) -> Result<ProgramLookup> {
        program::fetch_program(&self.transport, &self.api_base, station_id, when, area_id)
    }

    pub fn now_program(&self, station_id: &str, area_id: &str) -> Result<Option<ProgramInfo>> {
        Ok(self.fetch_program(station_id, When::Now, area_id)?.into_entry())
    }

    pub fn program_at(
        &self,
        station_id: &str,
        instant: Timestamp,
        area_id: &str,
    ) -> Result<Option<ProgramInfo>> {
        Ok(self
            .fetch_program(station_id, When::At(instant), area_id)?
            .into_entry())
    }

    pub fn weekly_programs(&self, station_id: &str, area_id: &str) -> Result<Vec<ProgramInfo>> {
        Ok(self.fetch_program(station_id, When::Weekly, area_id)?.into_week())
    }

    pub fn day_programs(
        &self,
        station_id: &str,
        date: NaiveDate,
        area_id: &str,
    ) -> Result<Vec<ProgramInfo>> {
        program::fetch_day(&self.transport, &self.api_base, station_id, date, area_id)
    }

    /// Programs on air right now on every station of an area
    pub fn area_now(&self, area_id: &str) -> Result<Vec<ProgramInfo>> {
        program::fetch_area_now(&self.transport, &self.api_base, area_id)
    }

    /// Programs on air right now in the default area
    pub fn default_area_now(&self) -> Result<Vec<ProgramInfo>> {
        self.area_now(&self.default_area)
    }

    /// One day of programs for every station of an area, station by station
    /// in catalog order
    pub fn area_programs(&self, area_id: &str, date: NaiveDate) -> Result<Vec<ProgramInfo>> {
        let stations = self.station_list(area_id)?;
        let mut programs = Vec::new();
        for station in &stations.stations {
            programs.extend(self.day_programs(&station.id, date, area_id)?);
        }
        debug!("area {}: {} programs on {}", area_id, programs.len(), date);
        Ok(programs)
    }

    pub fn search(
        &self,
        keyword: &str,
        filter: SearchFilter,
        area_id: &str,
    ) -> Result<Vec<ProgramInfo>> {
        search::search(&self.transport, &self.api_base, keyword, filter, area_id)
    }

    /// Keyword search scoped to the default area
    pub fn search_default_area(&self, keyword: &str, filter: SearchFilter) -> Result<Vec<ProgramInfo>> {
        self.search(keyword, filter, &self.default_area)
    }

    // ========================================================================
    // Capture hand-off
    // ========================================================================

    /// Authenticates, checks the station against the assigned area, then
    /// resolves its live stream and current program
    pub fn resolve_live(&self, station_id: &str) -> Result<Resolution> {
        let session = self.authenticate()?;

        if !self.is_station_available_for(station_id, &session)? {
            return Err(Error::StationUnavailable {
                station: station_id.to_string(),
                area_id: session.area_id().to_string(),
            });
        }

        let stream = self.stream_url(station_id, &session)?;
        let program = self.now_program(station_id, session.area_id())?;
        info!(
            "Resolved {} in {}: {}",
            station_id,
            session.area_id(),
            program.as_ref().map_or("no program", |p| p.title.as_str())
        );

        Ok(Resolution {
            session,
            stream,
            program,
        })
    }
}

/// Builder for configuring a [`RadikoClient`]
#[derive(Debug)]
pub struct RadikoClientBuilder {
    settings: HttpSettings,
    api_base: String,
    stream_base: String,
    default_area: String,
    auth_key: Vec<u8>,
}

impl Default for RadikoClientBuilder {
    fn default() -> Self {
        Self {
            settings: HttpSettings::default(),
            api_base: DEFAULT_API_BASE.to_string(),
            stream_base: DEFAULT_STREAM_BASE.to_string(),
            default_area: DEFAULT_AREA_ID.to_string(),
            auth_key: AUTH_KEY.to_vec(),
        }
    }
}

impl RadikoClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn settings(mut self, settings: HttpSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.settings.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.settings.user_agent = user_agent.into();
        self
    }

    /// Base URL for auth, station, program and search endpoints
    pub fn api_base(mut self, url: impl Into<String>) -> Self {
        self.api_base = url.into();
        self
    }

    /// Base URL of the live HLS host
    pub fn stream_base(mut self, url: impl Into<String>) -> Self {
        self.stream_base = url.into();
        self
    }

    pub fn default_area(mut self, area_id: impl Into<String>) -> Self {
        self.default_area = area_id.into();
        self
    }

    /// Replaces the player key used to answer the challenge
    pub fn auth_key(mut self, key: impl Into<Vec<u8>>) -> Self {
        self.auth_key = key.into();
        self
    }

    pub fn build(self) -> Result<RadikoClient> {
        if self.api_base.trim().is_empty() || self.stream_base.trim().is_empty() {
            return Err(Error::Configuration("radiko base URL is empty".into()));
        }
        if self.auth_key.is_empty() {
            return Err(Error::Configuration("radiko auth key is empty".into()));
        }
        if self.settings.timeout.is_zero() {
            return Err(Error::Configuration("timeout must be positive".into()));
        }

        Ok(RadikoClient {
            transport: Transport::new(self.settings),
            api_base: self.api_base.trim_end_matches('/').to_string(),
            stream_base: self.stream_base.trim_end_matches('/').to_string(),
            default_area: self.default_area,
            auth_key: Arc::from(self.auth_key),
            catalog: Catalog::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let builder = RadikoClientBuilder::default();
        assert_eq!(builder.api_base, DEFAULT_API_BASE);
        assert_eq!(builder.stream_base, DEFAULT_STREAM_BASE);
        assert_eq!(builder.default_area, DEFAULT_AREA_ID);
        assert_eq!(builder.auth_key, AUTH_KEY);
    }

    #[test]
    fn test_build_trims_base() {
        let client = RadikoClient::builder()
            .api_base("http://127.0.0.1:1234/")
            .timeout(Duration::from_secs(2))
            .build()
            .unwrap();
        assert_eq!(client.api_base(), "http://127.0.0.1:1234");
        assert_eq!(client.settings().timeout, Duration::from_secs(2));
    }

    #[test]
    fn test_build_rejects_bad_settings() {
        assert!(matches!(
            RadikoClient::builder().auth_key(Vec::new()).build(),
            Err(Error::Configuration(_))
        ));
        assert!(matches!(
            RadikoClient::builder().timeout(Duration::ZERO).build(),
            Err(Error::Configuration(_))
        ));
        assert!(matches!(
            RadikoClient::builder().api_base("").build(),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn test_clones_share_catalog() {
        let client = RadikoClient::new().unwrap();
        let clone = client.clone();
        clone
            .catalog()
            .get_or_fetch("JP13", || {
                crate::radiko::catalog::parse_station_list("JP13", "<stations></stations>")
            })
            .unwrap();
        assert!(client.catalog().cached("JP13").is_some());
    }
}
