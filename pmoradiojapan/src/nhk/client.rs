//! NHK radio client
//!
//! NHK needs no handshake: on-demand episodes and live streams are public
//! HLS playlists. The program guide API requires a key.

use super::models::{
    Corner, CornerList, NhkArea, NhkChannel, NowOnAirResponse, ProgramInfoResponse,
    RadioConfigXml, RecordingInfo, Series, Timing,
};
use crate::error::{Error, Result};
use crate::models::ProgramInfo;
use crate::timefmt::yyyymmdd;
use crate::transport::{HttpSettings, Transport};
use chrono::NaiveDate;
use std::time::Duration;
use tracing::{debug, info};

/// On-demand catalog JSON root
pub const DEFAULT_ONDEMAND_BASE: &str = "https://www.nhk.or.jp/radioondemand/json";

/// Live stream area table
pub const DEFAULT_CONFIG_URL: &str = "https://www.nhk.or.jp/radio/config/config_web.xml";

/// Program guide API root
pub const DEFAULT_PROGRAM_API_BASE: &str = "https://api.nhk.or.jp/v2";

pub const DEFAULT_AREA: &str = "tokyo";

/// Program guide code of the default area
pub const DEFAULT_AREA_CODE: &str = "130";

/// NHK client
#[derive(Debug, Clone)]
pub struct NhkClient {
    transport: Transport,
    ondemand_base: String,
    config_url: String,
    program_api_base: String,
    area: String,
    area_code: String,
    api_key: Option<String>,
}

impl NhkClient {
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    pub fn builder() -> NhkClientBuilder {
        NhkClientBuilder::default()
    }

    /// Live stream area used when none is given
    pub fn area(&self) -> &str {
        &self.area
    }

    pub fn area_code(&self) -> &str {
        &self.area_code
    }

    pub fn settings(&self) -> &HttpSettings {
        self.transport.settings()
    }

    // ========================================================================
    // On-demand catalog
    // ========================================================================

    pub fn new_arrivals(&self) -> Result<Vec<Corner>> {
        let url = format!("{}/new_arrivals.json", self.ondemand_base);
        let list: CornerList = self.transport.fetch_json(&url, &[])?;
        debug!("NHK new arrivals: {} corners", list.corners.len());
        Ok(list.corners)
    }

    /// Corners aired on `date`
    pub fn corners_by_date(&self, date: NaiveDate) -> Result<Vec<Corner>> {
        let url = format!("{}/corners-{}.json", self.ondemand_base, yyyymmdd(date));
        let list: CornerList = self.transport.fetch_json(&url, &[])?;
        debug!("NHK corners on {}: {}", date, list.corners.len());
        Ok(list.corners)
    }

    /// Series document with its episodes
    ///
    /// Numeric corner ids are zero-padded to two digits (`1` → `01`).
    pub fn series(&self, site_id: &str, corner_site_id: &str) -> Result<Series> {
        let url = series_url(&self.ondemand_base, site_id, corner_site_id);
        self.transport.fetch_json(&url, &[])
    }

    /// Series of a catalog corner
    pub fn corner_series(&self, corner: &Corner) -> Result<Series> {
        let site_id = corner.series_site_id.as_deref().ok_or_else(|| {
            Error::Configuration(format!("corner {:?} has no series_site_id", corner.title))
        })?;
        self.series(site_id, corner.corner_site_id.as_deref().unwrap_or("01"))
    }

    pub fn recording_info(&self, site_id: &str, corner_site_id: &str) -> Result<Vec<RecordingInfo>> {
        Ok(self.series(site_id, corner_site_id)?.recording_info())
    }

    // ========================================================================
    // Live streams
    // ========================================================================

    /// Every area of the live stream table, in document order
    pub fn areas(&self) -> Result<Vec<NhkArea>> {
        let config: RadioConfigXml = self.transport.fetch_xml(&self.config_url, &[])?;
        Ok(config.stream_url.data)
    }

    /// Live HLS playlist of `channel` in `area` (e.g. "tokyo", "osaka")
    ///
    /// An area missing from the table is [`Error::AreaNotFound`]; a listed
    /// area without a URL for the channel is [`Error::ChannelUnavailable`].
    pub fn live_stream_url(&self, channel: NhkChannel, area: &str) -> Result<String> {
        let areas = self.areas()?;
        let entry = areas
            .iter()
            .find(|a| a.area.trim() == area)
            .ok_or_else(|| Error::AreaNotFound(area.to_string()))?;

        let url = entry
            .stream_for(channel)
            .ok_or_else(|| Error::ChannelUnavailable {
                channel: channel.to_string(),
                area: area.to_string(),
            })?;
        info!("NHK {} live stream in {}: {}", channel, area, url);
        Ok(url.to_string())
    }

    /// Live HLS playlist of `channel` in the configured area
    pub fn live_stream(&self, channel: NhkChannel) -> Result<String> {
        self.live_stream_url(channel, &self.area)
    }

    // ========================================================================
    // Program guide
    // ========================================================================

    /// Previous, current or next program on `channel` in the configured
    /// area
    ///
    /// `None` when the guide has no entry for that slot.
    pub fn now_on_air(&self, channel: NhkChannel, timing: Timing) -> Result<Option<ProgramInfo>> {
        let key = self.api_key.as_deref().ok_or_else(|| {
            Error::Configuration("NHK program guide API key is not configured".into())
        })?;
        let service = channel.service_code();

        let now_url = format!(
            "{}/pg/now/{}/{}.json",
            self.program_api_base, self.area_code, service
        );
        let now: NowOnAirResponse = self.transport.fetch_json(&now_url, &[("key", key)])?;

        let program_id = now
            .nowonair_list
            .as_ref()
            .and_then(|list| list.get(service))
            .and_then(|entry| entry.pick(timing))
            .and_then(|p| p.id.as_deref())
            .map(str::trim)
            .filter(|id| !id.is_empty());
        let Some(program_id) = program_id else {
            debug!("NHK {} {:?}: nothing on air", service, timing);
            return Ok(None);
        };

        let info_url = format!(
            "{}/pg/info/{}/{}/{}.json",
            self.program_api_base, self.area_code, service, program_id
        );
        let mut details: ProgramInfoResponse =
            self.transport.fetch_json(&info_url, &[("key", key)])?;

        details
            .list
            .remove(service)
            .and_then(|programs| programs.into_iter().next())
            .map(|program| program.into_program(service, &self.area_code))
            .transpose()
    }
}

pub fn series_url(ondemand_base: &str, site_id: &str, corner_site_id: &str) -> String {
    let corner = corner_site_id.trim();
    let corner = match corner.parse::<u32>() {
        Ok(n) if corner.len() < 2 => format!("{:02}", n),
        _ => corner.to_string(),
    };
    format!("{}/{}-{}.json", ondemand_base.trim_end_matches('/'), site_id, corner)
}

/// Builder for configuring an [`NhkClient`]
#[derive(Debug)]
pub struct NhkClientBuilder {
    settings: HttpSettings,
    ondemand_base: String,
    config_url: String,
    program_api_base: String,
    area: String,
    area_code: String,
    api_key: Option<String>,
}

impl Default for NhkClientBuilder {
    fn default() -> Self {
        Self {
            settings: HttpSettings::default(),
            ondemand_base: DEFAULT_ONDEMAND_BASE.to_string(),
            config_url: DEFAULT_CONFIG_URL.to_string(),
            program_api_base: DEFAULT_PROGRAM_API_BASE.to_string(),
            area: DEFAULT_AREA.to_string(),
            area_code: DEFAULT_AREA_CODE.to_string(),
            api_key: None,
        }
    }
}

impl NhkClientBuilder {
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

    pub fn ondemand_base(mut self, url: impl Into<String>) -> Self {
        self.ondemand_base = url.into();
        self
    }

    pub fn config_url(mut self, url: impl Into<String>) -> Self {
        self.config_url = url.into();
        self
    }

    pub fn program_api_base(mut self, url: impl Into<String>) -> Self {
        self.program_api_base = url.into();
        self
    }

    pub fn area(mut self, area: impl Into<String>) -> Self {
        self.area = area.into();
        self
    }

    pub fn area_code(mut self, code: impl Into<String>) -> Self {
        self.area_code = code.into();
        self
    }

    /// Program guide API key; blank keys are ignored
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        self.api_key = if key.trim().is_empty() { None } else { Some(key) };
        self
    }

    pub fn build(self) -> Result<NhkClient> {
        if self.settings.timeout.is_zero() {
            return Err(Error::Configuration("timeout must be positive".into()));
        }
        if self.area_code.trim().is_empty() {
            return Err(Error::Configuration("NHK area code is empty".into()));
        }

        Ok(NhkClient {
            transport: Transport::new(self.settings),
            ondemand_base: self.ondemand_base.trim_end_matches('/').to_string(),
            config_url: self.config_url,
            program_api_base: self.program_api_base.trim_end_matches('/').to_string(),
            area: self.area,
            area_code: self.area_code,
            api_key: self.api_key,
        })
    }
}
