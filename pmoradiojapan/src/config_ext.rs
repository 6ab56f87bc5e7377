//! Integration with pmoconfig
//!
//! The `JapanRadioConfigExt` trait adds radiko and NHK settings to
//! `pmoconfig::Config` and turns them into explicit client settings. Clients
//! never read the configuration themselves.
//!
//! # Example
//!
//! ```no_run
//! use pmoconfig::get_config;
//! use pmoradiojapan::JapanRadioConfigExt;
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = get_config();
//!
//! if config.get_radiko_enabled()? {
//!     let client = config.radiko_client_builder()?.build()?;
//!     let stations = client.stations()?;
//!     println!("{} stations", stations.len());
//! }
//! # Ok(())
//! # }
//! ```

use crate::nhk::NhkClientBuilder;
use crate::radiko::client::DEFAULT_AREA_ID;
use crate::radiko::RadikoClientBuilder;
use crate::transport::{HttpSettings, DEFAULT_USER_AGENT};
use anyhow::Result;
use pmoconfig::Config;
use serde_yaml::Value;
use std::time::Duration;

const RADIKO: [&str; 2] = ["sources", "radiko"];
const NHK: [&str; 2] = ["sources", "nhk"];

fn path<'a>(section: &[&'a str; 2], key: &'a str) -> [&'a str; 3] {
    [section[0], section[1], key]
}

/// Extension trait for radiko and NHK settings in pmoconfig
///
/// Getters persist their default value when the key is missing.
pub trait JapanRadioConfigExt {
    // ========================================================================
    // radiko
    // ========================================================================

    fn get_radiko_enabled(&self) -> Result<bool>;
    fn set_radiko_enabled(&self, enabled: bool) -> Result<()>;

    /// Area used for catalogs and programs when the caller names none
    fn get_radiko_area_id(&self) -> Result<String>;
    fn set_radiko_area_id(&self, area_id: &str) -> Result<()>;

    // ========================================================================
    // NHK
    // ========================================================================

    fn get_nhk_enabled(&self) -> Result<bool>;
    fn set_nhk_enabled(&self, enabled: bool) -> Result<()>;

    /// Live stream area, e.g. "tokyo"
    fn get_nhk_area(&self) -> Result<String>;
    fn set_nhk_area(&self, area: &str) -> Result<()>;

    /// Program guide area code, e.g. "130"
    fn get_nhk_area_code(&self) -> Result<String>;
    fn set_nhk_area_code(&self, code: &str) -> Result<()>;

    /// Program guide API key (no default)
    fn get_nhk_api_key(&self) -> Result<Option<String>>;
    fn set_nhk_api_key(&self, key: &str) -> Result<()>;

    // ========================================================================
    // Clients
    // ========================================================================

    /// Timeout and user agent from `host.http`
    fn http_settings(&self) -> Result<HttpSettings>;

    fn radiko_client_builder(&self) -> Result<RadikoClientBuilder>;

    fn nhk_client_builder(&self) -> Result<NhkClientBuilder>;
}

/// Reads a scalar as text, persisting `default` when absent
fn string_or_default(config: &Config, path: &[&str], default: &str) -> Result<String> {
    match config.get_value(path) {
        Ok(Value::String(s)) if !s.trim().is_empty() => Ok(s),
        Ok(Value::Number(n)) => Ok(n.to_string()),
        _ => {
            config.set_value(path, Value::String(default.to_string()))?;
            Ok(default.to_string())
        }
    }
}

fn bool_or_default(config: &Config, path: &[&str], default: bool) -> Result<bool> {
    match config.get_value(path) {
        Ok(Value::Bool(b)) => Ok(b),
        _ => {
            config.set_value(path, Value::Bool(default))?;
            Ok(default)
        }
    }
}

impl JapanRadioConfigExt for Config {
    fn get_radiko_enabled(&self) -> Result<bool> {
        bool_or_default(self, &path(&RADIKO, "enabled"), true)
    }

    fn set_radiko_enabled(&self, enabled: bool) -> Result<()> {
        self.set_value(&path(&RADIKO, "enabled"), Value::Bool(enabled))
    }

    fn get_radiko_area_id(&self) -> Result<String> {
        string_or_default(self, &path(&RADIKO, "area_id"), DEFAULT_AREA_ID)
    }

    fn set_radiko_area_id(&self, area_id: &str) -> Result<()> {
        self.set_value(&path(&RADIKO, "area_id"), Value::String(area_id.to_string()))
    }

    fn get_nhk_enabled(&self) -> Result<bool> {
        bool_or_default(self, &path(&NHK, "enabled"), true)
    }

    fn set_nhk_enabled(&self, enabled: bool) -> Result<()> {
        self.set_value(&path(&NHK, "enabled"), Value::Bool(enabled))
    }

    fn get_nhk_area(&self) -> Result<String> {
        string_or_default(self, &path(&NHK, "area"), crate::nhk::client::DEFAULT_AREA)
    }

    fn set_nhk_area(&self, area: &str) -> Result<()> {
        self.set_value(&path(&NHK, "area"), Value::String(area.to_string()))
    }

    fn get_nhk_area_code(&self) -> Result<String> {
        string_or_default(
            self,
            &path(&NHK, "area_code"),
            crate::nhk::client::DEFAULT_AREA_CODE,
        )
    }

    fn set_nhk_area_code(&self, code: &str) -> Result<()> {
        self.set_value(&path(&NHK, "area_code"), Value::String(code.to_string()))
    }

    fn get_nhk_api_key(&self) -> Result<Option<String>> {
        Ok(self
            .get_string(&path(&NHK, "api_key"))
            .filter(|key| !key.trim().is_empty()))
    }

    fn set_nhk_api_key(&self, key: &str) -> Result<()> {
        self.set_value(&path(&NHK, "api_key"), Value::String(key.to_string()))
    }

    fn http_settings(&self) -> Result<HttpSettings> {
        let timeout = Duration::from_secs(self.get_http_timeout_secs()?);
        let user_agent = self
            .get_http_user_agent()
            .filter(|ua| !ua.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());
        Ok(HttpSettings {
            timeout,
            user_agent,
        })
    }

    fn radiko_client_builder(&self) -> Result<RadikoClientBuilder> {
        Ok(RadikoClientBuilder::new()
            .settings(self.http_settings()?)
            .default_area(self.get_radiko_area_id()?))
    }

    fn nhk_client_builder(&self) -> Result<NhkClientBuilder> {
        let mut builder = NhkClientBuilder::new()
            .settings(self.http_settings()?)
            .area(self.get_nhk_area()?)
            .area_code(self.get_nhk_area_code()?);
        if let Some(key) = self.get_nhk_api_key()? {
            builder = builder.api_key(key);
        }
        Ok(builder)
    }
}
