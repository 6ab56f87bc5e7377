//! Japanese radio client library for PMOMusic
//!
//! This crate resolves playable streams and program metadata for two
//! services:
//!
//! - **radiko**: commercial radio gated by area. A two-stage
//!   challenge/response handshake yields a session token and the area the
//!   client is located in; live chunklists and timefree playlists are then
//!   requested with that token.
//! - **NHK**: the public broadcaster. On-demand catalog, live HLS streams per
//!   area and the now-on-air program guide.
//!
//! Resolved streams and [`ProgramInfo`] values are meant to be handed to an
//! external capture process; this crate does not record anything itself.
//!
//! All calls are blocking. Clients take their network settings explicitly
//! ([`HttpSettings`]) and can be cloned and shared between threads.
//!
//! # Example
//!
//! ```no_run
//! use pmoradiojapan::{NhkChannel, NhkClient, RadikoClient};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // radiko: authenticate, then resolve a station of the assigned area
//!     let radiko = RadikoClient::new()?;
//!     let session = radiko.authenticate()?;
//!     let stations = radiko.session_stations(&session)?;
//!     if let Some(first) = stations.stations.first() {
//!         let stream = radiko.stream_url(&first.id, &session)?;
//!         println!("{} -> {}", first.name, stream.url);
//!     }
//!
//!     // NHK: live stream of NHK-FM in the default area (Tokyo)
//!     let nhk = NhkClient::new()?;
//!     println!("{}", nhk.live_stream(NhkChannel::Fm)?);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Configuration Extension
//!
//! With the `pmoconfig` feature (default), [`JapanRadioConfigExt`] builds
//! clients from the shared YAML configuration:
//!
//! ```no_run
//! use pmoconfig::get_config;
//! use pmoradiojapan::JapanRadioConfigExt;
//!
//! # fn main() -> anyhow::Result<()> {
//! let nhk = get_config().nhk_client_builder()?.build()?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod models;
pub mod nhk;
pub mod radiko;
pub mod timefmt;
pub mod transport;

#[cfg(feature = "pmoconfig")]
pub mod config_ext;

pub use error::{AuthStage, BodyFormat, Error, Result};
pub use models::{AreaCatalog, ProgramInfo, ResolvedStream, Session, Station};
pub use nhk::{NhkChannel, NhkClient, NhkClientBuilder, Timing};
pub use radiko::{
    Catalog, Challenge, ProgramLookup, RadikoClient, RadikoClientBuilder, Resolution,
    SearchFilter, When,
};
pub use timefmt::Timestamp;
pub use transport::HttpSettings;

#[cfg(feature = "pmoconfig")]
pub use config_ext::JapanRadioConfigExt;
