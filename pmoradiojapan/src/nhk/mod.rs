//! NHK: public broadcaster radio (on-demand catalog, live streams, guide)

pub mod client;
pub mod models;

pub use client::{NhkClient, NhkClientBuilder};
pub use models::{Corner, Episode, NhkArea, NhkChannel, RecordingInfo, Series, Timing};
