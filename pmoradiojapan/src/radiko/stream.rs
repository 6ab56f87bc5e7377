//! Stream locators: live HLS chunklists and timefree playlists

use super::auth::HEADER_AUTH_TOKEN;
use crate::error::{Error, Result};
use crate::models::{ResolvedStream, Session};
use crate::timefmt::Timestamp;
use crate::transport::{Method, Transport};
use tracing::{debug, warn};

/// Length parameter the web player sends for timefree playlists
const TIMEFREE_CHUNK_SECS: &str = "15";

pub fn live_playlist_url(stream_base: &str, station_id: &str) -> String {
    format!(
        "{}/{}/_definst_/simul-stream.stream/playlist.m3u8",
        stream_base.trim_end_matches('/'),
        station_id
    )
}

/// First `chunklist` URI of a master playlist, made absolute
///
/// Relative URIs are resolved against the directory of `playlist_url`.
pub fn extract_chunklist(playlist_url: &str, body: &str) -> Option<String> {
    let line = body
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .find(|line| line.contains("chunklist"))?;

    if line.starts_with("http://") || line.starts_with("https://") {
        return Some(line.to_string());
    }

    let base = playlist_url
        .rsplit_once('/')
        .map(|(dir, _)| dir)
        .unwrap_or(playlist_url);
    Some(format!("{}/{}", base, line.trim_start_matches('/')))
}

/// Resolves the live chunklist of `station_id` with the session token
///
/// A non-2xx answer is [`Error::HttpStatus`]; a 2xx answer without a usable
/// chunklist is [`Error::StreamUnavailable`].
pub fn resolve_live(
    transport: &Transport,
    stream_base: &str,
    station_id: &str,
    session: &Session,
) -> Result<ResolvedStream> {
    let playlist_url = live_playlist_url(stream_base, station_id);
    let response = transport.request(
        Method::Get,
        &playlist_url,
        &[],
        &[(HEADER_AUTH_TOKEN, session.auth_token())],
    )?;

    if !response.is_success() {
        warn!("live playlist for {} returned HTTP {}", station_id, response.status);
        return Err(Error::HttpStatus {
            url: playlist_url,
            status: response.status,
        });
    }

    let body = response.text()?;
    let url = extract_chunklist(&playlist_url, body).ok_or_else(|| {
        warn!(
            "live playlist for {} has no chunklist ({} bytes)",
            station_id,
            body.len()
        );
        Error::StreamUnavailable {
            station: station_id.to_string(),
            status: response.status,
        }
    })?;

    debug!("live stream for {}: {}", station_id, url);
    Ok(ResolvedStream::for_session(url, session))
}

/// Builds the timefree playlist locator for `[ft, to)`
///
/// No request is made; the capture process fetches the playlist itself with
/// the session token.
pub fn timefree_playlist(
    api_base: &str,
    station_id: &str,
    ft: &Timestamp,
    to: &Timestamp,
    session: &Session,
) -> Result<ResolvedStream> {
    if to <= ft {
        return Err(Error::InvalidTimestamp(format!(
            "timefree window ends before it starts: ft={} to={}",
            ft, to
        )));
    }

    let url = format!(
        "{}/v2/api/ts/playlist.m3u8?station_id={}&l={}&ft={}&to={}",
        api_base.trim_end_matches('/'),
        station_id,
        TIMEFREE_CHUNK_SECS,
        ft,
        to
    );
    Ok(ResolvedStream::for_session(url, session))
}
