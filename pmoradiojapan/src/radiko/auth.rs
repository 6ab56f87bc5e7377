//! Two-stage radiko authentication
//!
//! ```text
//! Idle ──auth1──▶ Stage1Sent ──auth2──▶ Stage2Sent ──▶ Authenticated
//!   └──────────────────┴───────────────────┴──────────▶ Failed(stage)
//! ```
//!
//! Stage 1 yields a token and a [`Challenge`]; stage 2 proves possession of
//! the player key and returns the area the service assigned to this client.
//! Token and challenge belong to one attempt: a retry starts over from
//! `Idle` with a fresh [`Authenticator`].

use super::partial_key::{derive_partial_key, Challenge};
use crate::error::{AuthStage, Error, Result};
use crate::models::Session;
use crate::transport::{Method, RawResponse, Transport};
use tracing::{debug, info, warn};

pub const HEADER_APP: &str = "X-Radiko-App";
pub const HEADER_APP_VERSION: &str = "X-Radiko-App-Version";
pub const HEADER_DEVICE: &str = "X-Radiko-Device";
pub const HEADER_USER: &str = "X-Radiko-User";
pub const HEADER_AUTH_TOKEN: &str = "X-Radiko-AuthToken";
pub const HEADER_KEY_OFFSET: &str = "X-Radiko-KeyOffset";
pub const HEADER_KEY_LENGTH: &str = "X-Radiko-KeyLength";
pub const HEADER_PARTIAL_KEY: &str = "X-Radiko-PartialKey";

const APP: &str = "pc_html5";
const APP_VERSION: &str = "0.0.1";
const DEVICE: &str = "pc";
const USER: &str = "dummy_user";

/// Handshake progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Idle,
    Stage1Sent,
    Stage2Sent,
    Authenticated,
    Failed(AuthStage),
}

/// Drives one handshake attempt
pub struct Authenticator<'a> {
    transport: &'a Transport,
    auth1_url: String,
    auth2_url: String,
    key: &'a [u8],
    state: AuthState,
}

impl<'a> Authenticator<'a> {
    pub fn new(transport: &'a Transport, api_base: &str, key: &'a [u8]) -> Self {
        let base = api_base.trim_end_matches('/');
        Self {
            transport,
            auth1_url: format!("{}/v2/api/auth1", base),
            auth2_url: format!("{}/v2/api/auth2", base),
            key,
            state: AuthState::Idle,
        }
    }

    pub fn state(&self) -> AuthState {
        self.state
    }

    /// Runs both stages and returns the session
    ///
    /// Can only be driven once; a second call fails without network traffic.
    pub fn authenticate(&mut self) -> Result<Session> {
        if self.state != AuthState::Idle {
            return Err(Error::auth(
                AuthStage::Stage1,
                None,
                format!("handshake already used (state {:?})", self.state),
            ));
        }

        self.state = AuthState::Stage1Sent;
        let (token, challenge) = self
            .stage1()
            .inspect_err(|_| self.state = AuthState::Failed(AuthStage::Stage1))?;

        let partial_key = derive_partial_key(self.key, &challenge)
            .inspect_err(|_| self.state = AuthState::Failed(AuthStage::Stage1))?;

        self.state = AuthState::Stage2Sent;
        let area_id = self
            .stage2(&token, &partial_key)
            .inspect_err(|_| self.state = AuthState::Failed(AuthStage::Stage2))?;

        self.state = AuthState::Authenticated;
        info!("radiko authentication succeeded, area {}", area_id);
        Ok(Session::new(token, area_id))
    }

    fn stage1(&self) -> Result<(String, Challenge)> {
        debug!("radiko auth stage 1");
        let headers = [
            (HEADER_APP, APP),
            (HEADER_APP_VERSION, APP_VERSION),
            (HEADER_DEVICE, DEVICE),
            (HEADER_USER, USER),
        ];
        let response = self
            .transport
            .request(Method::Get, &self.auth1_url, &[], &headers)?;
        parse_stage1(&response)
    }

    fn stage2(&self, token: &str, partial_key: &str) -> Result<String> {
        debug!("radiko auth stage 2");
        let headers = [
            (HEADER_AUTH_TOKEN, token),
            (HEADER_PARTIAL_KEY, partial_key),
            (HEADER_DEVICE, DEVICE),
            (HEADER_USER, USER),
        ];
        let response = self
            .transport
            .request(Method::Get, &self.auth2_url, &[], &headers)?;

        if !response.is_success() {
            warn!("radiko auth stage 2 rejected: HTTP {}", response.status);
            return Err(Error::auth(
                AuthStage::Stage2,
                Some(response.status),
                format!("HTTP status {}", response.status),
            ));
        }

        let body = response.text().map_err(|e| {
            Error::auth(
                AuthStage::Stage2,
                Some(response.status),
                format!("unreadable response body: {}", e),
            )
        })?;
        parse_area(body).ok_or_else(|| {
            Error::auth(
                AuthStage::Stage2,
                Some(response.status),
                format!("no area in response body {:?}", truncate(body)),
            )
        })
    }
}

/// Extracts the token and challenge from a stage-1 response
pub fn parse_stage1(response: &RawResponse) -> Result<(String, Challenge)> {
    let status = Some(response.status);
    if !response.is_success() {
        warn!("radiko auth stage 1 rejected: HTTP {}", response.status);
        return Err(Error::auth(
            AuthStage::Stage1,
            status,
            format!("HTTP status {}", response.status),
        ));
    }

    let header = |name: &str| {
        response
            .header(name)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| Error::auth(AuthStage::Stage1, status, format!("missing {}", name)))
    };

    let token = header(HEADER_AUTH_TOKEN)?.to_string();
    let challenge = Challenge::parse(header(HEADER_KEY_OFFSET)?, header(HEADER_KEY_LENGTH)?)?;
    if challenge.length == 0 {
        return Err(Error::auth(AuthStage::Stage1, status, "zero key length"));
    }

    Ok((token, challenge))
}

/// Area identifier from a stage-2 body such as `JP13,東京都,tokyo Japan`
pub fn parse_area(body: &str) -> Option<String> {
    let area = body.split(',').next()?.trim();
    if area.is_empty() || !area.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(area.to_string())
}

fn truncate(body: &str) -> String {
    body.chars().take(32).collect()
}
