//! Error types for the radiko and NHK clients

use std::fmt;

/// Result type alias for radio client operations
pub type Result<T> = std::result::Result<T, Error>;

/// Boxed underlying decoder error kept as the source of [`Error::Parse`]
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Body format a decoder expected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyFormat {
    /// UTF-8 text, before any structured decoding
    Text,
    Xml,
    Json,
}

impl fmt::Display for BodyFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BodyFormat::Text => f.write_str("UTF-8 text"),
            BodyFormat::Xml => f.write_str("XML"),
            BodyFormat::Json => f.write_str("JSON"),
        }
    }
}

/// Step of the radiko two-stage handshake
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStage {
    Stage1,
    Stage2,
}

impl fmt::Display for AuthStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthStage::Stage1 => f.write_str("stage1"),
            AuthStage::Stage2 => f.write_str("stage2"),
        }
    }
}

/// Errors that can occur when using the radio clients
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Service unreachable, connection reset or timeout
    #[error("HTTP request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: ureq::Error,
    },

    /// Body did not decode as the expected format
    #[error("{format} parsing failed ({body_len} bytes, starting with {body_prefix:?}): {source}")]
    Parse {
        format: BodyFormat,
        body_len: usize,
        body_prefix: String,
        #[source]
        source: BoxError,
    },

    /// Well-formed response with a non-success status
    #[error("{url} returned HTTP status {status}")]
    HttpStatus { url: String, status: u16 },

    /// radiko handshake failed at the given stage
    #[error("Authentication failed at {stage}: {reason}")]
    AuthHandshake {
        stage: AuthStage,
        status: Option<u16>,
        reason: String,
    },

    /// Offset/length pair from the server does not fit the key
    #[error("Challenge out of range: offset={offset} length={length} key_len={key_len}")]
    ChallengeRange {
        offset: String,
        length: String,
        key_len: usize,
    },

    /// Successful response that carried no playable locator
    #[error("No stream available for station {station} (HTTP status {status})")]
    StreamUnavailable { station: String, status: u16 },

    /// Area table entry without a stream for the channel
    #[error("No {channel} stream listed for area {area}")]
    ChannelUnavailable { channel: String, area: String },

    /// Station not present in the session's area
    #[error("Station {station} is not available in area {area_id}")]
    StationUnavailable { station: String, area_id: String },

    /// Area missing from a service-provided area table
    #[error("Area not found: {0}")]
    AreaNotFound(String),

    /// Time text that could not be normalized to `YYYYMMDDHHMMSS`
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// Missing or inconsistent client settings
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Configuration store error (from pmoconfig/anyhow)
    #[error("Configuration store error: {0}")]
    Config(#[from] anyhow::Error),
}

/// Maximum number of characters kept from a body that failed to decode
const BODY_PREFIX_CHARS: usize = 64;

impl Error {
    pub(crate) fn network(url: impl Into<String>, source: ureq::Error) -> Self {
        Self::Network {
            url: url.into(),
            source,
        }
    }

    pub(crate) fn parse(
        format: BodyFormat,
        body: &str,
        source: impl Into<BoxError>,
    ) -> Self {
        Self::Parse {
            format,
            body_len: body.len(),
            body_prefix: body.chars().take(BODY_PREFIX_CHARS).collect(),
            source: source.into(),
        }
    }

    pub(crate) fn auth(stage: AuthStage, status: Option<u16>, reason: impl Into<String>) -> Self {
        Self::AuthHandshake {
            stage,
            status,
            reason: reason.into(),
        }
    }

    /// HTTP status carried by the error, if any
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::HttpStatus { status, .. } | Error::StreamUnavailable { status, .. } => {
                Some(*status)
            }
            Error::AuthHandshake { status, .. } => *status,
            _ => None,
        }
    }

    /// True when the transport gave up waiting for the service
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Error::Network {
                source: ureq::Error::Timeout(_),
                ..
            }
        )
    }

    /// True for handshake failures and challenge errors
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            Error::AuthHandshake { .. } | Error::ChallengeRange { .. }
        )
    }

    /// Handshake stage that failed, for [`Error::AuthHandshake`]
    pub fn auth_stage(&self) -> Option<AuthStage> {
        match self {
            Error::AuthHandshake { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}
