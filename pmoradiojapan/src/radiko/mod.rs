//! radiko: area-gated commercial radio
//!
//! Live and timefree streams require a session obtained through a two-stage
//! challenge/response handshake; the handshake also tells which area the
//! client is in, and only that area's stations can be played.

pub mod auth;
pub mod catalog;
pub mod client;
pub mod partial_key;
pub mod program;
pub mod search;
pub mod stream;

pub use auth::{AuthState, Authenticator};
pub use catalog::Catalog;
pub use client::{RadikoClient, RadikoClientBuilder, Resolution};
pub use partial_key::{derive_partial_key, Challenge, AUTH_KEY};
pub use program::{ProgramLookup, When};
pub use search::SearchFilter;
