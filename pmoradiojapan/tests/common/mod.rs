//! Shared fixtures for the mocked-HTTP integration tests

#![allow(dead_code)]

use pmoradiojapan::{NhkClient, RadikoClient};
use std::time::Duration;

/// 20-byte key used instead of the player key
pub const TEST_KEY: &[u8] = b"0123456789abcdefghij";

/// base64 of `TEST_KEY[5..15]` ("56789abcde")
pub const TEST_PARTIAL_KEY: &str = "NTY3ODlhYmNkZQ==";

pub const TOKEN: &str = "test-auth-token";

pub fn radiko_client(server: &mockito::Server) -> RadikoClient {
    RadikoClient::builder()
        .api_base(server.url())
        .stream_base(server.url())
        .auth_key(TEST_KEY)
        .timeout(Duration::from_secs(5))
        .build()
        .expect("radiko client")
}

pub fn nhk_client(server: &mockito::Server, api_key: Option<&str>) -> NhkClient {
    let mut builder = NhkClient::builder()
        .ondemand_base(format!("{}/radioondemand/json", server.url()))
        .config_url(format!("{}/radio/config/config_web.xml", server.url()))
        .program_api_base(format!("{}/v2", server.url()))
        .timeout(Duration::from_secs(5));
    if let Some(key) = api_key {
        builder = builder.api_key(key);
    }
    builder.build().expect("nhk client")
}

/// Mocks a successful handshake assigning `area_body`'s area
pub fn mock_auth(server: &mut mockito::Server, area_body: &str) -> (mockito::Mock, mockito::Mock) {
    let auth1 = server
        .mock("GET", "/v2/api/auth1")
        .match_header("x-radiko-app", "pc_html5")
        .match_header("x-radiko-app-version", "0.0.1")
        .match_header("x-radiko-device", "pc")
        .match_header("x-radiko-user", "dummy_user")
        .with_status(200)
        .with_header("x-radiko-authtoken", TOKEN)
        .with_header("x-radiko-keyoffset", "5")
        .with_header("x-radiko-keylength", "10")
        .with_body("please send a partial key")
        .create();

    let auth2 = server
        .mock("GET", "/v2/api/auth2")
        .match_header("x-radiko-authtoken", TOKEN)
        .match_header("x-radiko-partialkey", TEST_PARTIAL_KEY)
        .match_header("x-radiko-device", "pc")
        .match_header("x-radiko-user", "dummy_user")
        .with_status(200)
        .with_body(area_body)
        .create();

    (auth1, auth2)
}

pub fn station_list(ids: &[(&str, &str)]) -> String {
    let stations: String = ids
        .iter()
        .map(|(id, name)| format!("<station><id>{}</id><name>{}</name></station>", id, name))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><stations area_id="JP13" area_name="TOKYO JAPAN">{}</stations>"#,
        stations
    )
}
