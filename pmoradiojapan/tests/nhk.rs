//! NHK catalog, live table and program guide against a mocked server

mod common;

use chrono::NaiveDate;
use common::nhk_client;
use mockito::Matcher;
use pmoradiojapan::{Error, NhkChannel, Timing};

const CONFIG_WEB: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<radiru_config>
  <info>https://www.nhk.or.jp/radio/config/info.xml</info>
  <stream_url>
    <data>
      <areajp>札幌</areajp>
      <area>sapporo</area>
      <apikey>700</apikey>
      <areakey>010</areakey>
      <r1hls><![CDATA[https://radio-stream.nhk.jp/hls/live/2023545/nhkradiruikr1/master.m3u8]]></r1hls>
      <r2hls><![CDATA[https://radio-stream.nhk.jp/hls/live/2023501/nhkradiruakr2/master.m3u8]]></r2hls>
      <fmhls><![CDATA[https://radio-stream.nhk.jp/hls/live/2023546/nhkradiruikfm/master.m3u8]]></fmhls>
    </data>
    <data>
      <areajp>東京</areajp>
      <area>tokyo</area>
      <apikey>001</apikey>
      <areakey>130</areakey>
      <r1hls><![CDATA[https://radio-stream.nhk.jp/hls/live/2023229/nhkradiruakr1/master.m3u8]]></r1hls>
      <r2hls><![CDATA[https://radio-stream.nhk.jp/hls/live/2023501/nhkradiruakr2/master.m3u8]]></r2hls>
      <fmhls></fmhls>
    </data>
  </stream_url>
</radiru_config>"#;

#[test]
fn new_arrivals_lists_corners() -> anyhow::Result<()> {
    let mut server = mockito::Server::new();
    let arrivals = server
        .mock("GET", "/radioondemand/json/new_arrivals.json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"corners": [
                {"title": "ラジオ文芸館", "radio_broadcast": "R1", "series_site_id": "47Q5W9WQK9",
                 "corner_site_id": "01", "onair_date": "2026年1月18日(日)放送"},
                {"title": "きょうは何の日", "radio_broadcast": "R1,FM", "series_site_id": "X4X6N1XG8Z",
                 "corner_site_id": "01", "thumbnail_url": "https://www.nhk.or.jp/x.jpg"}
            ]}"#,
        )
        .create();

    let corners = nhk_client(&server, None).new_arrivals()?;

    assert_eq!(corners.len(), 2);
    assert_eq!(corners[0].title, "ラジオ文芸館");
    assert_eq!(corners[1].radio_broadcast.as_deref(), Some("R1,FM"));
    assert_eq!(corners[1].onair_date, None);
    arrivals.assert();
    Ok(())
}

#[test]
fn corners_by_date_uses_compact_date() -> anyhow::Result<()> {
    let mut server = mockito::Server::new();
    let corners = server
        .mock("GET", "/radioondemand/json/corners-20260118.json")
        .with_status(200)
        .with_body(r#"{"onair_date": "20260118", "corners": []}"#)
        .create();

    let date = NaiveDate::from_ymd_opt(2026, 1, 18).expect("valid date");
    assert!(nhk_client(&server, None).corners_by_date(date)?.is_empty());
    corners.assert();
    Ok(())
}

#[test]
fn corner_series_flattens_episodes() -> anyhow::Result<()> {
    let mut server = mockito::Server::new();
    let series = server
        .mock("GET", "/radioondemand/json/47Q5W9WQK9-01.json")
        .with_status(200)
        .with_body(
            r#"{
                "title": "ラジオ文芸館",
                "series_site_id": "47Q5W9WQK9",
                "corner_site_id": "01",
                "schedule": "毎週日曜 午前8:05",
                "episodes": [
                    {"program_title": "「鼠小僧次郎吉」", "onair_date": "2026年1月18日(日)午前8:05放送",
                     "closed_at": "2026年1月26日(月)午前10:00配信終了",
                     "stream_url": "https://vod-stream.nhk.jp/radioondemand/r/47Q5W9WQK9/s/stream_47Q5W9WQK9_01/index.m3u8"}
                ]
            }"#,
        )
        .expect(2)
        .create();

    let client = nhk_client(&server, None);
    let corner = pmoradiojapan::nhk::Corner {
        title: "ラジオ文芸館".into(),
        series_site_id: Some("47Q5W9WQK9".into()),
        corner_site_id: Some("1".into()),
        ..Default::default()
    };

    let series_doc = client.corner_series(&corner)?;
    assert_eq!(series_doc.schedule.as_deref(), Some("毎週日曜 午前8:05"));

    let info = client.recording_info("47Q5W9WQK9", "01")?;
    assert_eq!(info.len(), 1);
    assert_eq!(info[0].title, "ラジオ文芸館");
    assert_eq!(info[0].program_title, "「鼠小僧次郎吉」");
    assert!(info[0].stream_url.ends_with("index.m3u8"));
    series.assert();
    Ok(())
}

#[test]
fn live_stream_is_read_from_area_table() -> anyhow::Result<()> {
    let mut server = mockito::Server::new();
    let table = server
        .mock("GET", "/radio/config/config_web.xml")
        .with_status(200)
        .with_header("content-type", "application/xml")
        .with_body(CONFIG_WEB)
        .expect(4)
        .create();
    let client = nhk_client(&server, None);

    assert_eq!(
        client.live_stream_url(NhkChannel::R1, "tokyo")?,
        "https://radio-stream.nhk.jp/hls/live/2023229/nhkradiruakr1/master.m3u8"
    );
    assert_eq!(
        client.live_stream_url(NhkChannel::Fm, "sapporo")?,
        "https://radio-stream.nhk.jp/hls/live/2023546/nhkradiruikfm/master.m3u8"
    );

    let missing = client.live_stream_url(NhkChannel::R1, "naha").unwrap_err();
    assert!(matches!(missing, Error::AreaNotFound(ref area) if area == "naha"));

    // the area is listed but carries no FM stream
    let blank = client.live_stream_url(NhkChannel::Fm, "tokyo").unwrap_err();
    match &blank {
        Error::ChannelUnavailable { channel, area } => {
            assert_eq!(channel, "FM");
            assert_eq!(area, "tokyo");
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(blank.status_code(), None);

    table.assert();
    Ok(())
}

#[test]
fn live_stream_uses_configured_area() -> anyhow::Result<()> {
    let mut server = mockito::Server::new();
    let table = server
        .mock("GET", "/radio/config/config_web.xml")
        .with_status(200)
        .with_body(CONFIG_WEB)
        .create();

    let client = pmoradiojapan::NhkClient::builder()
        .config_url(format!("{}/radio/config/config_web.xml", server.url()))
        .area("sapporo")
        .build()?;

    assert_eq!(
        client.live_stream(NhkChannel::R1)?,
        "https://radio-stream.nhk.jp/hls/live/2023545/nhkradiruikr1/master.m3u8"
    );
    table.assert();
    Ok(())
}

#[test]
fn now_on_air_follows_program_id() -> anyhow::Result<()> {
    let mut server = mockito::Server::new();
    let now = server
        .mock("GET", "/v2/pg/now/130/r1.json")
        .match_query(Matcher::UrlEncoded("key".into(), "test-key".into()))
        .with_status(200)
        .with_body(
            r#"{"nowonair_list": {"r1": {
                "previous": {"id": "2026012022001"},
                "present": {"id": "2026012023051"},
                "following": {"id": null}
            }}}"#,
        )
        .expect(2)
        .create();
    let info = server
        .mock("GET", "/v2/pg/info/130/r1/2026012023051.json")
        .match_query(Matcher::UrlEncoded("key".into(), "test-key".into()))
        .with_status(200)
        .with_body(
            r#"{"list": {"r1": [{
                "id": "2026012023051",
                "title": "ラジオ深夜便",
                "subtitle": "",
                "content": "▽ロマンチックコンサート",
                "act": "【アンカー】村田",
                "start_time": "2026-01-20T23:05:00+09:00",
                "end_time": "2026-01-21T05:00:00+09:00",
                "program_logo": {"url": "//www.nhk.or.jp/radio/shinyabin.png"},
                "program_url": "//www.nhk.or.jp/shinyabin/"
            }]}}"#,
        )
        .create();

    let client = nhk_client(&server, Some("test-key"));

    let program = client
        .now_on_air(NhkChannel::R1, Timing::Present)?
        .expect("program on air");
    assert_eq!(program.title, "ラジオ深夜便");
    assert_eq!(program.station_id, "r1");
    assert_eq!(program.area_id, "130");
    assert_eq!(program.start_time.to_string(), "20260120230500");
    assert_eq!(program.description, None);
    assert_eq!(program.info.as_deref(), Some("▽ロマンチックコンサート"));
    assert_eq!(
        program.image_url.as_deref(),
        Some("https://www.nhk.or.jp/radio/shinyabin.png")
    );
    assert_eq!(program.info_url.as_deref(), Some("https://www.nhk.or.jp/shinyabin/"));

    assert!(client.now_on_air(NhkChannel::R1, Timing::Following)?.is_none());

    now.assert();
    info.assert();
    Ok(())
}

#[test]
fn now_on_air_without_list_is_none() -> anyhow::Result<()> {
    let mut server = mockito::Server::new();
    let _now = server
        .mock("GET", "/v2/pg/now/130/r3.json")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"nowonair_list": null}"#)
        .create();

    let program = nhk_client(&server, Some("test-key")).now_on_air(NhkChannel::Fm, Timing::Present)?;
    assert!(program.is_none());
    Ok(())
}
