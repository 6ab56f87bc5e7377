//! Program lookups and search against a mocked radiko

mod common;

use common::radiko_client;
use mockito::Matcher;
use pmoradiojapan::{BodyFormat, Error, SearchFilter, Timestamp};

const SCHEDULE_20260120: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<radiko>
  <ttl>1800</ttl>
  <srvtime>1768860000</srvtime>
  <stations>
    <station id="TBS">
      <name>TBSラジオ</name>
      <progs>
        <date>20260120</date>
        <prog id="1" ft="20260120050000" to="20260120053000" ftl="0500" tol="0530" dur="1800">
          <title>生島ヒロシのおはよう定食</title>
          <pfm>生島ヒロシ</pfm>
          <url>https://www.tbsradio.jp/ikushima/</url>
        </prog>
        <prog id="2" ft="20260120053000" to="20260120063000" ftl="0530" tol="0630" dur="3600">
          <title>生島ヒロシのおはよう一直線</title>
          <pfm>生島ヒロシ</pfm>
          <desc></desc>
        </prog>
        <prog id="3" ft="20260121010000" to="20260121050000" ftl="2500" tol="2900" dur="14400">
          <title>JUNK</title>
        </prog>
      </progs>
    </station>
  </stations>
</radiko>"#;

fn at(ts: &str) -> anyhow::Result<Timestamp> {
    Ok(ts.parse::<Timestamp>()?)
}

#[test]
fn program_at_uses_half_open_windows() -> anyhow::Result<()> {
    let mut server = mockito::Server::new();
    let schedule = server
        .mock("GET", "/v3/program/station/date/20260120/TBS.xml")
        .with_status(200)
        .with_body(SCHEDULE_20260120)
        .expect(3)
        .create();
    let client = radiko_client(&server);

    let first = client
        .program_at("TBS", at("20260120050000")?, "JP13")?
        .expect("program at 05:00");
    assert_eq!(first.title, "生島ヒロシのおはよう定食");
    assert_eq!(first.duration_minutes(), 30);
    assert_eq!(first.performer.as_deref(), Some("生島ヒロシ"));
    assert_eq!(first.area_id, "JP13");

    // 05:30 belongs to the next program only
    let second = client
        .program_at("TBS", at("20260120053000")?, "JP13")?
        .expect("program at 05:30");
    assert_eq!(second.title, "生島ヒロシのおはよう一直線");
    assert_eq!(second.description, None);

    // after midnight the previous broadcast day is consulted
    let late = client
        .program_at("TBS", at("20260121030000")?, "JP13")?
        .expect("program at 27:00");
    assert_eq!(late.title, "JUNK");
    assert_eq!(late.duration_minutes(), 240);

    schedule.assert();
    Ok(())
}

#[test]
fn program_at_gap_is_none() -> anyhow::Result<()> {
    let mut server = mockito::Server::new();
    let _schedule = server
        .mock("GET", "/v3/program/station/date/20260120/TBS.xml")
        .with_status(200)
        .with_body(SCHEDULE_20260120)
        .create();

    let program = radiko_client(&server).program_at("TBS", at("20260120120000")?, "JP13")?;
    assert!(program.is_none());
    Ok(())
}

#[test]
fn weekly_lookup_returns_every_entry() -> anyhow::Result<()> {
    let mut server = mockito::Server::new();
    let weekly = server
        .mock("GET", "/v3/program/station/weekly/TBS.xml")
        .with_status(200)
        .with_body(SCHEDULE_20260120)
        .create();

    let programs = radiko_client(&server).weekly_programs("TBS", "JP13")?;

    let titles: Vec<&str> = programs.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(
        titles,
        ["生島ヒロシのおはよう定食", "生島ヒロシのおはよう一直線", "JUNK"]
    );
    assert!(programs.iter().all(|p| p.station_id == "TBS"));
    weekly.assert();
    Ok(())
}

#[test]
fn malformed_schedule_is_a_parse_error() {
    let mut server = mockito::Server::new();
    let _schedule = server
        .mock("GET", "/v3/program/station/date/20260120/TBS.xml")
        .with_status(200)
        .with_body("<radiko><stations><station id=\"TBS\">")
        .create();

    let err = radiko_client(&server)
        .program_at("TBS", "20260120060000".parse().unwrap(), "JP13")
        .unwrap_err();

    assert!(
        matches!(err, Error::Parse { format: BodyFormat::Xml, .. }),
        "{:?}",
        err
    );
}

#[test]
fn area_now_lists_every_station() -> anyhow::Result<()> {
    let mut server = mockito::Server::new();
    let _now = server
        .mock("GET", "/v3/program/now/JP13.xml")
        .with_status(200)
        .with_body(
            r#"<radiko><stations>
                <station id="TBS"><progs><prog ft="20260120050000" to="20260120053000"><title>A</title></prog></progs></station>
                <station id="QRR"><progs><prog ft="20260120050000" to="20260120060000"><title>B</title></prog></progs></station>
            </stations></radiko>"#,
        )
        .create();

    let programs = radiko_client(&server).area_now("JP13")?;

    let stations: Vec<&str> = programs.iter().map(|p| p.station_id.as_str()).collect();
    assert_eq!(stations, ["TBS", "QRR"]);
    Ok(())
}

#[test]
fn search_sends_the_player_parameters() -> anyhow::Result<()> {
    let mut server = mockito::Server::new();
    let search = server
        .mock("GET", "/v3/api/program/search")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("key".into(), "生島".into()),
            Matcher::UrlEncoded("filter".into(), "past".into()),
            Matcher::UrlEncoded("area_id".into(), "JP13".into()),
            Matcher::UrlEncoded("row_limit".into(), "12".into()),
            Matcher::UrlEncoded("app_id".into(), "pc".into()),
            Matcher::Regex("uid=[0-9a-f]{32}".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "meta": {"key": ["生島"], "result_count": 1},
                "data": [{
                    "title": "生島ヒロシのおはよう定食",
                    "station_id": "TBS",
                    "start_time": "2026-01-19 05:00:00",
                    "end_time": "2026-01-19 05:30:00",
                    "performer": "生島ヒロシ",
                    "description": "",
                    "img": "https://radiko.jp/res/program/DEFAULT_IMAGE/TBS/xx.jpg"
                }]
            }"#,
        )
        .create();

    let programs = radiko_client(&server).search("生島", SearchFilter::Past, "JP13")?;

    assert_eq!(programs.len(), 1);
    assert_eq!(programs[0].start_time.to_string(), "20260119050000");
    assert_eq!(programs[0].duration_minutes(), 30);
    assert_eq!(programs[0].description, None);
    assert!(programs[0].image_url.is_some());
    search.assert();
    Ok(())
}

#[test]
fn default_area_now_uses_the_configured_area() -> anyhow::Result<()> {
    let mut server = mockito::Server::new();
    let now = server
        .mock("GET", "/v3/program/now/JP40.xml")
        .with_status(200)
        .with_body(
            r#"<radiko><stations>
                <station id="RKB"><progs><prog ft="20260120050000" to="20260120060000"><title>C</title></prog></progs></station>
            </stations></radiko>"#,
        )
        .create();

    let client = pmoradiojapan::RadikoClient::builder()
        .api_base(server.url())
        .default_area("JP40")
        .build()?;

    let programs = client.default_area_now()?;
    assert_eq!(programs.len(), 1);
    assert_eq!(programs[0].area_id, "JP40");
    now.assert();
    Ok(())
}

#[test]
fn search_default_area_scopes_the_query() -> anyhow::Result<()> {
    let mut server = mockito::Server::new();
    let search = server
        .mock("GET", "/v3/api/program/search")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("area_id".into(), "JP27".into()),
            Matcher::UrlEncoded("filter".into(), "future".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"data": []}"#)
        .create();

    let client = pmoradiojapan::RadikoClient::builder()
        .api_base(server.url())
        .default_area("JP27")
        .build()?;

    assert!(client
        .search_default_area("ニュース", SearchFilter::Future)?
        .is_empty());
    search.assert();
    Ok(())
}
