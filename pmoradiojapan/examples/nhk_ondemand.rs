//! Example: browse the NHK on-demand catalog and live streams
//!
//! Run with: cargo run -p pmoradiojapan --example nhk_ondemand

use pmoconfig::get_config;
use pmoradiojapan::{JapanRadioConfigExt, NhkChannel, Timing};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let config = get_config();
    let client = config.nhk_client_builder()?.build()?;

    println!("=== Live streams ({}) ===", client.area());
    for channel in [NhkChannel::R1, NhkChannel::R2, NhkChannel::Fm] {
        match client.live_stream(channel) {
            Ok(url) => println!("  {:<14} {}", channel.display_name(), url),
            Err(e) => println!("  {:<14} unavailable: {}", channel.display_name(), e),
        }
    }

    if config.get_nhk_api_key()?.is_some() {
        if let Some(program) = client.now_on_air(NhkChannel::Fm, Timing::Present)? {
            println!("\nNow on NHK-FM: {} ({})", program.title, program.start_time.hhmm());
        }
    }

    let corners = client.new_arrivals()?;
    println!("\n=== New arrivals ({}) ===", corners.len());
    for corner in corners.iter().take(5) {
        println!("  {}", corner.title);
        if corner.series_site_id.is_none() {
            continue;
        }
        for info in client.corner_series(corner)?.recording_info() {
            println!("    {} [{}]", info.program_title, info.closed_at);
            println!("    {}", info.stream_url);
        }
    }

    Ok(())
}
