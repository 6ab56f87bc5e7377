//! Example: resolve a radiko live stream and the program on air
//!
//! Run with: cargo run -p pmoradiojapan --example resolve_live -- TBS

use pmoconfig::get_config;
use pmoradiojapan::JapanRadioConfigExt;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = get_config();

    // Initialize logging
    if config.get_log_enable_console()? {
        let level = config.get_log_min_level()?;
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
            )
            .init();
    }

    let station = std::env::args().nth(1).unwrap_or_else(|| "TBS".to_string());
    let client = config.radiko_client_builder()?.build()?;

    let resolution = client.resolve_live(&station)?;
    println!("Station: {}", station);
    println!("Area:    {}", resolution.session.area_id());
    println!("Stream:  {}", resolution.stream.url);
    println!("Header:  X-Radiko-AuthToken: {}", resolution.stream.auth_token);

    match &resolution.program {
        Some(program) => {
            println!("\n=== On air ===");
            println!("  {}", program.title);
            println!(
                "  {} - {} ({} min)",
                program.start_time.hhmm(),
                program.end_time.hhmm(),
                program.duration_minutes()
            );
            if let Some(performer) = &program.performer {
                println!("  {}", performer);
            }
        }
        None => println!("\nNo program information"),
    }

    Ok(())
}
