mod status;

use std::time::Duration;

use chrono::{SecondsFormat, Utc};
use clap::Parser;
use rand::Rng;
use status::StatusReport;
use tracing::{error, info, warn};

#[derive(Debug, Parser)]
#[command(about = "Pushes randomized device status reports to the status API")]
struct Args {
    /// Base URL of the status API
    #[arg(long, env = "STATUS_API_URL", default_value = "http://localhost:8080")]
    url: String,

    /// API key sent in the X-API-Key header
    #[arg(long, env = "API_KEY", default_value = "dev-key-123")]
    api_key: String,

    /// Number of simulated devices
    #[arg(long, env = "DEVICES", default_value_t = 10)]
    devices: usize,

    /// Seconds between report rounds
    #[arg(long, env = "INTERVAL_SECS", default_value_t = 5)]
    interval_secs: u64,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::fmt::init();

    info!("Starting status simulator");
    info!(
        "Target: {}, Devices: {}, Interval: {}s",
        args.url, args.devices, args.interval_secs
    );

    let client = reqwest::Client::new();
    let endpoint = format!("{}/status", args.url.trim_end_matches('/'));
    let mut ticker = tokio::time::interval(Duration::from_secs(args.interval_secs));
    let mut rounds = 0u64;

    loop {
        ticker.tick().await;

        for i in 0..args.devices {
            let report = generate_report(&mut rand::thread_rng(), format!("dev-{:03}", i));

            match client
                .post(&endpoint)
                .header("X-API-Key", &args.api_key)
                .json(&report)
                .send()
                .await
            {
                Ok(response) if response.status().is_success() => {}
                Ok(response) => {
                    warn!(
                        "Server rejected report for {}: {}",
                        report.device_id,
                        response.status()
                    );
                }
                Err(e) => {
                    error!("Failed to send report for {}: {}", report.device_id, e);
                }
            }
        }

        rounds += 1;
        if rounds % 10 == 0 {
            info!("Completed {} report rounds", rounds);
        }
    }
}

fn generate_report(rng: &mut impl Rng, device_id: String) -> StatusReport {
    let battery_level = if rng.gen_bool(0.02) {
        rng.gen_range(0..20) // 2% low battery
    } else {
        rng.gen_range(20..=100) // Normal range
    };

    StatusReport {
        device_id,
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        battery_level,
        rssi: rng.gen_range(-90..-30),
        online: rng.gen_bool(0.95),
    }
}
