//! Recent earthquakes example
//!
//! This example demonstrates the core functionality of quake-feed:
//! - Loading configuration (optionally from a JSON file)
//! - Creating a load controller with a connectivity probe
//! - Requesting a load and waiting for delivery
//! - Formatting each record for display
//!
//! Usage: `cargo run --example recent_quakes [config.json]`

use quake_feed::format::display_fields;
use quake_feed::{
    Config, ConnectivityFlag, DisplayConfig, FeedConsumer, FeedResult, LoadController,
    MagnitudeBucket,
};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Prints one line per earthquake
struct ListPrinter {
    display: DisplayConfig,
}

impl FeedConsumer for ListPrinter {
    fn on_result(&mut self, result: &FeedResult) {
        if let Some(failure) = result.failure() {
            println!("✗ Load failed ({}): {}", failure.code(), failure);
            return;
        }

        if result.records().is_empty() {
            println!("No earthquakes found");
            return;
        }

        for record in result.records() {
            let fields = display_fields(record, &self.display);
            let color = fields.color.as_deref().unwrap_or("-");
            println!(
                "{:>4} [{:>3} {:<7}] {:<16} {:<28} {:<13} {}",
                fields.magnitude,
                fields.bucket.label(),
                color,
                fields.location_offset.trim_end(),
                fields.primary_location,
                fields.date,
                fields.time
            );
        }
    }

    fn on_cleared(&mut self) {
        println!("(list cleared)");
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // RUST_LOG=quake_feed=debug shows session and state transitions
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut config = match std::env::args().nth(1) {
        Some(path) => Config::from_json_file(path)?,
        None => Config::default(),
    };

    // Give the strongest buckets a color when none were configured
    if config.display.palette.is_empty() {
        config.display.palette = config
            .display
            .palette
            .with_color(MagnitudeBucket::Five, "#F7A24B")
            .with_color(MagnitudeBucket::Six, "#F08A48")
            .with_color(MagnitudeBucket::Seven, "#EA6D43")
            .with_color(MagnitudeBucket::Eight, "#E3503F")
            .with_color(MagnitudeBucket::Nine, "#D2363A")
            .with_color(MagnitudeBucket::TenPlus, "#C03823");
    }

    println!("Loading {}", config.feed.url);

    let network = ConnectivityFlag::new(true);
    let printer = ListPrinter {
        display: config.display.clone(),
    };
    let mut controller = LoadController::from_config(&config.feed, Arc::new(network), printer)?;

    controller.request_load();
    controller.await_delivery().await;

    // A second request is answered from the retained result without a fetch
    println!("\nRequesting again:");
    controller.request_load();

    controller.reset();
    Ok(())
}
