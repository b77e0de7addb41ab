//! Identify a finger against the sensor library

use std::time::Duration;

use tokio::time::sleep;
use tracing_subscriber::EnvFilter;
use zfm::{FingerprintSensor, ZfmSensor};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let port = std::env::var("SENSOR_PORT").unwrap_or_else(|_| "/dev/ttyUSB0".to_string());

    let mut sensor = ZfmSensor::new(port);
    sensor.connect().await?;

    let params = sensor.read_parameters().await?;
    println!("{}", params);
    println!("{} templates stored", sensor.template_count().await?);

    println!("Place your finger on the sensor...");
    while !sensor.has_fingerprint().await? {
        sleep(Duration::from_millis(200)).await;
    }

    match sensor.search_match().await? {
        Some(hit) => println!("Matched {}", hit),
        None => println!("Unknown finger"),
    }

    sensor.close().await;
    Ok(())
}
