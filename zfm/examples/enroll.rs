//! Enroll a finger into the sensor library
//!
//! Run with: SENSOR_PORT=/dev/ttyUSB0 cargo run --example enroll -- 5

use std::time::Duration;

use tokio::time::sleep;
use tracing_subscriber::EnvFilter;
use zfm::{ErrorKind, FingerprintSensor, ZfmSensor};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let port = std::env::var("SENSOR_PORT").unwrap_or_else(|_| "/dev/ttyUSB0".to_string());
    let position: u16 = std::env::args().nth(1).as_deref().unwrap_or("0").parse()?;

    let mut sensor = ZfmSensor::new(port);
    sensor.connect().await?;

    println!("Place your finger on the sensor...");
    while !sensor.has_fingerprint().await? {
        sleep(Duration::from_millis(200)).await;
    }

    println!("Remove your finger, then place it again...");
    sleep(Duration::from_secs(2)).await;

    let template = loop {
        match sensor.create_model().await {
            Ok(Some(template)) => break template,
            Ok(None) => sleep(Duration::from_millis(200)).await,
            Err(e) if e.kind() == ErrorKind::FingerprintsDontMatch => {
                println!("Fingerprints don't match, try again");
                sensor.close().await;
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        }
    };

    sensor.save_model(&template, position).await?;
    println!("Stored template at #{}", position);

    sensor.close().await;
    Ok(())
}
