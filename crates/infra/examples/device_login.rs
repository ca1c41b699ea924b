//! Example: signing in with the device-code flow and listing devices
//!
//! 1. Point the SDK at your tenant: ```bash export
//!    DEVICEPLAT_CLIENT_ID=your-client-id ```
//!
//! 2. Run this example: ```bash cargo run --example device_login ```
//!
//! The example prints a verification URL and user code, polls until you
//! approve the login, then lists the devices on the account.

use std::sync::Arc;

use deviceplat_infra::{config, DeviceCodeFlow, DevicePlatClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let sdk = config::load()?;
    let flow = DeviceCodeFlow::new(sdk.auth)?;

    let tokens = flow
        .authorize(|authorization| {
            println!("Open {} and enter code {}", authorization.verification_uri, authorization.user_code);
            if let Some(complete) = &authorization.verification_uri_complete {
                println!("  or go straight to {complete}");
            }
        })
        .await?;
    println!("Signed in\n");

    let provider = flow.into_provider(tokens)?.on_refresh(|_| {
        tracing::info!("Access token refreshed");
    });
    let client = DevicePlatClient::new(sdk.api, Arc::new(provider))?;

    let devices = client.devices().list_mine().await?;
    for device in &devices.devices {
        let state = if device.online { "online" } else { "offline" };
        println!("{:<24} {:<20} {}", device.device_id, device.name, state);
    }

    Ok(())
}
