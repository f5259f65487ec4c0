use std::sync::Arc;

use anyhow::Result;
use dotenv::dotenv;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use appointment_cell::services::BookingCoordinator;
use auth_cell::services::AuthService;
use auth_cell::token::{FileTokenStore, MemoryTokenStore, TokenStore};
use doctor_cell::services::DoctorService;
use shared_api::ApiClient;
use shared_config::ApiConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // Loading Env Vars
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting HMS client");

    // Load configuration
    let config = ApiConfig::from_env();
    if !config.is_configured() {
        warn!("HMS_API_BASE_URL is not set; requests will fail");
    }

    let api = Arc::new(ApiClient::new(&config));
    let tokens: Arc<dyn TokenStore> = match &config.token_path {
        Some(path) => Arc::new(FileTokenStore::new(path)),
        None => Arc::new(MemoryTokenStore::new()),
    };

    let auth = AuthService::new(Arc::clone(&api), tokens);
    let doctors = DoctorService::new(Arc::clone(&api));
    let coordinator = BookingCoordinator::new(Arc::clone(&api));

    let Some(user) = auth.initialize().await? else {
        info!("No stored session; log in through the app to use this client");
        return Ok(());
    };
    info!("Signed in as {} <{}>", user.name, user.email);

    let Some(token) = auth.token().await else {
        return Ok(());
    };

    match doctors.list_doctors(&token).await {
        Ok(list) => {
            info!("{} doctors available", list.len());
            for doctor in list.iter().take(10) {
                info!("  #{} {} [{}]", doctor.id, doctor.name, doctor.specialties.join(", "));
            }
        }
        Err(e) => warn!("Could not list doctors: {}", e),
    }

    match coordinator.refresh_appointments(&token).await {
        Ok(appointments) => {
            info!("{} appointments on record", appointments.len());
            for app in &appointments {
                info!(
                    "  #{} {} {} ({:?})",
                    app.id, app.appointment_date, app.appointment_time, app.status
                );
            }
        }
        Err(e) => warn!("Could not refresh appointments: {}", e),
    }

    Ok(())
}
