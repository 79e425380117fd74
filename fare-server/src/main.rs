use fare_server::config::ServerConfig;
use fare_server::contribution::{
    CloudinaryClient, CloudinaryConfig, ContributionDesk, ResendClient, ResendConfig,
};
use fare_server::directions::{OsrmClient, OsrmConfig};
use fare_server::store::{DocumentStore, TimedStore};
use fare_server::web::{AppState, create_router};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Warning: failed to read .env: {e}");
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("fare_server=info,tower_http=info")),
        )
        .init();

    let config = ServerConfig::from_env();

    // Load stored documents (fail fast on a corrupt file)
    let documents = DocumentStore::open(&config.data_path)
        .await
        .expect("Failed to open data file");
    let store = TimedStore::new(documents, config.store_timeout());
    debug!(deadline_ms = store.deadline().as_millis() as u64, "store calls bounded");

    let directions = OsrmClient::new(
        OsrmConfig::default()
            .with_base_url(&config.osrm_base_url)
            .with_timeout(config.directions_timeout_secs),
    )
    .expect("Failed to create directions client");

    let image_host = match (
        &config.cloudinary_cloud_name,
        &config.cloudinary_upload_preset,
    ) {
        (Some(cloud), Some(preset)) => Some(
            CloudinaryClient::new(CloudinaryConfig::new(cloud, preset))
                .expect("Failed to create image upload client"),
        ),
        _ => {
            warn!("Cloudinary not configured, contribution images will be rejected");
            None
        }
    };
    let notifier = match &config.resend_api_key {
        Some(key) => Some(
            ResendClient::new(ResendConfig::new(key)).expect("Failed to create email client"),
        ),
        None => {
            warn!("RESEND_API_KEY not set, contributions will be rejected");
            None
        }
    };
    let contributions = ContributionDesk::new(image_host, notifier, config.admin_email.clone());

    let state = AppState::new(
        store,
        directions,
        contributions,
        config.night_policy,
        config.fare_offset(),
    );
    let app = create_router(state, &config.static_dir, &config.allowed_origin);

    let addr = config.bind_addr().expect("Invalid HOST or PORT");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listen address");
    info!(%addr, data = %config.data_path.display(), "taxi fare server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
    info!("server stopped");
}

/// Resolve on Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutting down");
}
