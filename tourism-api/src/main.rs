use std::net::SocketAddr;
use std::sync::Arc;
use tourism_api::{app, AppState};
use tourism_booking::BookingManager;
use tourism_store::{ApiClient, AuthClient, Config, RestBookingRepository, RestCatalog};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tourism_api=debug,tourism_booking=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load()?;
    tracing::info!("Starting back-office API on port {}", config.server.port);

    let auth = AuthClient::new(ApiClient::new(config.services.auth_url.as_str()));
    let token = auth.service_token(&config.services.credentials()).await?;

    let client = |base_url: &str| match &token {
        Some(token) => ApiClient::new(base_url).with_token(token.clone()),
        None => ApiClient::new(base_url),
    };

    // Fail early on a rejected service token
    if token.is_some() {
        let user = AuthClient::new(client(&config.services.auth_url)).me().await?;
        tracing::info!("Service calls authenticated as {} ({})", user.full_name, user.user_type);
    }

    let catalog = RestCatalog::new(client(&config.services.catalog_url));
    let repository = RestBookingRepository::new(client(&config.services.booking_url));

    let manager = BookingManager::new(Arc::new(repository), Arc::new(catalog))
        .with_default_source(config.business_rules.default_source.clone())
        .with_currency(config.business_rules.currency.clone());

    let app = app(AppState::new(manager, config.auth.jwt_secret.clone()));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
