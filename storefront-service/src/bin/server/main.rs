use std::sync::Arc;

use auth::Authenticator;
use chrono::Duration;
use storefront_service::config::Config;
use storefront_service::domain::user::service::UserService;
use storefront_service::inbound::http::router::create_router;
use storefront_service::outbound::repositories::InMemoryUserRepository;
use storefront_service::outbound::verification::LogCodeSender;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storefront_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "storefront-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        session_ttl_days = config.jwt.expiration_days,
        code_ttl_minutes = config.verification.code_ttl_minutes,
        max_concurrent_hashes = config.password.max_concurrent_hashes,
        "Configuration loaded"
    );

    let session_ttl = Duration::try_days(config.jwt.expiration_days)
        .ok_or_else(|| anyhow::anyhow!("jwt.expiration_days is out of range"))?;
    let code_ttl = Duration::try_minutes(config.verification.code_ttl_minutes)
        .ok_or_else(|| anyhow::anyhow!("verification.code_ttl_minutes is out of range"))?;

    let authenticator = Arc::new(
        Authenticator::new(config.jwt.secret.as_bytes())?.with_session_ttl(session_ttl),
    );
    let user_repository = Arc::new(InMemoryUserRepository::new());
    let code_sender = Arc::new(LogCodeSender::new());

    let user_service = Arc::new(
        UserService::new(user_repository, code_sender, Arc::clone(&authenticator))
            .with_code_ttl(code_ttl)
            .with_max_concurrent_hashes(config.password.max_concurrent_hashes),
    );

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(user_service, &authenticator);

    if let Err(e) = axum::serve(http_listener, http_application).await {
        tracing::error!(error = %e, "Server error");
        return Err(e.into());
    }

    tracing::info!("Server exited successfully");

    Ok(())
}
