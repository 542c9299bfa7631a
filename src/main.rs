use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use newsdesk::{
    auth::token::TokenService,
    config::Config,
    mailer::{Mailer, SmtpMailer},
    news::NewsClient,
    newsletter::{self, Dispatcher},
    rest,
    state::AppState,
    store::Store,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "newsdesk=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Arc::new(Config::load());

    let store = Store::open(&config.database_url)
        .await
        .expect("Failed to connect to DB");
    let tokens = TokenService::new(&config.jwt_secret);
    let mailer: Arc<dyn Mailer> = Arc::new(SmtpMailer::new(
        &config.smtp_host,
        &config.smtp_username,
        &config.smtp_password,
        &config.email_from,
    )?);
    let news = NewsClient::new(&config.news_api_url, &config.news_api_key);

    let state = AppState {
        store: store.clone(),
        tokens,
        mailer: mailer.clone(),
        news: news.clone(),
        config: config.clone(),
    };

    // Weekly newsletter job, runs until shutdown is signalled.
    let dispatcher = Arc::new(Dispatcher::new(
        store,
        news,
        mailer,
        config.public_base_url.clone(),
    ));
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let newsletter_task = newsletter::spawn(
        dispatcher,
        Duration::from_secs(config.newsletter_interval_secs),
        shutdown_rx,
    );

    let app = rest::router(state);
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("REST API listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    shutdown_tx.send(true).ok();
    newsletter_task.await?;
    tracing::info!("shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
