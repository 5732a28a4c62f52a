//! API server entry point.

use std::sync::Arc;

use api::config::Config;
use auth::HttpIdentityVerifier;
use cache::InMemoryCache;
use catalog::HttpCatalogClient;
use order_store::{InMemoryOrderStore, OrderStore, PostgresOrderStore};
use tokio::signal;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use workflow::{OrderWorkflow, TracingEventPublisher};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("received SIGINT, starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("received SIGTERM, starting graceful shutdown");
        }
    }
}

#[tokio::main]
async fn main() {
    // 1. Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 2. Install Prometheus metrics recorder
    let prometheus_builder = metrics_exporter_prometheus::PrometheusBuilder::new();
    let metrics_handle = prometheus_builder
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    let config = Config::from_env();

    // 3. Wire the order store
    let store: Arc<dyn OrderStore> = match &config.database_url {
        Some(url) => {
            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(5)
                .connect(url)
                .await
                .expect("failed to connect to database");
            let store = PostgresOrderStore::new(pool);
            store.run_migrations().await.expect("migrations failed");
            tracing::info!("using PostgreSQL order store");
            Arc::new(store)
        }
        None => {
            tracing::info!("DATABASE_URL not set, using in-memory order store");
            Arc::new(InMemoryOrderStore::new())
        }
    };

    // 4. Wire the external collaborators and the workflow engine
    let catalog = HttpCatalogClient::new(config.items_service_url.clone(), config.outbound_timeout)
        .expect("failed to build catalog client");
    let verifier =
        HttpIdentityVerifier::new(config.auth_service_url.clone(), config.outbound_timeout)
            .expect("failed to build identity verifier");

    let workflow = OrderWorkflow::new(
        store,
        Arc::new(catalog),
        Arc::new(InMemoryCache::new()),
        Arc::new(TracingEventPublisher::new()),
    );
    let state = api::AppState::new(Arc::new(workflow), Arc::new(verifier));

    // 5. Build and start the server
    let app = api::create_app(state, metrics_handle);

    let addr = config.addr();
    tracing::info!(%addr, "starting API server");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind address");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");

    tracing::info!("server shut down gracefully");
}
