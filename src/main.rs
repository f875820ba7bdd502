use carservice::{
    build_router, db, AppConfig, AppState, BookingRepository, InMemoryBookingRepository,
    InMemoryUserRepository, PostgresBookingRepository, PostgresUserRepository, UserRepository,
};
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "carservice=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting car service booking server");

    let config = AppConfig::from_env()?;

    // Postgres when DATABASE_URL is set, in-memory otherwise
    let mut pool = None;
    let user_repository: Arc<dyn UserRepository + Send + Sync>;
    let booking_repository: Arc<dyn BookingRepository + Send + Sync>;
    match &config.database {
        Some(database) => {
            let pg_pool = db::connect(database).await?;
            db::init_schema(&pg_pool).await?;
            user_repository = Arc::new(PostgresUserRepository::new(pg_pool.clone()));
            booking_repository = Arc::new(PostgresBookingRepository::new(pg_pool.clone()));
            pool = Some(pg_pool);
        }
        None => {
            warn!("DATABASE_URL is not set, using in-memory storage (data is lost on restart)");
            user_repository = Arc::new(InMemoryUserRepository::new());
            booking_repository = Arc::new(InMemoryBookingRepository::new());
        }
    }

    let app_state = AppState::new(user_repository, booking_repository, &config.auth);
    let app = build_router(app_state);

    let listener = tokio::net::TcpListener::bind(config.server.bind_address()).await?;
    info!("Server running on http://{}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(pool) = pool {
        db::close(pool).await;
    }
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
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

    info!("Shutdown signal received");
}
