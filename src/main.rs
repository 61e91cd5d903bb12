use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vocab_notebook::{
    clock::Clock,
    config::AppConfig,
    db, handlers,
    services::daily_reset,
    state::AppState,
};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vocab_notebook=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load();

    let clock = Clock::from_offset_minutes(config.reset.utc_offset_minutes);
    let pool = db::init_db(&config.database_path).expect("Failed to initialize database");

    {
        let conn = db::try_lock(&pool).expect("Database lock failed during startup");
        let demo_id =
            db::seed_demo_user(&conn, clock.now_utc()).expect("Failed to seed demo user");
        tracing::info!("Demo user '{}' has id {}", db::DEMO_USERNAME, demo_id);
    }

    let state = AppState::new(pool, clock);

    // Checks the reset window immediately, then keeps polling
    daily_reset::spawn_daily_reset(state.clone(), config.reset);

    let app = handlers::router(state);

    let bind_addr = config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|_| panic!("Failed to bind to {}", bind_addr));

    tracing::info!("Server running on http://localhost:{}", config.server.port);

    axum::serve(listener, app)
        .await
        .expect("Server failed to start");
}
