mod app;
mod config;
mod db;
mod error;
mod extractors;
mod groups;
mod images;
mod plants;
mod seed;
mod state;
mod store;
mod validation;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "plantcat=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let state = state::AppState::init().await?;
    tracing::info!(
        store = ?state.config.store,
        seed_dir = %state.config.seed_dir.display(),
        "catalog ready"
    );

    let app = app::build_app(state);
    app::serve(app).await
}
