use std::time::Duration;

use actix_web::{web, App, HttpServer};
use backend::middleware::cors::cors_middleware;
use backend::routes;
use backend::services::game_flow;
use backend::state::app_state::AppState;
use backend::telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Environment variables must be set by the runtime environment:
    // - Docker: Set via docker-compose env_file or docker run --env-file
    // - Local dev: Source env files manually (e.g., set -a; . ./.env; set +a)
    let host = std::env::var("BACKEND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("BACKEND_PORT")
        .unwrap_or_else(|_| "3001".to_string())
        .parse::<u16>()
        .unwrap_or_else(|_| {
            eprintln!("❌ BACKEND_PORT must be a valid port number");
            std::process::exit(1);
        });

    // Sweep configuration: how often to run, and how stale a game must
    // be before it goes.
    let sweep_interval_secs = env_u64("GAME_SWEEP_INTERVAL_SECS", 300);
    let game_max_age_secs = env_u64("GAME_MAX_AGE_SECS", 3600);

    println!("🚀 Starting card-table backend on http://{}:{}", host, port);

    let app_state = AppState::new();

    // Background age sweep: the only unsolicited mutation of the registry.
    let sweeper = app_state.registry_handle();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(sweep_interval_secs));
        loop {
            ticker.tick().await;
            let removed =
                game_flow::cleanup_old_games(&sweeper, time::Duration::seconds(game_max_age_secs as i64));
            if removed > 0 {
                tracing::info!(removed, "sweep.completed");
            }
        }
    });

    // Wrap AppState with web::Data before passing to HttpServer
    let data = web::Data::new(app_state);

    HttpServer::new(move || {
        App::new()
            .wrap(cors_middleware())
            .app_data(data.clone())
            .route("/", web::get().to(routes::health::root))
            .configure(routes::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}

fn env_u64(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(default)
}
