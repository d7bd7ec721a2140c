use larder_server::config::Config;
use larder_server::{api, app, db, telemetry, AppContext, AppState};
use std::env;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    // Check for --openapi flag to dump spec and exit
    if env::args().any(|arg| arg == "--openapi") {
        match api::openapi().to_pretty_json() {
            Ok(spec) => println!("{}", spec),
            Err(e) => eprintln!("Failed to render OpenAPI document: {}", e),
        }
        return;
    }

    telemetry::init_telemetry();

    let config = Config::load();
    let pool = db::create_pool(&config.database_url);
    let bind_addr = config.bind_addr.clone();
    let public_base = config.public_base().to_string();

    let state: AppState = Arc::new(AppContext { pool, config });

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .expect("Failed to bind listen address");

    if let Ok(addr) = listener.local_addr() {
        tracing::info!("Server listening on {}", addr);
    }
    tracing::info!("Swagger UI available at {}/swagger-ui/", public_base);
    tracing::info!("OpenAPI spec available at {}/api-docs/openapi.json", public_base);

    if let Err(e) = axum::serve(listener, app(state)).await {
        tracing::error!("Server error: {}", e);
    }
}
