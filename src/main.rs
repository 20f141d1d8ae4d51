use actix_cors::Cors;
use actix_web::{App, HttpServer, web};
use payment_api::infrastructure::config::AppConfig;
use payment_api::infrastructure::logging::init_logging;
use payment_api::presentation::handlers::{AppState, configure_routes};
use payment_api::presentation::middleware::{
    JwtAuthMiddleware, RequestIdMiddleware, TimingMiddleware,
};
use tracing::{info, instrument};

fn cors(allowed_origin: Option<&str>) -> Cors {
    match allowed_origin {
        Some(origin) => Cors::default()
            .allowed_origin(origin)
            .allow_any_method()
            .allow_any_header()
            .max_age(3600),
        None => Cors::permissive(),
    }
}

#[tokio::main]
#[instrument]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;

    init_logging(&config.log_level);
    info!("Logging initialized successfully");

    let state = web::Data::new(AppState::in_memory(
        config.jwt_secret.clone(),
        config.jwt_validity_secs,
    ));
    info!("Application state initialized");

    let jwt_secret = config.jwt_secret.clone();
    let cors_origin = config.cors_allowed_origin.clone();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(JwtAuthMiddleware::new(jwt_secret.clone()))
            .wrap(TimingMiddleware)
            .wrap(RequestIdMiddleware)
            .wrap(cors(cors_origin.as_deref()))
            .configure(configure_routes)
    });

    let bind_addr = config.bind_addr();
    let server = server.bind(bind_addr.as_str())?;
    info!(address = %bind_addr, "Server bound successfully");

    info!(
        address = %bind_addr,
        routes = %"POST /api/v1/users/login, POST /api/v1/users/signup, GET /api/v1/users, GET /api/v1/users/{id}, GET /api/v1/users/{id}/payments, POST /api/v1/payments, GET /api/v1/payments/{id}, GET /api/health",
        "Starting HTTP server"
    );
    server.run().await?;
    Ok(())
}
