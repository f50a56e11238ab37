use actix_cors::Cors;
use actix_governor::{Governor, GovernorConfigBuilder};
use actix_web::{web, App, HttpServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wert_server::routes;
use wert_server::{AppState, ServerConfig};

fn build_cors(origins: &[String]) -> Cors {
    if origins.is_empty() {
        // No allow-list configured: any origin.
        Cors::default()
            .allow_any_origin()
            .allowed_methods(vec!["GET", "POST"])
            .allowed_headers(vec!["content-type", "authorization"])
            .max_age(3600)
    } else {
        let mut cors = Cors::default();
        for origin in origins {
            cors = cors.allowed_origin(origin);
        }
        cors.allowed_methods(vec!["GET", "POST"])
            .allowed_headers(vec!["content-type", "authorization"])
            .max_age(3600)
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match ServerConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    let port = config.port;
    let rate_limit_rpm = config.rate_limit_rpm;
    let cors_origins = config.allowed_origins.clone();

    if config.metrics_token.is_none() && !config.public_metrics {
        tracing::warn!("METRICS_TOKEN not set — /metrics is disabled");
    }

    let state = web::Data::new(AppState::from_config(&config));
    let profile = state.sessions.profile();

    tracing::info!("TrevArts Wert session backend listening on port {port}");
    tracing::info!(
        "Commodity: {} on {} | Price: ${} per NFT",
        profile.commodity,
        profile.network,
        profile.unit_price_usd
    );
    tracing::info!(
        "Partner: {} | Contract: {}",
        state.sessions.partner_id(),
        state.sessions.contract()
    );
    tracing::info!("Rate limit: {rate_limit_rpm} req/min per IP");
    tracing::info!("  POST http://localhost:{port}/api/wert/session");
    tracing::info!("  POST http://localhost:{port}/api/wert/webhook");

    let governor_conf = match GovernorConfigBuilder::default()
        .requests_per_minute(rate_limit_rpm)
        .finish()
    {
        Some(conf) => conf,
        None => {
            tracing::error!("Invalid rate limiter configuration: {rate_limit_rpm} req/min");
            std::process::exit(1);
        }
    };

    HttpServer::new(move || {
        App::new()
            .wrap(build_cors(&cors_origins))
            .wrap(Governor::new(&governor_conf))
            .app_data(state.clone())
            .service(routes::health)
            .service(routes::metrics_endpoint)
            .service(routes::create_session)
            .service(routes::webhook)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
