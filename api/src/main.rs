use std::net::SocketAddr;

use axum::Router;
use serde::Serialize;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod error;
mod extract;
mod gateway;
mod intents;
mod routes;
mod speech;
mod state;
#[cfg(test)]
mod testing;

use config::SkillConfig;
use gateway::HttpGateway;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Virtual Garden Skill API",
        version = "0.1.0",
        description = "Voice-assistant request handler for gardening questions: planting calendars, weather advice, and a personal plant list."
    ),
    paths(
        routes::health::health_check,
        routes::skill::handle_skill_event,
    ),
    components(schemas(
        garden_core::error::ApiError,
        garden_core::skill::SkillEvent,
        garden_core::skill::Session,
        garden_core::skill::SkillRequest,
        garden_core::skill::Intent,
        garden_core::skill::Slot,
        garden_core::response::ResponseEnvelope,
        garden_core::response::SpeechletResponse,
        garden_core::response::OutputSpeech,
        garden_core::response::Card,
        garden_core::response::Reprompt,
        HealthResponse,
    )),
    tags(
        (name = "skill", description = "Voice-platform event handling"),
        (name = "system", description = "Liveness and dependency checks")
    )
)]
struct ApiDoc;

#[derive(Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// "ok" when the plant service answered the ping
    pub plant_api: String,
}

#[tokio::main]
async fn main() {
    // Load .env if present (dev only)
    let _ = dotenvy::dotenv();

    // Structured JSON logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "garden_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let config = match SkillConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!(error = %err, "invalid configuration");
            std::process::exit(1);
        }
    };

    let gateway = match HttpGateway::new(&config) {
        Ok(gateway) => gateway,
        Err(err) => {
            tracing::error!(error = %err, "failed to build remote data client");
            std::process::exit(1);
        }
    };

    tracing::info!(
        plant_api = %config.plant_api_url,
        weather_location = %config.weather_location,
        timezone = config.timezone.name(),
        "skill configured"
    );

    let app_state = state::AppState::new(config, gateway);

    let app = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .merge(routes::health::router())
        .merge(routes::skill::router())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Garden skill listening on {}", addr);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!(error = %err, %addr, "failed to bind");
            std::process::exit(1);
        }
    };

    if let Err(err) = axum::serve(listener, app).await {
        tracing::error!(error = %err, "server stopped");
        std::process::exit(1);
    }
}
