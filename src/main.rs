mod config;
mod ebay;
mod graphql;
mod http;
mod metrics;
mod models;
mod normalize;
mod search;

use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, State},
    response::Html,
    routing::get,
};
use config::GatewayConfig;
use ebay::sold::SoldListingsScraper;
use graphql::{ApiSchema, build_schema};
use search::SearchOrchestrator;
use serde_json::json;
use std::{net::SocketAddr, sync::Arc};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        error!(target = "sanbi.api", "server crashed: {err}");
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = Arc::new(GatewayConfig::from_env());
    if !config.ebay.credentials.is_complete() {
        warn!(
            target = "sanbi.api",
            "EBAY_PROD_APP_ID / EBAY_PROD_CERT_ID not set; searches will return degraded results"
        );
    }
    if config.sold.api_key.is_none() {
        warn!(
            target = "sanbi.api",
            "SCRAPEOPS_API_KEY not set; soldPrices will return empty lists"
        );
    }

    let addr: SocketAddr = ([0, 0, 0, 0], config.port).into();
    let app = router(&config);
    info!(target = "sanbi.api", "listening on http://{addr}/graphql");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}

#[derive(Clone)]
struct AppState {
    schema: ApiSchema,
}

fn router(config: &Arc<GatewayConfig>) -> Router {
    let scraper = SoldListingsScraper::new(config.sold.clone(), &config.http);
    let schema = build_schema(SearchOrchestrator::new(config.clone()), scraper);

    let cors = CorsLayer::new()
        .allow_headers(Any)
        .allow_methods(Any)
        .allow_origin(Any);

    Router::new()
        .route("/health", get(health))
        .route("/graphql", get(graphiql).post(graphql_handler))
        .with_state(AppState { schema })
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
}

/// Health and readiness check.
///
/// - Method: `GET`
/// - Path: `/health`
///
/// Returns a small JSON payload with `status` and `service`.
async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": "sanbi-gateway",
    }))
}

/// Executes `searchByKeyword`, `searchByImage`, `soldPrices` and `hello`.
///
/// - Method: `POST`
/// - Path: `/graphql`
async fn graphql_handler(State(state): State<AppState>, req: GraphQLRequest) -> GraphQLResponse {
    state.schema.execute(req.into_inner()).await.into()
}

async fn graphiql() -> Html<String> {
    Html(
        async_graphql::http::GraphiQLSource::build()
            .endpoint("/graphql")
            .finish(),
    )
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));
    let _ = fmt().with_env_filter(filter).try_init();
}
