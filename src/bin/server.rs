use axum::{
    Json, Router,
    http::StatusCode,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use slit_planner::config::PlannerConfig;
use slit_planner::planner;
use slit_planner::report::partition_tiers;
use slit_planner::types::{Candidate, Order};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

#[derive(Deserialize, Serialize)]
struct PlanRequest {
    orders: Vec<Order>,
    /// Any subset of the planner configuration; omitted fields keep their
    /// defaults.
    #[serde(default)]
    config: PlannerConfig,
}

#[derive(Serialize)]
struct PlanResponse {
    optimal: Vec<Candidate>,
    negotiable: Vec<Candidate>,
    order_count: usize,
    candidate_count: usize,
}

async fn plan(
    Json(req): Json<PlanRequest>,
) -> Result<Json<PlanResponse>, (StatusCode, String)> {
    tracing::info!(
        body = serde_json::to_string(&req).unwrap_or_default(),
        "POST /plan"
    );

    for order in &req.orders {
        if order.width == 0 || order.length == 0 {
            return Err((
                StatusCode::BAD_REQUEST,
                format!("order '{}' has zero width or length", order.name),
            ));
        }
    }

    // Same drop rule the file loader applies: sub-minimum orders never
    // reach the search.
    let orders: Vec<Order> = req
        .orders
        .into_iter()
        .filter(|o| o.count >= req.config.min_order_count)
        .collect();

    let candidates = planner::plan(&orders, &req.config);
    let (optimal, negotiable) =
        partition_tiers(&candidates, req.config.allowed_deviation_percent);

    let response = PlanResponse {
        order_count: orders.len(),
        candidate_count: candidates.len(),
        optimal: optimal.into_iter().cloned().collect(),
        negotiable: negotiable.into_iter().cloned().collect(),
    };

    Ok(Json(response))
}

#[tokio::main]
async fn main() {
    let _sentry = std::env::var("SENTRY_DSN").ok().map(|dsn| {
        sentry::init((
            dsn,
            sentry::ClientOptions {
                release: sentry::release_name!(),
                ..Default::default()
            },
        ))
    });

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open("server.log")
        .expect("failed to open server.log");

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_target(false)
        .with_ansi(false)
        .with_max_level(Level::INFO)
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3001".to_string());
    let addr = format!("0.0.0.0:{port}");

    let app = Router::new()
        .route("/up", get(|| async { "ok" }))
        .route("/plan", post(plan))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        );

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    eprintln!("Listening on {addr}");
    axum::serve(listener, app).await.unwrap();
}
