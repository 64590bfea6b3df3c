use axum::{
    Json, Router,
    http::StatusCode,
    routing::{get, post},
};
use load_planner::metrics::{self, AxleSplit};
use load_planner::packer::{PackCounts, ShelfPacker};
use load_planner::types::{Trailer, deserialize_u32_from_number};
use serde::{Deserialize, Serialize};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

#[derive(Deserialize, Serialize)]
struct PackRequestBody {
    #[serde(default = "default_trailer")]
    trailer: Trailer,
    #[serde(default)]
    counts: CountsBody,
    #[serde(default)]
    custom: Vec<(i32, i32)>,
}

#[derive(Deserialize, Serialize, Default)]
struct CountsBody {
    #[serde(default, deserialize_with = "deserialize_u32_from_number")]
    euro: u32,
    #[serde(default, deserialize_with = "deserialize_u32_from_number")]
    industrie: u32,
    #[serde(default, deserialize_with = "deserialize_u32_from_number")]
    blumenwagen: u32,
    #[serde(default, deserialize_with = "deserialize_u32_from_number")]
    ibc: u32,
}

fn default_trailer() -> Trailer {
    Trailer::reefer()
}

#[derive(Serialize)]
struct PackResponse {
    placements: Vec<PlacementBody>,
    log: Vec<String>,
    used_length_cm: i32,
    axle_front_pct: i32,
    axle_back_pct: i32,
}

#[derive(Serialize)]
struct PlacementBody {
    typ: String,
    x_cm: i32,
    y_cm: i32,
    w_cm: i32,
    h_cm: i32,
}

async fn pack(
    Json(req): Json<PackRequestBody>,
) -> Result<Json<PackResponse>, (StatusCode, String)> {
    tracing::info!(
        body = serde_json::to_string(&req).unwrap_or_default(),
        "POST /pack"
    );

    if req.trailer.length <= 0 || req.trailer.width <= 0 {
        return Err((
            StatusCode::BAD_REQUEST,
            "trailer dimensions must be positive".to_string(),
        ));
    }
    for &(w, h) in &req.custom {
        if w <= 0 || h <= 0 {
            return Err((
                StatusCode::BAD_REQUEST,
                "custom footprint dimensions must be positive".to_string(),
            ));
        }
    }

    let counts = PackCounts {
        euro: req.counts.euro,
        industrie: req.counts.industrie,
        blumenwagen: req.counts.blumenwagen,
        ibc: req.counts.ibc,
        custom: req.custom.clone(),
    };

    let report = ShelfPacker::new(req.trailer).pack(&counts.to_requests());

    let spans: Vec<metrics::Span> = report
        .placements
        .iter()
        .map(|p| metrics::Span {
            x: p.x as f64,
            bbox_w: p.w as f64,
            heavy: p.kind.heavy(),
        })
        .collect();
    let used = metrics::used_length(spans.iter().copied());
    let AxleSplit {
        front_pct,
        back_pct,
    } = metrics::axle_split(spans.iter().copied(), req.trailer);

    let response = PackResponse {
        placements: report
            .placements
            .iter()
            .map(|p| PlacementBody {
                typ: p.kind.name().to_string(),
                x_cm: p.x,
                y_cm: p.y,
                w_cm: p.w,
                h_cm: p.h,
            })
            .collect(),
        log: report.log,
        used_length_cm: used,
        axle_front_pct: front_pct,
        axle_back_pct: back_pct,
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
        .open("development.log")
        .expect("failed to open development.log");

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
        .route("/pack", post(pack))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        );

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    eprintln!("Listening on {addr}");
    axum::serve(listener, app).await.unwrap();
}
