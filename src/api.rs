//! HTTP API: one `POST` route per formula family plus a liveness route
//!
//! Request and response bodies are JSON objects with camelCase field names. Every error response
//! has the body `{"message": ...}`.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{middleware, Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;

use crate::ber::{self, BerParams, BerResults};
use crate::cellular::{self, CellularParams, CellularResults};
use crate::comm_system::{self, CommSystemParams, CommSystemResults};
use crate::erlang::{self, ErlangParams, ErlangResults};
use crate::link_budget::{self, LinkBudgetParams, LinkBudgetResults};
use crate::ofdm::{self, OfdmParams, OfdmResults};
use crate::sim::{self, SimParams, SimResults};
use crate::{cors, CorsPolicy, Error, ServerConfig};

/// Body of liveness and error responses
#[derive(Clone, PartialEq, Debug, Deserialize, Serialize)]
pub struct MessageBody {
    /// Human-readable message
    pub message: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::InvalidInput(_) | Error::MissingInput(_) | Error::MalformedBody(_) => {
                StatusCode::BAD_REQUEST
            }
            Error::OriginNotAllowed(_) => StatusCode::FORBIDDEN,
            Error::InvalidPattern(_) | Error::Io(_) | Error::Task(_) => {
                tracing::error!("Request failed: {}", self);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let body = MessageBody {
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Returns the router for the API.
pub fn build_router(policy: CorsPolicy) -> Router {
    let policy = Arc::new(policy);
    Router::new()
        .route("/api/test", get(liveness))
        .route("/api/ber", post(ber_db))
        .route("/api/ber/linear", post(ber_linear))
        .route("/api/ber/simulate", post(ber_simulate))
        .route("/api/erlang-b", post(erlang_b))
        .route("/api/link-budget", post(link_budget_power))
        .route("/api/ofdm", post(ofdm_throughput))
        .route("/api/comm-system", post(comm_system_rates))
        .route("/api/cellular", post(cellular_sizing))
        .layer(middleware::from_fn_with_state(
            Arc::clone(&policy),
            cors::enforce_origin,
        ))
        .layer(policy.layer())
        .layer(TraceLayer::new_for_http())
}

/// Serves the API until Ctrl-C is received.
///
/// # Errors
///
/// Returns an error if the listening socket cannot be bound or the server fails.
pub async fn serve(config: ServerConfig) -> Result<(), Error> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        allowed_origins = ?config.cors.allowed_origins(),
        "Server is listening on port {}",
        config.port
    );
    axum::serve(listener, build_router(config.cors))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("Server stopped");
    Ok(())
}

/// Completes when Ctrl-C is received.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Cannot listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

/// Returns request body or an error carrying the rejection reason.
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, Error> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| Error::MalformedBody(rejection.body_text()))
}

async fn liveness() -> Json<MessageBody> {
    Json(MessageBody {
        message: "Success! The server is online and responding.".to_string(),
    })
}

/// Body of `POST /api/ber` (Eb/N0 in dB)
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BerDbRequest {
    eb_no_db: Option<f64>,
    modulation_order: Option<f64>,
}

/// Body of `POST /api/ber/linear` (Eb/N0 as a linear ratio)
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BerLinearRequest {
    eb_no_linear: Option<f64>,
    modulation_order: Option<f64>,
}

async fn ber_db(
    payload: Result<Json<BerDbRequest>, JsonRejection>,
) -> Result<Json<BerResults>, Error> {
    let request = json_body(payload)?;
    let (Some(eb_no_db), Some(modulation_order)) = (request.eb_no_db, request.modulation_order)
    else {
        return Err(Error::MissingInput(
            "Missing required input: ebNoDb or modulationOrder".to_string(),
        ));
    };
    let results = ber::evaluate(&BerParams {
        eb_no_db,
        modulation_order,
    })?;
    tracing::debug!(eb_no_db, modulation_order, ber = results.ber, "Evaluated BER");
    Ok(Json(results))
}

async fn ber_linear(
    payload: Result<Json<BerLinearRequest>, JsonRejection>,
) -> Result<Json<BerResults>, Error> {
    let request = json_body(payload)?;
    let (Some(eb_no_linear), Some(modulation_order)) =
        (request.eb_no_linear, request.modulation_order)
    else {
        return Err(Error::MissingInput(
            "Missing required input: ebNoLinear or modulationOrder".to_string(),
        ));
    };
    let results = ber::evaluate_linear(eb_no_linear, modulation_order)?;
    tracing::debug!(eb_no_linear, modulation_order, ber = results.ber, "Evaluated BER");
    Ok(Json(results))
}

async fn ber_simulate(
    payload: Result<Json<SimParams>, JsonRejection>,
) -> Result<Json<SimResults>, Error> {
    let params = json_body(payload)?;
    let results = tokio::task::spawn_blocking(move || sim::run_bpsk_awgn_sim(&params))
        .await
        .map_err(|e| Error::Task(e.to_string()))??;
    Ok(Json(results))
}

async fn erlang_b(
    payload: Result<Json<ErlangParams>, JsonRejection>,
) -> Result<Json<ErlangResults>, Error> {
    let params = json_body(payload)?;
    let traffic = params.traffic;
    // Heavy traffic keeps blocking above zero, so the recursion may visit every channel.
    let results = tokio::task::spawn_blocking(move || erlang::evaluate(&params))
        .await
        .map_err(|e| Error::Task(e.to_string()))??;
    tracing::debug!(
        traffic,
        blocking = results.blocking_probability,
        required_channels = results.required_channels,
        "Evaluated Erlang-B"
    );
    Ok(Json(results))
}

async fn link_budget_power(
    payload: Result<Json<LinkBudgetParams>, JsonRejection>,
) -> Result<Json<LinkBudgetResults>, Error> {
    Ok(Json(link_budget::evaluate(&json_body(payload)?)?))
}

async fn ofdm_throughput(
    payload: Result<Json<OfdmParams>, JsonRejection>,
) -> Result<Json<OfdmResults>, Error> {
    Ok(Json(ofdm::evaluate(&json_body(payload)?)?))
}

async fn comm_system_rates(
    payload: Result<Json<CommSystemParams>, JsonRejection>,
) -> Result<Json<CommSystemResults>, Error> {
    Ok(Json(comm_system::evaluate(&json_body(payload)?)?))
}

async fn cellular_sizing(
    payload: Result<Json<CellularParams>, JsonRejection>,
) -> Result<Json<CellularResults>, Error> {
    Ok(Json(cellular::evaluate(&json_body(payload)?)?))
}
