use axum::{
    Router,
    middleware::from_fn,
    routing::{get, post},
};

use crate::auth::guards::{allow_authenticated, allow_lecturer, allow_staff, allow_student};
use crate::state::AppState;

mod common;
mod get;
mod post;

pub use common::{
    GenerateQrReq, GenerateQrResponse, ListQuery, ScanResponse, StatsResponse, ValidateScanReq,
};
pub use get::{attendance_stats, list_records};
pub use post::{generate_qr, validate_scan};

/// `/attendance` routes.
///
/// - `POST /qr` → lecturer builds the payload for the QR image
/// - `POST /validate` → student submits a scanned code with their location
/// - `GET /` → attendance records (students only see their own)
/// - `GET /stats` → present/partial/absent percentages (staff)
pub fn attendance_routes() -> Router<AppState> {
    Router::new()
        .route("/qr", post(generate_qr).route_layer(from_fn(allow_lecturer)))
        .route("/validate", post(validate_scan).route_layer(from_fn(allow_student)))
        .route("/", get(list_records).route_layer(from_fn(allow_authenticated)))
        .route("/stats", get(attendance_stats).route_layer(from_fn(allow_staff)))
}
