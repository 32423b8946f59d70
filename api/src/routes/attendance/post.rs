use attendance::{
    AttendanceQrPayload, DecisionReason, LedgerError, Lecturer, SessionScope, payload::decode,
    validation::validate_module_code,
};
use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use common::format_validation_errors;
use validator::Validate;

use super::common::{GenerateQrReq, GenerateQrResponse, ScanResponse, ValidateScanReq};
use crate::{
    auth::AuthUser,
    response::{ApiResponse, Empty},
    state::AppState,
};

fn unprocessable(message: impl Into<String>) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ApiResponse::<Empty>::error(message)),
    )
        .into_response()
}

/// POST /api/attendance/qr
///
/// Builds the payload for the lecturer's current module/class/checkpoint selection,
/// stamped with the lecturer's id and the current time. Called again whenever the
/// selection changes.
///
/// ### Request Body
/// ```json
/// {
///   "lecturerName": "Dr. Uwimana",
///   "moduleId": "CS301",
///   "classId": "Y3-A",
///   "sessionType": "first",
///   "location": { "latitude": -1.9441, "longitude": 30.0619 }
/// }
/// ```
///
/// ### Responses
/// - `200 OK` with `{ payload, qrData }`
/// - `422 Unprocessable Entity` for missing fields, a bad module code or an invalid location
pub async fn generate_qr(
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(body): Json<GenerateQrReq>,
) -> Response {
    if let Err(e) = body.validate() {
        return unprocessable(format_validation_errors(&e));
    }
    if let Err(e) = validate_module_code(&body.module_id) {
        return unprocessable(e.to_string());
    }
    if let Err(e) = body.location.check() {
        return unprocessable(format!("Invalid location: {e}"));
    }

    let lecturer = Lecturer {
        id: claims.sub,
        name: body.lecturer_name,
        department: body.department,
        school: body.school,
    };
    let scope = SessionScope {
        module_id: body.module_id,
        class_id: body.class_id,
        session_type: body.session_type,
    };

    let payload = AttendanceQrPayload::new(
        &lecturer,
        &scope,
        body.location,
        Utc::now().timestamp_millis(),
    );
    let qr_data = payload.encode();

    tracing::info!(
        lecturer_id = %payload.lecturer_id,
        module_id = %payload.module_id,
        class_id = %payload.class_id,
        session_type = %payload.session_type,
        "Generated attendance QR payload"
    );

    (
        StatusCode::OK,
        Json(ApiResponse::success(
            GenerateQrResponse { payload, qr_data },
            "QR code generated",
        )),
    )
        .into_response()
}

/// POST /api/attendance/validate
///
/// Verifies a scanned code against the student's location and, if accepted,
/// records the checkpoint.
///
/// ### Responses
/// - `200 OK` → accepted and recorded; `data` is the decision plus the record
/// - `400 Bad Request` → rejected (`MALFORMED`, `EXPIRED`, `TOO_FAR`); `data` is the decision
/// - `409 Conflict` → checkpoint already recorded for this student in today's session
/// - `422 Unprocessable Entity` → unusable student location
pub async fn validate_scan(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(body): Json<ValidateScanReq>,
) -> Response {
    if let Err(e) = body.location.check() {
        return unprocessable(format!("Invalid location: {e}"));
    }

    let now = Utc::now();
    let decoded = decode(&body.qr_data);
    let decision = state
        .verifier()
        .verify(decoded.as_ref(), &body.location, now.timestamp_millis());

    let payload = match decoded {
        Ok(payload) if decision.accepted => payload,
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::error_with(
                    ScanResponse {
                        decision,
                        record: None,
                    },
                    decision.reason.user_message(),
                )),
            )
                .into_response();
        }
    };

    let recorded = state
        .ledger()
        .write()
        .await
        .record(&claims.sub, &payload, body.location, now);

    match recorded {
        Ok(record) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                ScanResponse {
                    decision,
                    record: Some(record),
                },
                DecisionReason::Ok.user_message(),
            )),
        )
            .into_response(),
        Err(LedgerError::AlreadyRecorded { .. }) => (
            StatusCode::CONFLICT,
            Json(ApiResponse::error_with(
                ScanResponse {
                    decision,
                    record: None,
                },
                "Attendance already recorded",
            )),
        )
            .into_response(),
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<Empty>::error(e.to_string())),
        )
            .into_response(),
    }
}
