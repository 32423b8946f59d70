use attendance::{
    AttendanceRecord, AttendanceStats, RecordFilter, group_by_module,
    validation::validate_date_range,
};
use axum::{
    Extension, Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{NaiveDate, Utc};

use super::common::{ListQuery, StatsResponse};
use crate::{
    auth::{AuthUser, Role},
    response::{ApiResponse, Empty},
    state::AppState,
};

fn scanned_within(record: &AttendanceRecord, from: Option<NaiveDate>, to: Option<NaiveDate>) -> bool {
    [record.first_scanned_at, record.second_scanned_at]
        .into_iter()
        .flatten()
        .map(|at| at.date_naive())
        .any(|day| from.is_none_or(|f| day >= f) && to.is_none_or(|t| day <= t))
}

/// GET /api/attendance
///
/// ### Query Parameters
/// - `moduleId` (optional)
/// - `studentId` (optional, ignored for students, who only ever see their own records)
/// - `from`, `to` (optional, `YYYY-MM-DD`, inclusive)
///
/// ### Responses
/// - `200 OK` with the matching records
/// - `422 Unprocessable Entity` for an invalid date range
pub async fn list_records(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Query(query): Query<ListQuery>,
) -> Response {
    if let (Some(from), Some(to)) = (query.from, query.to) {
        if let Err(errors) = validate_date_range(from, to, Utc::now().date_naive()) {
            let message = errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ApiResponse::<Empty>::error(message)),
            )
                .into_response();
        }
    }

    let student_id = match claims.role {
        Role::Student => Some(claims.sub.clone()),
        _ => query.student_id,
    };
    let filter = RecordFilter {
        module_id: query.module_id,
        student_id,
    };

    let records: Vec<AttendanceRecord> = state
        .ledger()
        .read()
        .await
        .records(&filter)
        .into_iter()
        .filter(|r| scanned_within(r, query.from, query.to))
        .collect();

    (
        StatusCode::OK,
        Json(ApiResponse::success(records, "Attendance records retrieved")),
    )
        .into_response()
}

/// GET /api/attendance/stats
///
/// Present/partial/absent percentages overall and per module.
///
/// Only students with at least one accepted scan have a record, and there is
/// no class roster to count the rest against, so `absentPercentage` is always
/// `0` here. It is kept so the shape matches `AttendanceStats` everywhere.
///
/// ### Query Parameters
/// - `moduleId` (optional)
pub async fn attendance_stats(
    State(state): State<AppState>,
    Query(filter): Query<RecordFilter>,
) -> Response {
    let records = state.ledger().read().await.records(&filter);

    let by_module = group_by_module(&records)
        .into_iter()
        .map(|(module, rs)| (module, AttendanceStats::from_records(rs)))
        .collect();

    let stats = StatsResponse {
        overall: AttendanceStats::from_records(&records),
        by_module,
    };

    (
        StatusCode::OK,
        Json(ApiResponse::success(stats, "Attendance statistics retrieved")),
    )
        .into_response()
}
