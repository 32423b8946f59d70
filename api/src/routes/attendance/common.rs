use attendance::{
    AttendanceDecision, AttendanceQrPayload, AttendanceRecord, AttendanceStats, GeoPoint,
    SessionType,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GenerateQrReq {
    #[serde(default)]
    pub lecturer_name: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub school: String,
    #[validate(length(min = 1, message = "Module ID is required"))]
    pub module_id: String,
    #[validate(length(min = 1, message = "Class ID is required"))]
    pub class_id: String,
    #[serde(default)]
    pub session_type: SessionType,
    /// The lecturer's device location.
    pub location: GeoPoint,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateQrResponse {
    pub payload: AttendanceQrPayload,
    /// Text to render into the QR image.
    pub qr_data: String,
}

/// `qrData` is passed to the decoder as-is, so blank text is `MALFORMED` like any other unreadable code.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateScanReq {
    pub qr_data: String,
    /// The student's device location.
    pub location: GeoPoint,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResponse {
    #[serde(flatten)]
    pub decision: AttendanceDecision,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<AttendanceRecord>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub module_id: Option<String>,
    pub student_id: Option<String>,
    /// Inclusive, by scan date.
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub overall: AttendanceStats,
    pub by_module: BTreeMap<String, AttendanceStats>,
}
