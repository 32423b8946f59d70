//! In-memory record of accepted scans.
//!
//! The verifier has no memory, so the same code can be scanned any number of
//! times inside its window. The ledger is what refuses a second scan of the
//! same checkpoint by the same student on the same day. A class id names a
//! cohort, so next week's lecture for the same module and class gets a fresh
//! record. It lives only as long as the process.

use crate::geo::GeoPoint;
use crate::payload::{AttendanceQrPayload, SessionType};
use crate::record::AttendanceRecord;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("Attendance already recorded for the {session_type} session")]
    AlreadyRecorded { session_type: SessionType },
    #[error("Student ID is required")]
    MissingStudent,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordFilter {
    pub module_id: Option<String>,
    pub student_id: Option<String>,
}

impl RecordFilter {
    fn matches(&self, record: &AttendanceRecord) -> bool {
        self.module_id
            .as_deref()
            .is_none_or(|m| m == record.module_id)
            && self
                .student_id
                .as_deref()
                .is_none_or(|s| s == record.student_id)
    }
}

/// (student, module, class, session day)
type LedgerKey = (String, String, String, NaiveDate);

/// UTC day the code was generated on, falling back to the scan day.
fn session_date(payload: &AttendanceQrPayload, taken_at: DateTime<Utc>) -> NaiveDate {
    DateTime::from_timestamp_millis(payload.timestamp)
        .unwrap_or(taken_at)
        .date_naive()
}

#[derive(Debug, Default)]
pub struct AttendanceLedger {
    records: BTreeMap<LedgerKey, AttendanceRecord>,
}

impl AttendanceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the payload's checkpoint for `student_id`.
    ///
    /// Call only with payloads the verifier accepted.
    pub fn record(
        &mut self,
        student_id: &str,
        payload: &AttendanceQrPayload,
        scanner: GeoPoint,
        taken_at: DateTime<Utc>,
    ) -> Result<AttendanceRecord, LedgerError> {
        if student_id.trim().is_empty() {
            return Err(LedgerError::MissingStudent);
        }

        let session_date = session_date(payload, taken_at);
        let key = (
            student_id.to_string(),
            payload.module_id.clone(),
            payload.class_id.clone(),
            session_date,
        );

        let record = self
            .records
            .entry(key)
            .or_insert_with(|| AttendanceRecord {
                student_id: student_id.to_string(),
                module_id: payload.module_id.clone(),
                class_id: payload.class_id.clone(),
                session_date,
                lecturer_id: payload.lecturer_id.clone(),
                first_scan: false,
                second_scan: false,
                first_scanned_at: None,
                second_scanned_at: None,
                location: scanner,
            });

        if record.has_scan(payload.session_type) {
            return Err(LedgerError::AlreadyRecorded {
                session_type: payload.session_type,
            });
        }

        record.mark(payload.session_type, taken_at);
        record.location = scanner;

        info!(
            student_id,
            module_id = %record.module_id,
            class_id = %record.class_id,
            session_date = %record.session_date,
            session_type = %payload.session_type,
            "Attendance recorded"
        );

        Ok(record.clone())
    }

    pub fn records(&self, filter: &RecordFilter) -> Vec<AttendanceRecord> {
        self.records
            .values()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
