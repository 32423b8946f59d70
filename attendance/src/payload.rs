//! Attendance QR payload and its text codec.
//!
//! The text embedded in the QR image is compact JSON with the keys
//! `lecturerId`, `lecturerName`, `department`, `school`, `moduleId`, `classId`,
//! `sessionType`, `timestamp` and `location { latitude, longitude }`.
//! There is no version field; new keys may only be added as optional.

use crate::geo::{GeoError, GeoPoint};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

/// Which of the two attendance checkpoints of a class a code stands for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionType {
    #[default]
    First,
    Second,
}

impl SessionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionType::First => "first",
            SessionType::Second => "second",
        }
    }
}

impl fmt::Display for SessionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionType {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first" => Ok(SessionType::First),
            "second" => Ok(SessionType::Second),
            other => Err(DecodeError::UnknownSessionType(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    #[error("QR data is empty")]
    Empty,
    #[error("QR data is not valid JSON: {0}")]
    Syntax(String),
    #[error("missing {0}")]
    MissingField(&'static str),
    #[error("timestamp must be a positive integer of milliseconds")]
    InvalidTimestamp,
    #[error("invalid location: {0}")]
    InvalidLocation(#[from] GeoError),
    #[error("unknown session type `{0}`")]
    UnknownSessionType(String),
}

/// Identity of the lecturer generating a code.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Lecturer {
    pub id: String,
    pub name: String,
    pub department: String,
    pub school: String,
}

/// Module/class/checkpoint the lecturer has selected.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionScope {
    pub module_id: String,
    pub class_id: String,
    pub session_type: SessionType,
}

/// The claim a lecturer broadcasts for one session. Not signed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceQrPayload {
    pub lecturer_id: String,
    pub lecturer_name: String,
    pub department: String,
    pub school: String,
    pub module_id: String,
    pub class_id: String,
    pub session_type: SessionType,
    /// Milliseconds since the Unix epoch at generation time.
    pub timestamp: i64,
    pub location: GeoPoint,
}

impl AttendanceQrPayload {
    pub fn new(
        lecturer: &Lecturer,
        scope: &SessionScope,
        location: GeoPoint,
        timestamp_ms: i64,
    ) -> Self {
        Self {
            lecturer_id: lecturer.id.clone(),
            lecturer_name: lecturer.name.clone(),
            department: lecturer.department.clone(),
            school: lecturer.school.clone(),
            module_id: scope.module_id.clone(),
            class_id: scope.class_id.clone(),
            session_type: scope.session_type,
            timestamp: timestamp_ms,
            location,
        }
    }

    pub fn encode(&self) -> String {
        encode(self)
    }
}

impl FromStr for AttendanceQrPayload {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode(s)
    }
}

/// Serializes the payload into the text placed inside the QR image.
pub fn encode(payload: &AttendanceQrPayload) -> String {
    // field order is the struct's declaration order
    serde_json::to_string(payload)
        .unwrap_or_else(|_| unreachable!("payload contains only strings and finite numbers"))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WirePayload {
    lecturer_id: Option<String>,
    lecturer_name: Option<String>,
    department: Option<String>,
    school: Option<String>,
    #[serde(alias = "module")]
    module_id: Option<String>,
    #[serde(alias = "class")]
    class_id: Option<String>,
    #[serde(alias = "type")]
    session_type: Option<String>,
    timestamp: Option<serde_json::Number>,
    location: Option<WireLocation>,
}

#[derive(Deserialize)]
struct WireLocation {
    latitude: Option<f64>,
    longitude: Option<f64>,
}

/// Parses scanned text back into a payload.
///
/// Accepts the legacy `module`, `class` and `type` keys. Unknown keys are ignored.
pub fn decode(raw: &str) -> Result<AttendanceQrPayload, DecodeError> {
    if raw.trim().is_empty() {
        return Err(DecodeError::Empty);
    }

    let wire: WirePayload =
        serde_json::from_str(raw).map_err(|e| DecodeError::Syntax(e.to_string()))?;

    let lecturer_id = required(wire.lecturer_id, "lecturer information")?;
    let module_id = required(wire.module_id, "module information")?;

    let timestamp = wire
        .timestamp
        .ok_or(DecodeError::MissingField("timestamp"))?
        .as_i64()
        .filter(|ts| *ts > 0)
        .ok_or(DecodeError::InvalidTimestamp)?;

    let location = wire
        .location
        .ok_or(DecodeError::MissingField("location information"))?;
    let latitude = location
        .latitude
        .ok_or(DecodeError::MissingField("location latitude"))?;
    let longitude = location
        .longitude
        .ok_or(DecodeError::MissingField("location longitude"))?;
    let location = GeoPoint::new(latitude, longitude)?;

    let session_type = match wire.session_type {
        Some(s) => s.parse()?,
        None => SessionType::default(),
    };

    Ok(AttendanceQrPayload {
        lecturer_id,
        lecturer_name: wire.lecturer_name.unwrap_or_default(),
        department: wire.department.unwrap_or_default(),
        school: wire.school.unwrap_or_default(),
        module_id,
        class_id: wire.class_id.unwrap_or_default(),
        session_type,
        timestamp,
        location,
    })
}

fn required(value: Option<String>, what: &'static str) -> Result<String, DecodeError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(DecodeError::MissingField(what)),
    }
}
