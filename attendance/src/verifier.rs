use crate::geo::{GeoPoint, haversine_meters};
use crate::payload::{AttendanceQrPayload, DecodeError, decode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Acceptance policy. Both limits are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VerifierConfig {
    /// How long a code stays valid after generation.
    #[serde(default = "default_expiry_window_ms")]
    pub expiry_window_ms: i64,

    /// Maximum distance between lecturer and student devices.
    #[serde(default = "default_max_radius_meters")]
    pub max_radius_meters: f64,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            expiry_window_ms: default_expiry_window_ms(),
            max_radius_meters: default_max_radius_meters(),
        }
    }
}

fn default_expiry_window_ms() -> i64 {
    300_000
}

fn default_max_radius_meters() -> f64 {
    50.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DecisionReason {
    Ok,
    Expired,
    TooFar,
    Malformed,
}

impl DecisionReason {
    /// Text shown to the student for this outcome.
    pub fn user_message(&self) -> &'static str {
        match self {
            DecisionReason::Ok => "Attendance recorded",
            DecisionReason::Expired => "QR code has expired",
            DecisionReason::TooFar => "You are too far from the classroom",
            DecisionReason::Malformed => "Invalid QR code",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceDecision {
    pub accepted: bool,
    pub reason: DecisionReason,
    pub distance_meters: Option<f64>,
}

impl AttendanceDecision {
    pub fn accept(distance_meters: f64) -> Self {
        Self {
            accepted: true,
            reason: DecisionReason::Ok,
            distance_meters: Some(distance_meters),
        }
    }

    pub fn reject(reason: DecisionReason, distance_meters: Option<f64>) -> Self {
        Self {
            accepted: false,
            reason,
            distance_meters,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AttendanceVerifier {
    config: VerifierConfig,
}

impl AttendanceVerifier {
    pub fn new(config: VerifierConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }

    /// Decides a scan from the outcome of decoding it.
    pub fn verify(
        &self,
        decoded: Result<&AttendanceQrPayload, &DecodeError>,
        scanner: &GeoPoint,
        now_ms: i64,
    ) -> AttendanceDecision {
        match decoded {
            Ok(payload) => self.verify_payload(payload, scanner, now_ms),
            Err(err) => {
                info!(error = %err, "Rejected malformed QR payload");
                AttendanceDecision::reject(DecisionReason::Malformed, None)
            }
        }
    }

    /// Decodes the scanned text and decides it in one step.
    pub fn verify_scan(&self, raw: &str, scanner: &GeoPoint, now_ms: i64) -> AttendanceDecision {
        let decoded = decode(raw);
        self.verify(decoded.as_ref(), scanner, now_ms)
    }

    /// Applies the expiry window, then the radius. A timestamp ahead of `now_ms`
    /// counts as fresh.
    pub fn verify_payload(
        &self,
        payload: &AttendanceQrPayload,
        scanner: &GeoPoint,
        now_ms: i64,
    ) -> AttendanceDecision {
        let age_ms = now_ms.saturating_sub(payload.timestamp);
        if age_ms > self.config.expiry_window_ms {
            info!(
                module_id = %payload.module_id,
                age_ms,
                window_ms = self.config.expiry_window_ms,
                "Rejected expired QR payload"
            );
            return AttendanceDecision::reject(DecisionReason::Expired, None);
        }

        let distance = haversine_meters(&payload.location, scanner);
        if distance > self.config.max_radius_meters {
            info!(
                module_id = %payload.module_id,
                distance_m = distance,
                max_radius_m = self.config.max_radius_meters,
                "Rejected scan outside the classroom radius"
            );
            return AttendanceDecision::reject(DecisionReason::TooFar, Some(distance));
        }

        debug!(
            module_id = %payload.module_id,
            session_type = %payload.session_type,
            age_ms,
            distance_m = distance,
            "Accepted QR scan"
        );
        AttendanceDecision::accept(distance)
    }
}
