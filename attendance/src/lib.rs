//! QR-code attendance verification.
//!
//! A lecturer's device builds an [`AttendanceQrPayload`] (identity, session scope,
//! its own location and a timestamp) and [`payload::encode`]s it into the text that
//! ends up inside the QR image. A student's device [`payload::decode`]s the scanned
//! text and hands it to the [`AttendanceVerifier`] together with its own location and
//! the current time. The verifier is pure: the same inputs always yield the same
//! [`AttendanceDecision`].
//!
//! Recording accepted scans, duplicate detection and reporting live in [`ledger`]
//! and [`record`], outside of the verifier.

pub mod geo;
pub mod ledger;
pub mod payload;
pub mod record;
pub mod validation;
pub mod verifier;

pub use geo::{EARTH_RADIUS_M, GeoError, GeoPoint, haversine_meters};
pub use ledger::{AttendanceLedger, LedgerError, RecordFilter};
pub use payload::{AttendanceQrPayload, DecodeError, Lecturer, SessionScope, SessionType};
pub use record::{AttendanceRecord, AttendanceStats, AttendanceStatus, group_by_module};
pub use validation::ValidationError;
pub use verifier::{AttendanceDecision, AttendanceVerifier, DecisionReason, VerifierConfig};
