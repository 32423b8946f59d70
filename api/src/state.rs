//! Application state shared across Axum route handlers.

use attendance::{AttendanceLedger, AttendanceVerifier, VerifierConfig};
use common::config;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Central application state.
///
/// - The verifier, holding the expiry window and radius in force.
/// - The in-memory attendance ledger, shared behind an async lock.
#[derive(Clone)]
pub struct AppState {
    verifier: AttendanceVerifier,
    ledger: Arc<RwLock<AttendanceLedger>>,
}

impl AppState {
    pub fn new(config: VerifierConfig) -> Self {
        Self {
            verifier: AttendanceVerifier::new(config),
            ledger: Arc::new(RwLock::new(AttendanceLedger::new())),
        }
    }

    /// Builds state from the global `AppConfig`.
    pub fn from_config() -> Self {
        Self::new(verifier_config())
    }

    pub fn verifier(&self) -> &AttendanceVerifier {
        &self.verifier
    }

    pub fn ledger(&self) -> &RwLock<AttendanceLedger> {
        &self.ledger
    }
}

/// The verification policy configured through `QR_EXPIRY_WINDOW_MS` and `MAX_RADIUS_METERS`.
pub fn verifier_config() -> VerifierConfig {
    VerifierConfig {
        expiry_window_ms: config::qr_expiry_window_ms(),
        max_radius_meters: config::max_radius_meters(),
    }
}
