//! Typed delivery errors for the relay.
//!
//! These never surface as a failing exit status on the hook path; they exist
//! so a failed notification can be reported with its cause (HTTP status plus
//! body, or transport error) instead of a bare "failed".

use thiserror::Error;

/// Why a single delivery attempt did not succeed.
#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("tracker returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl DeliveryError {
    /// True for timeouts and connection failures, false for HTTP error
    /// statuses the tracker actually produced.
    pub fn is_transport(&self) -> bool {
        matches!(self, DeliveryError::Transport(_))
    }
}
