//! Request DTOs for the control channel
//!
//! Defines the structure of incoming control-message bodies.

use serde::Deserialize;

/// Envelope for a control message (POST /_agent/message)
///
/// # Fields
/// - `kind`: The message type, `SKIP_WAITING` or `GET_VERSION`
#[derive(Debug, Clone, Deserialize)]
pub struct ControlEnvelope {
    /// The message type
    #[serde(rename = "type")]
    pub kind: String,
}
