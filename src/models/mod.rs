//! Request and Response models for the agent's reserved endpoints
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing control-channel and diagnostics bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::ControlEnvelope;
pub use responses::{HealthResponse, MessageResponse, StatsResponse, VersionResponse};
