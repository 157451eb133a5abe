//! # REST API Interface Layer
//!
//! HTTP endpoints for the certificate service. Handlers translate JSON or
//! form payloads into domain commands, call the service, and map results and
//! errors back to response envelopes and status codes.

pub mod body;
pub mod certificate_apis;
pub mod error;
pub mod health_apis;
pub mod mappers;

pub use error::ApiError;
