//! # Domain Module
//!
//! Business rules for certificate records, independent of HTTP and of the
//! concrete storage backend.
//!
//! - **models**: the certificate record, its normalization rules, and the
//!   storage mode enum
//! - **id_generator**: strictly increasing, clock-derived identifiers
//! - **certificate_service**: the store facade that selects a backend per call
//! - **commands**: internal command and result types
//! - **error**: the failure taxonomy reported to callers

pub mod certificate_service;
pub mod commands;
pub mod error;
pub mod id_generator;
pub mod models;

pub use certificate_service::*;
pub use commands::*;
pub use error::CertificateError;
pub use id_generator::IdGenerator;
