//! # SQLite Storage
//!
//! Database backend. One row per certificate, addressed by the external `id`
//! column; the table's own `row_id` never leaves this module.
//!
//! - **connection.rs** - pool setup, schema, readiness state, health monitor
//! - **certificate_repository.rs** - per-record queries

pub mod certificate_repository;
pub mod connection;

pub use certificate_repository::CertificateRepository as SqliteCertificateRepository;
pub use connection::{ConnectionState, DbConnection};
