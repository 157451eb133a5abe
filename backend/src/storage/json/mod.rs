//! # JSON File Storage
//!
//! Fallback backend used whenever the database connection is not live.
//!
//! - **connection.rs** - data directory, document paths, write lock
//! - **certificate_repository.rs** - whole-document read/rewrite of certificates

pub mod certificate_repository;
pub mod connection;

pub use certificate_repository::CertificateRepository;
pub use connection::JsonConnection;
