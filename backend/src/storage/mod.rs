//! # Storage Module
//!
//! Persistence for certificate records behind the traits in [`traits`].
//!
//! Two backends exist:
//!
//! - **sqlite**: the primary store, one row per certificate, used while the
//!   database connection is live
//! - **json**: a single JSON document on local disk, used as the fallback
//!
//! Neither backend decides when it is used; the certificate service probes the
//! database before every operation and routes the call.

pub mod json;
pub mod sqlite;
pub mod traits;

pub use json::{CertificateRepository as JsonCertificateRepository, JsonConnection};
pub use sqlite::{ConnectionState, DbConnection, SqliteCertificateRepository};
pub use traits::{CertificateStorage, EditableCertificateStorage, LivenessProbe};
