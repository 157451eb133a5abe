pub mod certificate;
pub mod storage_mode;

pub use certificate::{CertificatePatch, DomainCertificate};
pub use storage_mode::StorageMode;
