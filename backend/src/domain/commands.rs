//! Domain-level command and result types.
//! The REST layer maps the public DTOs from the `shared` crate to these
//! internal types; they are never serialized directly.

pub mod certificates {
    use crate::domain::error::CertificateError;
    use crate::domain::models::certificate::DomainCertificate;
    use crate::domain::models::storage_mode::StorageMode;

    /// Raw input for issuing a certificate.
    #[derive(Debug, Clone, Default)]
    pub struct CreateCertificateCommand {
        pub student_name: Option<String>,
        pub course_name: Option<String>,
        pub date: Option<String>,
        pub qr_label: Option<String>,
    }

    /// Raw input for a partial update.
    #[derive(Debug, Clone, Default)]
    pub struct UpdateCertificateCommand {
        pub student_name: Option<String>,
        pub course_name: Option<String>,
        pub date: Option<String>,
        pub qr_label: Option<String>,
    }

    /// Result of listing certificates.
    ///
    /// A failed read still produces a (possibly empty) list; the failure is
    /// carried in `read_error` for the caller to log.
    #[derive(Debug, Clone)]
    pub struct CertificateListResult {
        pub certificates: Vec<DomainCertificate>,
        pub mode: StorageMode,
        pub read_error: Option<CertificateError>,
    }

    #[derive(Debug, Clone)]
    pub struct CreateCertificateResult {
        pub certificate: DomainCertificate,
        pub mode: StorageMode,
        pub success_message: String,
    }

    #[derive(Debug, Clone)]
    pub struct UpdateCertificateResult {
        pub certificate: DomainCertificate,
        pub mode: StorageMode,
        pub success_message: String,
    }

    #[derive(Debug, Clone)]
    pub struct DeleteCertificateResult {
        pub id: i64,
        pub deleted: DomainCertificate,
        pub mode: StorageMode,
        pub success_message: String,
    }
}
