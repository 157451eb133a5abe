pub mod certificate_mapper;

pub use certificate_mapper::CertificateMapper;
