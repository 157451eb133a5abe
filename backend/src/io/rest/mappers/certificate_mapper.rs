use shared::{
    Certificate, CertificateListResponse, CertificateResponse, CreateCertificateRequest,
    DeleteCertificateResponse, UpdateCertificateRequest,
};

use crate::domain::commands::certificates::{
    CertificateListResult, CreateCertificateCommand, CreateCertificateResult,
    DeleteCertificateResult, UpdateCertificateCommand, UpdateCertificateResult,
};
use crate::domain::models::DomainCertificate;

pub struct CertificateMapper;

impl CertificateMapper {
    /// Convert domain DomainCertificate to shared Certificate DTO
    pub fn to_dto(domain: DomainCertificate) -> Certificate {
        Certificate {
            id: domain.id,
            student_name: domain.student_name,
            course_name: domain.course_name,
            date: domain.date,
            qr_label: domain.qr_label,
            created_at: domain.created_at,
            updated_at: domain.updated_at,
        }
    }

    pub fn to_dto_list(domain_certificates: Vec<DomainCertificate>) -> Vec<Certificate> {
        domain_certificates.into_iter().map(Self::to_dto).collect()
    }

    pub fn to_create_command(request: CreateCertificateRequest) -> CreateCertificateCommand {
        CreateCertificateCommand {
            student_name: request.student_name,
            course_name: request.course_name,
            date: request.date,
            qr_label: request.qr_label,
        }
    }

    pub fn to_update_command(request: UpdateCertificateRequest) -> UpdateCertificateCommand {
        UpdateCertificateCommand {
            student_name: request.student_name,
            course_name: request.course_name,
            date: request.date,
            qr_label: request.qr_label,
        }
    }

    pub fn to_list_response(result: CertificateListResult) -> CertificateListResponse {
        let data = Self::to_dto_list(result.certificates);
        CertificateListResponse {
            success: true,
            count: data.len(),
            data,
        }
    }

    pub fn to_create_response(result: CreateCertificateResult) -> CertificateResponse {
        CertificateResponse {
            success: true,
            data: Self::to_dto(result.certificate),
            message: result.success_message,
        }
    }

    pub fn to_update_response(result: UpdateCertificateResult) -> CertificateResponse {
        CertificateResponse {
            success: true,
            data: Self::to_dto(result.certificate),
            message: result.success_message,
        }
    }

    pub fn to_delete_response(result: DeleteCertificateResult) -> DeleteCertificateResponse {
        DeleteCertificateResponse {
            success: true,
            message: result.success_message,
            id: result.id,
            deleted: Self::to_dto(result.deleted),
        }
    }
}
