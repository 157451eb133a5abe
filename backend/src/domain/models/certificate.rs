//! Certificate record and its normalization rules.
//!
//! Everything here is pure: raw command input goes in, a well-formed record or
//! patch comes out. Persistence is the storage layer's business.

use chrono::{SecondsFormat, Utc};

use crate::domain::commands::certificates::{CreateCertificateCommand, UpdateCertificateCommand};
use crate::domain::error::CertificateError;
use crate::domain::id_generator::IdGenerator;

#[derive(Debug, Clone, PartialEq)]
pub struct DomainCertificate {
    pub id: i64,
    pub student_name: String,
    pub course_name: String,
    pub date: String,
    pub qr_label: String,
    pub created_at: String,
    pub updated_at: Option<String>,
}

/// Fields to replace on an existing certificate. `None` leaves a field untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct CertificatePatch {
    pub student_name: Option<String>,
    pub course_name: Option<String>,
    pub date: Option<String>,
    pub qr_label: Option<String>,
    pub updated_at: String,
}

impl DomainCertificate {
    /// Label printed next to the QR code when the caller did not supply one
    pub fn default_qr_label(id: i64) -> String {
        format!("ID: {}", id)
    }

    /// Validate and normalize a create payload into a new certificate.
    ///
    /// Required fields are checked before an id is drawn, so rejected
    /// payloads never consume identifiers.
    pub fn normalize_for_create(
        command: CreateCertificateCommand,
        ids: &IdGenerator,
    ) -> Result<Self, CertificateError> {
        let student_name = trimmed(command.student_name);
        let course_name = trimmed(command.course_name);
        let date = trimmed(command.date);

        let mut missing = Vec::new();
        if student_name.is_none() {
            missing.push("studentName");
        }
        if course_name.is_none() {
            missing.push("courseName");
        }
        if date.is_none() {
            missing.push("date");
        }

        let (Some(student_name), Some(course_name), Some(date)) = (student_name, course_name, date)
        else {
            return Err(CertificateError::Validation { fields: missing });
        };

        let id = ids.next_id();
        let qr_label = trimmed(command.qr_label).unwrap_or_else(|| Self::default_qr_label(id));

        Ok(Self {
            id,
            student_name,
            course_name,
            date,
            qr_label,
            created_at: now_timestamp(),
            updated_at: None,
        })
    }

    /// Build a patch from the supplied fields of an update payload.
    ///
    /// Supplied required fields must still be non-empty after trimming. A
    /// supplied `qrLabel` is taken as-is after trimming, empty included.
    pub fn normalize_for_update(
        command: UpdateCertificateCommand,
    ) -> Result<CertificatePatch, CertificateError> {
        let mut empty = Vec::new();
        let mut required = |value: Option<String>, field: &'static str| {
            let value = value.map(|v| v.trim().to_string());
            if matches!(&value, Some(v) if v.is_empty()) {
                empty.push(field);
            }
            value
        };

        let student_name = required(command.student_name, "studentName");
        let course_name = required(command.course_name, "courseName");
        let date = required(command.date, "date");

        if !empty.is_empty() {
            return Err(CertificateError::Validation { fields: empty });
        }

        Ok(CertificatePatch {
            student_name,
            course_name,
            date,
            qr_label: command.qr_label.map(|v| v.trim().to_string()),
            updated_at: now_timestamp(),
        })
    }

    /// Apply a patch in place
    pub fn apply(&mut self, patch: CertificatePatch) {
        if let Some(student_name) = patch.student_name {
            self.student_name = student_name;
        }
        if let Some(course_name) = patch.course_name {
            self.course_name = course_name;
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(qr_label) = patch.qr_label {
            self.qr_label = qr_label;
        }
        self.updated_at = Some(patch.updated_at);
    }
}

/// Current time in the RFC 3339 form used for `createdAt`/`updatedAt`
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
