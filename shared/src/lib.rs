use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A certificate as exposed over the API.
///
/// `id` is the external key; storage-internal identifiers never leave the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certificate {
    pub id: i64,
    pub student_name: String,
    pub course_name: String,
    /// Caller-supplied date, kept verbatim (not validated as a calendar date)
    pub date: String,
    pub qr_label: String,
    /// RFC 3339 timestamp set once at creation
    pub created_at: String,
    /// RFC 3339 timestamp of the last update, absent if never updated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Payload for issuing a new certificate.
///
/// Fields are optional at the wire level so that missing values can be
/// reported together instead of failing on the first one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCertificateRequest {
    #[serde(default, deserialize_with = "loose_string")]
    pub student_name: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub course_name: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub qr_label: Option<String>,
}

/// Partial update of a certificate. Only supplied fields are replaced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCertificateRequest {
    #[serde(default, deserialize_with = "loose_string")]
    pub student_name: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub course_name: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub qr_label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CertificateListResponse {
    pub success: bool,
    pub data: Vec<Certificate>,
    pub count: usize,
}

/// Response for create and update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CertificateResponse {
    pub success: bool,
    pub data: Certificate,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteCertificateResponse {
    pub success: bool,
    pub message: String,
    pub id: i64,
    pub deleted: Certificate,
}

/// Uniform failure envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    /// Extra detail, only populated in development deployments
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Requested path, set for unknown endpoints
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            message: None,
            path: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub environment: String,
    /// "connected" or "fallback"
    pub storage_mode: String,
    pub certificates_count: usize,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiInfoResponse {
    pub message: String,
    pub version: String,
    pub endpoints: ApiEndpoints,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEndpoints {
    pub health: String,
    pub certificates: String,
}

/// Accepts strings, numbers and booleans, turning them into strings.
/// `null` and absent values both become `None`.
fn loose_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        Some(other) => Some(other.to_string()),
    })
}
