//! Request bodies arrive either as JSON or as URL-encoded forms.

use axum::{
    async_trait,
    extract::{
        rejection::{FormRejection, JsonRejection},
        FromRequest, Request,
    },
    http::header,
    response::{IntoResponse, Response},
    Form, Json,
};
use serde::de::DeserializeOwned;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Deserializes the body as a form when the content type says so, as JSON
/// otherwise
pub struct JsonOrForm<T>(pub T);

#[derive(Debug)]
pub enum BodyRejection {
    Json(JsonRejection),
    Form(FormRejection),
}

impl BodyRejection {
    pub fn body_text(&self) -> String {
        match self {
            BodyRejection::Json(rejection) => rejection.body_text(),
            BodyRejection::Form(rejection) => rejection.body_text(),
        }
    }
}

impl IntoResponse for BodyRejection {
    fn into_response(self) -> Response {
        match self {
            BodyRejection::Json(rejection) => rejection.into_response(),
            BodyRejection::Form(rejection) => rejection.into_response(),
        }
    }
}

fn is_form(req: &Request) -> bool {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map_or(false, |content_type| content_type.starts_with(FORM_CONTENT_TYPE))
}

#[async_trait]
impl<T, S> FromRequest<S> for JsonOrForm<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = BodyRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_form(&req) {
            let Form(value) = Form::<T>::from_request(req, state)
                .await
                .map_err(BodyRejection::Form)?;
            Ok(JsonOrForm(value))
        } else {
            let Json(value) = Json::<T>::from_request(req, state)
                .await
                .map_err(BodyRejection::Json)?;
            Ok(JsonOrForm(value))
        }
    }
}
