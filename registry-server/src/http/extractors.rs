//! Custom Axum extractors

use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::http::header::CONTENT_TYPE;
use serde_json::{Map, Value};

use super::error::ApiError;
use crate::models::RegistrationForm;

/// Registration body from either JSON or an urlencoded form.
///
/// Any other content type, or a blank body, yields an empty form, which
/// validation then rejects. A body that does not parse as its declared
/// type is an internal error.
pub struct RegistrationBody(pub RegistrationForm);

enum BodyKind {
    Json,
    Form,
    Other,
}

fn body_kind(req: &Request) -> BodyKind {
    let Some(content_type) = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
    else {
        return BodyKind::Other;
    };

    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    if mime == "application/json" || mime.ends_with("+json") {
        BodyKind::Json
    } else if mime == "application/x-www-form-urlencoded" {
        BodyKind::Form
    } else {
        BodyKind::Other
    }
}

fn parse_json(bytes: &[u8]) -> Result<RegistrationForm, ApiError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(RegistrationForm::default());
    }
    serde_json::from_slice(bytes).map_err(|e| ApiError::Internal {
        message: format!("invalid JSON body: {e}"),
    })
}

/// Repeated keys (multi-select inputs) are collected into a list, which
/// `RegistrationForm` joins with `,`.
fn parse_form(bytes: &[u8]) -> Result<RegistrationForm, ApiError> {
    let pairs: Vec<(String, String)> =
        serde_urlencoded::from_bytes(bytes).map_err(|e| ApiError::Internal {
            message: format!("invalid form body: {e}"),
        })?;

    let mut fields = Map::new();
    for (key, value) in pairs {
        match fields.get_mut(&key) {
            Some(Value::Array(values)) => values.push(Value::String(value)),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, Value::String(value)]);
            }
            None => {
                fields.insert(key, Value::String(value));
            }
        }
    }

    serde_json::from_value(Value::Object(fields)).map_err(|e| ApiError::Internal {
        message: format!("invalid form body: {e}"),
    })
}

impl<S> FromRequest<S> for RegistrationBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let kind = body_kind(&req);
        if let BodyKind::Other = kind {
            return Ok(Self(RegistrationForm::default()));
        }

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::Internal {
                message: format!("unreadable body: {}", e.body_text()),
            })?;

        let form = match kind {
            BodyKind::Json => parse_json(&bytes)?,
            BodyKind::Form => parse_form(&bytes)?,
            BodyKind::Other => RegistrationForm::default(),
        };

        Ok(Self(form))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    async fn extract(
        content_type: Option<&str>,
        body: &'static str,
    ) -> Result<RegistrationForm, ApiError> {
        let mut builder = axum::http::Request::builder()
            .method("POST")
            .uri("/register");
        if let Some(ct) = content_type {
            builder = builder.header(CONTENT_TYPE, ct);
        }
        let req = builder.body(Body::from(body)).unwrap();
        RegistrationBody::from_request(req, &()).await.map(|b| b.0)
    }

    #[tokio::test]
    async fn json_with_charset() {
        let form = extract(
            Some("application/json; charset=utf-8"),
            r#"{"name":"Ann","student_id":"S1"}"#,
        )
        .await
        .unwrap();
        assert_eq!(form.name.as_deref(), Some("Ann"));
        assert_eq!(form.email, None);
    }

    #[tokio::test]
    async fn urlencoded_form() {
        let form = extract(
            Some("application/x-www-form-urlencoded"),
            "name=Ann+Lee&email=ann%40x.com&student_id=S1&age=21",
        )
        .await
        .unwrap();
        assert_eq!(form.name.as_deref(), Some("Ann Lee"));
        assert_eq!(form.email.as_deref(), Some("ann@x.com"));
        assert_eq!(form.age.as_deref(), Some("21"));
    }

    #[tokio::test]
    async fn unknown_content_type_is_empty() {
        let form = extract(Some("text/plain"), "name=Ann").await.unwrap();
        assert!(form.name.is_none());

        let form = extract(None, "").await.unwrap();
        assert!(form.student_id.is_none());
    }

    #[tokio::test]
    async fn blank_json_body_is_empty() {
        let form = extract(Some("application/json"), "").await.unwrap();
        assert!(form.name.is_none());

        let form = extract(Some("application/json"), "  \n").await.unwrap();
        assert!(form.student_id.is_none());
    }

    #[tokio::test]
    async fn repeated_form_keys_are_joined() {
        let form = extract(
            Some("application/x-www-form-urlencoded"),
            "name=Ann&languages=en&languages=fr&languages=sw",
        )
        .await
        .unwrap();
        assert_eq!(form.name.as_deref(), Some("Ann"));
        assert_eq!(form.languages.as_deref(), Some("en,fr,sw"));
    }

    #[tokio::test]
    async fn malformed_json_is_internal() {
        let err = extract(Some("application/json"), "{not json").await.unwrap_err();
        assert!(matches!(err, ApiError::Internal { .. }));
    }
}
