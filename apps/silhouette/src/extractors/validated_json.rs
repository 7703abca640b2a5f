use std::ops::{Deref, DerefMut};

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use bytes::BytesMut;
use futures_util::future::LocalBoxFuture;
use futures_util::StreamExt;
use serde::de::DeserializeOwned;
use serde_json::Error as JsonError;
use tracing::{debug, warn};

use crate::error::AppError;
use crate::logging::pii::Redacted;

/// Largest request body accepted; every method's message is far smaller.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// JSON body extractor for rpc messages. Oversized, unreadable or
/// malformed bodies become a 400 Problem Details response that never
/// echoes body content.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<T> ValidatedJson<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for ValidatedJson<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> DerefMut for ValidatedJson<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<T> FromRequest for ValidatedJson<T>
where
    T: DeserializeOwned + 'static,
{
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let mut payload = payload.take();
        let method = req.path().to_string();

        Box::pin(async move {
            let mut body = BytesMut::new();
            while let Some(chunk) = payload.next().await {
                let chunk = chunk.map_err(|e| {
                    warn!(%method, error = %e, "Failed to read request body chunk");
                    AppError::bad_request("failed to read request body")
                })?;
                if body.len() + chunk.len() > MAX_BODY_BYTES {
                    warn!(%method, limit = MAX_BODY_BYTES, "Request body too large");
                    return Err(AppError::bad_request(format!(
                        "request body exceeds {MAX_BODY_BYTES} bytes"
                    )));
                }
                body.extend_from_slice(&chunk);
            }

            serde_json::from_slice::<T>(&body)
                .map(ValidatedJson)
                .map_err(|e| {
                    debug!(
                        %method,
                        error = %Redacted(&e.to_string()),
                        body_size = body.len(),
                        "JSON parsing failed"
                    );
                    AppError::bad_request(classify_json_error(&e))
                })
        })
    }
}

/// Sanitized message; never echoes body content.
fn classify_json_error(error: &JsonError) -> String {
    match error.classify() {
        serde_json::error::Category::Syntax => {
            format!("invalid JSON at line {}", error.line())
        }
        serde_json::error::Category::Eof => "invalid JSON: unexpected end of input".to_string(),
        serde_json::error::Category::Data => {
            "invalid JSON: missing or wrongly typed fields".to_string()
        }
        serde_json::error::Category::Io => "invalid JSON: I/O error while reading body".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize)]
    #[allow(dead_code)]
    struct Lookup {
        username: String,
        slug: String,
    }

    #[test]
    fn syntax_errors_name_the_line() {
        let err = serde_json::from_str::<Lookup>("{\n\"username\": }").unwrap_err();
        assert_eq!(classify_json_error(&err), "invalid JSON at line 2");
    }

    #[test]
    fn eof_and_data_errors() {
        let eof = serde_json::from_str::<Lookup>(r#"{"username": "a""#).unwrap_err();
        assert!(classify_json_error(&eof).contains("unexpected end of input"));

        let data = serde_json::from_str::<Lookup>(r#"{"username": 1, "slug": "s"}"#).unwrap_err();
        let detail = classify_json_error(&data);
        assert!(detail.contains("wrongly typed"));
        assert!(!detail.contains('1'));
    }

    #[test]
    fn deref_exposes_inner() {
        let mut v = ValidatedJson(Lookup {
            username: "a@b.co".into(),
            slug: "s".into(),
        });
        v.slug = "t".into();
        assert_eq!(v.username, "a@b.co");
        assert_eq!(v.into_inner().slug, "t");
    }
}
