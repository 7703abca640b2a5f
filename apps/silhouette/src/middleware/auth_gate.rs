//! Per-call authorization gate for the rpc scope.
//!
//! Reads both bearer credentials and the body's top-level `username`,
//! runs [`AuthInterceptor`] and, on success, hands the handler an
//! immutable [`AuthContext`] plus a cancellation token tied to the call.
//! Any failure is rendered here, before the handler runs.

use std::future::{ready, Ready};
use std::rc::Rc;

use actix_http::h1;
use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderMap, AUTHORIZATION};
use actix_web::{web, Error, HttpMessage};
use futures_util::future::LocalBoxFuture;
use tokio_util::sync::CancellationToken;

use crate::auth::{AuthContext, InboundCall};
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::state::app_state::AppState;

pub const SERVICE_AUTHORIZATION: &str = "service-authorization";

pub struct AuthGate;

impl<S, B> Transform<S, ServiceRequest> for AuthGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthGateMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthGateMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthGateMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthGateMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, mut req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let body = match req.extract::<web::Bytes>().await {
                Ok(body) => body,
                Err(e) => {
                    let err = AppError::bad_request(format!("unreadable request body: {e}"));
                    return Ok(req.error_response(err).map_into_right_body());
                }
            };

            let admitted = admit(&req, &body);
            let ctx = match admitted {
                Ok(ctx) => ctx,
                // Rendered now so the Problem Details body carries the trace id.
                Err(err) => return Ok(req.error_response(err).map_into_right_body()),
            };

            let (_, mut payload) = h1::Payload::create(true);
            payload.unread_data(body);
            req.set_payload(payload.into());

            let cancel = CancellationToken::new();
            req.extensions_mut().insert(ctx);
            req.extensions_mut().insert(cancel.clone());

            // Dropped with this future when the client goes away, which
            // aborts any in-flight field transforms.
            let _guard = cancel.drop_guard();
            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}

fn admit(req: &ServiceRequest, body: &[u8]) -> Result<AuthContext, AppError> {
    let state = req.app_data::<web::Data<AppState>>().ok_or_else(|| {
        AppError::internal(ErrorCode::Internal, "application state not configured")
    })?;

    let headers = req.headers();
    let service_token = bearer(headers, SERVICE_AUTHORIZATION);
    let user_token = bearer(headers, AUTHORIZATION.as_str());
    let target_owner = target_owner(body);

    let call = InboundCall {
        method: req.path(),
        service_token: service_token.as_deref(),
        user_token: user_token.as_deref(),
        target_owner: target_owner.as_deref(),
    };
    let now = time::OffsetDateTime::now_utc().unix_timestamp();

    state.auth.intercept(&call, now).map_err(AppError::from)
}

/// Token from `Bearer <token>`; anything else counts as absent.
pub(crate) fn bearer(headers: &HeaderMap, name: &str) -> Option<String> {
    let value = headers.get(name)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then(|| token.to_string())
}

/// Top-level `username` of a JSON body, trimmed.
pub(crate) fn target_owner(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    value
        .get("username")?
        .as_str()
        .map(|s| s.trim().to_string())
}

#[cfg(test)]
mod tests {
    use actix_web::http::header::{HeaderName, HeaderValue};

    use super::*;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (k, v) in pairs {
            map.insert(HeaderName::from_static(k), HeaderValue::from_static(v));
        }
        map
    }

    #[test]
    fn bearer_parsing() {
        let map = headers(&[
            ("authorization", "Bearer user.jwt.value"),
            ("service-authorization", "bearer   s2s.jwt.value "),
        ]);
        assert_eq!(bearer(&map, "authorization").as_deref(), Some("user.jwt.value"));
        assert_eq!(
            bearer(&map, SERVICE_AUTHORIZATION).as_deref(),
            Some("s2s.jwt.value")
        );

        let map = headers(&[("authorization", "Basic abc"), ("service-authorization", "Bearer")]);
        assert_eq!(bearer(&map, "authorization"), None);
        assert_eq!(bearer(&map, SERVICE_AUTHORIZATION), None);
        assert_eq!(bearer(&HeaderMap::new(), "authorization"), None);
    }

    #[test]
    fn target_owner_reads_top_level_username_only() {
        assert_eq!(
            target_owner(br#"{"username":" alice@example.com ","slug":"x"}"#).as_deref(),
            Some("alice@example.com")
        );
        assert_eq!(target_owner(br#"{"profile":{"username":"a@b.c"}}"#), None);
        assert_eq!(target_owner(br#"{"username":42}"#), None);
        assert_eq!(target_owner(b"not json"), None);
        assert_eq!(target_owner(b""), None);
    }
}
