use std::future::{ready, Ready};
use std::time::Instant;

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, HttpMessage};
use futures_util::future::LocalBoxFuture;
use tracing::{error, info, warn};

use crate::auth::AuthContext;
use crate::error::AppError;

/// Emits one `call_completed` line per request, levelled by status class.
///
/// Carries the requesting service and whether a user credential was
/// presented (read from the `AuthContext` the gate stored) plus the
/// stable error code on failures. Usernames never appear here.
pub struct StructuredLogger;

impl<S, B> Transform<S, ServiceRequest> for StructuredLogger
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = StructuredLoggerMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(StructuredLoggerMiddleware { service }))
    }
}

pub struct StructuredLoggerMiddleware<S> {
    service: S,
}

struct CallOutcome {
    status: u16,
    service: Option<String>,
    user_call: bool,
    code: Option<&'static str>,
}

fn outcome<B>(res: &ServiceResponse<B>) -> CallOutcome {
    let extensions = res.request().extensions();
    let auth = extensions.get::<AuthContext>();
    CallOutcome {
        status: res.status().as_u16(),
        service: auth.map(|a| a.requesting_service().to_string()),
        user_call: auth.is_some_and(|a| a.user_claims().is_some()),
        code: res
            .response()
            .error()
            .and_then(|e| e.as_error::<AppError>())
            .map(|e| e.code().as_str()),
    }
}

impl<S, B> Service<ServiceRequest> for StructuredLoggerMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let start = Instant::now();
        let fut = self.service.call(req);

        Box::pin(async move {
            let result = fut.await;
            let elapsed_us = start.elapsed().as_micros() as u64;

            let call = match &result {
                Ok(res) => outcome(res),
                Err(err) => CallOutcome {
                    status: err.as_response_error().status_code().as_u16(),
                    service: None,
                    user_call: false,
                    code: err.as_error::<AppError>().map(|e| e.code().as_str()),
                },
            };
            let service = call.service.as_deref().unwrap_or("-");
            let code = call.code.unwrap_or("-");

            match call.status {
                500.. => error!(status = call.status, service, user_call = call.user_call, code, elapsed_us, "call_completed"),
                400..=499 => warn!(status = call.status, service, user_call = call.user_call, code, elapsed_us, "call_completed"),
                _ => info!(status = call.status, service, user_call = call.user_call, code, elapsed_us, "call_completed"),
            }

            result
        })
    }
}
