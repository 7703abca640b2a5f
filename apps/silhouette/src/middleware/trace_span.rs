//! Opens the `call` span every log line of a request is recorded under.
//!
//! Sits inside `RequestTrace`, whose `TraceId` it reads. Rpc paths are
//! split into `rpc.service` and `rpc.method`; anything else (health) is
//! recorded by path only.

use std::future::{ready, Ready};

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, HttpMessage};
use futures_util::future::LocalBoxFuture;
use tracing::{info_span, Instrument, Span};

use crate::auth::policy::parse_full_method;
use crate::trace_ctx::TraceId;

pub struct TraceSpan;

impl<S, B> Transform<S, ServiceRequest> for TraceSpan
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = TraceSpanMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TraceSpanMiddleware { service }))
    }
}

pub struct TraceSpanMiddleware<S> {
    service: S,
}

fn call_span(trace_id: &str, path: &str) -> Span {
    match parse_full_method(path) {
        Some(name) => info_span!(
            "call",
            trace_id = %trace_id,
            rpc.service = %format_args!("{}.{}", name.package, name.service),
            rpc.method = %name.method,
        ),
        None => info_span!("call", trace_id = %trace_id, url.path = %path),
    }
}

impl<S, B> Service<ServiceRequest> for TraceSpanMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let trace_id = req
            .extensions()
            .get::<TraceId>()
            .map(|id| id.0.clone())
            .unwrap_or_else(|| "unknown".to_string());
        let span = call_span(&trace_id, req.path());

        Box::pin(self.service.call(req).instrument(span))
    }
}
