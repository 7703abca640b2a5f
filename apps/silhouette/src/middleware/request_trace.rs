use std::future::{ready, Ready};

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::{Error, HttpMessage};
use futures_util::future::LocalBoxFuture;

use crate::trace_ctx::{self, TraceId};

pub const REQUEST_ID: &str = "x-request-id";

/// Outermost middleware. Adopts the caller's `x-request-id` when it is a
/// UUID, otherwise mints one; the id lands in extensions, in the
/// task-local for everything downstream, and on the response.
pub struct RequestTrace;

impl<S, B> Transform<S, ServiceRequest> for RequestTrace
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestTraceMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestTraceMiddleware { service }))
    }
}

pub struct RequestTraceMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RequestTraceMiddleware<S>
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
        let trace_id = req
            .headers()
            .get(REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .and_then(TraceId::from_upstream)
            .unwrap_or_else(TraceId::generate);
        req.extensions_mut().insert(trace_id.clone());

        let fut = self.service.call(req);
        Box::pin(async move {
            let mut res = trace_ctx::with_trace_id(trace_id.0.clone(), fut).await?;
            // A uuid is always a valid header value.
            if let Ok(value) = HeaderValue::from_str(trace_id.as_str()) {
                res.headers_mut()
                    .insert(HeaderName::from_static(REQUEST_ID), value);
            }
            Ok(res)
        })
    }
}

#[cfg(test)]
mod tests {
    use actix_web::{test, web, App, HttpResponse};

    use super::*;

    async fn echo() -> HttpResponse {
        HttpResponse::Ok().body(trace_ctx::trace_id())
    }

    #[actix_web::test]
    async fn adopts_upstream_uuid_and_exposes_it_downstream() {
        let app = test::init_service(
            App::new()
                .wrap(RequestTrace)
                .route("/echo", web::get().to(echo)),
        )
        .await;

        let upstream = "7c9e6679-7425-40de-944b-e07fc1f90ae7";
        let req = test::TestRequest::get()
            .uri("/echo")
            .insert_header(("x-request-id", upstream))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.headers().get("x-request-id").unwrap(), upstream);
        let body = test::read_body(resp).await;
        assert_eq!(body, upstream.as_bytes());
    }

    #[actix_web::test]
    async fn replaces_non_uuid_upstream_id() {
        let app = test::init_service(
            App::new()
                .wrap(RequestTrace)
                .route("/echo", web::get().to(echo)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/echo")
            .insert_header(("x-request-id", "not-a-uuid"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        let echoed = resp.headers().get("x-request-id").unwrap().to_str().unwrap().to_string();
        assert_ne!(echoed, "not-a-uuid");
        assert!(TraceId::from_upstream(&echoed).is_some());
    }
}
