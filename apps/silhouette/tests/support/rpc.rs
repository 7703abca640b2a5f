//! Request builders for `POST /<package>.<Service>/<Method>` calls.

use actix_web::http::header::AUTHORIZATION;
use actix_web::test;
use serde_json::Value;
use silhouette::middleware::auth_gate::SERVICE_AUTHORIZATION;
use silhouette_test_support::tokens::{bearer, service_token, user_token};

/// Scopes the calling service holds in most tests.
pub const SERVICE_SCOPES: &[&str] = &["r:silhouette:*", "w:silhouette:*"];

/// An rpc call with an optional service and user credential.
pub fn call(method: &str, body: &Value, service: Option<&str>, user: Option<&str>) -> test::TestRequest {
    let mut req = test::TestRequest::post().uri(method).set_json(body);
    if let Some(token) = service {
        req = req.insert_header((SERVICE_AUTHORIZATION, bearer(token)));
    }
    if let Some(token) = user {
        req = req.insert_header((AUTHORIZATION, bearer(token)));
    }
    req
}

/// Service-only call, as used for profile creation.
pub fn as_service(method: &str, body: &Value) -> test::TestRequest {
    call(method, body, Some(&service_token(SERVICE_SCOPES)), None)
}

/// A user acting on their own records, holding no scopes.
pub fn as_user(method: &str, body: &Value, username: &str) -> test::TestRequest {
    call(
        method,
        body,
        Some(&service_token(SERVICE_SCOPES)),
        Some(&user_token(username, &[])),
    )
}

/// A user holding `scopes`.
pub fn as_user_with_scopes(
    method: &str,
    body: &Value,
    username: &str,
    scopes: &[&str],
) -> test::TestRequest {
    call(
        method,
        body,
        Some(&service_token(SERVICE_SCOPES)),
        Some(&user_token(username, scopes)),
    )
}
