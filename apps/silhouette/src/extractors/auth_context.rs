//! Hands the gate's [`AuthContext`] to handlers as an explicit argument.

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpMessage, HttpRequest};
use futures_util::future::{ready, Ready};
use tracing::error;

use crate::auth::AuthContext;
use crate::error::AppError;
use crate::errors::ErrorCode;

impl FromRequest for AuthContext {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        // Only reachable for routes mounted outside the gate.
        let ctx = req.extensions().get::<AuthContext>().cloned().ok_or_else(|| {
            error!(path = %req.path(), "AuthContext missing; route is not behind AuthGate");
            AppError::internal(ErrorCode::Internal, "authorization context unavailable")
        });
        ready(ctx)
    }
}
