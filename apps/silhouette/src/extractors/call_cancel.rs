use std::ops::Deref;

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpMessage, HttpRequest};
use futures_util::future::{ready, Ready};
use tokio_util::sync::CancellationToken;

/// Cancellation token of the current call. Cancelled when the call's
/// future is dropped; a fresh token outside the gate.
#[derive(Debug, Clone)]
pub struct CallCancel(pub CancellationToken);

impl Deref for CallCancel {
    type Target = CancellationToken;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequest for CallCancel {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = req
            .extensions()
            .get::<CancellationToken>()
            .cloned()
            .unwrap_or_default();
        ready(Ok(CallCancel(token)))
    }
}
