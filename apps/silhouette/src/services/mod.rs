//! Method implementations. Each one re-checks authorization against its
//! own request's owner before touching a record store.

pub mod addresses;
pub mod phones;
pub mod profiles;

use crate::auth::{authorize_request, AuthContext};
use crate::error::AppError;
use crate::logging::security;

/// Handler-side authorization for `owner`, independent of the gate.
pub(crate) fn ensure_access(auth: &AuthContext, method: &str, owner: &str) -> Result<(), AppError> {
    authorize_request(auth, owner).map(|_| ()).map_err(|reason| {
        security::access_denied(method, auth.actor(), &reason.to_string());
        AppError::access_denied()
    })
}
