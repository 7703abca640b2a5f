use tracing::warn;

use crate::logging::pii::Redacted;
use crate::trace_ctx;

/// A credential was missing or failed verification.
pub fn credential_rejected(method: &str, credential: &'static str, reason: &str) {
    let trace_id = trace_ctx::trace_id();

    warn!(
        event = "SECURITY_CREDENTIAL_REJECTED",
        %trace_id,
        method,
        credential,
        reason,
        "Credential rejected"
    );
}

/// A verified caller was denied by the authorization decision.
pub fn access_denied(method: &str, subject: &str, reason: &str) {
    let trace_id = trace_ctx::trace_id();

    warn!(
        event = "SECURITY_ACCESS_DENIED",
        %trace_id,
        method,
        subject = %Redacted(subject),
        reason,
        "Access denied"
    );
}

/// No policy is declared for the called method; the call fails closed.
pub fn policy_missing(method: &str) {
    let trace_id = trace_ctx::trace_id();

    warn!(
        event = "SECURITY_POLICY_MISSING",
        %trace_id,
        method,
        "No authorization policy for method"
    );
}
