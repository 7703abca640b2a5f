use super::claims::Claims;
use super::policy::AuthPolicy;

/// Outcome of a successful gate pass, created once per call.
///
/// Fields are private; nothing downstream can widen what the gate granted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    policy: AuthPolicy,
    service_claims: Claims,
    user_claims: Option<Claims>,
}

impl AuthContext {
    pub fn new(policy: AuthPolicy, service_claims: Claims, user_claims: Option<Claims>) -> Self {
        Self {
            policy,
            service_claims,
            user_claims,
        }
    }

    pub fn policy(&self) -> &AuthPolicy {
        &self.policy
    }

    pub fn required_scopes(&self) -> &[String] {
        &self.policy.required_scopes
    }

    pub fn self_access_allowed(&self) -> bool {
        self.policy.self_access_allowed
    }

    pub fn service_claims(&self) -> &Claims {
        &self.service_claims
    }

    /// `None` for service-only calls.
    pub fn user_claims(&self) -> Option<&Claims> {
        self.user_claims.as_ref()
    }

    /// Subject acting on this call, for audit logs.
    pub fn actor(&self) -> &str {
        self.user_claims
            .as_ref()
            .map_or(self.service_claims.sub.as_str(), |c| c.sub.as_str())
    }

    pub fn requesting_service(&self) -> &str {
        &self.service_claims.sub
    }
}
