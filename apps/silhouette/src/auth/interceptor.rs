use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use super::context::AuthContext;
use super::decision::{decide, Decision, DenyReason};
use super::policy::{PolicyError, PolicyTable};
use super::verifier::{TokenVerifier, VerifyError};
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::logging::security;

/// Transport-neutral view of one inbound call.
#[derive(Debug, Clone, Copy, Default)]
pub struct InboundCall<'a> {
    /// Fully-qualified method, `/package.Service/Method`.
    pub method: &'a str,
    pub service_token: Option<&'a str>,
    pub user_token: Option<&'a str>,
    /// Owner of the resource named by the request, if it names one.
    pub target_owner: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error(transparent)]
    Policy(#[from] PolicyError),
    #[error("service credential missing")]
    MissingServiceCredential,
    #[error("service credential rejected: {0}")]
    ServiceCredential(VerifyError),
    #[error("service credential holds none of the required scopes")]
    ServiceScopes,
    #[error("user credential missing")]
    MissingUserCredential,
    #[error("user credential rejected: {0}")]
    UserCredential(VerifyError),
    #[error("access denied: {0}")]
    Denied(DenyReason),
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Policy(_) => AppError::internal(
                ErrorCode::PolicyNotFound,
                "no authorization policy for method",
            ),
            AuthError::MissingServiceCredential => AppError::unauthenticated(
                ErrorCode::MissingServiceCredential,
                "service credential required",
            ),
            AuthError::ServiceCredential(VerifyError::Expired { .. }) => {
                AppError::unauthenticated(ErrorCode::ExpiredCredential, "service credential expired")
            }
            AuthError::ServiceCredential(_) => AppError::unauthenticated(
                ErrorCode::InvalidServiceCredential,
                "invalid service credential",
            ),
            AuthError::ServiceScopes => AppError::unauthenticated(
                ErrorCode::ServiceScopeMismatch,
                "service not authorized for method",
            ),
            AuthError::MissingUserCredential => AppError::unauthenticated(
                ErrorCode::MissingUserCredential,
                "user credential required",
            ),
            AuthError::UserCredential(VerifyError::Expired { .. }) => {
                AppError::unauthenticated(ErrorCode::ExpiredCredential, "user credential expired")
            }
            AuthError::UserCredential(VerifyError::Premature { .. }) => AppError::unauthenticated(
                ErrorCode::PrematureCredential,
                "user credential not yet valid",
            ),
            AuthError::UserCredential(VerifyError::Audience { .. }) => AppError::permission_denied(
                ErrorCode::AudienceMismatch,
                "credential not issued for this service",
            ),
            AuthError::UserCredential(_) => AppError::unauthenticated(
                ErrorCode::InvalidUserCredential,
                "invalid user credential",
            ),
            AuthError::Denied(_) => AppError::access_denied(),
        }
    }
}

/// Runs policy resolution, both credential checks and the decision for
/// one call. Holds only read-only, shareable state.
#[derive(Debug, Clone)]
pub struct AuthInterceptor {
    policies: Arc<PolicyTable>,
    service: Arc<TokenVerifier>,
    user: Arc<TokenVerifier>,
}

impl AuthInterceptor {
    pub fn new(policies: PolicyTable, service: TokenVerifier, user: TokenVerifier) -> Self {
        Self {
            policies: Arc::new(policies),
            service: Arc::new(service),
            user: Arc::new(user),
        }
    }

    pub fn policies(&self) -> &PolicyTable {
        &self.policies
    }

    /// Admits the call or says why not. `now` is seconds since epoch.
    pub fn intercept(&self, call: &InboundCall<'_>, now: i64) -> Result<AuthContext, AuthError> {
        let policy = self.policies.resolve(call.method).map_err(|e| {
            security::policy_missing(call.method);
            AuthError::from(e)
        })?;

        // A valid service credential is mandatory, self-access included.
        let service_token = call.service_token.ok_or_else(|| {
            security::credential_rejected(call.method, "service", "missing");
            AuthError::MissingServiceCredential
        })?;
        let service_claims = self.service.verify(service_token, now).map_err(|e| {
            security::credential_rejected(call.method, "service", &e.to_string());
            AuthError::ServiceCredential(e)
        })?;
        if !service_claims.has_any_scope(policy.required_scopes.as_slice()) {
            security::credential_rejected(call.method, "service", "scope mismatch");
            return Err(AuthError::ServiceScopes);
        }

        let Some(user_token) = call.user_token else {
            if policy.service_only_allowed {
                debug!(
                    method = call.method,
                    service = %service_claims.sub,
                    "service-only call admitted"
                );
                return Ok(AuthContext::new(policy.clone(), service_claims, None));
            }
            security::credential_rejected(call.method, "user", "missing");
            return Err(AuthError::MissingUserCredential);
        };

        let user_claims = self.user.verify(user_token, now).map_err(|e| {
            security::credential_rejected(call.method, "user", &e.to_string());
            AuthError::UserCredential(e)
        })?;

        match decide(&user_claims, policy, call.target_owner) {
            Decision::Allow(basis) => {
                debug!(method = call.method, ?basis, "call admitted");
                Ok(AuthContext::new(
                    policy.clone(),
                    service_claims,
                    Some(user_claims),
                ))
            }
            Decision::Deny(reason) => {
                security::access_denied(call.method, &user_claims.sub, &reason.to_string());
                Err(AuthError::Denied(reason))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    use super::*;
    use crate::auth::policy::AuthPolicy;
    use crate::auth::verifier::CredentialKind;

    const S2S_SECRET: &[u8] = b"interceptor-s2s-secret-0123456789abcdef";
    const USER_SECRET: &[u8] = b"interceptor-user-secret-0123456789abcde";
    const NOW: i64 = 1_760_000_000;
    const DELETE_PHONE: &str = "/silhouette.v1.Phones/DeletePhone";
    const CREATE_PROFILE: &str = "/silhouette.v1.Profiles/CreateProfile";

    fn interceptor() -> AuthInterceptor {
        let policies = PolicyTable::from_declarations([
            (
                DELETE_PHONE,
                AuthPolicy::scoped(&["w:silhouette:*", "w:silhouette:phone:*"]).with_self_access(),
            ),
            (
                CREATE_PROFILE,
                AuthPolicy::scoped(&["w:silhouette:*", "w:silhouette:profile:*"])
                    .with_service_only(),
            ),
        ])
        .unwrap();
        AuthInterceptor::new(
            policies,
            TokenVerifier::from_secret(CredentialKind::Service, S2S_SECRET, "silhouette"),
            TokenVerifier::from_secret(CredentialKind::User, USER_SECRET, "silhouette"),
        )
    }

    fn token(secret: &[u8], sub: &str, scopes: &str, iat: i64, exp: i64, aud: &[&str]) -> String {
        let body = json!({"sub": sub, "aud": aud, "scp": scopes, "iat": iat, "exp": exp});
        encode(&Header::default(), &body, &EncodingKey::from_secret(secret)).unwrap()
    }

    fn service() -> String {
        token(S2S_SECRET, "shaw", "w:silhouette:*", NOW, NOW + 60, &["silhouette"])
    }

    fn user(sub: &str, scopes: &str) -> String {
        token(USER_SECRET, sub, scopes, NOW, NOW + 60, &["silhouette"])
    }

    fn call<'a>(svc: Option<&'a str>, usr: Option<&'a str>, owner: Option<&'a str>) -> InboundCall<'a> {
        InboundCall {
            method: DELETE_PHONE,
            service_token: svc,
            user_token: usr,
            target_owner: owner,
        }
    }

    #[test]
    fn admits_scoped_user_and_exposes_exact_claims() {
        let svc = service();
        let usr = user("admin@example.com", "w:silhouette:phone:*");
        let ctx = interceptor()
            .intercept(&call(Some(&svc), Some(&usr), Some("bob@example.com")), NOW)
            .unwrap();

        assert_eq!(ctx.service_claims().sub, "shaw");
        let claims = ctx.user_claims().unwrap();
        assert_eq!(claims.sub, "admin@example.com");
        assert_eq!(claims.iat, NOW);
        assert_eq!(claims.exp, NOW + 60);
        assert!(ctx.self_access_allowed());
        assert_eq!(ctx.required_scopes().len(), 2);
    }

    #[test]
    fn self_access_only_for_own_records() {
        let svc = service();
        let usr = user("alice@example.com", "r:silhouette:*");

        assert!(interceptor()
            .intercept(&call(Some(&svc), Some(&usr), Some("alice@example.com")), NOW)
            .is_ok());
        assert_eq!(
            interceptor().intercept(&call(Some(&svc), Some(&usr), Some("bob@example.com")), NOW),
            Err(AuthError::Denied(DenyReason::SubjectMismatch))
        );
    }

    #[test]
    fn unknown_method_fails_closed() {
        let svc = service();
        let usr = user("admin@example.com", "w:silhouette:*");
        let err = interceptor()
            .intercept(
                &InboundCall {
                    method: "/silhouette.v1.Phones/ListPhones",
                    service_token: Some(&svc),
                    user_token: Some(&usr),
                    target_owner: None,
                },
                NOW,
            )
            .unwrap_err();
        assert!(matches!(err, AuthError::Policy(PolicyError::UnknownMethod(_))));
        assert_eq!(AppError::from(err).status().as_u16(), 500);
    }

    #[test]
    fn service_credential_is_mandatory_even_for_self_access() {
        let usr = user("alice@example.com", "");
        let err = interceptor()
            .intercept(&call(None, Some(&usr), Some("alice@example.com")), NOW)
            .unwrap_err();
        assert_eq!(err, AuthError::MissingServiceCredential);

        let forged = token(USER_SECRET, "shaw", "w:silhouette:*", NOW, NOW + 60, &["silhouette"]);
        let err = interceptor()
            .intercept(&call(Some(&forged), Some(&usr), Some("alice@example.com")), NOW)
            .unwrap_err();
        assert_eq!(err, AuthError::ServiceCredential(VerifyError::BadSignature));
        assert_eq!(AppError::from(err).status().as_u16(), 401);
    }

    #[test]
    fn service_without_method_scope_is_unauthenticated() {
        let svc = token(S2S_SECRET, "shaw", "r:silhouette:*", NOW, NOW + 60, &["silhouette"]);
        let usr = user("alice@example.com", "");
        let err = interceptor()
            .intercept(&call(Some(&svc), Some(&usr), Some("alice@example.com")), NOW)
            .unwrap_err();
        assert_eq!(err, AuthError::ServiceScopes);
        assert_eq!(AppError::from(err).status().as_u16(), 401);
    }

    #[test]
    fn missing_user_credential() {
        let svc = service();
        assert_eq!(
            interceptor().intercept(&call(Some(&svc), None, Some("alice@example.com")), NOW),
            Err(AuthError::MissingUserCredential)
        );

        let ctx = interceptor()
            .intercept(
                &InboundCall {
                    method: CREATE_PROFILE,
                    service_token: Some(&svc),
                    user_token: None,
                    target_owner: Some("new@example.com"),
                },
                NOW,
            )
            .unwrap();
        assert!(ctx.user_claims().is_none());
        assert_eq!(ctx.actor(), "shaw");
    }

    #[test]
    fn expired_user_credential_rejected_regardless_of_scope() {
        let svc = service();
        let usr = token(
            USER_SECRET,
            "admin@example.com",
            "w:silhouette:*",
            NOW - 120,
            NOW - 1,
            &["silhouette"],
        );
        let err = interceptor()
            .intercept(&call(Some(&svc), Some(&usr), None), NOW)
            .unwrap_err();
        assert_eq!(err, AuthError::UserCredential(VerifyError::Expired { exp: NOW - 1 }));
        assert_eq!(AppError::from(err).status().as_u16(), 401);
    }

    #[test]
    fn premature_user_credential_rejected() {
        let svc = service();
        let usr = token(
            USER_SECRET,
            "admin@example.com",
            "w:silhouette:*",
            NOW + 3,
            NOW + 60,
            &["silhouette"],
        );
        let err = interceptor()
            .intercept(&call(Some(&svc), Some(&usr), None), NOW)
            .unwrap_err();
        assert!(matches!(err, AuthError::UserCredential(VerifyError::Premature { .. })));
        assert_eq!(AppError::from(err).status().as_u16(), 401);
    }

    #[test]
    fn foreign_audience_is_permission_denied() {
        let svc = service();
        let usr = token(
            USER_SECRET,
            "admin@example.com",
            "w:silhouette:*",
            NOW,
            NOW + 60,
            &["pixie"],
        );
        let err = interceptor()
            .intercept(&call(Some(&svc), Some(&usr), None), NOW)
            .unwrap_err();
        assert_eq!(AppError::from(err).status().as_u16(), 403);
    }
}
