//! The single authorization decision shared by the gate and the handlers.

use thiserror::Error;

use super::claims::Claims;
use super::context::AuthContext;
use super::policy::AuthPolicy;

/// Longest target owner accepted for comparison.
pub const MAX_TARGET_LEN: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllowBasis {
    Scope,
    SelfAccess,
    ServiceOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DenyReason {
    #[error("no required scope and self-access not allowed")]
    NoScope,
    #[error("target owner is missing or unsafe to compare")]
    UnsafeTarget,
    #[error("target owner does not match subject")]
    SubjectMismatch,
    #[error("method requires a user credential")]
    UserRequired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow(AllowBasis),
    Deny(DenyReason),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow(_))
    }
}

/// Non-empty, at most [`MAX_TARGET_LEN`] chars, no control characters
/// other than tab, CR and LF.
pub fn is_safe_for_comparison(value: &str) -> bool {
    !value.is_empty()
        && value.chars().count() <= MAX_TARGET_LEN
        && !value
            .chars()
            .any(|c| c.is_control() && !matches!(c, '\t' | '\r' | '\n'))
}

/// Scope match wins; otherwise self-access needs the policy flag and a safe
/// target owner that equals the subject byte for byte.
pub fn decide(claims: &Claims, policy: &AuthPolicy, target_owner: Option<&str>) -> Decision {
    if claims.has_any_scope(policy.required_scopes.as_slice()) {
        return Decision::Allow(AllowBasis::Scope);
    }
    if !policy.self_access_allowed {
        return Decision::Deny(DenyReason::NoScope);
    }
    match target_owner {
        Some(owner) if is_safe_for_comparison(owner) => {
            if owner == claims.sub {
                Decision::Allow(AllowBasis::SelfAccess)
            } else {
                Decision::Deny(DenyReason::SubjectMismatch)
            }
        }
        _ => Decision::Deny(DenyReason::UnsafeTarget),
    }
}

/// Handler-side re-check against the owner field of the handler's own request.
pub fn authorize_request(auth: &AuthContext, target_owner: &str) -> Result<AllowBasis, DenyReason> {
    match auth.user_claims() {
        Some(claims) => match decide(claims, auth.policy(), Some(target_owner)) {
            Decision::Allow(basis) => Ok(basis),
            Decision::Deny(reason) => Err(reason),
        },
        None if auth.policy().service_only_allowed => Ok(AllowBasis::ServiceOnly),
        None => Err(DenyReason::UserRequired),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use proptest::prelude::*;

    use super::*;

    fn claims(sub: &str, scopes: &[&str]) -> Claims {
        Claims {
            sub: sub.to_string(),
            aud: vec!["silhouette".into()],
            scopes: scopes.iter().map(|s| (*s).to_string()).collect::<BTreeSet<_>>(),
            iat: 0,
            exp: 1,
        }
    }

    fn phone_write() -> AuthPolicy {
        AuthPolicy::scoped(&["w:silhouette:*", "w:silhouette:phone:*"]).with_self_access()
    }

    #[test]
    fn scope_wins_regardless_of_target() {
        let c = claims("admin@example.com", &["w:silhouette:phone:*"]);
        assert_eq!(
            decide(&c, &phone_write(), Some("someone-else@example.com")),
            Decision::Allow(AllowBasis::Scope)
        );
        assert_eq!(
            decide(&c, &phone_write(), None),
            Decision::Allow(AllowBasis::Scope)
        );
    }

    #[test]
    fn self_access_requires_exact_subject() {
        let c = claims("alice@example.com", &[]);
        assert_eq!(
            decide(&c, &phone_write(), Some("alice@example.com")),
            Decision::Allow(AllowBasis::SelfAccess)
        );
        assert_eq!(
            decide(&c, &phone_write(), Some("Alice@example.com")),
            Decision::Deny(DenyReason::SubjectMismatch)
        );
        assert_eq!(
            decide(&c, &phone_write(), Some("bob@example.com")),
            Decision::Deny(DenyReason::SubjectMismatch)
        );
    }

    #[test]
    fn self_access_off_denies_even_own_resource() {
        let c = claims("alice@example.com", &[]);
        let policy = AuthPolicy::scoped(&["w:silhouette:*"]);
        assert_eq!(
            decide(&c, &policy, Some("alice@example.com")),
            Decision::Deny(DenyReason::NoScope)
        );
    }

    #[test]
    fn unsafe_targets_are_denied() {
        let long = "a".repeat(MAX_TARGET_LEN + 1);
        let c = claims(&long, &[]);
        assert_eq!(
            decide(&c, &phone_write(), Some(&long)),
            Decision::Deny(DenyReason::UnsafeTarget)
        );

        let c = claims("", &[]);
        assert_eq!(
            decide(&c, &phone_write(), Some("")),
            Decision::Deny(DenyReason::UnsafeTarget)
        );
        assert_eq!(
            decide(&c, &phone_write(), None),
            Decision::Deny(DenyReason::UnsafeTarget)
        );

        let c = claims("alice\u{0}@example.com", &[]);
        assert_eq!(
            decide(&c, &phone_write(), Some("alice\u{0}@example.com")),
            Decision::Deny(DenyReason::UnsafeTarget)
        );
    }

    #[test]
    fn safety_check_boundaries() {
        assert!(is_safe_for_comparison(&"é".repeat(MAX_TARGET_LEN)));
        assert!(!is_safe_for_comparison(&"é".repeat(MAX_TARGET_LEN + 1)));
        assert!(is_safe_for_comparison("tab\there\r\n"));
        assert!(!is_safe_for_comparison("bell\u{7}"));
        assert!(!is_safe_for_comparison("del\u{7f}"));
    }

    #[test]
    fn handler_recheck_uses_context() {
        let ctx = AuthContext::new(
            phone_write(),
            claims("shaw", &["w:silhouette:*"]),
            Some(claims("alice@example.com", &[])),
        );
        assert_eq!(
            authorize_request(&ctx, "alice@example.com"),
            Ok(AllowBasis::SelfAccess)
        );
        assert_eq!(
            authorize_request(&ctx, "bob@example.com"),
            Err(DenyReason::SubjectMismatch)
        );

        let service_only = AuthContext::new(
            AuthPolicy::scoped(&["w:silhouette:*"]).with_service_only(),
            claims("shaw", &["w:silhouette:*"]),
            None,
        );
        assert_eq!(
            authorize_request(&service_only, "anyone@example.com"),
            Ok(AllowBasis::ServiceOnly)
        );

        let needs_user = AuthContext::new(phone_write(), claims("shaw", &[]), None);
        assert_eq!(
            authorize_request(&needs_user, "alice@example.com"),
            Err(DenyReason::UserRequired)
        );
    }

    proptest! {
        #[test]
        fn self_access_grants_only_on_equality(sub in "[a-z]{1,12}@example\\.com", other in "[a-z]{1,12}@example\\.com") {
            let c = claims(&sub, &[]);
            let decision = decide(&c, &phone_write(), Some(&other));
            prop_assert_eq!(decision.is_allowed(), sub == other);
        }
    }
}
