//! Per-call authorization gate.
//!
//! `interceptor` orchestrates `policy` lookup, two `verifier` instances and
//! the pure `decision` function, producing an immutable `context` that is
//! handed to handlers explicitly.

pub mod claims;
pub mod context;
pub mod decision;
pub mod interceptor;
pub mod policy;
pub mod verifier;

pub use claims::Claims;
pub use context::AuthContext;
pub use decision::{authorize_request, decide, is_safe_for_comparison, Decision, DenyReason};
pub use interceptor::{AuthError, AuthInterceptor, InboundCall};
pub use policy::{AuthPolicy, PolicyError, PolicyTable};
pub use verifier::{CredentialKind, TokenVerifier, VerifyError};
