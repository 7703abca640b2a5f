use std::collections::HashMap;

use thiserror::Error;

/// Authorization requirements declared for one remote method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthPolicy {
    /// Any one of these grants access (OR).
    pub required_scopes: Vec<String>,
    /// Caller may act on a resource whose owner equals their subject.
    pub self_access_allowed: bool,
    /// A service credential alone is sufficient.
    pub service_only_allowed: bool,
}

impl AuthPolicy {
    pub fn scoped(scopes: &[&str]) -> Self {
        Self {
            required_scopes: scopes.iter().map(|s| (*s).to_string()).collect(),
            self_access_allowed: false,
            service_only_allowed: false,
        }
    }

    pub fn with_self_access(mut self) -> Self {
        self.self_access_allowed = true;
        self
    }

    pub fn with_service_only(mut self) -> Self {
        self.service_only_allowed = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    #[error("malformed method name: {0}")]
    MalformedMethod(String),
    #[error("no policy declared for {0}")]
    UnknownMethod(String),
    #[error("policy declared twice for {0}")]
    Duplicate(String),
}

/// Parts of a fully-qualified method name `/package.Service/Method`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodName<'a> {
    pub package: &'a str,
    pub service: &'a str,
    pub method: &'a str,
}

pub fn parse_full_method(full: &str) -> Option<MethodName<'_>> {
    let rest = full.strip_prefix('/')?;
    let (qualified, method) = rest.split_once('/')?;
    let (package, service) = qualified.rsplit_once('.')?;
    let valid = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    let package_ok = !package.is_empty() && package.split('.').all(valid);

    (package_ok && valid(service) && valid(method)).then_some(MethodName {
        package,
        service,
        method,
    })
}

/// Static table from method name to policy, built once at startup.
///
/// Lookups for anything not declared fail; there is no default policy.
#[derive(Debug, Clone, Default)]
pub struct PolicyTable {
    entries: HashMap<String, AuthPolicy>,
}

impl PolicyTable {
    pub fn from_declarations<I, M>(declarations: I) -> Result<Self, PolicyError>
    where
        I: IntoIterator<Item = (M, AuthPolicy)>,
        M: Into<String>,
    {
        let mut entries = HashMap::new();
        for (method, policy) in declarations {
            let method = method.into();
            if parse_full_method(&method).is_none() {
                return Err(PolicyError::MalformedMethod(method));
            }
            if entries.contains_key(&method) {
                return Err(PolicyError::Duplicate(method));
            }
            entries.insert(method, policy);
        }
        Ok(Self { entries })
    }

    pub fn resolve(&self, full_method: &str) -> Result<&AuthPolicy, PolicyError> {
        if parse_full_method(full_method).is_none() {
            return Err(PolicyError::MalformedMethod(full_method.to_string()));
        }
        self.entries
            .get(full_method)
            .ok_or_else(|| PolicyError::UnknownMethod(full_method.to_string()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn methods(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}
