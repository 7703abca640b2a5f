//! ULID-based unique test data, so tests sharing a database never collide.

use ulid::Ulid;

/// `{prefix}-{ulid}`
pub fn unique_str(prefix: &str) -> String {
    format!("{}-{}", prefix, Ulid::new())
}

/// A unique, valid username of the form `{prefix}-{ulid}@example.test`.
///
/// ```
/// use silhouette_test_support::unique_helpers::unique_username;
///
/// let a = unique_username("alice");
/// let b = unique_username("alice");
/// assert_ne!(a, b);
/// assert!(a.ends_with("@example.test"));
/// ```
pub fn unique_username(prefix: &str) -> String {
    format!("{}-{}@example.test", prefix, Ulid::new()).to_lowercase()
}
