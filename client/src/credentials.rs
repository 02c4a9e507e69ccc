//! Bearer credential providers.
//!
//! The remote store asks its provider for a token on every mutating request
//! and forwards it untouched. Where the token comes from (a login form, a
//! keychain, an environment variable) is up to the provider.

use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

/// Supplies an opaque bearer token on demand.
pub trait CredentialProvider: Send + Sync {
    /// The token to attach, or `None` to send the request unauthenticated.
    fn bearer_token(&self) -> Option<String>;
}

impl<F> CredentialProvider for F
where
    F: Fn() -> Option<String> + Send + Sync,
{
    fn bearer_token(&self) -> Option<String> {
        self()
    }
}

/// A token fixed at construction.
#[derive(Clone, Default)]
pub struct StaticToken(Option<String>);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(Some(token.into()))
    }

    /// A provider that never supplies a token.
    pub fn none() -> Self {
        Self(None)
    }
}

impl From<Option<String>> for StaticToken {
    fn from(token: Option<String>) -> Self {
        Self(token)
    }
}

impl CredentialProvider for StaticToken {
    fn bearer_token(&self) -> Option<String> {
        self.0.clone()
    }
}

impl fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("StaticToken")
            .field(&self.0.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// A token that can be replaced at runtime, e.g. after a login.
///
/// Clones share the same slot.
#[derive(Clone, Default)]
pub struct SharedToken {
    inner: Arc<RwLock<Option<String>>>,
}

impl SharedToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new token.
    pub fn set(&self, token: impl Into<String>) {
        *self.inner.write() = Some(token.into());
    }

    /// Forget the token.
    pub fn clear(&self) {
        *self.inner.write() = None;
    }
}

impl CredentialProvider for SharedToken {
    fn bearer_token(&self) -> Option<String> {
        self.inner.read().clone()
    }
}

impl fmt::Debug for SharedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedToken")
            .field("has_token", &self.inner.read().is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_token() {
        assert_eq!(StaticToken::new("abc").bearer_token().as_deref(), Some("abc"));
        assert_eq!(StaticToken::none().bearer_token(), None);
    }

    #[test]
    fn shared_token_updates_all_clones() {
        let token = SharedToken::new();
        let clone = token.clone();
        assert_eq!(clone.bearer_token(), None);

        token.set("fresh");
        assert_eq!(clone.bearer_token().as_deref(), Some("fresh"));

        clone.clear();
        assert_eq!(token.bearer_token(), None);
    }

    #[test]
    fn closures_are_providers() {
        let provider = || Some("from-closure".to_string());
        assert_eq!(provider.bearer_token().as_deref(), Some("from-closure"));
    }

    #[test]
    fn debug_never_prints_token() {
        let shown = format!("{:?}", StaticToken::new("secret-value"));
        assert!(!shown.contains("secret-value"));

        let shared = SharedToken::new();
        shared.set("secret-value");
        assert!(!format!("{:?}", shared).contains("secret-value"));
    }
}
