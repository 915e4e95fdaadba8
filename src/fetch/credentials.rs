//! # Access-token injection.
//!
//! Requests carry `X-ACCESS-TOKEN` when the client's [`Credentials`] provider
//! yields a token. [`SharedToken`] is the settable provider: clones share one
//! cell, and an update is seen by requests prepared afterwards only.

use std::sync::Arc;

use parking_lot::RwLock;

/// Source of the access token attached to outgoing requests.
pub trait Credentials: Send + Sync + 'static {
    /// Current token, `None` when no header should be sent.
    fn access_token(&self) -> Option<Arc<str>>;
}

/// Cloneable, settable token cell.
///
/// ## Example
/// ```rust
/// use taskslot::{Credentials, SharedToken};
///
/// let token = SharedToken::new();
/// token.set("");
/// assert!(token.access_token().is_none());
///
/// token.set("abc");
/// assert_eq!(token.access_token().as_deref(), Some("abc"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct SharedToken {
    cell: Arc<RwLock<Option<Arc<str>>>>,
}

impl SharedToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `token`. An empty token is ignored and the previous one kept.
    pub fn set(&self, token: impl AsRef<str>) {
        let token = token.as_ref();
        if token.is_empty() {
            return;
        }
        *self.cell.write() = Some(Arc::from(token));
    }

    /// Forgets the stored token.
    pub fn clear(&self) {
        *self.cell.write() = None;
    }
}

impl Credentials for SharedToken {
    fn access_token(&self) -> Option<Arc<str>> {
        self.cell.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_token_keeps_previous() {
        let token = SharedToken::new();
        token.set("first");
        token.set("");
        assert_eq!(token.access_token().as_deref(), Some("first"));
    }

    #[test]
    fn test_clones_share_the_cell() {
        let token = SharedToken::new();
        let seen_by_client = token.clone();

        token.set("abc");
        assert_eq!(seen_by_client.access_token().as_deref(), Some("abc"));

        token.clear();
        assert!(seen_by_client.access_token().is_none());
    }
}
