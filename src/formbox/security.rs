//! Security collaborators: submission tokens and actor capabilities.
//!
//! The binder verifies a token tied to the metabox id before accepting a
//! submission, then checks that the current actor may edit the target
//! entity. Hosts supply their own implementations; the bundled
//! [`WindowedTokenProvider`] covers standalone use with the classic
//! time-windowed scheme: tokens are valid for the window they were issued
//! in and the one before it.

use chrono::{Duration, Utc};
use sha2::{Digest, Sha256};

use crate::storage::EntityId;

/// Issues and verifies submission tokens for a scope string.
pub trait TokenProvider {
    fn issue(&self, scope: &str) -> String;
    fn verify(&self, token: &str, scope: &str) -> bool;
}

/// Answers whether the current actor holds a capability on an entity.
pub trait Capabilities {
    fn actor_can(&self, capability: &str, entity: EntityId) -> bool;
}

/// Stateless token provider hashing a secret, the scope and the current
/// time window. Two consecutive windows verify, so a token stays usable
/// for between half a lifetime and a full lifetime.
pub struct WindowedTokenProvider {
    secret: String,
    lifetime: Duration,
}

impl WindowedTokenProvider {
    /// Tokens live for a day by default.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            lifetime: Duration::hours(24),
        }
    }

    pub fn with_lifetime(mut self, lifetime: Duration) -> Self {
        self.lifetime = lifetime;
        self
    }

    fn window(&self) -> i64 {
        let half_life = (self.lifetime.num_seconds() / 2).max(1);
        Utc::now().timestamp() / half_life
    }

    fn token_for(&self, scope: &str, window: i64) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.secret.as_bytes());
        hasher.update(scope.as_bytes());
        hasher.update(window.to_be_bytes());
        let digest = hasher.finalize();
        let mut token = String::with_capacity(20);
        for byte in digest.iter().take(10) {
            token.push_str(&format!("{:02x}", byte));
        }
        token
    }
}

impl TokenProvider for WindowedTokenProvider {
    fn issue(&self, scope: &str) -> String {
        self.token_for(scope, self.window())
    }

    fn verify(&self, token: &str, scope: &str) -> bool {
        let window = self.window();
        token == self.token_for(scope, window) || token == self.token_for(scope, window - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_tokens_verify_for_the_same_scope() {
        let provider = WindowedTokenProvider::new("secret");
        let token = provider.issue("box_metabox");
        assert!(provider.verify(&token, "box_metabox"));
    }

    #[test]
    fn tokens_are_scope_bound() {
        let provider = WindowedTokenProvider::new("secret");
        let token = provider.issue("box_metabox");
        assert!(!provider.verify(&token, "other_metabox"));
    }

    #[test]
    fn tokens_are_secret_bound() {
        let issuing = WindowedTokenProvider::new("secret");
        let other = WindowedTokenProvider::new("different");
        let token = issuing.issue("box_metabox");
        assert!(!other.verify(&token, "box_metabox"));
    }

    #[test]
    fn garbage_tokens_do_not_verify() {
        let provider = WindowedTokenProvider::new("secret");
        assert!(!provider.verify("", "box_metabox"));
        assert!(!provider.verify("deadbeef", "box_metabox"));
    }
}
