//! External collaborator interfaces
//!
//! The core never talks to a cloud API, a container runtime or a key
//! server; it hands a compiled [`Plan`] to a provisioning engine and asks
//! a key source for SSH public keys. Both are narrow seams implemented
//! outside this workspace.

use crate::error::Result;
use crate::plan::Plan;
use async_trait::async_trait;

/// Provisioning engine abstraction
///
/// Consumes a compiled plan and makes it real: boots machines, starts
/// containers, programs firewalls. Retries, timeouts and concurrency are
/// the engine's business, not the blueprint layer's.
#[async_trait]
pub trait ProvisionEngine: Send + Sync {
    /// Engine name (e.g. "sakura-cloud", "mock")
    fn name(&self) -> &str;

    /// Provision everything the plan describes
    async fn provision(&self, plan: &Plan) -> Result<()>;

    /// Tear down everything previously provisioned for a namespace
    async fn teardown(&self, namespace: &str) -> Result<()>;
}

/// SSH public key lookup for an account name
///
/// Mirrors the "fetch this user's keys from a forge" convenience: the
/// returned strings are opaque authorized_keys lines.
pub trait SshKeySource {
    fn public_keys(&self, account: &str) -> Result<Vec<String>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct StaticKeys(HashMap<String, Vec<String>>);

    impl SshKeySource for StaticKeys {
        fn public_keys(&self, account: &str) -> Result<Vec<String>> {
            Ok(self.0.get(account).cloned().unwrap_or_default())
        }
    }

    #[test]
    fn test_key_source_lookup() {
        let mut keys = HashMap::new();
        keys.insert(
            "ejj".to_string(),
            vec!["ssh-ed25519 AAAA... ejj".to_string()],
        );
        let source = StaticKeys(keys);

        assert_eq!(source.public_keys("ejj").unwrap().len(), 1);
        assert!(source.public_keys("nobody").unwrap().is_empty());
    }
}
