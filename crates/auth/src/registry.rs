//! Authorization registry: one immutable root authority plus an
//! insertion-ordered set of writers.
//!
//! The registry is a plain value. Callers that share it across threads wrap it
//! in a lock and take the write side for `add_writer` / `remove_writer`, so
//! mutations are serialized globally.

use serde::Serialize;
use thiserror::Error;

use pharmasafe_core::{DomainError, Identity};

use crate::Role;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Only the root authority may manage writers.
    #[error("unauthorized: only the root authority can manage writers")]
    Unauthorized,

    #[error("{0} is already a writer")]
    AlreadyAuthorized(Identity),

    #[error("invalid identity: {0}")]
    InvalidIdentity(String),

    #[error("the root authority cannot be removed")]
    CannotRemoveRootAuthority,

    #[error("{0} is not a writer")]
    NotAuthorized(Identity),
}

impl From<DomainError> for RegistryError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::InvalidIdentity(msg) => RegistryError::InvalidIdentity(msg),
            other => RegistryError::InvalidIdentity(other.to_string()),
        }
    }
}

/// Writer registry for one deployment.
///
/// Invariant: `writers[0] == root`, and `writers` holds no duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorizationRegistry {
    root: Identity,
    writers: Vec<Identity>,
}

impl AuthorizationRegistry {
    /// Create a registry owned by `root`, which becomes the first writer.
    pub fn new(root: Identity) -> Self {
        Self {
            writers: vec![root.clone()],
            root,
        }
    }

    pub fn root_authority(&self) -> &Identity {
        &self.root
    }

    pub fn is_writer(&self, identity: &Identity) -> bool {
        self.writers.contains(identity)
    }

    pub fn is_root_authority(&self, identity: &Identity) -> bool {
        &self.root == identity
    }

    pub fn role_of(&self, identity: &Identity) -> Role {
        if self.is_root_authority(identity) {
            Role::RootAuthority
        } else if self.is_writer(identity) {
            Role::Writer
        } else {
            Role::Reader
        }
    }

    /// Writers in insertion order; the root authority is always first.
    pub fn list_writers(&self) -> &[Identity] {
        &self.writers
    }

    /// Grant writer privilege to `identity`.
    ///
    /// The requester is checked before the identity is even parsed, so a
    /// non-root caller always sees `Unauthorized`.
    pub fn add_writer(
        &mut self,
        identity: &str,
        requested_by: &Identity,
    ) -> Result<Identity, RegistryError> {
        if !self.is_root_authority(requested_by) {
            return Err(RegistryError::Unauthorized);
        }

        let identity = Identity::parse(identity)?;
        if self.is_writer(&identity) {
            return Err(RegistryError::AlreadyAuthorized(identity));
        }

        self.writers.push(identity.clone());
        tracing::info!(writer = %identity, "writer added");
        Ok(identity)
    }

    /// Revoke writer privilege from `identity`.
    pub fn remove_writer(
        &mut self,
        identity: &str,
        requested_by: &Identity,
    ) -> Result<Identity, RegistryError> {
        if !self.is_root_authority(requested_by) {
            return Err(RegistryError::Unauthorized);
        }

        let identity = Identity::parse(identity)?;
        if self.is_root_authority(&identity) {
            return Err(RegistryError::CannotRemoveRootAuthority);
        }

        let Some(pos) = self.writers.iter().position(|w| w == &identity) else {
            return Err(RegistryError::NotAuthorized(identity));
        };

        self.writers.remove(pos);
        tracing::info!(writer = %identity, "writer removed");
        Ok(identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn id(raw: &str) -> Identity {
        Identity::parse(raw).unwrap()
    }

    fn accounts() -> Vec<Identity> {
        (1..=5).map(|i| id(&format!("0x{:040x}", i))).collect()
    }

    #[test]
    fn only_the_creator_is_a_writer_initially() {
        let accounts = accounts();
        let registry = AuthorizationRegistry::new(accounts[0].clone());

        for (i, account) in accounts.iter().enumerate() {
            assert_eq!(registry.is_writer(account), i == 0, "account {i}");
        }
        assert_eq!(registry.list_writers(), &[accounts[0].clone()]);
        assert!(registry.is_root_authority(&accounts[0]));
    }

    #[test]
    fn root_can_add_writer() {
        let accounts = accounts();
        let mut registry = AuthorizationRegistry::new(accounts[0].clone());

        registry
            .add_writer(accounts[1].as_str(), &accounts[0])
            .unwrap();

        for (i, account) in accounts.iter().take(3).enumerate() {
            assert_eq!(registry.is_writer(account), i <= 1, "account {i}");
        }
        assert_eq!(registry.list_writers().len(), 2);
        assert!(!registry.is_root_authority(&accounts[1]));
    }

    #[test]
    fn a_different_creator_owns_its_own_registry() {
        let accounts = accounts();
        let registry = AuthorizationRegistry::new(accounts[2].clone());

        assert_eq!(registry.list_writers()[0], accounts[2]);
        assert!(!registry.is_writer(&accounts[0]));
    }

    #[test]
    fn non_root_cannot_add_writers() {
        let accounts = accounts();
        let mut registry = AuthorizationRegistry::new(accounts[0].clone());
        registry
            .add_writer(accounts[1].as_str(), &accounts[0])
            .unwrap();

        // A writer is not the root authority.
        let err = registry
            .add_writer(accounts[2].as_str(), &accounts[1])
            .unwrap_err();
        assert_eq!(err, RegistryError::Unauthorized);

        let err = registry
            .add_writer(accounts[2].as_str(), &accounts[2])
            .unwrap_err();
        assert_eq!(err, RegistryError::Unauthorized);
    }

    #[test]
    fn adding_existing_writer_fails() {
        let accounts = accounts();
        let mut registry = AuthorizationRegistry::new(accounts[0].clone());
        registry
            .add_writer(accounts[1].as_str(), &accounts[0])
            .unwrap();

        let err = registry
            .add_writer(&accounts[1].as_str().to_uppercase(), &accounts[0])
            .unwrap_err();
        assert_eq!(err, RegistryError::AlreadyAuthorized(accounts[1].clone()));
    }

    #[test]
    fn invalid_identities_are_rejected() {
        let accounts = accounts();
        let mut registry = AuthorizationRegistry::new(accounts[0].clone());
        let zero = "0x0000000000000000000000000000000000000000";

        assert!(matches!(
            registry.add_writer(zero, &accounts[0]),
            Err(RegistryError::InvalidIdentity(_))
        ));
        assert!(matches!(
            registry.remove_writer(zero, &accounts[0]),
            Err(RegistryError::InvalidIdentity(_))
        ));
        assert!(matches!(
            registry.add_writer("", &accounts[0]),
            Err(RegistryError::InvalidIdentity(_))
        ));
    }

    #[test]
    fn root_can_remove_writer() {
        let accounts = accounts();
        let mut registry = AuthorizationRegistry::new(accounts[0].clone());
        registry
            .add_writer(accounts[1].as_str(), &accounts[0])
            .unwrap();

        registry
            .remove_writer(accounts[1].as_str(), &accounts[0])
            .unwrap();

        assert_eq!(registry.list_writers(), &[accounts[0].clone()]);
        assert!(!registry.is_writer(&accounts[1]));
    }

    #[test]
    fn root_cannot_be_removed() {
        let accounts = accounts();
        let mut registry = AuthorizationRegistry::new(accounts[0].clone());

        let err = registry
            .remove_writer(accounts[0].as_str(), &accounts[0])
            .unwrap_err();
        assert_eq!(err, RegistryError::CannotRemoveRootAuthority);
        assert!(registry.is_writer(&accounts[0]));
    }

    #[test]
    fn removing_non_writer_fails() {
        let accounts = accounts();
        let mut registry = AuthorizationRegistry::new(accounts[0].clone());

        let err = registry
            .remove_writer(accounts[3].as_str(), &accounts[0])
            .unwrap_err();
        assert_eq!(err, RegistryError::NotAuthorized(accounts[3].clone()));
    }

    #[test]
    fn non_root_cannot_remove_writers() {
        let accounts = accounts();
        let mut registry = AuthorizationRegistry::new(accounts[0].clone());
        registry
            .add_writer(accounts[1].as_str(), &accounts[0])
            .unwrap();
        registry
            .add_writer(accounts[2].as_str(), &accounts[0])
            .unwrap();

        let err = registry
            .remove_writer(accounts[2].as_str(), &accounts[1])
            .unwrap_err();
        assert_eq!(err, RegistryError::Unauthorized);
        assert_eq!(registry.list_writers().len(), 3);
    }

    #[test]
    fn list_preserves_insertion_order() {
        let accounts = accounts();
        let mut registry = AuthorizationRegistry::new(accounts[0].clone());
        for account in [&accounts[3], &accounts[1], &accounts[4]] {
            registry.add_writer(account.as_str(), &accounts[0]).unwrap();
        }
        registry
            .remove_writer(accounts[1].as_str(), &accounts[0])
            .unwrap();

        assert_eq!(
            registry.list_writers(),
            &[accounts[0].clone(), accounts[3].clone(), accounts[4].clone()]
        );
    }

    #[derive(Debug, Clone)]
    enum Op {
        Add { target: usize, by: usize },
        Remove { target: usize, by: usize },
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0usize..5, 0usize..5).prop_map(|(target, by)| Op::Add { target, by }),
            (0usize..5, 0usize..5).prop_map(|(target, by)| Op::Remove { target, by }),
        ]
    }

    proptest! {
        /// Whatever sequence of add/remove requests arrives, the root stays
        /// first, writers stay unique, and only root-issued requests change state.
        #[test]
        fn registry_invariants_hold(ops in proptest::collection::vec(op_strategy(), 0..40)) {
            let accounts = accounts();
            let mut registry = AuthorizationRegistry::new(accounts[0].clone());

            for op in ops {
                let before = registry.clone();
                let (result, by) = match op {
                    Op::Add { target, by } => {
                        (registry.add_writer(accounts[target].as_str(), &accounts[by]), by)
                    }
                    Op::Remove { target, by } => {
                        (registry.remove_writer(accounts[target].as_str(), &accounts[by]), by)
                    }
                };

                if by != 0 {
                    prop_assert!(matches!(result, Err(RegistryError::Unauthorized)));
                }
                if result.is_err() {
                    prop_assert_eq!(&registry, &before);
                }

                prop_assert_eq!(&registry.list_writers()[0], &accounts[0]);
                let mut unique = registry.list_writers().to_vec();
                unique.sort();
                unique.dedup();
                prop_assert_eq!(unique.len(), registry.list_writers().len());
            }
        }
    }
}
