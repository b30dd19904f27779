use serde::Serialize;
use thiserror::Error;

use pharmasafe_core::Identity;

use crate::{AuthorizationRegistry, Privilege, Role};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("forbidden: {identity} lacks privilege '{privilege}'")]
    Forbidden {
        identity: Identity,
        privilege: Privilege,
    },
}

/// Authorize an identity against a registry snapshot.
///
/// - No IO
/// - No panics
/// - No business logic (pure policy check)
pub fn authorize(
    registry: &AuthorizationRegistry,
    identity: &Identity,
    required: Privilege,
) -> Result<(), AuthzError> {
    if registry.role_of(identity).grants(required) {
        Ok(())
    } else {
        Err(AuthzError::Forbidden {
            identity: identity.clone(),
            privilege: required,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Authorization Explanation (Audit Trail)
// ─────────────────────────────────────────────────────────────────────────────

/// Detailed explanation of an authorization decision.
///
/// Answers "why was this identity allowed/denied?" for status endpoints and
/// audit logs.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorizationExplanation {
    pub identity: Identity,
    pub required_privilege: Privilege,
    pub role: Role,
    pub granted: bool,
    pub reason: String,
}

/// Explain why an authorization decision was made (or would be made).
pub fn explain_authorization(
    registry: &AuthorizationRegistry,
    identity: &Identity,
    required: Privilege,
) -> AuthorizationExplanation {
    let role = registry.role_of(identity);
    let granted = role.grants(required);

    let reason = match (role, granted) {
        (Role::RootAuthority, _) => {
            "identity is the root authority and holds every privilege".to_string()
        }
        (Role::Writer, true) => format!("writers hold '{required}'"),
        (Role::Writer, false) => format!(
            "'{required}' is reserved for the root authority ({})",
            registry.root_authority()
        ),
        (Role::Reader, _) => format!("identity is not a writer; '{required}' requires one"),
    };

    AuthorizationExplanation {
        identity: identity.clone(),
        required_privilege: required,
        role,
        granted,
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn id(raw: &str) -> Identity {
        Identity::parse(raw).unwrap()
    }

    fn registry_with_writer() -> (AuthorizationRegistry, Identity, Identity) {
        let root = id("0xaaaa");
        let writer = id("0xbbbb");
        let mut registry = AuthorizationRegistry::new(root.clone());
        registry.add_writer(writer.as_str(), &root).unwrap();
        (registry, root, writer)
    }

    #[test]
    fn writers_may_write_records_but_not_manage_writers() {
        let (registry, _root, writer) = registry_with_writer();

        assert!(authorize(&registry, &writer, Privilege::WriteRecords).is_ok());
        assert_eq!(
            authorize(&registry, &writer, Privilege::ManageWriters),
            Err(AuthzError::Forbidden {
                identity: writer,
                privilege: Privilege::ManageWriters,
            })
        );
    }

    #[test]
    fn root_holds_every_privilege() {
        let (registry, root, _writer) = registry_with_writer();

        assert!(authorize(&registry, &root, Privilege::WriteRecords).is_ok());
        assert!(authorize(&registry, &root, Privilege::ManageWriters).is_ok());
    }

    #[test]
    fn explanation_reports_role_and_decision() {
        let (registry, _root, _writer) = registry_with_writer();
        let stranger = id("0xcccc");

        let explanation = explain_authorization(&registry, &stranger, Privilege::WriteRecords);
        assert_eq!(explanation.role, Role::Reader);
        assert!(!explanation.granted);

        let json = serde_json::to_value(&explanation).unwrap();
        assert_eq!(json["role"], "reader");
        assert_eq!(json["required_privilege"], "write_records");
    }

    proptest! {
        /// The decision is a pure function of the registry snapshot.
        #[test]
        fn decision_matches_explanation(n in 1u64..64, manage in any::<bool>()) {
            let (registry, _root, _writer) = registry_with_writer();
            let identity = id(&format!("0x{:04x}", n));
            let privilege = if manage { Privilege::ManageWriters } else { Privilege::WriteRecords };

            let decision = authorize(&registry, &identity, privilege).is_ok();
            let explanation = explain_authorization(&registry, &identity, privilege);
            prop_assert_eq!(decision, explanation.granted);
            prop_assert_eq!(decision, authorize(&registry, &identity, privilege).is_ok());
        }
    }
}
