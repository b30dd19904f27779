use serde::{Deserialize, Serialize};

/// Role an identity holds in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// The registry creator ("deployer"). Always a writer, never removable.
    RootAuthority,
    /// An authorized writer ("admin").
    Writer,
    /// Any other identity: may read and verify, nothing else.
    Reader,
}

/// Privilege required by an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Privilege {
    /// Create products, append stages, commit fingerprints.
    WriteRecords,
    /// Add or remove writers.
    ManageWriters,
}

impl Role {
    pub fn grants(self, privilege: Privilege) -> bool {
        match (self, privilege) {
            (Role::RootAuthority, _) => true,
            (Role::Writer, Privilege::WriteRecords) => true,
            _ => false,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::RootAuthority => "root_authority",
            Role::Writer => "writer",
            Role::Reader => "reader",
        }
    }
}

impl Privilege {
    pub fn as_str(self) -> &'static str {
        match self {
            Privilege::WriteRecords => "write_records",
            Privilege::ManageWriters => "manage_writers",
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::fmt::Display for Privilege {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
