// ── Resident identity ──

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque resident identifier, stable across cycles.
///
/// The API sends numbers or strings; both are kept as their text form
/// so lookups never depend on the wire representation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResidentId(String);

impl ResidentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResidentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResidentId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for ResidentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&eetly_api::types::UserId> for ResidentId {
    fn from(id: &eetly_api::types::UserId) -> Self {
        Self(id.to_string())
    }
}

/// A member of the household as reported by the info query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resident {
    pub id: ResidentId,
    pub name: String,
    /// Position in the household list (the API's `order`).
    pub ordinal: i64,
}
