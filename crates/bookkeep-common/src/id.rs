//! Bookkeep identifier types
use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::FromStrVisitor;

/// Identifier of a company, the tenant context of a session.
///
/// The backend uses integer primary keys. On the wire the id travels as a
/// JSON number in request bodies and as a decimal string in the `company`
/// header and in persisted session state.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct CompanyId(u64);

impl CompanyId {
    /// Construct a company id from its numeric primary key.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// The numeric primary key.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for CompanyId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl Display for CompanyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error returned when a company id string is not a decimal integer.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid company id: `{0}`")]
pub struct InvalidCompanyId(String);

impl FromStr for CompanyId {
    type Err = InvalidCompanyId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(Self)
            .map_err(|_| InvalidCompanyId(s.to_string()))
    }
}

impl<'de> Deserialize<'de> for CompanyId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_any(FromStrVisitor::new("company id"))
    }
}

impl Serialize for CompanyId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u64(self.0)
    }
}
