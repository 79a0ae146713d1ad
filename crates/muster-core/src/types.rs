use serde::{Deserialize, Serialize};
use std::fmt;

// All three ids are externally-issued 64-bit identifiers. They are newtypes so
// a coordinator id can never be passed where a subject id is expected, and so
// every boundary normalizes to a single canonical representation.

// ---------------------------------------------------------------------------
// UnitId
// ---------------------------------------------------------------------------

/// Organizational unit all state is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitId(pub u64);

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for UnitId {
    type Err = crate::error::MusterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_u64(s).map(UnitId)
    }
}

// ---------------------------------------------------------------------------
// CoordinatorId
// ---------------------------------------------------------------------------

/// An actor responsible for contacting a subset of subjects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CoordinatorId(pub u64);

impl fmt::Display for CoordinatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for CoordinatorId {
    type Err = crate::error::MusterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_u64(s).map(CoordinatorId)
    }
}

// ---------------------------------------------------------------------------
// SubjectId
// ---------------------------------------------------------------------------

/// A population member to be contacted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectId(pub u64);

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for SubjectId {
    type Err = crate::error::MusterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_u64(s).map(SubjectId)
    }
}

fn parse_u64(s: &str) -> Result<u64, crate::error::MusterError> {
    s.parse::<u64>()
        .map_err(|_| crate::error::MusterError::InvalidId(s.to_string()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
