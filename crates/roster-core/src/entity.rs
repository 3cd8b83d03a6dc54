//! Normalized entities: people, courses and the memberships linking them.
//!
//! Identifiers are assigned by the store on first sight of a name or title and
//! never change afterwards.

use std::fmt;

use serde::{Deserialize, Serialize};

// ─── Identifiers ─────────────────────────────────────────────────────────────

/// Store-assigned identifier of a [`Person`].
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PersonId(pub i64);

/// Store-assigned identifier of a [`Course`].
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct CourseId(pub i64);

impl fmt::Display for PersonId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

impl fmt::Display for CourseId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

// ─── Role ────────────────────────────────────────────────────────────────────

/// The role a person holds in a course.
///
/// Stored as a plain integer. `0` and `1` have well-known meanings; any other
/// value is carried through unchanged.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Role(pub i64);

impl Role {
  pub const LEARNER: Role = Role(0);
  pub const INSTRUCTOR: Role = Role(1);

  /// Human-readable name for the well-known roles.
  pub fn label(self) -> Option<&'static str> {
    match self {
      Role::LEARNER => Some("learner"),
      Role::INSTRUCTOR => Some("instructor"),
      _ => None,
    }
  }
}

/// Renders the bare integer. The fingerprint depends on this exact text.
impl fmt::Display for Role {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

// ─── Entities ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
  pub id:   PersonId,
  pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
  pub id:    CourseId,
  pub title: String,
}

/// Association between one person and one course.
/// At most one exists per `(person_id, course_id)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
  pub person_id: PersonId,
  pub course_id: CourseId,
  pub role:      Role,
}
