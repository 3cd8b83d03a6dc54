//! The `RosterStore` trait.
//!
//! Implemented by storage backends (e.g. `roster-store-sqlite`). The driving
//! procedure in [`loader`](crate::loader) is written against this abstraction
//! only.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::{
  entity::{Course, CourseId, Membership, Person, PersonId},
  verify::{Fingerprint, JoinedRow},
};

// ─── Snapshot ────────────────────────────────────────────────────────────────

/// Full contents of the three relations, each ordered by primary key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterSnapshot {
  pub people:      Vec<Person>,
  pub courses:     Vec<Course>,
  pub memberships: Vec<Membership>,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a normalized roster store.
///
/// A store is owned by exactly one running process. Calls are issued one at a
/// time; implementations need not guard against interleaved writers.
pub trait RosterStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Schema ────────────────────────────────────────────────────────────

  /// Drop the `Person`, `Course` and `Membership` relations if present and
  /// recreate them empty. Safe to call any number of times.
  fn reset_schema(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Transaction boundary ──────────────────────────────────────────────

  /// Start the batch that [`commit`](Self::commit) makes durable.
  fn begin(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn commit(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Discard everything written since [`begin`](Self::begin).
  fn rollback(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Writes ────────────────────────────────────────────────────────────

  /// Return the identifier for `name`, inserting a person on first sight.
  /// Never changes the identifier of an existing person.
  fn resolve_person<'a>(
    &'a self,
    name: &'a str,
  ) -> impl Future<Output = Result<PersonId, Self::Error>> + Send + 'a;

  /// Return the identifier for `title`, inserting a course on first sight.
  fn resolve_course<'a>(
    &'a self,
    title: &'a str,
  ) -> impl Future<Output = Result<CourseId, Self::Error>> + Send + 'a;

  /// Insert the membership, replacing the role of an existing row for the
  /// same `(person_id, course_id)` pair.
  fn write_membership(
    &self,
    membership: Membership,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Reads ─────────────────────────────────────────────────────────────

  fn list_people(&self) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + '_;

  fn list_courses(&self) -> impl Future<Output = Result<Vec<Course>, Self::Error>> + Send + '_;

  fn list_memberships(
    &self,
  ) -> impl Future<Output = Result<Vec<Membership>, Self::Error>> + Send + '_;

  /// Joined rows ordered by name, title, role (all descending), truncated to
  /// `limit` when given.
  fn joined_rows(
    &self,
    limit: Option<usize>,
  ) -> impl Future<Output = Result<Vec<JoinedRow>, Self::Error>> + Send + '_;

  /// The smallest [`Fingerprint`] over all joined rows, `None` if empty.
  fn min_fingerprint(
    &self,
  ) -> impl Future<Output = Result<Option<Fingerprint>, Self::Error>> + Send + '_;

  /// Read all three relations.
  fn snapshot(&self) -> impl Future<Output = Result<RosterSnapshot, Self::Error>> + Send + '_ {
    async move {
      Ok(RosterSnapshot {
        people:      self.list_people().await?,
        courses:     self.list_courses().await?,
        memberships: self.list_memberships().await?,
      })
    }
  }
}
