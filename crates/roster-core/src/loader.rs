//! The driving procedure: normalize records into a [`RosterStore`].
//!
//! Each record resolves its person, then its course, then writes the
//! membership. All writes of a run land in one batch that is committed once
//! at the end; any failure rolls the batch back and is returned unchanged.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{entity::Membership, record::RosterRecord, store::RosterStore};

/// What a single [`load`] touched. Entity counts are distinct values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadSummary {
  pub records:     usize,
  pub people:      usize,
  pub courses:     usize,
  pub memberships: usize,
}

/// Reset the schema, then [`load`] `records` into the fresh relations.
pub async fn rebuild<S: RosterStore>(
  store: &S,
  records: &[RosterRecord],
) -> Result<LoadSummary, S::Error> {
  store.reset_schema().await?;
  load(store, records).await
}

/// Load `records` in input order and commit them as one batch.
pub async fn load<S: RosterStore>(
  store: &S,
  records: &[RosterRecord],
) -> Result<LoadSummary, S::Error> {
  store.begin().await?;

  let outcome = match apply(store, records).await {
    Ok(summary) => store.commit().await.map(|()| summary),
    Err(e) => Err(e),
  };

  match outcome {
    Ok(summary) => {
      info!(
        records = summary.records,
        people = summary.people,
        courses = summary.courses,
        memberships = summary.memberships,
        "roster committed"
      );
      Ok(summary)
    }
    Err(e) => {
      if let Err(rollback_err) = store.rollback().await {
        warn!(error = %rollback_err, "rollback after failed load also failed");
      }
      Err(e)
    }
  }
}

async fn apply<S: RosterStore>(
  store: &S,
  records: &[RosterRecord],
) -> Result<LoadSummary, S::Error> {
  let mut people = BTreeSet::new();
  let mut courses = BTreeSet::new();
  let mut pairs = BTreeSet::new();

  for (index, record) in records.iter().enumerate() {
    let person_id = store.resolve_person(&record.name).await?;
    let course_id = store.resolve_course(&record.title).await?;
    store
      .write_membership(Membership { person_id, course_id, role: record.role })
      .await?;

    debug!(
      index,
      name = %record.name,
      title = %record.title,
      role = %record.role,
      %person_id,
      %course_id,
      "record applied"
    );

    people.insert(person_id);
    courses.insert(course_id);
    pairs.insert((person_id, course_id));
  }

  Ok(LoadSummary {
    records:     records.len(),
    people:      people.len(),
    courses:     courses.len(),
    memberships: pairs.len(),
  })
}

#[cfg(test)]
mod tests {
  use std::sync::Mutex;

  use super::*;
  use crate::{
    entity::{Course, CourseId, Person, PersonId, Role},
    store::RosterSnapshot,
    verify::{Fingerprint, JoinedRow},
  };

  #[derive(Debug, thiserror::Error)]
  #[error("injected failure resolving {0:?}")]
  struct Injected(String);

  #[derive(Debug, Clone, Default, PartialEq)]
  struct Tables {
    people:      Vec<Person>,
    courses:     Vec<Course>,
    memberships: Vec<Membership>,
    next_id:     i64,
  }

  /// Vec-backed store whose batch is a copy of the committed tables.
  #[derive(Default)]
  struct MemoryStore {
    committed: Mutex<Tables>,
    pending:   Mutex<Option<Tables>>,
    fail_on:   Option<String>,
  }

  impl MemoryStore {
    fn failing_on(name: &str) -> Self {
      Self { fail_on: Some(name.to_owned()), ..Self::default() }
    }

    fn with_tables<T>(&self, f: impl FnOnce(&mut Tables) -> T) -> T {
      let mut pending = self.pending.lock().unwrap();
      match pending.as_mut() {
        Some(tables) => f(tables),
        None => f(&mut self.committed.lock().unwrap()),
      }
    }
  }

  impl RosterStore for MemoryStore {
    type Error = Injected;

    async fn reset_schema(&self) -> Result<(), Injected> {
      *self.committed.lock().unwrap() = Tables::default();
      Ok(())
    }

    async fn begin(&self) -> Result<(), Injected> {
      let snapshot = self.committed.lock().unwrap().clone();
      *self.pending.lock().unwrap() = Some(snapshot);
      Ok(())
    }

    async fn commit(&self) -> Result<(), Injected> {
      if let Some(tables) = self.pending.lock().unwrap().take() {
        *self.committed.lock().unwrap() = tables;
      }
      Ok(())
    }

    async fn rollback(&self) -> Result<(), Injected> {
      self.pending.lock().unwrap().take();
      Ok(())
    }

    async fn resolve_person(&self, name: &str) -> Result<PersonId, Injected> {
      if self.fail_on.as_deref() == Some(name) {
        return Err(Injected(name.to_owned()));
      }
      Ok(self.with_tables(|t| {
        if let Some(p) = t.people.iter().find(|p| p.name == name) {
          return p.id;
        }
        t.next_id += 1;
        let id = PersonId(t.next_id);
        t.people.push(Person { id, name: name.to_owned() });
        id
      }))
    }

    async fn resolve_course(&self, title: &str) -> Result<CourseId, Injected> {
      Ok(self.with_tables(|t| {
        if let Some(c) = t.courses.iter().find(|c| c.title == title) {
          return c.id;
        }
        t.next_id += 1;
        let id = CourseId(t.next_id);
        t.courses.push(Course { id, title: title.to_owned() });
        id
      }))
    }

    async fn write_membership(&self, membership: Membership) -> Result<(), Injected> {
      self.with_tables(|t| {
        match t.memberships.iter_mut().find(|m| {
          m.person_id == membership.person_id && m.course_id == membership.course_id
        }) {
          Some(existing) => existing.role = membership.role,
          None => t.memberships.push(membership),
        }
      });
      Ok(())
    }

    async fn list_people(&self) -> Result<Vec<Person>, Injected> {
      Ok(self.with_tables(|t| t.people.clone()))
    }

    async fn list_courses(&self) -> Result<Vec<Course>, Injected> {
      Ok(self.with_tables(|t| t.courses.clone()))
    }

    async fn list_memberships(&self) -> Result<Vec<Membership>, Injected> {
      Ok(self.with_tables(|t| t.memberships.clone()))
    }

    async fn joined_rows(&self, _limit: Option<usize>) -> Result<Vec<JoinedRow>, Injected> {
      Ok(Vec::new())
    }

    async fn min_fingerprint(&self) -> Result<Option<Fingerprint>, Injected> {
      Ok(None)
    }
  }

  fn sample() -> Vec<RosterRecord> {
    vec![
      RosterRecord::new("Kristin", "R Programming", Role::INSTRUCTOR),
      RosterRecord::new("Kristin", "Python", Role::LEARNER),
      RosterRecord::new("Sylvia", "Python", Role::LEARNER),
    ]
  }

  #[tokio::test]
  async fn summary_counts_distinct_entities() {
    let store = MemoryStore::default();
    let summary = rebuild(&store, &sample()).await.unwrap();

    assert_eq!(summary, LoadSummary { records: 3, people: 2, courses: 2, memberships: 3 });

    let snap = store.snapshot().await.unwrap();
    assert_eq!(snap.people.len(), 2);
    assert_eq!(snap.courses.len(), 2);
    assert_eq!(snap.memberships.len(), 3);
  }

  #[tokio::test]
  async fn repeated_pair_counts_once_and_keeps_last_role() {
    let store = MemoryStore::default();
    let records = vec![
      RosterRecord::new("Ann", "Go", Role(2)),
      RosterRecord::new("Ann", "Go", Role(3)),
    ];
    let summary = rebuild(&store, &records).await.unwrap();

    assert_eq!(summary.memberships, 1);
    let memberships = store.list_memberships().await.unwrap();
    assert_eq!(memberships.len(), 1);
    assert_eq!(memberships[0].role, Role(3));
  }

  #[tokio::test]
  async fn failure_rolls_back_the_whole_batch() {
    let store = MemoryStore::failing_on("Sylvia");
    let err = rebuild(&store, &sample()).await.unwrap_err();
    assert_eq!(err.0, "Sylvia");

    assert_eq!(store.snapshot().await.unwrap(), RosterSnapshot::default());
    assert!(store.pending.lock().unwrap().is_none());
  }

  #[tokio::test]
  async fn empty_input_commits_nothing() {
    let store = MemoryStore::default();
    let summary = rebuild(&store, &[]).await.unwrap();
    assert_eq!(summary, LoadSummary::default());
    assert_eq!(store.snapshot().await.unwrap(), RosterSnapshot::default());
  }
}
