//! [`SqliteStore`] — the SQLite implementation of [`RosterStore`].

use std::{collections::BTreeSet, path::Path};

use rusqlite::OptionalExtension as _;
use tracing::debug;

use roster_core::{
  entity::{Course, CourseId, Membership, Person, PersonId},
  store::RosterStore,
  verify::{Fingerprint, JoinedRow},
};

use crate::{
  Error, Result,
  encode::{course_from_row, encode_limit, joined_from_row, membership_from_row, person_from_row},
  schema,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A roster store backed by a single SQLite file.
///
/// Opening does not touch the schema; call
/// [`reset_schema`](RosterStore::reset_schema) before loading.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path`.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref().to_path_buf();
    let unavailable = |source: tokio_rusqlite::Error| Error::StoreUnavailable { path: path.clone(), source };

    let conn = tokio_rusqlite::Connection::open(&path).await.map_err(unavailable)?;
    // Force SQLite to read the file header so a bad path fails here.
    conn
      .call(|conn| Ok(conn.query_row("PRAGMA schema_version", [], |r| r.get::<_, i64>(0))?))
      .await
      .map_err(unavailable)?;

    debug!(path = %path.display(), "store opened");
    Ok(Self { conn })
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    Ok(Self { conn })
  }

  /// Close the underlying connection, surfacing any error SQLite reports.
  pub async fn close(self) -> Result<()> {
    self.conn.close().await?;
    Ok(())
  }

  async fn execute_batch(&self, sql: &'static str) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute_batch(sql)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Insert-or-ignore `value`, then read back its identifier.
  async fn resolve_key(
    &self,
    insert: &'static str,
    select: &'static str,
    value: &str,
  ) -> Result<i64> {
    let value = value.to_owned();
    let id = self
      .conn
      .call(move |conn| {
        conn.prepare_cached(insert)?.execute(rusqlite::params![value])?;
        let id: i64 = conn
          .prepare_cached(select)?
          .query_row(rusqlite::params![value], |r| r.get(0))?;
        Ok(id)
      })
      .await?;
    Ok(id)
  }

  async fn query_all<T, F>(&self, sql: &'static str, map: F) -> Result<Vec<T>>
  where
    T: Send + 'static,
    F: Fn(&rusqlite::Row<'_>) -> rusqlite::Result<T> + Send + 'static,
  {
    let rows = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare_cached(sql)?;
        let rows = stmt.query_map([], |row| map(row))?.collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }
}

// ─── RosterStore impl ────────────────────────────────────────────────────────

impl RosterStore for SqliteStore {
  type Error = Error;

  // ── Schema ────────────────────────────────────────────────────────────────

  async fn reset_schema(&self) -> Result<()> {
    let present: BTreeSet<String> = self
      .conn
      .call(|conn| {
        let tx = conn.transaction()?;
        tx.execute_batch(schema::RESET)?;
        tx.commit()?;

        let mut stmt = conn.prepare(schema::EXISTING_RELATIONS)?;
        let names = stmt
          .query_map([], |r| r.get::<_, String>(0))?
          .collect::<rusqlite::Result<BTreeSet<_>>>()?;
        Ok(names)
      })
      .await?;

    if let Some(missing) = schema::RELATIONS.iter().find(|r| !present.contains(**r)) {
      return Err(Error::SchemaMismatch((*missing).to_owned()));
    }

    debug!("roster schema reset");
    Ok(())
  }

  // ── Transaction boundary ──────────────────────────────────────────────────

  async fn begin(&self) -> Result<()> { self.execute_batch("BEGIN").await }

  async fn commit(&self) -> Result<()> { self.execute_batch("COMMIT").await }

  async fn rollback(&self) -> Result<()> { self.execute_batch("ROLLBACK").await }

  // ── Writes ────────────────────────────────────────────────────────────────

  async fn resolve_person(&self, name: &str) -> Result<PersonId> {
    self
      .resolve_key(schema::INSERT_PERSON, schema::SELECT_PERSON_ID, name)
      .await
      .map(PersonId)
  }

  async fn resolve_course(&self, title: &str) -> Result<CourseId> {
    self
      .resolve_key(schema::INSERT_COURSE, schema::SELECT_COURSE_ID, title)
      .await
      .map(CourseId)
  }

  async fn write_membership(&self, membership: Membership) -> Result<()> {
    let Membership { person_id, course_id, role } = membership;

    self
      .conn
      .call(move |conn| {
        conn
          .prepare_cached(schema::UPSERT_MEMBERSHIP)?
          .execute(rusqlite::params![person_id.0, course_id.0, role.0])?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn list_people(&self) -> Result<Vec<Person>> {
    self.query_all(schema::LIST_PEOPLE, person_from_row).await
  }

  async fn list_courses(&self) -> Result<Vec<Course>> {
    self.query_all(schema::LIST_COURSES, course_from_row).await
  }

  async fn list_memberships(&self) -> Result<Vec<Membership>> {
    self.query_all(schema::LIST_MEMBERSHIPS, membership_from_row).await
  }

  async fn joined_rows(&self, limit: Option<usize>) -> Result<Vec<JoinedRow>> {
    let limit = encode_limit(limit);

    let rows = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare_cached(schema::JOINED_ROWS)?;
        let rows = stmt
          .query_map(rusqlite::params![limit], joined_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  async fn min_fingerprint(&self) -> Result<Option<Fingerprint>> {
    let value: Option<String> = self
      .conn
      .call(|conn| {
        Ok(conn
          .prepare_cached(schema::MIN_FINGERPRINT)?
          .query_row(rusqlite::params![Fingerprint::TAG], |r| r.get(0))
          .optional()?)
      })
      .await?;
    Ok(value.map(Fingerprint))
  }
}
