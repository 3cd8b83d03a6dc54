//! Row decoding between SQLite columns and `roster-core` types.
//!
//! Identifiers and roles are plain INTEGER columns; names and titles are TEXT.

use roster_core::{
  entity::{Course, CourseId, Membership, Person, PersonId, Role},
  verify::JoinedRow,
};
use rusqlite::Row;

pub fn person_from_row(row: &Row<'_>) -> rusqlite::Result<Person> {
  Ok(Person { id: PersonId(row.get(0)?), name: row.get(1)? })
}

pub fn course_from_row(row: &Row<'_>) -> rusqlite::Result<Course> {
  Ok(Course { id: CourseId(row.get(0)?), title: row.get(1)? })
}

pub fn membership_from_row(row: &Row<'_>) -> rusqlite::Result<Membership> {
  Ok(Membership {
    person_id: PersonId(row.get(0)?),
    course_id: CourseId(row.get(1)?),
    role:      Role(row.get(2)?),
  })
}

pub fn joined_from_row(row: &Row<'_>) -> rusqlite::Result<JoinedRow> {
  Ok(JoinedRow {
    name:  row.get(0)?,
    title: row.get(1)?,
    role:  Role(row.get(2)?),
  })
}

/// `None` becomes SQLite's "no limit".
pub fn encode_limit(limit: Option<usize>) -> i64 {
  limit.map_or(-1, |n| i64::try_from(n).unwrap_or(i64::MAX))
}
