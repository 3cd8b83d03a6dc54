//! Error type for `roster-store-sqlite`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The database file could not be opened or created.
  #[error("store unavailable at {}: {source}", path.display())]
  StoreUnavailable {
    path:   PathBuf,
    #[source]
    source: tokio_rusqlite::Error,
  },

  /// A roster relation is missing: the schema was never initialised or
  /// initialisation did not produce it.
  #[error("schema mismatch: relation {0:?} does not exist")]
  SchemaMismatch(String),

  #[error("database error: {0}")]
  Database(tokio_rusqlite::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Statements against an absent relation surface as [`Error::SchemaMismatch`];
/// everything else is a plain [`Error::Database`].
impl From<tokio_rusqlite::Error> for Error {
  fn from(err: tokio_rusqlite::Error) -> Self {
    if let tokio_rusqlite::Error::Rusqlite(inner) = &err
      && let Some(table) = missing_table(inner)
    {
      return Error::SchemaMismatch(table.to_owned());
    }
    Error::Database(err)
  }
}

fn missing_table(err: &rusqlite::Error) -> Option<&str> {
  let msg = match err {
    rusqlite::Error::SqliteFailure(_, Some(msg)) => msg,
    rusqlite::Error::SqlInputError { msg, .. } => msg,
    _ => return None,
  };
  msg.strip_prefix("no such table: ")
}
