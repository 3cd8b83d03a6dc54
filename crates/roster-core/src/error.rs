//! Error types for `roster-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// An input record is missing one of its three fields or has the wrong
  /// type in one of them. `index` is the zero-based position in the input.
  #[error("malformed record at index {index}: {reason}")]
  MalformedRecord { index: usize, reason: String },

  #[error("invalid roster document: {0}")]
  InvalidDocument(String),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
