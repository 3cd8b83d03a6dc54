//! Read-side acceptance types: joined rows and the verification fingerprint.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entity::Role;

/// One row of the `Person ⋈ Membership ⋈ Course` join.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinedRow {
  pub name:  String,
  pub title: String,
  pub role:  Role,
}

impl fmt::Display for JoinedRow {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} | {} | {}", self.name, self.title, self.role)
  }
}

/// Tagged uppercase hex of `name || title || role`.
///
/// Ordering is plain byte order of the tagged string, which is what the
/// store's `ORDER BY` over the projected value produces.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(pub String);

impl Fingerprint {
  pub const TAG: &'static str = "XYZZY";

  pub fn of(row: &JoinedRow) -> Self {
    let joined = format!("{}{}{}", row.name, row.title, row.role);
    Self(format!("{}{}", Self::TAG, hex::encode_upper(joined)))
  }

  /// Smallest fingerprint over `rows`, or `None` when there are none.
  pub fn minimum<'a>(rows: impl IntoIterator<Item = &'a JoinedRow>) -> Option<Self> {
    rows.into_iter().map(Self::of).min()
  }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for Fingerprint {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn row(name: &str, title: &str, role: i64) -> JoinedRow {
    JoinedRow { name: name.into(), title: title.into(), role: Role(role) }
  }

  #[test]
  fn joined_row_display() {
    assert_eq!(row("Sylvia", "Python", 0).to_string(), "Sylvia | Python | 0");
  }

  #[test]
  fn fingerprint_is_tagged_upper_hex() {
    // "Ab1" = 0x41 0x62 0x31
    assert_eq!(Fingerprint::of(&row("A", "b", 1)).as_str(), "XYZZY416231");
  }

  #[test]
  fn fingerprint_hexes_utf8_bytes() {
    // "é" is C3 A9 in UTF-8.
    assert_eq!(Fingerprint::of(&row("é", "", 0)).as_str(), "XYZZYC3A930");
  }

  #[test]
  fn minimum_picks_smallest_string() {
    let rows = [
      row("Sylvia", "Python", 0),
      row("Kristin", "R Programming", 1),
      row("Kristin", "Python", 0),
    ];
    let min = Fingerprint::minimum(&rows).unwrap();
    let expected = rows.iter().map(Fingerprint::of).min().unwrap();
    assert_eq!(min, expected);
    assert!(min.as_str().starts_with(Fingerprint::TAG));
  }

  #[test]
  fn minimum_of_nothing_is_none() {
    assert_eq!(Fingerprint::minimum(&[] as &[JoinedRow]), None);
  }
}
