//! Raw input records and their JSON decoding.
//!
//! A roster document is a list of lists. Each entry supplies
//! `[name, title, role]`; anything after the third element is ignored.

use serde_json::Value;

use crate::{Error, Result, entity::Role};

/// One denormalized input row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterRecord {
  pub name:  String,
  pub title: String,
  pub role:  Role,
}

impl RosterRecord {
  pub fn new(name: impl Into<String>, title: impl Into<String>, role: Role) -> Self {
    Self { name: name.into(), title: title.into(), role }
  }

  /// Decode the entry at position `index` of a roster document.
  pub fn from_value(index: usize, value: &Value) -> Result<Self> {
    let malformed = |reason: String| Error::MalformedRecord { index, reason };

    let fields = value.as_array().ok_or_else(|| {
      malformed(format!("expected a [name, title, role] list, found {}", kind_of(value)))
    })?;

    let text = |pos: usize, field: &str| -> Result<String> {
      match fields.get(pos) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(malformed(format!(
          "{field} must be a string, found {}",
          kind_of(other)
        ))),
        None => Err(malformed(format!("missing {field}"))),
      }
    };

    let name = text(0, "name")?;
    let title = text(1, "title")?;
    let role = match fields.get(2) {
      Some(v) => v.as_i64().map(Role).ok_or_else(|| {
        malformed(format!("role must be an integer, found {}", kind_of(v)))
      })?,
      None => return Err(malformed("missing role".into())),
    };

    Ok(Self { name, title, role })
  }
}

/// Decode a complete roster document.
///
/// Decoding is all-or-nothing: the first malformed entry fails the whole
/// document.
pub fn parse_records(json: &str) -> Result<Vec<RosterRecord>> {
  let doc: Value = serde_json::from_str(json)?;
  let Value::Array(entries) = doc else {
    return Err(Error::InvalidDocument(format!(
      "expected a list of records, found {}",
      kind_of(&doc)
    )));
  };

  entries
    .iter()
    .enumerate()
    .map(|(index, entry)| RosterRecord::from_value(index, entry))
    .collect()
}

fn kind_of(value: &Value) -> &'static str {
  match value {
    Value::Null => "null",
    Value::Bool(_) => "a boolean",
    Value::Number(n) if n.is_i64() || n.is_u64() => "an integer",
    Value::Number(_) => "a float",
    Value::String(_) => "a string",
    Value::Array(_) => "a list",
    Value::Object(_) => "an object",
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_well_formed_document() {
    let records = parse_records(
      r#"[["Kristin","R Programming",1],["Kristin","Python",0],["Sylvia","Python",0]]"#,
    )
    .unwrap();

    assert_eq!(records.len(), 3);
    assert_eq!(records[0], RosterRecord::new("Kristin", "R Programming", Role::INSTRUCTOR));
    assert_eq!(records[2], RosterRecord::new("Sylvia", "Python", Role::LEARNER));
  }

  #[test]
  fn empty_document_yields_no_records() {
    assert!(parse_records("[]").unwrap().is_empty());
  }

  #[test]
  fn extra_fields_are_ignored() {
    let records = parse_records(r#"[["Ann","Go",1,"extra",null]]"#).unwrap();
    assert_eq!(records, vec![RosterRecord::new("Ann", "Go", Role(1))]);
  }

  #[test]
  fn missing_role_is_malformed() {
    let err = parse_records(r#"[["Ann","Go",1],["Bob","Rust"]]"#).unwrap_err();
    match err {
      Error::MalformedRecord { index, reason } => {
        assert_eq!(index, 1);
        assert!(reason.contains("role"), "{reason}");
      }
      other => panic!("unexpected error: {other:?}"),
    }
  }

  #[test]
  fn wrong_types_are_malformed() {
    for doc in [
      r#"[[1,"Go",1]]"#,
      r#"[["Ann",null,1]]"#,
      r#"[["Ann","Go","1"]]"#,
      r#"[["Ann","Go",1.5]]"#,
      r#"[{"name":"Ann"}]"#,
    ] {
      assert!(
        matches!(parse_records(doc), Err(Error::MalformedRecord { index: 0, .. })),
        "{doc} should be rejected"
      );
    }
  }

  #[test]
  fn non_list_document_is_rejected() {
    assert!(matches!(
      parse_records(r#"{"roster":[]}"#),
      Err(Error::InvalidDocument(_))
    ));
  }

  #[test]
  fn syntax_error_is_json_error() {
    assert!(matches!(parse_records("[[\"Ann\""), Err(Error::Json(_))));
  }
}
