//! SQL for the roster relations.
//!
//! The schema is rebuilt from scratch on every run; there is no migration
//! path and no `user_version` bookkeeping.

/// Relations owned by the loader, in creation order.
pub const RELATIONS: [&str; 3] = ["Person", "Course", "Membership"];

/// Drops and recreates all three relations. Run inside one transaction.
///
/// Dropping an `AUTOINCREMENT` table also clears its `sqlite_sequence` row,
/// so identifiers restart at 1 after a reset.
pub const RESET: &str = "
DROP TABLE IF EXISTS Membership;
DROP TABLE IF EXISTS Course;
DROP TABLE IF EXISTS Person;

CREATE TABLE Person (
    id    INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT UNIQUE,
    name  TEXT    NOT NULL UNIQUE
);

CREATE TABLE Course (
    id     INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT UNIQUE,
    title  TEXT    NOT NULL UNIQUE
);

-- Pure association; referential integrity holds by construction.
CREATE TABLE Membership (
    person_id  INTEGER NOT NULL,
    course_id  INTEGER NOT NULL,
    role       INTEGER NOT NULL,
    PRIMARY KEY (person_id, course_id)
);
";

pub const EXISTING_RELATIONS: &str =
  "SELECT name FROM sqlite_master WHERE type = 'table' AND name IN ('Person', 'Course', 'Membership')";

// ─── Upserts ─────────────────────────────────────────────────────────────────

pub const INSERT_PERSON: &str = "INSERT OR IGNORE INTO Person (name) VALUES (?1)";
pub const SELECT_PERSON_ID: &str = "SELECT id FROM Person WHERE name = ?1";

pub const INSERT_COURSE: &str = "INSERT OR IGNORE INTO Course (title) VALUES (?1)";
pub const SELECT_COURSE_ID: &str = "SELECT id FROM Course WHERE title = ?1";

pub const UPSERT_MEMBERSHIP: &str =
  "INSERT OR REPLACE INTO Membership (person_id, course_id, role) VALUES (?1, ?2, ?3)";

// ─── Reads ───────────────────────────────────────────────────────────────────

pub const LIST_PEOPLE: &str = "SELECT id, name FROM Person ORDER BY id";
pub const LIST_COURSES: &str = "SELECT id, title FROM Course ORDER BY id";
pub const LIST_MEMBERSHIPS: &str =
  "SELECT person_id, course_id, role FROM Membership ORDER BY person_id, course_id";

/// A negative `LIMIT` means no limit in SQLite.
pub const JOINED_ROWS: &str = "
SELECT p.name, c.title, m.role
FROM Person p
JOIN Membership m ON p.id = m.person_id
JOIN Course     c ON m.course_id = c.id
ORDER BY p.name DESC, c.title DESC, m.role DESC
LIMIT ?1";

/// `?1` is the fingerprint tag. `m.role` is concatenated as its decimal text.
pub const MIN_FINGERPRINT: &str = "
SELECT ?1 || hex(p.name || c.title || m.role) AS x
FROM Person p
JOIN Membership m ON p.id = m.person_id
JOIN Course     c ON m.course_id = c.id
ORDER BY x
LIMIT 1";
