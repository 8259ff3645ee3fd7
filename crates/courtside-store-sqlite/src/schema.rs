//! SQL schema for the Courtside SQLite store.
//!
//! Executed once at connection startup. `PRAGMA user_version` records the
//! schema revision.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// Foreign-key columns are plain text without `REFERENCES` clauses: an
/// upstream document may name a parent that never arrives, and such rows are
/// kept and resolve to nothing at join time.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS categories (
    category_id   TEXT PRIMARY KEY,
    category_name TEXT NOT NULL,
    gender        TEXT
);

CREATE TABLE IF NOT EXISTS competitions (
    competition_id   TEXT PRIMARY KEY,
    competition_name TEXT NOT NULL,
    parent_id        TEXT,
    \"type\"           TEXT,
    gender           TEXT,
    level            TEXT,
    category_id      TEXT
);

CREATE TABLE IF NOT EXISTS competitors (
    competitor_id TEXT PRIMARY KEY,
    name          TEXT,
    country       TEXT,
    country_code  TEXT,
    abbreviation  TEXT
);

-- One row per competitor per ranking list; re-ingesting a list overwrites.
CREATE TABLE IF NOT EXISTS competitor_rankings (
    ranking_id          TEXT NOT NULL,
    ranking_name        TEXT,
    competitor_id       TEXT NOT NULL,
    rank                INTEGER,
    movement            INTEGER,
    points              REAL,
    competitions_played INTEGER,
    PRIMARY KEY (ranking_id, competitor_id)
);

CREATE TABLE IF NOT EXISTS complexes (
    complex_id   TEXT PRIMARY KEY,
    complex_name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS venues (
    venue_id     TEXT PRIMARY KEY,
    venue_name   TEXT NOT NULL,
    city_name    TEXT,
    country_name TEXT,
    country_code TEXT,
    timezone     TEXT,
    complex_id   TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS competitions_category_idx ON competitions(category_id);
CREATE INDEX IF NOT EXISTS competitions_parent_idx   ON competitions(parent_id);
CREATE INDEX IF NOT EXISTS rankings_competitor_idx   ON competitor_rankings(competitor_id);
CREATE INDEX IF NOT EXISTS venues_complex_idx        ON venues(complex_id);

PRAGMA user_version = 1;
";
