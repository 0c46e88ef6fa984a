/// A schema migration.
#[derive(Debug)]
pub struct Migration {
    pub version: u32,
    pub name: &'static str,
    pub sql: &'static str,
}

const MIGRATION_001: &str = r#"
-- Enable foreign keys
PRAGMA foreign_keys = ON;

-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_migrations (
    version INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- Instrument reference list
CREATE TABLE IF NOT EXISTS instruments (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    instrument TEXT NOT NULL CHECK (instrument <> ''),
    section TEXT NOT NULL CHECK (section <> '')
);

CREATE INDEX IF NOT EXISTS idx_instruments_instrument ON instruments(instrument);

-- Canonical persons
CREATE TABLE IF NOT EXISTS names (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name TEXT,
    middle_name TEXT,
    last_name TEXT,
    CHECK (first_name IS NOT NULL OR last_name IS NOT NULL)
);

CREATE INDEX IF NOT EXISTS idx_names_first_last ON names(first_name, last_name);
CREATE INDEX IF NOT EXISTS idx_names_middle_last ON names(middle_name, last_name);

-- Unreconciled assignments as written in the source
CREATE TABLE IF NOT EXISTS assignments_by_name (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    instrument TEXT NOT NULL CHECK (instrument <> ''),
    first_name TEXT,
    middle_name TEXT,
    last_name TEXT
);

-- Reconciled person/instrument links (regenerated on every reconcile)
CREATE TABLE IF NOT EXISTS assignments (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    player_id INTEGER NOT NULL REFERENCES names(id),
    instrument_id INTEGER NOT NULL REFERENCES instruments(id),
    matched_on TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_assignments_player_id ON assignments(player_id);
CREATE INDEX IF NOT EXISTS idx_assignments_instrument_id ON assignments(instrument_id);
"#;

const MIGRATION_002: &str = r#"
-- Everybody, with their instrument and section where they have one
CREATE VIEW IF NOT EXISTS all_musicians AS
SELECT DISTINCT
    n.first_name,
    n.middle_name,
    n.last_name,
    i.instrument,
    i.section
FROM names n
LEFT JOIN assignments a ON a.player_id = n.id
LEFT JOIN instruments i ON i.id = a.instrument_id
ORDER BY n.last_name, n.first_name, i.instrument;

-- Instruments nobody plays
CREATE VIEW IF NOT EXISTS instruments_without_musicians AS
SELECT
    i.instrument,
    i.section
FROM instruments i
WHERE NOT EXISTS (SELECT 1 FROM assignments a WHERE a.instrument_id = i.id)
ORDER BY i.section, i.instrument;

-- People linked to two or more distinct instruments
CREATE VIEW IF NOT EXISTS multi_instrumentalists AS
SELECT DISTINCT
    n.first_name,
    n.middle_name,
    n.last_name,
    i.instrument,
    i.section
FROM names n
JOIN assignments a ON a.player_id = n.id
JOIN instruments i ON i.id = a.instrument_id
WHERE n.id IN (
    SELECT player_id
    FROM assignments
    GROUP BY player_id
    HAVING COUNT(DISTINCT instrument_id) >= 2
)
ORDER BY n.last_name, n.first_name, i.instrument;

-- Instruments linked to two or more distinct people
CREATE VIEW IF NOT EXISTS multiple_players AS
SELECT DISTINCT
    i.instrument,
    i.section,
    n.first_name,
    n.middle_name,
    n.last_name
FROM instruments i
JOIN assignments a ON a.instrument_id = i.id
JOIN names n ON n.id = a.player_id
WHERE i.id IN (
    SELECT instrument_id
    FROM assignments
    GROUP BY instrument_id
    HAVING COUNT(DISTINCT player_id) >= 2
)
ORDER BY i.instrument, n.last_name, n.first_name;
"#;

pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "initial_schema",
        sql: MIGRATION_001,
    },
    Migration {
        version: 2,
        name: "report_views",
        sql: MIGRATION_002,
    },
];
