//! Database schema definitions
//!
//! This module contains all SQL schema definitions for the paddock
//! database.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- One row per collected race
CREATE TABLE IF NOT EXISTS race (
    id TEXT PRIMARY KEY,
    date TEXT NOT NULL,
    race_number INTEGER NOT NULL,
    race_class TEXT NOT NULL,
    distance TEXT NOT NULL,
    going TEXT NOT NULL,
    course TEXT NOT NULL,
    prize TEXT NOT NULL,
    pace TEXT NOT NULL,
    image_url TEXT NOT NULL,
    source_url TEXT NOT NULL,
    collected_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_race_source_url ON race(source_url);
CREATE INDEX IF NOT EXISTS idx_race_date ON race(date);

-- One row per runner per race
CREATE TABLE IF NOT EXISTS runner (
    race_id TEXT NOT NULL REFERENCES race(id),
    horse_id TEXT NOT NULL,
    ordinal INTEGER NOT NULL,
    place TEXT NOT NULL,
    number TEXT NOT NULL,
    name TEXT NOT NULL,
    jockey TEXT NOT NULL,
    trainer TEXT NOT NULL,
    actual_weight TEXT NOT NULL,
    declared_weight TEXT NOT NULL,
    draw TEXT NOT NULL,
    length_behind_winner TEXT NOT NULL,
    running_positions TEXT NOT NULL,
    finish_time TEXT NOT NULL,
    win_odds TEXT NOT NULL,
    horse_url TEXT NOT NULL,
    PRIMARY KEY (race_id, ordinal)
);

CREATE INDEX IF NOT EXISTS idx_runner_horse ON runner(horse_id);

-- Addresses confirmed to have no event
CREATE TABLE IF NOT EXISTS no_event (
    url TEXT PRIMARY KEY,
    recorded_at TEXT NOT NULL
);
"#;

/// Initializes the database schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
