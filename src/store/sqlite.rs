use super::{ScoreRecord, ScoreStore};
use crate::error::{FilmPulseError, Result};
use crate::types::film::FilmId;
use crate::score::grade::grade_for;
use crate::types::scoring::{
    DiscoverabilityBreakdown, DiscoverabilityResult, Grade, DISCOVERABILITY_WEIGHTS,
};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use tracing::debug;

const SCHEMA_VERSION: i64 = 1;

const CREATE_FILM_SCORES: &str = "
CREATE TABLE IF NOT EXISTS film_scores (
    film_id         TEXT PRIMARY KEY NOT NULL,
    discoverability INTEGER NOT NULL CHECK (discoverability BETWEEN 0 AND 100),
    hype_score      REAL,
    grade           TEXT NOT NULL CHECK (grade IN ('A', 'B', 'C', 'D')),
    breakdown       TEXT NOT NULL,
    input_digest    TEXT NOT NULL,
    analyzed_at     TEXT NOT NULL
)";

const UPSERT_FILM_SCORE: &str = "
INSERT INTO film_scores
    (film_id, discoverability, hype_score, grade, breakdown, input_digest, analyzed_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
ON CONFLICT(film_id) DO UPDATE SET
    discoverability = excluded.discoverability,
    hype_score      = excluded.hype_score,
    grade           = excluded.grade,
    breakdown       = excluded.breakdown,
    input_digest    = excluded.input_digest,
    analyzed_at     = excluded.analyzed_at";

const SELECT_COLUMNS: &str =
    "SELECT film_id, discoverability, hype_score, grade, breakdown, input_digest, analyzed_at FROM film_scores";

type RawRow = (String, i64, Option<f64>, String, String, String, String);

/// Score store backed by one SQLite table mirroring the films score columns.
/// The breakdown is kept as JSON text next to them.
pub struct SqliteScoreStore {
    conn: Mutex<Connection>,
}

impl SqliteScoreStore {
    pub fn open<T: AsRef<Path>>(db_path: T) -> Result<Self> {
        if let Some(parent) = db_path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        debug!(path = %db_path.as_ref().display(), "opening score store");
        Self::init(Connection::open(db_path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        let version: i64 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
        if version > SCHEMA_VERSION {
            return Err(FilmPulseError::ConfigParse(format!(
                "score store schema version {version} is newer than supported {SCHEMA_VERSION}"
            )));
        }
        conn.execute_batch(CREATE_FILM_SCORES)?;
        conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
    ))
}

fn into_record(raw: RawRow) -> Result<ScoreRecord> {
    let (film_id, score, hype_score, grade, breakdown, input_digest, analyzed_at) = raw;
    let corrupt = |detail: String| FilmPulseError::CorruptRecord(film_id.clone(), detail);

    let id: FilmId = film_id
        .parse()
        .map_err(|err| corrupt(format!("bad film id: {err}")))?;
    let score = u8::try_from(score)
        .ok()
        .filter(|score| *score <= 100)
        .ok_or_else(|| corrupt(format!("discoverability out of range: {score}")))?;
    let grade = grade
        .chars()
        .next()
        .and_then(Grade::from_char)
        .ok_or_else(|| corrupt(format!("unknown grade: {grade}")))?;
    if grade != grade_for(score) {
        return Err(corrupt(format!(
            "grade {grade} does not match discoverability {score}"
        )));
    }
    let breakdown: DiscoverabilityBreakdown = serde_json::from_str(&breakdown)
        .map_err(|err| corrupt(format!("bad breakdown: {err}")))?;
    if let Some((name, value, _)) = breakdown
        .components(&DISCOVERABILITY_WEIGHTS)
        .into_iter()
        .find(|(_, value, _)| !(0.0..=1.0).contains(value))
    {
        return Err(corrupt(format!("{name} out of range: {value}")));
    }
    let analyzed_at = DateTime::parse_from_rfc3339(&analyzed_at)
        .map_err(|err| corrupt(format!("bad analyzed_at: {err}")))?
        .with_timezone(&Utc);

    Ok(ScoreRecord {
        film_id: id,
        result: DiscoverabilityResult {
            score,
            grade,
            breakdown,
        },
        hype_score,
        input_digest,
        analyzed_at,
    })
}

impl ScoreStore for SqliteScoreStore {
    fn upsert(&self, record: &ScoreRecord) -> Result<()> {
        let breakdown = serde_json::to_string(&record.result.breakdown)?;
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        tx.execute(
            UPSERT_FILM_SCORE,
            params![
                record.film_id.as_str(),
                i64::from(record.result.score),
                record.hype_score,
                record.result.grade.to_string(),
                breakdown,
                record.input_digest,
                record.analyzed_at.to_rfc3339(),
            ],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn get(&self, id: &FilmId) -> Result<ScoreRecord> {
        let raw = {
            let conn = self.conn.lock();
            conn.query_row(
                &format!("{SELECT_COLUMNS} WHERE film_id = ?1"),
                params![id.as_str()],
                read_row,
            )
            .optional()?
        };
        match raw {
            Some(raw) => into_record(raw),
            None => Err(FilmPulseError::NotFound(id.to_string())),
        }
    }

    fn list(&self) -> Result<Vec<ScoreRecord>> {
        let rows = {
            let conn = self.conn.lock();
            let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} ORDER BY film_id"))?;
            let rows = stmt
                .query_map([], read_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            rows
        };
        rows.into_iter().map(into_record).collect()
    }

    fn remove(&self, id: &FilmId) -> Result<()> {
        let deleted = self.conn.lock().execute(
            "DELETE FROM film_scores WHERE film_id = ?1",
            params![id.as_str()],
        )?;
        if deleted == 0 {
            return Err(FilmPulseError::NotFound(id.to_string()));
        }
        Ok(())
    }
}
