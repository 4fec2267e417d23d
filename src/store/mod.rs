pub mod memory;
pub mod sqlite;

use crate::error::Result;
use crate::types::film::FilmId;
use crate::types::scoring::DiscoverabilityResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Latest analysis of one film. Replaced whole on every write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub film_id: FilmId,
    pub result: DiscoverabilityResult,
    /// Upstream hype at analysis time, if the sentiment source had one.
    pub hype_score: Option<f64>,
    pub input_digest: String,
    pub analyzed_at: DateTime<Utc>,
}

/// Persistence for the latest result per film. Implementations make each
/// `upsert` visible all at once or not at all.
pub trait ScoreStore: Send + Sync {
    fn upsert(&self, record: &ScoreRecord) -> Result<()>;

    /// `NotFound` when the film has never been analyzed.
    fn get(&self, id: &FilmId) -> Result<ScoreRecord>;

    /// All records ordered by film id.
    fn list(&self) -> Result<Vec<ScoreRecord>>;

    fn remove(&self, id: &FilmId) -> Result<()>;
}

impl<T: ScoreStore + ?Sized> ScoreStore for Box<T> {
    fn upsert(&self, record: &ScoreRecord) -> Result<()> {
        (**self).upsert(record)
    }

    fn get(&self, id: &FilmId) -> Result<ScoreRecord> {
        (**self).get(id)
    }

    fn list(&self) -> Result<Vec<ScoreRecord>> {
        (**self).list()
    }

    fn remove(&self, id: &FilmId) -> Result<()> {
        (**self).remove(id)
    }
}

impl<T: ScoreStore + ?Sized> ScoreStore for Arc<T> {
    fn upsert(&self, record: &ScoreRecord) -> Result<()> {
        (**self).upsert(record)
    }

    fn get(&self, id: &FilmId) -> Result<ScoreRecord> {
        (**self).get(id)
    }

    fn list(&self) -> Result<Vec<ScoreRecord>> {
        (**self).list()
    }

    fn remove(&self, id: &FilmId) -> Result<()> {
        (**self).remove(id)
    }
}
