use super::{ScoreRecord, ScoreStore};
use crate::error::{FilmPulseError, Result};
use crate::types::film::FilmId;
use parking_lot::RwLock;
use std::collections::BTreeMap;

#[derive(Debug, Default)]
pub struct MemoryScoreStore {
    records: RwLock<BTreeMap<FilmId, ScoreRecord>>,
}

impl MemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScoreStore for MemoryScoreStore {
    fn upsert(&self, record: &ScoreRecord) -> Result<()> {
        self.records
            .write()
            .insert(record.film_id.clone(), record.clone());
        Ok(())
    }

    fn get(&self, id: &FilmId) -> Result<ScoreRecord> {
        self.records
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| FilmPulseError::NotFound(id.to_string()))
    }

    fn list(&self) -> Result<Vec<ScoreRecord>> {
        Ok(self.records.read().values().cloned().collect())
    }

    fn remove(&self, id: &FilmId) -> Result<()> {
        self.records
            .write()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| FilmPulseError::NotFound(id.to_string()))
    }
}
