pub mod json;
pub mod md;

use crate::error::FilmPulseError;
use crate::score::composite::{contributions, Contribution};
use crate::score::grade::{release_recommendation, ReleaseRecommendation};
use crate::store::ScoreRecord;
use crate::types::film::{Film, FilmId};
use crate::types::scoring::{Grade, DISCOVERABILITY_WEIGHTS};
use serde::Serialize;

#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    Json,
    Md,
}

/// Dashboard view of one stored analysis.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreReport {
    pub film_id: FilmId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub discoverability: u8,
    pub grade: Grade,
    pub interpretation: &'static str,
    pub hype_score: Option<f64>,
    pub breakdown: Vec<Contribution>,
    pub release_recommendation: ReleaseRecommendation,
    pub analyzed_at: String,
}

impl ScoreReport {
    pub fn new(record: &ScoreRecord, film: Option<&Film>) -> Self {
        let result = &record.result;
        Self {
            film_id: record.film_id.clone(),
            title: film.map(|film| film.title.clone()),
            discoverability: result.score,
            grade: result.grade,
            interpretation: result.grade.interpretation(),
            hype_score: record.hype_score,
            breakdown: contributions(&result.breakdown, &DISCOVERABILITY_WEIGHTS),
            release_recommendation: release_recommendation(
                result.score,
                film.and_then(Film::release_month),
            ),
            analyzed_at: record.analyzed_at.to_rfc3339(),
        }
    }
}

pub fn render(report: &ScoreReport, format: OutputFormat) -> Result<String, FilmPulseError> {
    match format {
        OutputFormat::Json => json::to_json(report).map_err(FilmPulseError::Json),
        OutputFormat::Md => Ok(md::to_markdown(report)),
    }
}
