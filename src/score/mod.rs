pub mod composite;
pub mod grade;
pub mod normalize;

use crate::error::{FilmPulseError, Result};
use crate::signals::{MarketSignals, SignalProvider};
use crate::store::{ScoreRecord, ScoreStore};
use crate::types::config::ScoringPolicy;
use crate::types::film::{Film, FilmId};
use crate::types::scoring::{DiscoverabilityResult, DISCOVERABILITY_WEIGHTS};
use chrono::Utc;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

/// Pure scoring entry point: identical film, signals and policy always
/// produce an identical result.
pub fn compute_discoverability(
    film: &Film,
    signals: &MarketSignals,
    policy: &ScoringPolicy,
) -> Result<DiscoverabilityResult> {
    let breakdown = normalize::normalize(film, signals, policy)?;
    let score = composite::composite_score(&breakdown, &DISCOVERABILITY_WEIGHTS);
    Ok(DiscoverabilityResult {
        score,
        grade: grade::grade_for(score),
        breakdown,
    })
}

/// SHA-256 over the inputs that produced a result.
pub fn input_digest(film: &Film, signals: &MarketSignals) -> Result<String> {
    #[derive(Serialize)]
    struct Inputs<'a> {
        film: &'a Film,
        signals: &'a MarketSignals,
    }

    let bytes = serde_json::to_vec(&Inputs { film, signals })?;
    let digest = Sha256::digest(&bytes);
    Ok(format!("{digest:x}"))
}

/// Analyzes films against a signal source and persists each result whole.
pub struct Engine<P, S> {
    provider: P,
    store: S,
    policy: ScoringPolicy,
}

impl<P: SignalProvider, S: ScoreStore> Engine<P, S> {
    pub fn new(provider: P, store: S, policy: ScoringPolicy) -> Result<Self> {
        composite::check_weights(&DISCOVERABILITY_WEIGHTS)?;
        policy.validate()?;
        Ok(Self {
            provider,
            store,
            policy,
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn policy(&self) -> &ScoringPolicy {
        &self.policy
    }

    /// Computes without persisting.
    pub fn preview(&self, film: &Film) -> Result<ScoreRecord> {
        film.validate()?;
        let signals = self.fetch_signals(film)?;
        let result = compute_discoverability(film, &signals, &self.policy)?;
        debug!(film_id = %film.id, breakdown = ?result.breakdown, "discoverability computed");
        Ok(ScoreRecord {
            film_id: film.id.clone(),
            result,
            hype_score: signals.hype_score,
            input_digest: input_digest(film, &signals)?,
            analyzed_at: Utc::now(),
        })
    }

    /// Computes and replaces the film's stored result. On any error the
    /// previously stored result is left as it was.
    pub fn analyze(&self, film: &Film) -> Result<ScoreRecord> {
        let record = self.preview(film)?;
        self.store.upsert(&record)?;
        info!(
            film_id = %record.film_id,
            score = record.result.score,
            grade = %record.result.grade,
            "discoverability stored"
        );
        Ok(record)
    }

    pub fn latest(&self, id: &FilmId) -> Result<ScoreRecord> {
        self.store.get(id)
    }

    fn fetch_signals(&self, film: &Film) -> Result<MarketSignals> {
        let signals = self.provider.signals(film).map_err(|err| {
            warn!(film_id = %film.id, error = %err, "signal provider failed");
            match err {
                FilmPulseError::UpstreamUnavailable(_) => err,
                other => FilmPulseError::UpstreamUnavailable(other.to_string()),
            }
        })?;
        signals.validate().map_err(|err| {
            warn!(film_id = %film.id, error = %err, "signal provider returned bad data");
            FilmPulseError::UpstreamUnavailable(err.to_string())
        })?;
        Ok(signals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signals::StaticSignals;
    use crate::store::memory::MemoryScoreStore;
    use crate::types::film::fixtures::sample_film;
    use crate::types::film::Genre;
    use crate::types::scoring::{DiscoverabilityBreakdown, Grade};
    use std::sync::atomic::{AtomicBool, Ordering};

    struct FlakyProvider {
        fail: AtomicBool,
        signals: MarketSignals,
    }

    impl SignalProvider for FlakyProvider {
        fn signals(&self, _film: &Film) -> Result<MarketSignals> {
            if self.fail.load(Ordering::SeqCst) {
                Err(FilmPulseError::UpstreamUnavailable(
                    "sentiment engine timed out".to_string(),
                ))
            } else {
                Ok(self.signals)
            }
        }
    }

    fn hyped() -> MarketSignals {
        MarketSignals {
            hype_score: Some(72.0),
            ..MarketSignals::default()
        }
    }

    fn engine(signals: MarketSignals) -> Engine<StaticSignals, MemoryScoreStore> {
        Engine::new(
            StaticSignals(signals),
            MemoryScoreStore::new(),
            ScoringPolicy::default(),
        )
        .expect("engine should build")
    }

    #[test]
    fn compute_is_idempotent_byte_for_byte() {
        let film = sample_film();
        let policy = ScoringPolicy::default();
        let first = compute_discoverability(&film, &hyped(), &policy).expect("first run");
        let second = compute_discoverability(&film, &hyped(), &policy).expect("second run");
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_vec(&first).expect("serialize"),
            serde_json::to_vec(&second).expect("serialize")
        );
    }

    #[test]
    fn missing_release_date_substitutes_neutral_timing_exactly() {
        let mut film = sample_film();
        film.release_date = None;
        let policy = ScoringPolicy::default();

        let result = compute_discoverability(&film, &hyped(), &policy).expect("should compute");
        assert_eq!(
            result.breakdown.release_timing,
            policy.defaults.release_timing
        );

        let expected = composite::composite_score(
            &DiscoverabilityBreakdown {
                release_timing: policy.defaults.release_timing,
                ..result.breakdown
            },
            &DISCOVERABILITY_WEIGHTS,
        );
        assert_eq!(result.score, expected);
    }

    #[test]
    fn result_grade_matches_score() {
        let result = compute_discoverability(&sample_film(), &hyped(), &ScoringPolicy::default())
            .expect("should compute");
        assert_eq!(result.grade, grade::grade_for(result.score));
    }

    #[test]
    fn strong_film_grades_a() {
        let mut film = sample_film();
        film.cast_popularity = 10.0;
        film.budget = 8e7;
        let signals = MarketSignals {
            hype_score: Some(100.0),
            genre_affinity: Some(1.0),
            market_crowding: Some(0.0),
            release_fit: Some(1.0),
        };
        let result = compute_discoverability(&film, &signals, &ScoringPolicy::default())
            .expect("should compute");
        assert_eq!(result.grade, Grade::A);
    }

    #[test]
    fn analyze_persists_latest_result() {
        let engine = engine(hyped());
        let film = sample_film();

        let record = engine.analyze(&film).expect("analysis should succeed");
        let stored = engine.latest(&film.id).expect("record should be stored");
        assert_eq!(stored.result, record.result);
        assert_eq!(stored.hype_score, Some(72.0));
    }

    #[test]
    fn invalid_film_is_rejected_without_a_write() {
        let engine = engine(hyped());
        let mut film = sample_film();
        film.budget = 0.0;

        assert!(matches!(
            engine.analyze(&film),
            Err(FilmPulseError::InvalidInput(_))
        ));
        assert!(matches!(
            engine.latest(&film.id),
            Err(FilmPulseError::NotFound(_))
        ));
    }

    #[test]
    fn cast_popularity_out_of_range_is_rejected_without_a_write() {
        let engine = engine(hyped());
        for cast in [0.5, 10.5] {
            let mut film = sample_film();
            film.cast_popularity = cast;
            assert!(matches!(
                engine.analyze(&film),
                Err(FilmPulseError::InvalidInput(_))
            ));
            assert!(matches!(
                engine.latest(&film.id),
                Err(FilmPulseError::NotFound(_))
            ));
        }
    }

    #[test]
    fn invalid_reanalysis_keeps_previous_result() {
        let engine = engine(hyped());
        let film = sample_film();
        let before = engine.analyze(&film).expect("first analysis");

        let mut changed = film.clone();
        changed.cast_popularity = 11.0;
        assert!(engine.analyze(&changed).is_err());
        let after = engine.latest(&film.id).expect("record should remain");
        assert_eq!(after, before);
    }

    #[test]
    fn score_on_a_half_point_rounds_to_even_and_grades_accordingly() {
        // 17.7 + 1.8 + 15 + 10 + 20 = 64.5 points
        let mut film = sample_film();
        film.genre = Genre::Drama;
        film.budget = 8e6;
        film.cast_popularity = 1.0;
        let signals = MarketSignals {
            hype_score: Some(9.0),
            genre_affinity: Some(1.0),
            market_crowding: Some(0.0),
            release_fit: Some(1.0),
        };
        let result = compute_discoverability(&film, &signals, &ScoringPolicy::default())
            .expect("should compute");
        assert_eq!(result.score, 64);
        assert_eq!(result.grade, Grade::C);
    }

    #[test]
    fn upstream_failure_keeps_previous_result() {
        let provider = FlakyProvider {
            fail: AtomicBool::new(false),
            signals: hyped(),
        };
        let engine = Engine::new(provider, MemoryScoreStore::new(), ScoringPolicy::default())
            .expect("engine should build");
        let film = sample_film();
        let before = engine.analyze(&film).expect("first analysis should succeed");

        engine.provider.fail.store(true, Ordering::SeqCst);
        let mut changed = film.clone();
        changed.cast_popularity = 2.0;
        assert!(matches!(
            engine.analyze(&changed),
            Err(FilmPulseError::UpstreamUnavailable(_))
        ));

        let after = engine.latest(&film.id).expect("previous record should remain");
        assert_eq!(after.result, before.result);
        assert_eq!(after.input_digest, before.input_digest);
    }

    #[test]
    fn out_of_range_provider_signals_count_as_upstream_failure() {
        let engine = engine(MarketSignals {
            hype_score: Some(250.0),
            ..MarketSignals::default()
        });
        assert!(matches!(
            engine.analyze(&sample_film()),
            Err(FilmPulseError::UpstreamUnavailable(_))
        ));
    }

    #[test]
    fn engine_rejects_invalid_policy() {
        let mut policy = ScoringPolicy::default();
        policy.release_timing[0] = 2.0;
        let result = Engine::new(StaticSignals::default(), MemoryScoreStore::new(), policy);
        assert!(matches!(result, Err(FilmPulseError::ConfigParse(_))));
    }

    #[test]
    fn input_digest_tracks_inputs() {
        let film = sample_film();
        let a = input_digest(&film, &hyped()).expect("digest");
        let b = input_digest(&film, &hyped()).expect("digest");
        let c = input_digest(&film, &MarketSignals::default()).expect("digest");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn concurrent_reanalysis_never_mixes_results() {
        let engine = engine(hyped());
        let base = sample_film();
        let variants: Vec<Film> = (1..=8)
            .map(|step| Film {
                cast_popularity: f64::from(step),
                ..base.clone()
            })
            .collect();
        let expected: Vec<DiscoverabilityResult> = variants
            .iter()
            .map(|film| {
                compute_discoverability(film, &hyped(), engine.policy()).expect("should compute")
            })
            .collect();

        std::thread::scope(|scope| {
            for film in &variants {
                let engine = &engine;
                scope.spawn(move || {
                    for _ in 0..25 {
                        engine.analyze(film).expect("analysis should succeed");
                    }
                });
            }
        });

        let stored = engine.latest(&base.id).expect("record should exist");
        assert!(expected.contains(&stored.result));
    }
}
