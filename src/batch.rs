use crate::error::{FilmPulseError, Result};
use crate::manifest::{is_manifest_path, load_manifest};
use crate::score::Engine;
use crate::signals::{FilmSignals, MarketSignals};
use crate::store::{ScoreRecord, ScoreStore};
use crate::types::config::ScoringPolicy;
use crate::types::film::{Film, FilmId};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

#[derive(Debug)]
pub struct BatchFailure {
    pub path: PathBuf,
    pub error: FilmPulseError,
}

#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub analyzed: Vec<(PathBuf, ScoreRecord)>,
    pub failures: Vec<BatchFailure>,
}

/// Manifest files under `root`, sorted by path. Hidden directories are skipped.
pub fn discover_manifests(root: &Path) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0 || !entry.file_name().to_string_lossy().starts_with('.')
        })
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file() && is_manifest_path(entry.path()))
        .map(|entry| entry.into_path())
        .collect();
    paths.sort();
    paths
}

/// Analyzes every manifest under `root` in parallel. A film that fails is
/// recorded in the outcome and does not stop the others. When two manifests
/// carry the same film id, the first in path order is analyzed and the
/// later ones fail.
pub fn run_batch<S: ScoreStore>(
    root: &Path,
    store: S,
    fallback: MarketSignals,
    policy: ScoringPolicy,
) -> Result<BatchOutcome> {
    if !root.is_dir() {
        return Err(FilmPulseError::PathNotFound(root.display().to_string()));
    }

    let mut outcome = BatchOutcome::default();
    let mut provider = FilmSignals::new(fallback);
    let mut films: Vec<(PathBuf, Film)> = Vec::new();
    let mut claimed: BTreeMap<FilmId, PathBuf> = BTreeMap::new();
    for path in discover_manifests(root) {
        match load_manifest(&path) {
            Ok(manifest) => {
                let (film, signals) = manifest.register();
                if let Some(first) = claimed.get(&film.id) {
                    let error = FilmPulseError::InvalidInput(format!(
                        "duplicate film id {} (already used by {})",
                        film.id,
                        first.display()
                    ));
                    warn!(path = %path.display(), error = %error, "skipping duplicate film");
                    outcome.failures.push(BatchFailure { path, error });
                    continue;
                }
                claimed.insert(film.id.clone(), path.clone());
                provider.insert(film.id.clone(), signals);
                films.push((path, film));
            }
            Err(error) => {
                warn!(path = %path.display(), error = %error, "skipping unreadable manifest");
                outcome.failures.push(BatchFailure { path, error });
            }
        }
    }

    let engine = Engine::new(provider, store, policy)?;
    let results: Vec<(PathBuf, Result<ScoreRecord>)> = films
        .into_par_iter()
        .map(|(path, film)| {
            let result = engine.analyze(&film);
            (path, result)
        })
        .collect();

    for (path, result) in results {
        match result {
            Ok(record) => outcome.analyzed.push((path, record)),
            Err(error) => {
                warn!(path = %path.display(), error = %error, "film analysis failed");
                outcome.failures.push(BatchFailure { path, error });
            }
        }
    }
    info!(
        analyzed = outcome.analyzed.len(),
        failed = outcome.failures.len(),
        "batch complete"
    );
    Ok(outcome)
}
