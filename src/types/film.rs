use crate::error::{FilmPulseError, Result};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const FILM_ID_PREFIX: &str = "FP-";
const FILM_ID_BODY_LEN: usize = 8;

/// Film identifier of the form `FP-XXXXXXXX` (upper-case alphanumerics).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FilmId(String);

impl FilmId {
    pub fn generate() -> Self {
        let simple = uuid::Uuid::new_v4().simple().to_string();
        let body = simple[..FILM_ID_BODY_LEN].to_ascii_uppercase();
        Self(format!("{FILM_ID_PREFIX}{body}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for FilmId {
    type Err = FilmPulseError;

    fn from_str(raw: &str) -> Result<Self> {
        let body = raw
            .strip_prefix(FILM_ID_PREFIX)
            .ok_or_else(|| FilmPulseError::InvalidFilmId(raw.to_string()))?;
        let well_formed = body.len() == FILM_ID_BODY_LEN
            && body
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit());
        if !well_formed {
            return Err(FilmPulseError::InvalidFilmId(raw.to_string()));
        }
        Ok(Self(raw.to_string()))
    }
}

impl TryFrom<String> for FilmId {
    type Error = FilmPulseError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<FilmId> for String {
    fn from(id: FilmId) -> Self {
        id.0
    }
}

impl fmt::Display for FilmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Genre {
    Action,
    Romance,
    Thriller,
    Comedy,
    Drama,
    Horror,
}

impl Genre {
    pub const ALL: [Genre; 6] = [
        Genre::Action,
        Genre::Romance,
        Genre::Thriller,
        Genre::Comedy,
        Genre::Drama,
        Genre::Horror,
    ];

    /// Position in [`Genre::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Language {
    Hindi,
    English,
    Tamil,
    Telugu,
    Bengali,
    Marathi,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Platform {
    Theatre,
    #[serde(rename = "OTT")]
    Ott,
    Both,
}

/// A registered film. Immutable input to scoring; a changed attribute means a
/// new `Film` value and a fresh analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Film {
    pub id: FilmId,
    pub title: String,
    pub genre: Genre,
    pub language: Language,
    pub budget: f64,
    #[serde(default)]
    pub release_date: Option<NaiveDate>,
    pub platform: Platform,
    pub cast_popularity: f64,
    #[serde(default)]
    pub owner_id: Option<i64>,
    #[serde(default)]
    pub director: Option<String>,
    #[serde(default)]
    pub production_house: Option<String>,
}

impl Film {
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(FilmPulseError::InvalidInput(
                "title must not be empty".to_string(),
            ));
        }
        if !self.budget.is_finite() || self.budget <= 0.0 {
            return Err(FilmPulseError::InvalidInput(format!(
                "budget must be greater than 0 (found {})",
                self.budget
            )));
        }
        if !(1.0..=10.0).contains(&self.cast_popularity) {
            return Err(FilmPulseError::InvalidInput(format!(
                "cast_popularity must be between 1 and 10 (found {})",
                self.cast_popularity
            )));
        }
        Ok(())
    }

    /// Calendar month (1-12) of the planned release, if one is set.
    pub fn release_month(&self) -> Option<u32> {
        self.release_date.map(|date| date.month())
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn sample_film() -> Film {
        Film {
            id: "FP-0A1B2C3D".parse().expect("fixture id should parse"),
            title: "The Metro Files".to_string(),
            genre: Genre::Thriller,
            language: Language::Hindi,
            budget: 4.5e7,
            release_date: NaiveDate::from_ymd_opt(2024, 11, 1),
            platform: Platform::Ott,
            cast_popularity: 7.5,
            owner_id: Some(1),
            director: Some("Vikramaditya Motwane".to_string()),
            production_house: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::sample_film;
    use super::*;

    #[test]
    fn film_id_accepts_prefixed_alphanumerics() {
        assert!("FP-1234ABCD".parse::<FilmId>().is_ok());
        assert!("FP-1234abcd".parse::<FilmId>().is_err());
        assert!("XX-1234ABCD".parse::<FilmId>().is_err());
        assert!("FP-123".parse::<FilmId>().is_err());
    }

    #[test]
    fn generated_film_id_is_well_formed() {
        let id = FilmId::generate();
        assert!(id.as_str().parse::<FilmId>().is_ok());
    }

    #[test]
    fn validate_rejects_non_positive_budget() {
        let mut film = sample_film();
        film.budget = 0.0;
        assert!(matches!(
            film.validate(),
            Err(FilmPulseError::InvalidInput(_))
        ));
        film.budget = -10.0;
        assert!(film.validate().is_err());
    }

    #[test]
    fn validate_rejects_cast_popularity_out_of_range() {
        let mut film = sample_film();
        film.cast_popularity = 0.5;
        assert!(film.validate().is_err());
        film.cast_popularity = 10.5;
        assert!(film.validate().is_err());
        film.cast_popularity = 10.0;
        assert!(film.validate().is_ok());
    }

    #[test]
    fn genre_index_matches_position_in_all() {
        for (position, genre) in Genre::ALL.iter().enumerate() {
            assert_eq!(genre.index(), position);
        }
    }

    #[test]
    fn platform_uses_upper_case_ott_on_the_wire() {
        let json = serde_json::to_string(&Platform::Ott).expect("platform should serialize");
        assert_eq!(json, "\"OTT\"");
    }
}
