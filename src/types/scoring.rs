use serde::{Deserialize, Serialize};
use std::fmt;

/// Fraction in [0, 1].
pub type SubScore = f64;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weights {
    pub audience_match: f64,
    pub buzz_score: f64,
    pub competition_index: f64,
    pub budget_efficiency: f64,
    pub release_timing: f64,
}

pub const DISCOVERABILITY_WEIGHTS: Weights = Weights {
    audience_match: 0.25,
    buzz_score: 0.20,
    competition_index: 0.15,
    budget_efficiency: 0.20,
    release_timing: 0.20,
};

impl Weights {
    pub fn sum(&self) -> f64 {
        self.audience_match
            + self.buzz_score
            + self.competition_index
            + self.budget_efficiency
            + self.release_timing
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiscoverabilityBreakdown {
    pub audience_match: SubScore,
    pub buzz_score: SubScore,
    pub competition_index: SubScore,
    pub budget_efficiency: SubScore,
    pub release_timing: SubScore,
}

impl DiscoverabilityBreakdown {
    pub fn uniform(value: SubScore) -> Self {
        Self {
            audience_match: value,
            buzz_score: value,
            competition_index: value,
            budget_efficiency: value,
            release_timing: value,
        }
    }

    /// Named components paired with their weights, in display order.
    pub fn components(&self, weights: &Weights) -> [(&'static str, SubScore, f64); 5] {
        [
            ("audience_match", self.audience_match, weights.audience_match),
            ("buzz_score", self.buzz_score, weights.buzz_score),
            (
                "competition_index",
                self.competition_index,
                weights.competition_index,
            ),
            (
                "budget_efficiency",
                self.budget_efficiency,
                weights.budget_efficiency,
            ),
            ("release_timing", self.release_timing, weights.release_timing),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
}

impl Grade {
    pub fn as_char(self) -> char {
        match self {
            Self::A => 'A',
            Self::B => 'B',
            Self::C => 'C',
            Self::D => 'D',
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'A' => Some(Self::A),
            'B' => Some(Self::B),
            'C' => Some(Self::C),
            'D' => Some(Self::D),
            _ => None,
        }
    }

    pub fn interpretation(self) -> &'static str {
        match self {
            Self::A => "Excellent discoverability: prime wide theatrical release.",
            Self::B => "Good discoverability: selective theatrical plus OTT premiere.",
            Self::C => "Moderate discoverability: niche audiences and festival circuit.",
            Self::D => "Low discoverability: rethink positioning before release.",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiscoverabilityResult {
    pub score: u8,
    pub grade: Grade,
    pub breakdown: DiscoverabilityBreakdown,
}
