use crate::genome::Genome;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordinal fitness classification, best first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FitnessLevel {
    Best,
    Good,
    NotBad,
    Poor,
}

impl FitnessLevel {
    /// Bucket a total score: >10 Best, >9 Good, >7 NotBad, else Poor
    pub fn from_score(score: f32) -> Self {
        if score > 10.0 {
            FitnessLevel::Best
        } else if score > 9.0 {
            FitnessLevel::Good
        } else if score > 7.0 {
            FitnessLevel::NotBad
        } else {
            FitnessLevel::Poor
        }
    }
}

impl fmt::Display for FitnessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FitnessLevel::Best => write!(f, "best"),
            FitnessLevel::Good => write!(f, "good"),
            FitnessLevel::NotBad => write!(f, "not-bad"),
            FitnessLevel::Poor => write!(f, "poor"),
        }
    }
}

/// Classify a genome. Total: NaN trait values simply score zero.
pub fn evaluate(genome: &Genome) -> FitnessLevel {
    FitnessLevel::from_score(score(genome))
}

/// Sum of the per-trait scores; at most 11.
pub fn score(genome: &Genome) -> f32 {
    red_score(genome.red)
        + green_score(genome.green)
        + blue_score(genome.blue)
        + size_score(genome.size)
        + shape_score(genome)
}

/// Lower red is better
pub fn red_score(red: f32) -> f32 {
    if red < 0.2 {
        2.0
    } else if red < 0.3 {
        1.5
    } else if red < 0.4 {
        1.0
    } else {
        0.0
    }
}

/// Higher green is better
pub fn green_score(green: f32) -> f32 {
    if green > 0.8 {
        2.0
    } else if green > 0.7 {
        1.5
    } else if green > 0.6 {
        1.0
    } else {
        0.0
    }
}

/// Higher blue is better
pub fn blue_score(blue: f32) -> f32 {
    if blue > 0.9 {
        2.0
    } else if blue > 0.8 {
        1.5
    } else if blue > 0.7 {
        1.0
    } else {
        0.0
    }
}

/// Medium sizes score highest, nothing at the extremes
pub fn size_score(size: f32) -> f32 {
    if size > 0.8 || size < 0.2 {
        0.0
    } else if size > 0.6 || size < 0.4 {
        1.0
    } else if size.is_nan() {
        0.0
    } else {
        2.0
    }
}

/// +2 when body and head match, +1 more when the ears match too
pub fn shape_score(genome: &Genome) -> f32 {
    if genome.body_shape != genome.head_shape {
        return 0.0;
    }
    if genome.body_shape == genome.ear_shape {
        3.0
    } else {
        2.0
    }
}
