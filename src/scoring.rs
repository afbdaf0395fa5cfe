use std::{
    collections::VecDeque,
    sync::{Mutex, MutexGuard},
};

use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

/// Half-open `[min, max)` interval a synthetic score is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreRange {
    pub min: f64,
    pub max: f64,
}

impl ScoreRange {
    pub const TRIAGE: ScoreRange = ScoreRange { min: 0.1, max: 0.8 };
    pub const EQUITY_PROFILE_A: ScoreRange = ScoreRange { min: 0.1, max: 0.4 };
    pub const EQUITY_PROFILE_B: ScoreRange = ScoreRange { min: 0.2, max: 0.6 };

    pub fn contains(&self, score: f64) -> bool {
        score >= self.min && score < self.max
    }
}

/// Supplies the opaque disparity score consumed by the synthesizer.
pub trait ScoreSource: Send + Sync {
    fn draw(&self, range: ScoreRange) -> f64;
}

pub struct UniformScoreSource {
    rng: Mutex<StdRng>,
}

impl UniformScoreSource {
    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn rng(&self) -> MutexGuard<'_, StdRng> {
        self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ScoreSource for UniformScoreSource {
    fn draw(&self, range: ScoreRange) -> f64 {
        if range.max <= range.min {
            return range.min;
        }
        self.rng().gen_range(range.min..range.max)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedScoreSource(pub f64);

impl ScoreSource for FixedScoreSource {
    fn draw(&self, _range: ScoreRange) -> f64 {
        self.0
    }
}

/// Replays queued scores in order, then falls back to the lower bound of the
/// requested range.
#[derive(Debug, Default)]
pub struct ScriptedScoreSource {
    queued: Mutex<VecDeque<f64>>,
}

impl ScriptedScoreSource {
    pub fn new(scores: impl IntoIterator<Item = f64>) -> Self {
        Self {
            queued: Mutex::new(scores.into_iter().collect()),
        }
    }
}

impl ScoreSource for ScriptedScoreSource {
    fn draw(&self, range: ScoreRange) -> f64 {
        self.queued
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front()
            .unwrap_or(range.min)
    }
}
