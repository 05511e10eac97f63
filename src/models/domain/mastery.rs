use serde::Serialize;

pub const MAX_MASTERY: f64 = 7.0;

/// Decayed, clamped mastery for one (user, topic) pair. Derived on demand, never stored.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize)]
pub struct MasteryScore(f64);

impl MasteryScore {
    pub const ZERO: MasteryScore = MasteryScore(0.0);

    /// Clamps a raw accumulated sum into `[0, MAX_MASTERY]`.
    pub fn from_raw(sum: f64) -> Self {
        if sum.is_nan() {
            return Self::ZERO;
        }
        MasteryScore(sum.clamp(0.0, MAX_MASTERY))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl From<MasteryScore> for f64 {
    fn from(score: MasteryScore) -> Self {
        score.0
    }
}
