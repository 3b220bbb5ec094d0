//! Trust score value object

use serde::{Deserialize, Serialize};

/// A trust weight in [0, 1] attached to every claim.
///
/// Construction and arithmetic both clamp into range, so a `TrustScore`
/// can never hold an out-of-range value.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrustScore(f64);

impl TrustScore {
    /// Create a trust score, clamping into [0, 1].
    ///
    /// # Examples
    ///
    /// ```
    /// use dialectic_domain::TrustScore;
    ///
    /// assert_eq!(TrustScore::new(0.7).value(), 0.7);
    /// assert_eq!(TrustScore::new(1.4).value(), 1.0);
    /// assert_eq!(TrustScore::new(-0.2).value(), 0.0);
    /// ```
    pub fn new(value: f64) -> Self {
        Self(value.clamp(0.0, 1.0))
    }

    /// Get the raw value.
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Apply a signed delta, clamping the result into [0, 1].
    pub fn adjusted(&self, delta: f64) -> Self {
        Self::new(self.0 + delta)
    }
}
