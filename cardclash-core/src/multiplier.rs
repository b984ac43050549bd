//! Exact rational multipliers for power and reward scaling

use serde::Serialize;

/// A multiplier expressed as `numerator / denominator`
///
/// Applying a multiplier floors the result, so integer power and currency
/// values never pick up fractional drift.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Multiplier {
    pub numerator: u32,
    pub denominator: u32,
}

impl Multiplier {
    /// Identity multiplier (x1)
    pub const ONE: Multiplier = Multiplier::new(1, 1);

    pub const fn new(numerator: u32, denominator: u32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// Build a multiplier from a whole percentage (150 -> x1.5)
    pub const fn percent(percent: u32) -> Self {
        Self::new(percent, 100)
    }

    pub fn is_identity(&self) -> bool {
        self.numerator == self.denominator
    }

    /// floor(value * numerator / denominator)
    pub fn apply(&self, value: u32) -> u32 {
        let scaled = u64::from(value) * u64::from(self.numerator) / u64::from(self.denominator);
        u32::try_from(scaled).unwrap_or(u32::MAX)
    }

    /// Scale a signed value, rounding toward zero
    pub fn apply_signed(&self, value: i32) -> i32 {
        let scaled = i64::from(value) * i64::from(self.numerator) / i64::from(self.denominator);
        scaled.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
    }

    /// Approximate value for display
    pub fn as_f64(&self) -> f64 {
        f64::from(self.numerator) / f64::from(self.denominator)
    }
}

impl Default for Multiplier {
    fn default() -> Self {
        Multiplier::ONE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_floors() {
        let m = Multiplier::new(13, 10);
        assert_eq!(m.apply(100), 130);
        assert_eq!(m.apply(3), 3); // 3.9
        assert_eq!(m.apply(7), 9); // 9.1
        assert_eq!(m.apply(0), 0);
    }

    #[test]
    fn test_apply_signed_rounds_toward_zero() {
        let half = Multiplier::new(1, 2);
        assert_eq!(half.apply_signed(25), 12);
        assert_eq!(half.apply_signed(-15), -7);
        assert_eq!(half.apply(25), 12);
    }

    #[test]
    fn test_no_overflow() {
        let m = Multiplier::new(13, 10);
        assert_eq!(m.apply(u32::MAX), u32::MAX);
    }

    #[test]
    fn test_percent() {
        assert_eq!(Multiplier::percent(150).apply(80), 120);
        assert!(Multiplier::percent(100).is_identity());
        assert!((Multiplier::new(13, 10).as_f64() - 1.3).abs() < 1e-9);
    }
}
