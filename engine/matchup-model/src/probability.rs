//! Win-probability heuristic
//!
//! Blends the live score margin with the projected margin and squashes the
//! result through a logistic curve. This is a display heuristic, not a
//! calibrated forecast.

use serde::{Deserialize, Serialize};

/// Weight given to the current score margin
pub const SCORE_WEIGHT: f64 = 0.3;

/// Weight given to the projected score margin
pub const PROJECTION_WEIGHT: f64 = 0.7;

/// Fraction of the combined projection used to normalize the advantage
pub const PROJECTION_SCALE: f64 = 0.1;

/// Decimal places kept on each probability
pub const PROBABILITY_PRECISION: u32 = 3;

/// Home/away win probabilities for a single matchup
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WinProbability {
    pub home: f64,
    pub away: f64,
}

impl WinProbability {
    /// Even odds, used when there is no projection signal
    pub const EVEN: WinProbability = WinProbability { home: 0.5, away: 0.5 };
}

/// Estimate home and away win probabilities.
///
/// `advantage = 0.3 * score_diff + 0.7 * proj_diff`, normalized by a tenth of
/// the combined projection and passed through `1 / (1 + e^-x)`. Both values
/// are rounded to three decimals and always sum to one.
pub fn estimate_win_probability(
    home_score: f64,
    away_score: f64,
    home_projected: f64,
    away_projected: f64,
) -> WinProbability {
    let total_projected = home_projected + away_projected;
    if total_projected <= 0.0 || !total_projected.is_finite() {
        return WinProbability::EVEN;
    }

    let score_diff = home_score - away_score;
    let proj_diff = home_projected - away_projected;
    let advantage = SCORE_WEIGHT * score_diff + PROJECTION_WEIGHT * proj_diff;

    let scaled = advantage / (total_projected * PROJECTION_SCALE);
    if !scaled.is_finite() {
        return WinProbability::EVEN;
    }

    let home = round_to(logistic(scaled), PROBABILITY_PRECISION);
    let away = round_to(1.0 - home, PROBABILITY_PRECISION);

    WinProbability { home, away }
}

/// Round `value` to `places` decimal digits, halves away from zero
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}

fn logistic(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_complementary(p: WinProbability) {
        assert!((0.0..=1.0).contains(&p.home), "home out of range: {}", p.home);
        assert!((0.0..=1.0).contains(&p.away), "away out of range: {}", p.away);
        assert!((p.home + p.away - 1.0).abs() < 1e-9, "sum was {}", p.home + p.away);
    }

    #[test]
    fn test_reference_matchup() {
        let p = estimate_win_probability(50.0, 40.0, 100.0, 90.0);
        assert_eq!(p.home, 0.629);
        assert_eq!(p.away, 0.371);
    }

    #[test]
    fn test_zero_projection_is_even_regardless_of_score() {
        assert_eq!(estimate_win_probability(0.0, 0.0, 0.0, 0.0), WinProbability::EVEN);
        assert_eq!(estimate_win_probability(87.4, 12.0, 0.0, 0.0), WinProbability::EVEN);
        assert_eq!(estimate_win_probability(0.0, 150.2, 0.0, 0.0), WinProbability::EVEN);
    }

    #[test]
    fn test_identical_teams_are_even() {
        let p = estimate_win_probability(60.0, 60.0, 110.0, 110.0);
        assert_eq!(p, WinProbability::EVEN);
    }

    #[test]
    fn test_symmetry_when_sides_swap() {
        let home = estimate_win_probability(72.3, 55.1, 120.4, 101.9);
        let swapped = estimate_win_probability(55.1, 72.3, 101.9, 120.4);
        assert_eq!(home.home, swapped.away);
        assert_eq!(home.away, swapped.home);
    }

    #[test]
    fn test_blowout_saturates_without_leaving_range() {
        let p = estimate_win_probability(180.0, 0.0, 180.0, 0.1);
        assert_complementary(p);
        assert!(p.home > 0.99);
    }

    #[test]
    fn test_projection_outweighs_current_score() {
        // Away leads now, home projects far better
        let p = estimate_win_probability(20.0, 30.0, 130.0, 90.0);
        assert!(p.home > 0.5);
    }

    #[test]
    fn test_outputs_stay_bounded_and_rounded() {
        let scores = [0.0, 3.2, 17.8, 45.0, 99.9, 140.6];
        let projections = [0.0, 0.4, 60.2, 95.5, 121.0, 180.3];
        for &hs in &scores {
            for &as_ in &scores {
                for &hp in &projections {
                    for &ap in &projections {
                        let p = estimate_win_probability(hs, as_, hp, ap);
                        assert_complementary(p);
                        assert_eq!(round_to(p.home, 3), p.home);
                        assert_eq!(round_to(p.away, 3), p.away);
                    }
                }
            }
        }
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(0.62862, 3), 0.629);
        assert_eq!(round_to(101.26, 1), 101.3);
        assert_eq!(round_to(-2.45, 0), -2.0);
    }
}
