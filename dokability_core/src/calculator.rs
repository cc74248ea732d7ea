//! Drink value calculations.
//!
//! Every function here is pure. Inputs are not range-checked: negative
//! volumes or percentages above 100 propagate arithmetically, and the two
//! divisions fall back to a sentinel `0.0` when the divisor is not positive.

use crate::types::{DerivedMetrics, VolumeOption, VolumeUnit};

/// Empirical scaling from ml of ethanol per euro to the dokability score.
/// Calibrated so typical retail drinks land between 1 and 100.
pub const SCORE_MULTIPLIER: f64 = 6.5;

/// Upper bound of the dokability score
pub const MAX_SCORE: i32 = 100;

/// Convert a volume to milliliters
pub fn to_milliliters(value: f64, unit: VolumeUnit) -> f64 {
    value * unit.ml_factor()
}

/// Milliliters of ethanol in `volume_ml` at `alcohol_percent` ABV
pub fn calculate_pure_alcohol(volume_ml: f64, alcohol_percent: f64) -> f64 {
    volume_ml * (alcohol_percent / 100.0)
}

/// Price per centiliter of pure alcohol, or 0 when there is no alcohol
pub fn calculate_price_per_cl_alcohol(price: f64, pure_alcohol_ml: f64) -> f64 {
    if pure_alcohol_ml <= 0.0 {
        return 0.0;
    }
    price / (pure_alcohol_ml / 10.0)
}

/// Milliliters of pure alcohol per currency unit, or 0 for a non-positive price
pub fn calculate_ml_per_euro(pure_alcohol_ml: f64, price: f64) -> f64 {
    if price <= 0.0 {
        return 0.0;
    }
    pure_alcohol_ml / price
}

/// Dokability score: `min(100, round(ml_per_euro * 6.5))`
///
/// Halves round toward positive infinity.
pub fn calculate_dokability_score(ml_per_euro: f64) -> i32 {
    let rounded = round_half_up(ml_per_euro * SCORE_MULTIPLIER);
    // `as` saturates and maps NaN to 0
    (rounded as i32).min(MAX_SCORE)
}

/// Round to the nearest integer, ties toward positive infinity
fn round_half_up(x: f64) -> f64 {
    let floor = x.floor();
    // The fractional part of a double is exact, so no `x + 0.5` carry
    if x - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

/// Run the full pipeline for one drink
///
/// Order: normalize volume, pure alcohol, price per cl, ml per euro, score.
pub fn calculate(
    price: f64,
    volume: f64,
    volume_unit: VolumeUnit,
    alcohol_percent: f64,
) -> DerivedMetrics {
    let volume_ml = to_milliliters(volume, volume_unit);
    let pure_alcohol_ml = calculate_pure_alcohol(volume_ml, alcohol_percent);
    let price_per_cl_alcohol = calculate_price_per_cl_alcohol(price, pure_alcohol_ml);
    let ml_per_euro = calculate_ml_per_euro(pure_alcohol_ml, price);
    let dokability_score = calculate_dokability_score(ml_per_euro);

    DerivedMetrics {
        volume_ml,
        pure_alcohol_ml,
        price_per_cl_alcohol,
        ml_per_euro,
        dokability_score,
    }
}

/// [`calculate`] for a catalog or custom volume option
pub fn calculate_option(price: f64, volume: &VolumeOption, alcohol_percent: f64) -> DerivedMetrics {
    calculate(price, volume.value, volume.unit, alcohol_percent)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-3;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < EPS
    }

    #[test]
    fn test_to_milliliters_factors() {
        for v in [0.0, 0.75, 1.0, 33.0, -2.5, 1234.5] {
            assert_eq!(to_milliliters(v, VolumeUnit::Liter), 1000.0 * v);
            assert_eq!(to_milliliters(v, VolumeUnit::Centiliter), 10.0 * v);
            assert_eq!(to_milliliters(v, VolumeUnit::Milliliter), v);
        }
    }

    #[test]
    fn test_unknown_unit_is_identity() {
        assert_eq!(to_milliliters(42.0, VolumeUnit::from("oz")), 42.0);
    }

    #[test]
    fn test_pure_alcohol_is_permissive() {
        assert_eq!(calculate_pure_alcohol(1000.0, 40.0), 400.0);
        assert_eq!(calculate_pure_alcohol(100.0, 150.0), 150.0);
        assert_eq!(calculate_pure_alcohol(100.0, -5.0), -5.0);
    }

    #[test]
    fn test_price_per_cl_sentinel() {
        for price in [0.0, 1.0, 3.5, 99.0, -4.0] {
            assert_eq!(calculate_price_per_cl_alcohol(price, 0.0), 0.0);
            assert_eq!(calculate_price_per_cl_alcohol(price, -5.0), 0.0);
        }
        assert_eq!(calculate_price_per_cl_alcohol(10.0, 50.0), 2.0);
    }

    #[test]
    fn test_ml_per_euro_sentinel() {
        for ml in [0.0, 15.51, 400.0] {
            assert_eq!(calculate_ml_per_euro(ml, 0.0), 0.0);
            assert_eq!(calculate_ml_per_euro(ml, -1.0), 0.0);
        }
        assert_eq!(calculate_ml_per_euro(90.0, 25.0), 3.6);
    }

    #[test]
    fn test_score_monotonic_and_capped() {
        let mut previous = calculate_dokability_score(0.0);
        assert_eq!(previous, 0);

        let mut x = 0.0;
        while x < 40.0 {
            let score = calculate_dokability_score(x);
            assert!(score >= previous, "score decreased at {}", x);
            assert!(score <= MAX_SCORE);
            previous = score;
            x += 0.05;
        }

        assert_eq!(calculate_dokability_score(1_000.0), MAX_SCORE);
        assert_eq!(calculate_dokability_score(f64::INFINITY), MAX_SCORE);
    }

    #[test]
    fn test_score_rounds_half_up() {
        // 1.0 * 6.5 = 6.5 -> 7
        assert_eq!(calculate_dokability_score(1.0), 7);
        // 3.6 * 6.5 = 23.4 -> 23
        assert_eq!(calculate_dokability_score(3.6), 23);
    }

    #[test]
    fn test_round_half_up_edges() {
        assert_eq!(round_half_up(0.49999999999999994), 0.0);
        assert_eq!(round_half_up(0.5), 1.0);
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_half_up(-2.6), -3.0);
        assert_eq!(round_half_up(23.4), 23.0);
        assert!(round_half_up(f64::NAN).is_nan());
    }

    #[test]
    fn test_beer_can_scenario() {
        let m = calculate(3.5, 33.0, VolumeUnit::Centiliter, 4.7);
        assert_eq!(m.volume_ml, 330.0);
        assert!(approx(m.pure_alcohol_ml, 15.51));
        assert!(approx(m.price_per_cl_alcohol, 2.2566));
        assert!(approx(m.ml_per_euro, 4.4314));
        assert_eq!(m.dokability_score, 29);
    }

    #[test]
    fn test_wine_bottle_scenario() {
        let m = calculate(25.0, 0.75, VolumeUnit::Liter, 12.0);
        assert_eq!(m.volume_ml, 750.0);
        assert!(approx(m.pure_alcohol_ml, 90.0));
        assert!(approx(m.price_per_cl_alcohol, 2.7778));
        assert!(approx(m.ml_per_euro, 3.6));
        assert_eq!(m.dokability_score, 23);
    }

    #[test]
    fn test_zero_inputs_never_divide_by_zero() {
        let m = calculate(0.0, 0.0, VolumeUnit::Milliliter, 0.0);
        assert_eq!(m.price_per_cl_alcohol, 0.0);
        assert_eq!(m.ml_per_euro, 0.0);
        assert_eq!(m.dokability_score, 0);
        assert!(m.price_per_cl_alcohol.is_finite());
    }

    #[test]
    fn test_calculate_option_matches_calculate() {
        let opt = VolumeOption::new(1.5, VolumeUnit::Liter, "1.5L");
        assert_eq!(
            calculate_option(12.0, &opt, 12.0),
            calculate(12.0, 1.5, VolumeUnit::Liter, 12.0)
        );
    }
}
