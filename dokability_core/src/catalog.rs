//! Default catalog of container sizes.
//!
//! This module provides the built-in volume options and the default
//! alcohol percentage used to pre-fill input for each of them.

use crate::types::{VolumeOption, VolumeUnit};
use crate::{Error, Result};
use once_cell::sync::Lazy;

/// Default ABV for spirits (shots, spirit bottles)
pub const SPIRITS_ABV: f64 = 40.0;

/// Default ABV for wine (glass, bottle, box)
pub const WINE_ABV: f64 = 12.0;

/// Default ABV for beer, cider and anything else
pub const BEER_ABV: f64 = 5.0;

const SPIRIT_LABELS: &[&str] = &["4cl", "8cl", "70cl", "1L"];
const WINE_LABELS: &[&str] = &["12cl", "75cl", "1.5L"];

/// Cached volume catalog - built once and reused across all operations
static VOLUME_OPTIONS: Lazy<Vec<VolumeOption>> = Lazy::new(build_volume_options);

/// Get a reference to the cached volume catalog, in display order
pub fn volume_options() -> &'static [VolumeOption] {
    &VOLUME_OPTIONS
}

fn build_volume_options() -> Vec<VolumeOption> {
    use VolumeUnit::{Centiliter, Liter};

    vec![
        VolumeOption::new(4.0, Centiliter, "4cl"),
        VolumeOption::new(8.0, Centiliter, "8cl"),
        VolumeOption::new(12.0, Centiliter, "12cl"),
        VolumeOption::new(33.0, Centiliter, "33cl"),
        VolumeOption::new(40.0, Centiliter, "40cl"),
        VolumeOption::new(44.0, Centiliter, "44cl"),
        VolumeOption::new(50.0, Centiliter, "50cl"),
        VolumeOption::new(70.0, Centiliter, "70cl"),
        VolumeOption::new(75.0, Centiliter, "75cl"),
        VolumeOption::new(1.0, Liter, "1L"),
        VolumeOption::new(1.5, Liter, "1.5L"),
    ]
}

/// Look up a catalog option by label (case-insensitive)
pub fn find_volume(label: &str) -> Option<&'static VolumeOption> {
    let wanted = label.trim();
    volume_options()
        .iter()
        .find(|opt| opt.label.eq_ignore_ascii_case(wanted))
}

/// Default alcohol percentage to pre-fill for a volume label
///
/// This is a heuristic for input convenience only; nothing enforces it.
pub fn default_abv_for(label: &str) -> f64 {
    let label = label.trim();
    if SPIRIT_LABELS.iter().any(|l| l.eq_ignore_ascii_case(label)) {
        SPIRITS_ABV
    } else if WINE_LABELS.iter().any(|l| l.eq_ignore_ascii_case(label)) {
        WINE_ABV
    } else {
        BEER_ABV
    }
}

/// Resolve a volume given either a catalog label ("33cl", "1L") or a bare
/// magnitude paired with a unit tag.
pub fn resolve_volume(volume: &str, unit: Option<&str>) -> Result<VolumeOption> {
    if unit.is_none() {
        if let Some(opt) = find_volume(volume) {
            return Ok(opt.clone());
        }
    }

    let (magnitude, suffix) = split_magnitude(volume);
    let value: f64 = magnitude
        .parse()
        .map_err(|_| Error::UnknownVolume(volume.to_string()))?;

    let unit = match (unit, suffix.is_empty()) {
        (Some(u), _) => VolumeUnit::from(u),
        (None, false) => VolumeUnit::from(suffix),
        (None, true) => VolumeUnit::Milliliter,
    };

    Ok(VolumeOption::custom(value, unit))
}

fn split_magnitude(input: &str) -> (&str, &str) {
    let input = input.trim();
    let idx = input
        .find(|c: char| c.is_ascii_alphabetic())
        .unwrap_or(input.len());
    (input[..idx].trim(), input[idx..].trim())
}
