use serde::{Deserialize, Serialize};
use std::fmt;

pub const KG_TO_LBS: f64 = 2.20462;
pub const LBS_TO_KG: f64 = 0.453592;
pub const M_TO_IN: f64 = 39.3701;

/// Display unit for weights. Storage is always kilograms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[default]
    Kg,
    Lbs,
}

impl Unit {
    pub fn as_str(self) -> &'static str {
        match self {
            Unit::Kg => "kg",
            Unit::Lbs => "lbs",
        }
    }

    /// Converts a canonical kilogram value into this unit.
    pub fn from_kg(self, kg: f64) -> f64 {
        match self {
            Unit::Kg => kg,
            Unit::Lbs => kg_to_lbs(kg),
        }
    }

    /// Converts a value expressed in this unit into kilograms.
    pub fn to_kg(self, value: f64) -> f64 {
        match self {
            Unit::Kg => value,
            Unit::Lbs => lbs_to_kg(value),
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn kg_to_lbs(kg: f64) -> f64 {
    kg * KG_TO_LBS
}

pub fn lbs_to_kg(lbs: f64) -> f64 {
    lbs * LBS_TO_KG
}

pub fn cm_to_m(cm: f64) -> f64 {
    cm / 100.0
}

pub fn m_to_cm(m: f64) -> f64 {
    m * 100.0
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeetInches {
    pub feet: u32,
    pub inches: u32,
}

/// Whole feet plus inches, rounded to the nearest inch before splitting so
/// the result never reads `5 ft 12 in`.
pub fn m_to_ft_in(m: f64) -> FeetInches {
    let total_inches = (m * M_TO_IN).round().max(0.0) as u32;
    FeetInches {
        feet: total_inches / 12,
        inches: total_inches % 12,
    }
}

pub fn ft_in_to_m(feet: f64, inches: f64) -> f64 {
    (feet * 12.0 + inches) / M_TO_IN
}

/// Rounds half away from zero to one decimal place.
pub fn round1(value: f64) -> f64 {
    let rounded = (value * 10.0).round() / 10.0;
    if rounded == 0.0 { 0.0 } else { rounded }
}

/// Fixed one-decimal rendering, e.g. `70.25` -> `"70.3"`.
pub fn fixed1(value: f64) -> String {
    format!("{:.1}", round1(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-4 * b.abs().max(1.0)
    }

    #[test]
    fn kg_lbs_round_trip() {
        for x in [0.1, 1.0, 45.5, 70.25, 82.0, 150.0, 300.7] {
            assert!(close(lbs_to_kg(kg_to_lbs(x)), x), "round trip failed for {x}");
        }
    }

    #[test]
    fn cm_round_trip() {
        for x in [0.5, 1.62, 1.8, 2.1] {
            assert!(close(cm_to_m(m_to_cm(x)), x));
        }
    }

    #[test]
    fn ft_in_round_trip_for_whole_inches() {
        for (feet, inches) in [(5u32, 0u32), (5, 11), (6, 2), (4, 7)] {
            let m = ft_in_to_m(f64::from(feet), f64::from(inches));
            assert_eq!(m_to_ft_in(m), FeetInches { feet, inches });
        }
    }

    #[test]
    fn unit_conversions_use_kg_as_canonical() {
        assert_eq!(Unit::Kg.to_kg(80.0), 80.0);
        assert!(close(Unit::Lbs.to_kg(176.37), 80.0));
        assert!(close(Unit::Lbs.from_kg(80.0), 176.3696));
    }

    #[test]
    fn fixed1_rounds_half_up_and_drops_negative_zero() {
        assert_eq!(fixed1(70.25), "70.3");
        assert_eq!(fixed1(-5.0), "-5.0");
        assert_eq!(fixed1(-0.01), "0.0");
        assert_eq!(fixed1(81.0), "81.0");
    }

    #[test]
    fn unit_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Unit::Lbs).unwrap(), "\"lbs\"");
        let unit: Unit = serde_json::from_str("\"kg\"").unwrap();
        assert_eq!(unit, Unit::Kg);
    }
}
