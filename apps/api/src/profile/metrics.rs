//! Energy-balance metrics derived from a user's physical profile.
//!
//! BMR uses the Mifflin–St Jeor equation (Mifflin et al., 1990):
//! `10 × weight_kg + 6.25 × height_cm − 5 × age + s`, with `s = +5` for men and
//! `s = −161` for women. TDEE scales the unrounded BMR by an activity factor.
//!
//! Rounding is half away from zero (`f64::round`), which equals half-up for
//! the non-negative values produced here.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::user::{ActivityLevel, Gender};

const MSJ_WEIGHT_COEF: f64 = 10.0;
const MSJ_HEIGHT_COEF: f64 = 6.25;
const MSJ_AGE_COEF: f64 = -5.0;
const MSJ_MALE_CONSTANT: f64 = 5.0;
const MSJ_FEMALE_CONSTANT: f64 = -161.0;

/// Multiplier applied when the stored activity level is not recognised.
pub const DEFAULT_ACTIVITY_MULTIPLIER: f64 = 1.55;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetricsError {
    /// Mifflin–St Jeor only defines male and female constants.
    #[error("BMR is not defined for gender '{0}'")]
    UnsupportedGender(String),

    #[error("profile is missing a positive {0}")]
    IncompleteProfile(&'static str),
}

impl MetricsError {
    /// Stable code exposed to API clients.
    pub fn code(&self) -> &'static str {
        match self {
            MetricsError::UnsupportedGender(_) => "unsupported_gender",
            MetricsError::IncompleteProfile(_) => "incomplete_profile",
        }
    }
}

/// Physical attributes needed for the metrics.
#[derive(Debug, Clone, Copy)]
pub struct BodyProfile {
    pub age: i32,
    pub gender: Gender,
    pub weight_kg: f64,
    pub height_cm: f64,
    /// `None` when the stored activity level is unrecognised.
    pub activity_level: Option<ActivityLevel>,
}

/// Why BMR/TDEE could not be computed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnergyUnavailable {
    pub code: String,
    pub message: String,
}

impl From<MetricsError> for EnergyUnavailable {
    fn from(e: MetricsError) -> Self {
        Self {
            code: e.code().to_string(),
            message: e.to_string(),
        }
    }
}

/// Metrics bundle returned with the profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnergyMetrics {
    pub bmi: f64,
    pub bmi_category: String,
    pub bmr: Option<i64>,
    pub tdee: Option<i64>,
    pub activity_multiplier: f64,
    pub energy_unavailable: Option<EnergyUnavailable>,
}

/// BMI to one decimal place. Zero when height is not positive.
pub fn compute_bmi(weight_kg: f64, height_cm: f64) -> f64 {
    let height_m = height_cm / 100.0;
    if height_m <= 0.0 {
        return 0.0;
    }
    round_to(weight_kg / (height_m * height_m), 1)
}

/// Category band for an already rounded BMI.
pub fn bmi_category(bmi: f64) -> &'static str {
    if bmi <= 0.0 {
        "Unknown"
    } else if bmi < 18.5 {
        "Underweight"
    } else if bmi < 25.0 {
        "Normal weight"
    } else if bmi < 30.0 {
        "Overweight"
    } else {
        "Obese"
    }
}

/// Unrounded Mifflin–St Jeor BMR in kcal/day.
pub fn compute_bmr(
    weight_kg: f64,
    height_cm: f64,
    age: i32,
    gender: Gender,
) -> Result<f64, MetricsError> {
    if weight_kg <= 0.0 {
        return Err(MetricsError::IncompleteProfile("weight"));
    }
    if height_cm <= 0.0 {
        return Err(MetricsError::IncompleteProfile("height"));
    }
    if age <= 0 {
        return Err(MetricsError::IncompleteProfile("age"));
    }

    let gender_constant = match gender {
        Gender::Male => MSJ_MALE_CONSTANT,
        Gender::Female => MSJ_FEMALE_CONSTANT,
        other => return Err(MetricsError::UnsupportedGender(other.as_str().to_string())),
    };

    Ok(MSJ_WEIGHT_COEF * weight_kg
        + MSJ_HEIGHT_COEF * height_cm
        + MSJ_AGE_COEF * f64::from(age)
        + gender_constant)
}

pub fn activity_multiplier(level: Option<ActivityLevel>) -> f64 {
    match level {
        Some(ActivityLevel::Sedentary) => 1.2,
        Some(ActivityLevel::LightlyActive) => 1.375,
        Some(ActivityLevel::ModeratelyActive) => 1.55,
        Some(ActivityLevel::VeryActive) => 1.725,
        Some(ActivityLevel::ExtremelyActive) => 1.9,
        None => DEFAULT_ACTIVITY_MULTIPLIER,
    }
}

/// TDEE in kcal/day from an unrounded BMR.
pub fn compute_tdee(bmr: f64, level: Option<ActivityLevel>) -> i64 {
    (bmr * activity_multiplier(level)).round() as i64
}

/// Computes the full bundle. BMI is always present; BMR/TDEE are `None` with a
/// reason when the profile does not support them.
pub fn compute_energy_metrics(profile: &BodyProfile) -> EnergyMetrics {
    let bmi = compute_bmi(profile.weight_kg, profile.height_cm);
    let multiplier = activity_multiplier(profile.activity_level);

    let (bmr, tdee, energy_unavailable) = match compute_bmr(
        profile.weight_kg,
        profile.height_cm,
        profile.age,
        profile.gender,
    ) {
        Ok(bmr) => (
            Some(bmr.round() as i64),
            Some(compute_tdee(bmr, profile.activity_level)),
            None,
        ),
        Err(e) => (None, None, Some(EnergyUnavailable::from(e))),
    };

    EnergyMetrics {
        bmi,
        bmi_category: bmi_category(bmi).to_string(),
        bmr,
        tdee,
        activity_multiplier: multiplier,
        energy_unavailable,
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10_f64.powi(decimals);
    (value * factor).round() / factor
}
