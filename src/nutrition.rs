use serde::Serialize;

use crate::constants::{
    DEFAULT_MET, KCAL_PER_G_CARBS, KCAL_PER_G_FAT, KCAL_PER_G_PROTEIN, MET_TABLE,
};
use crate::error::{AppError, Result};

/// Biological sex, as used by the BMR formulas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn parse(value: &str) -> Result<Self> {
        match value.to_lowercase().as_str() {
            "male" => Ok(Sex::Male),
            "female" => Ok(Sex::Female),
            _ => Err(AppError::InvalidInput(
                "Sex must be 'male' or 'female'".to_string(),
            )),
        }
    }
}

/// Weekly activity level with its fixed TDEE multiplier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityLevel {
    Sedentary,
    LightlyActive,
    ModeratelyActive,
    VeryActive,
    ExtraActive,
}

impl ActivityLevel {
    pub fn parse(value: &str) -> Result<Self> {
        match value.to_lowercase().as_str() {
            "sedentary" => Ok(ActivityLevel::Sedentary),
            "lightly_active" => Ok(ActivityLevel::LightlyActive),
            "moderately_active" => Ok(ActivityLevel::ModeratelyActive),
            "very_active" => Ok(ActivityLevel::VeryActive),
            "extra_active" => Ok(ActivityLevel::ExtraActive),
            _ => Err(AppError::InvalidInput(
                "Activity level must be one of: sedentary, lightly_active, \
                 moderately_active, very_active, extra_active"
                    .to_string(),
            )),
        }
    }

    pub fn multiplier(self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::LightlyActive => 1.375,
            ActivityLevel::ModeratelyActive => 1.55,
            ActivityLevel::VeryActive => 1.725,
            ActivityLevel::ExtraActive => 1.9,
        }
    }
}

/// Nutrition goal with its fixed calorie adjustment and macro split
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Goal {
    Lose,
    Maintain,
    Gain,
}

impl Goal {
    pub fn parse(value: &str) -> Result<Self> {
        match value.to_lowercase().as_str() {
            "lose" => Ok(Goal::Lose),
            "maintain" => Ok(Goal::Maintain),
            "gain" => Ok(Goal::Gain),
            _ => Err(AppError::InvalidInput(
                "Goal must be one of: lose, maintain, gain".to_string(),
            )),
        }
    }

    /// Daily calorie delta applied to TDEE
    pub fn calorie_adjustment(self) -> f64 {
        match self {
            Goal::Lose => -500.0,
            Goal::Maintain => 0.0,
            Goal::Gain => 300.0,
        }
    }

    /// Macro ratios as (protein, carbs, fat) fractions of daily calories
    pub fn macro_split(self) -> (f64, f64, f64) {
        match self {
            Goal::Lose => (0.40, 0.30, 0.30),
            Goal::Maintain => (0.30, 0.40, 0.30),
            Goal::Gain => (0.30, 0.50, 0.20),
        }
    }
}

/// Computed daily targets returned by the goals endpoint
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionTargets {
    pub bmr: f64,
    pub tdee: f64,
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
}

/// Basal metabolic rate, Mifflin-St Jeor equation
pub fn bmr_mifflin_st_jeor(sex: Sex, weight_kg: f64, height_cm: f64, age_years: f64) -> f64 {
    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * age_years;
    match sex {
        Sex::Male => base + 5.0,
        Sex::Female => base - 161.0,
    }
}

/// Basal metabolic rate, revised Harris-Benedict equation
pub fn bmr_harris_benedict(sex: Sex, weight_kg: f64, height_cm: f64, age_years: f64) -> f64 {
    match sex {
        Sex::Male => 88.362 + 13.397 * weight_kg + 4.799 * height_cm - 5.677 * age_years,
        Sex::Female => 447.593 + 9.247 * weight_kg + 3.098 * height_cm - 4.330 * age_years,
    }
}

/// Compute daily calorie and macro targets from profile attributes
///
/// Uses Mifflin-St Jeor for BMR, the fixed activity multiplier for TDEE,
/// and the goal's calorie adjustment and macro split. Gram targets use
/// 4/4/9 kcal per gram of protein/carbs/fat.
pub fn daily_targets(
    sex: Sex,
    weight_kg: f64,
    height_cm: f64,
    age_years: f64,
    level: ActivityLevel,
    goal: Goal,
) -> NutritionTargets {
    let bmr = bmr_mifflin_st_jeor(sex, weight_kg, height_cm, age_years);
    let tdee = bmr * level.multiplier();
    let calories = (tdee + goal.calorie_adjustment()).max(0.0);

    let (protein_ratio, carbs_ratio, fat_ratio) = goal.macro_split();

    NutritionTargets {
        bmr: bmr.round(),
        tdee: tdee.round(),
        calories: calories.round(),
        protein_g: (calories * protein_ratio / KCAL_PER_G_PROTEIN).round(),
        carbs_g: (calories * carbs_ratio / KCAL_PER_G_CARBS).round(),
        fat_g: (calories * fat_ratio / KCAL_PER_G_FAT).round(),
    }
}

/// Look up the MET value for an activity type
///
/// Unrecognized types fall back to the default MET of 4.0.
pub fn met_for(activity_type: &str) -> f64 {
    let needle = activity_type.to_lowercase();
    MET_TABLE
        .iter()
        .find(|(name, _)| *name == needle)
        .map(|(_, met)| *met)
        .unwrap_or(DEFAULT_MET)
}

/// Estimate calories burned: `MET × weight_kg × hours`
pub fn estimate_calories(activity_type: &str, duration_min: f64, weight_kg: f64) -> f64 {
    met_for(activity_type) * weight_kg * (duration_min / 60.0)
}
