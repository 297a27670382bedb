use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub age: i32,
    pub gender: String,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub activity_level: String,
    pub goal: String,
    pub target_weight_kg: Option<f64>,
    pub dietary_preference: String,
    pub allergies: Option<String>,
    pub medical_conditions: Option<String>,
    pub daily_calorie_target: Option<i32>,
    pub daily_protein_target: Option<i32>,
    pub daily_carbs_target: Option<i32>,
    pub daily_fat_target: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Values for a new `users` row. Enum fields are already validated.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub age: i32,
    pub gender: Gender,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub activity_level: ActivityLevel,
    pub goal: Goal,
    pub target_weight_kg: Option<f64>,
    pub dietary_preference: DietaryPreference,
    pub allergies: Option<String>,
    pub medical_conditions: Option<String>,
}

/// Error for a stored or submitted enum value outside its allowed set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Declares a snake_case string enum stored as TEXT.
macro_rules! text_enum {
    ($name:ident, $kind:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(UnknownVariant {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

text_enum!(Gender, "gender", {
    Male => "male",
    Female => "female",
    Other => "other",
    PreferNotToSay => "prefer_not_to_say",
});

text_enum!(ActivityLevel, "activity level", {
    Sedentary => "sedentary",
    LightlyActive => "lightly_active",
    ModeratelyActive => "moderately_active",
    VeryActive => "very_active",
    ExtremelyActive => "extremely_active",
});

text_enum!(Goal, "goal", {
    LoseWeight => "lose_weight",
    MaintainWeight => "maintain_weight",
    GainWeight => "gain_weight",
    ImproveHealth => "improve_health",
});

text_enum!(DietaryPreference, "dietary preference", {
    None => "none",
    Vegetarian => "vegetarian",
    Vegan => "vegan",
    Pescatarian => "pescatarian",
    Keto => "keto",
    Paleo => "paleo",
    GlutenFree => "gluten_free",
    DairyFree => "dairy_free",
    Halal => "halal",
    Kosher => "kosher",
});

impl Default for ActivityLevel {
    fn default() -> Self {
        ActivityLevel::ModeratelyActive
    }
}

impl Default for Goal {
    fn default() -> Self {
        Goal::MaintainWeight
    }
}

impl Default for DietaryPreference {
    fn default() -> Self {
        DietaryPreference::None
    }
}
