//! Entity models and read-side views.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::config::{Feature, FeatureSet};

/// A registered user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    /// Unique handle, `[A-Za-z0-9_]`, 3-64 chars.
    pub username: String,
    /// Unique, syntax-validated at registration.
    pub email: String,
    /// Opaque credential hash supplied by the auth collaborator.
    pub password_hash: String,
    pub bio: Option<String>,
    pub daily_calorie_goal: Option<i32>,
    /// Body weight in kilograms.
    pub weight: Option<f64>,
    /// Height in centimeters.
    pub height: Option<f64>,
    pub date_of_birth: Option<NaiveDate>,
    pub joined_at: DateTime<Utc>,
    pub profile_picture_url: Option<String>,
}

/// Input for user registration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserDraft {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// Partial profile update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfilePatch {
    pub bio: Option<String>,
    pub daily_calorie_goal: Option<i32>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    /// `YYYY-MM-DD`; a malformed value fails validation.
    pub date_of_birth: Option<String>,
    pub profile_picture_url: Option<String>,
}

/// A nutritional reference entry. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Food {
    pub id: String,
    /// Unique, case-sensitive exact match.
    pub name: String,
    pub calories_per_100g: f64,
    pub protein_per_100g: Option<f64>,
    pub carbs_per_100g: Option<f64>,
    pub fat_per_100g: Option<f64>,
    /// Unique identifier in an external catalog, when imported.
    pub external_id: Option<String>,
    /// Language tag for localized catalogs, e.g. "en".
    pub language: Option<String>,
}

/// Input for catalog writes and bulk imports.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FoodDraft {
    pub name: String,
    pub calories_per_100g: f64,
    pub protein_per_100g: Option<f64>,
    pub carbs_per_100g: Option<f64>,
    pub fat_per_100g: Option<f64>,
    pub external_id: Option<String>,
    pub language: Option<String>,
}

/// An immutable consumption event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodLog {
    pub id: String,
    /// Monotonic insertion sequence; tie-break for equal timestamps.
    pub seq: u64,
    pub user_id: String,
    pub food_id: String,
    pub grams: f64,
    pub logged_at: DateTime<Utc>,
}

/// Catalog entry as exposed to callers, shaped by the feature set.
#[derive(Debug, Clone, Serialize)]
pub struct FoodView {
    pub id: String,
    pub name: String,
    pub calories_per_100g: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protein_per_100g: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carbs_per_100g: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fat_per_100g: Option<f64>,
}

impl FoodView {
    /// Shape a catalog entry for a response. Macro-nutrient fields are only
    /// exposed when the nutrition-tracking feature is enabled.
    pub fn shape(food: &Food, features: &FeatureSet) -> Self {
        let nutrition = features.is_enabled(Feature::NutritionTracking);
        Self {
            id: food.id.clone(),
            name: food.name.clone(),
            calories_per_100g: food.calories_per_100g,
            protein_per_100g: food.protein_per_100g.filter(|_| nutrition),
            carbs_per_100g: food.carbs_per_100g.filter(|_| nutrition),
            fat_per_100g: food.fat_per_100g.filter(|_| nutrition),
        }
    }
}

/// A single consumption record enriched for the owner's log listing.
#[derive(Debug, Clone, Serialize)]
pub struct LogView {
    pub food_name: String,
    pub grams: f64,
    /// `calories_per_100g * grams / 100`, computed at read time.
    pub calories: f64,
    pub log_date: DateTime<Utc>,
}

/// A feed entry: somebody's consumption event enriched with author context.
#[derive(Debug, Clone, Serialize)]
pub struct FeedEntry {
    pub username: String,
    pub food_name: String,
    pub grams: f64,
    /// `calories_per_100g * grams / 100`, computed at read time.
    pub calories: f64,
    pub log_date: DateTime<Utc>,
}

/// The owner's view of their own profile.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileView {
    pub username: String,
    pub email: String,
    pub bio: Option<String>,
    pub daily_calorie_goal: Option<i32>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub date_of_birth: Option<NaiveDate>,
    pub joined_at: DateTime<Utc>,
    pub followers_count: usize,
    pub following_count: usize,
    pub profile_picture_url: Option<String>,
}

/// Another user's profile as visible to a viewer.
#[derive(Debug, Clone, Serialize)]
pub struct PublicProfileView {
    pub username: String,
    pub bio: Option<String>,
    pub profile_picture_url: Option<String>,
    pub followers_count: usize,
    pub following_count: usize,
    pub is_following: bool,
    pub joined_at: DateTime<Utc>,
}

/// Derives the calorie total for a quantity of a food.
pub fn calories_for(food: &Food, grams: f64) -> f64 {
    food.calories_per_100g * grams / 100.0
}
