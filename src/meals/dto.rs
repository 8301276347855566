use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::error::ApiError;
use crate::meals::repo::Meal;

time::serde::format_description!(day_fmt, Date, "[year]-[month]-[day]");

/// Per-serving macro snapshot, captured when the meal is logged and never
/// refreshed afterwards. Historical logs stay stable even if the source
/// food record changes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Nutrition {
    pub calories: Option<f64>,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fats: Option<f64>,
}

impl Nutrition {
    pub fn has_any_macro(&self) -> bool {
        self.calories.is_some()
            || self.protein.is_some()
            || self.carbs.is_some()
            || self.fats.is_some()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMealRequest {
    pub food_id: Option<String>,
    pub food_name: Option<String>,
    pub serving_size: Option<f64>,
    pub serving_unit: Option<String>,
    pub servings: Option<f64>,
    pub nutrition: Option<Nutrition>,
    #[serde(default, with = "day_fmt::option")]
    pub date: Option<Date>,
    pub is_planned: Option<bool>,
}

impl CreateMealRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        match self.food_name.as_deref() {
            Some(name) if !name.trim().is_empty() => {}
            _ => {
                return Err(ApiError::Validation(
                    "foodName is required and must be a string".into(),
                ))
            }
        }
        match &self.nutrition {
            None => {
                return Err(ApiError::Validation(
                    "nutrition is required and must be an object".into(),
                ))
            }
            Some(n) if !n.has_any_macro() => {
                return Err(ApiError::Validation(
                    "nutrition must include at least one macro (calories, protein, carbs or fats)"
                        .into(),
                ))
            }
            Some(_) => {}
        }
        validate_numeric("servingSize", self.serving_size)?;
        validate_numeric("servings", self.servings)?;
        if let Some(servings) = self.servings {
            if servings < 0.0 {
                return Err(ApiError::Validation("servings must not be negative".into()));
            }
        }
        Ok(())
    }
}

/// Partial update: any subset of mutable fields.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMealRequest {
    pub food_id: Option<String>,
    pub food_name: Option<String>,
    pub serving_size: Option<f64>,
    pub serving_unit: Option<String>,
    pub servings: Option<f64>,
    pub nutrition: Option<Nutrition>,
    #[serde(default, with = "day_fmt::option")]
    pub date: Option<Date>,
    pub is_planned: Option<bool>,
}

impl UpdateMealRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if let Some(name) = self.food_name.as_deref() {
            if name.trim().is_empty() {
                return Err(ApiError::Validation(
                    "foodName must not be empty when provided".into(),
                ));
            }
        }
        validate_numeric("servingSize", self.serving_size)?;
        validate_numeric("servings", self.servings)?;
        if let Some(servings) = self.servings {
            if servings < 0.0 {
                return Err(ApiError::Validation("servings must not be negative".into()));
            }
        }
        Ok(())
    }
}

fn validate_numeric(field: &str, value: Option<f64>) -> Result<(), ApiError> {
    if let Some(v) = value {
        if !v.is_finite() {
            return Err(ApiError::Validation(format!(
                "{field} must be a number when provided"
            )));
        }
    }
    Ok(())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MealResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub food_id: Option<String>,
    pub food_name: String,
    pub serving_size: Option<f64>,
    pub serving_unit: String,
    pub servings: f64,
    pub nutrition: Nutrition,
    #[serde(with = "day_fmt")]
    pub date: Date,
    pub is_planned: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<Meal> for MealResponse {
    fn from(m: Meal) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            food_id: m.food_id,
            food_name: m.food_name,
            serving_size: m.serving_size,
            serving_unit: m.serving_unit,
            servings: m.servings,
            nutrition: m.nutrition.0,
            date: m.date,
            is_planned: m.is_planned,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}
