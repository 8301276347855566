use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow, PgPool};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::meals::dto::Nutrition;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Meal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub food_id: Option<String>,
    pub food_name: String,
    pub serving_size: Option<f64>,
    pub serving_unit: String,
    pub servings: f64,
    pub nutrition: Json<Nutrition>,
    pub date: Date,
    pub is_planned: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug)]
pub struct NewMeal {
    pub user_id: Uuid,
    pub food_id: Option<String>,
    pub food_name: String,
    pub serving_size: Option<f64>,
    pub serving_unit: String,
    pub servings: f64,
    pub nutrition: Nutrition,
    pub date: Date,
    pub is_planned: bool,
}

/// Fields a partial update may touch. `None` leaves the column unchanged.
#[derive(Debug, Default)]
pub struct MealChanges {
    pub food_id: Option<String>,
    pub food_name: Option<String>,
    pub serving_size: Option<f64>,
    pub serving_unit: Option<String>,
    pub servings: Option<f64>,
    pub nutrition: Option<Nutrition>,
    pub date: Option<Date>,
    pub is_planned: Option<bool>,
}

const MEAL_COLUMNS: &str = "id, user_id, food_id, food_name, serving_size, serving_unit, \
     servings, nutrition, date, is_planned, created_at, updated_at";

impl Meal {
    pub async fn create(db: &PgPool, new: NewMeal) -> anyhow::Result<Meal> {
        let meal = sqlx::query_as::<_, Meal>(&format!(
            r#"
            INSERT INTO meals
                (user_id, food_id, food_name, serving_size, serving_unit,
                 servings, nutrition, date, is_planned)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {MEAL_COLUMNS}
            "#
        ))
        .bind(new.user_id)
        .bind(new.food_id)
        .bind(new.food_name)
        .bind(new.serving_size)
        .bind(new.serving_unit)
        .bind(new.servings)
        .bind(Json(new.nutrition))
        .bind(new.date)
        .bind(new.is_planned)
        .fetch_one(db)
        .await?;
        Ok(meal)
    }

    pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<Meal>> {
        let rows = sqlx::query_as::<_, Meal>(&format!(
            r#"
            SELECT {MEAL_COLUMNS}
            FROM meals
            WHERE user_id = $1
            ORDER BY date DESC, created_at DESC
            "#
        ))
        .bind(user_id)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Meal>> {
        let meal = sqlx::query_as::<_, Meal>(&format!(
            r#"
            SELECT {MEAL_COLUMNS}
            FROM meals
            WHERE id = $1
            "#
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(meal)
    }

    pub async fn update(db: &PgPool, id: Uuid, changes: MealChanges) -> anyhow::Result<Meal> {
        let meal = sqlx::query_as::<_, Meal>(&format!(
            r#"
            UPDATE meals SET
                food_id = COALESCE($2, food_id),
                food_name = COALESCE($3, food_name),
                serving_size = COALESCE($4, serving_size),
                serving_unit = COALESCE($5, serving_unit),
                servings = COALESCE($6, servings),
                nutrition = COALESCE($7, nutrition),
                date = COALESCE($8, date),
                is_planned = COALESCE($9, is_planned),
                updated_at = now()
            WHERE id = $1
            RETURNING {MEAL_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(changes.food_id)
        .bind(changes.food_name)
        .bind(changes.serving_size)
        .bind(changes.serving_unit)
        .bind(changes.servings)
        .bind(changes.nutrition.map(Json))
        .bind(changes.date)
        .bind(changes.is_planned)
        .fetch_one(db)
        .await?;
        Ok(meal)
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM meals WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
