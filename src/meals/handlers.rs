use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use sqlx::PgPool;
use time::OffsetDateTime;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::jwt::AuthUser,
    error::ApiError,
    meals::{
        dto::{CreateMealRequest, MealResponse, UpdateMealRequest},
        repo::{Meal, MealChanges, NewMeal},
    },
    state::AppState,
};

pub fn meal_routes() -> Router<AppState> {
    Router::new()
        .route("/meals", get(list_meals).post(create_meal))
        .route("/meals/:id", get(get_meal).put(update_meal).delete(delete_meal))
}

/// Loads a meal and enforces ownership. A missing id is `NotFound`; someone
/// else's meal is `Forbidden`, so callers can tell "doesn't exist" from
/// "not yours" without the error text leaking existence across tenants.
async fn load_owned(db: &PgPool, user_id: Uuid, id: Uuid) -> Result<Meal, ApiError> {
    let meal = Meal::find_by_id(db, id)
        .await?
        .ok_or(ApiError::NotFound("Meal not found"))?;
    if meal.user_id != user_id {
        warn!(meal_id = %id, caller = %user_id, "meal ownership mismatch");
        return Err(ApiError::Forbidden);
    }
    Ok(meal)
}

#[instrument(skip(state))]
pub async fn list_meals(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<MealResponse>>, ApiError> {
    let meals = Meal::list_by_user(&state.db, user_id).await?;
    Ok(Json(meals.into_iter().map(MealResponse::from).collect()))
}

#[instrument(skip(state, payload))]
pub async fn create_meal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateMealRequest>,
) -> Result<(StatusCode, Json<MealResponse>), ApiError> {
    payload.validate()?;

    let new = NewMeal {
        user_id,
        food_id: payload.food_id,
        food_name: payload.food_name.unwrap_or_default(),
        serving_size: payload.serving_size,
        serving_unit: payload
            .serving_unit
            .unwrap_or_else(|| "g".into())
            .to_lowercase(),
        servings: payload.servings.unwrap_or(1.0),
        nutrition: payload.nutrition.unwrap_or_default(),
        date: payload
            .date
            .unwrap_or_else(|| OffsetDateTime::now_utc().date()),
        is_planned: payload.is_planned.unwrap_or(false),
    };

    let meal = Meal::create(&state.db, new).await?;
    info!(meal_id = %meal.id, user_id = %user_id, "meal created");
    Ok((StatusCode::CREATED, Json(meal.into())))
}

#[instrument(skip(state))]
pub async fn get_meal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MealResponse>, ApiError> {
    let meal = load_owned(&state.db, user_id, id).await?;
    Ok(Json(meal.into()))
}

#[instrument(skip(state, payload))]
pub async fn update_meal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateMealRequest>,
) -> Result<Json<MealResponse>, ApiError> {
    payload.validate()?;
    load_owned(&state.db, user_id, id).await?;

    let changes = MealChanges {
        food_id: payload.food_id,
        food_name: payload.food_name,
        serving_size: payload.serving_size,
        serving_unit: payload.serving_unit.map(|u| u.to_lowercase()),
        servings: payload.servings,
        nutrition: payload.nutrition,
        date: payload.date,
        is_planned: payload.is_planned,
    };

    let meal = Meal::update(&state.db, id, changes).await?;
    info!(meal_id = %meal.id, user_id = %user_id, "meal updated");
    Ok(Json(meal.into()))
}

#[instrument(skip(state))]
pub async fn delete_meal(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    load_owned(&state.db, user_id, id).await?;
    Meal::delete(&state.db, id).await?;
    info!(meal_id = %id, user_id = %user_id, "meal deleted");
    Ok(StatusCode::NO_CONTENT)
}
