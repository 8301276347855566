use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::instrument;

use crate::{error::ApiError, nutrition::types::FoodRecord, state::AppState};

pub fn nutrition_routes() -> Router<AppState> {
    Router::new().route("/nutrition", get(get_nutrition))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionQuery {
    pub query: Option<String>,
    pub fdc_id: Option<String>,
    pub serving_size: Option<f64>,
    pub unit: Option<String>,
}

/// GET /nutrition — accepts either a free-text `query` or a direct `fdcId`,
/// with an optional serving override. `fdcId` wins when both are present.
#[instrument(skip(state))]
pub async fn get_nutrition(
    State(state): State<AppState>,
    Query(params): Query<NutritionQuery>,
) -> Result<Json<FoodRecord>, ApiError> {
    let serving = params.serving_size;
    let unit = params.unit.as_deref();

    let record = if let Some(fdc_id) = params.fdc_id.as_deref() {
        state.fdc.fetch_by_id(fdc_id, serving, unit).await?
    } else if let Some(query) = params.query.as_deref().filter(|q| !q.trim().is_empty()) {
        state.fdc.search(query, serving, unit).await?
    } else {
        return Err(ApiError::Validation(
            "Either query or fdcId query parameter is required".into(),
        ));
    };

    Ok(Json(record))
}
