//! Rescaling of provider macro values from the API-reported serving to a
//! user-requested serving.

use crate::nutrition::types::{FoodDetail, FoodNutrient, FoodRecord};

/// Gram factor for the units the API understands. Anything else counts as
/// grams (factor 1) — a documented approximation, not a silent bug.
fn unit_to_grams(unit: &str) -> f64 {
    match unit.to_lowercase().as_str() {
        "g" => 1.0,
        "oz" => 28.3495,
        "lb" => 453.592,
        "kg" => 1000.0,
        _ => 1.0,
    }
}

/// Converts a serving to grams, falling back to the raw size when the
/// conversion is non-finite or non-positive.
fn to_grams(size: f64, unit: &str) -> f64 {
    let grams = size * unit_to_grams(unit);
    if grams.is_finite() && grams > 0.0 {
        grams
    } else {
        size
    }
}

fn find_nutrient<'a>(
    nutrients: &'a [FoodNutrient],
    name: &str,
    unit: Option<&str>,
) -> Option<&'a FoodNutrient> {
    nutrients.iter().find(|n| {
        n.name() == name && unit.map_or(true, |u| n.unit().eq_ignore_ascii_case(u))
    })
}

/// Energy may be reported as "Energy" or as an Atwater energy entry; any
/// name containing "Energy" counts as long as the unit is kcal.
fn find_energy(nutrients: &[FoodNutrient]) -> Option<&FoodNutrient> {
    find_nutrient(nutrients, "Energy", Some("kcal")).or_else(|| {
        nutrients
            .iter()
            .find(|n| n.name().contains("Energy") && n.unit().eq_ignore_ascii_case("kcal"))
    })
}

/// Extracts the four macros from a detail record and rescales them to the
/// requested serving. An invalid requested serving (non-finite or
/// non-positive gram conversion) is ignored: scale stays 1 and the display
/// serving remains the provider's.
pub fn normalize(food: &FoodDetail, serving_size: Option<f64>, unit: Option<&str>) -> FoodRecord {
    let nutrients = &food.food_nutrients;

    let energy = find_energy(nutrients);
    let protein = find_nutrient(nutrients, "Protein", None);
    let carbs = find_nutrient(nutrients, "Carbohydrate, by difference", None);
    let fat = find_nutrient(nutrients, "Total lipid (fat)", None);

    let api_serving = food.serving_size.unwrap_or(100.0);
    let api_unit = food.serving_size_unit.as_deref().unwrap_or("g");
    let api_grams = to_grams(api_serving, api_unit);

    let mut display_size = api_serving;
    let mut display_unit = api_unit.to_string();
    let mut scale = 1.0;

    if let Some(requested) = serving_size {
        let requested_unit = unit.unwrap_or("g");
        let user_grams = to_grams(requested, requested_unit);
        let next = user_grams / api_grams;
        if next.is_finite() && next > 0.0 {
            scale = next;
            display_size = requested;
            display_unit = requested_unit.to_string();
        }
    }

    let scaled = |n: Option<&FoodNutrient>| n.and_then(FoodNutrient::amount).map(|a| a * scale);

    FoodRecord {
        description: food.description.clone(),
        fdc_id: food.fdc_id,
        data_type: food.data_type.clone(),
        serving_size: display_size,
        serving_size_unit: display_unit,
        calories: scaled(energy),
        protein: scaled(protein),
        carbs: scaled(carbs),
        fat: scaled(fat),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn banana() -> FoodDetail {
        serde_json::from_value(serde_json::json!({
            "fdcId": 1105314,
            "description": "Banana, raw",
            "dataType": "SR Legacy",
            "foodNutrients": [
                { "nutrient": { "name": "Energy", "unitName": "kcal" }, "amount": 89.0 },
                { "nutrient": { "name": "Protein", "unitName": "g" }, "amount": 1.09 },
                { "nutrient": { "name": "Carbohydrate, by difference", "unitName": "g" }, "amount": 22.84 },
                { "nutrient": { "name": "Total lipid (fat)", "unitName": "g" }, "amount": 0.33 }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn no_override_returns_raw_values_and_provider_serving() {
        let record = normalize(&banana(), None, None);
        assert_eq!(record.serving_size, 100.0);
        assert_eq!(record.serving_size_unit, "g");
        assert_eq!(record.calories, Some(89.0));
        assert_eq!(record.protein, Some(1.09));
        assert_eq!(record.carbs, Some(22.84));
        assert_eq!(record.fat, Some(0.33));
    }

    #[test]
    fn gram_override_scales_linearly() {
        let record = normalize(&banana(), Some(150.0), Some("g"));
        assert_eq!(record.serving_size, 150.0);
        assert_eq!(record.serving_size_unit, "g");
        assert_eq!(record.calories, Some(89.0 * 1.5));
        assert_eq!(record.protein, Some(1.09 * 1.5));
        assert_eq!(record.carbs, Some(22.84 * 1.5));
        assert_eq!(record.fat, Some(0.33 * 1.5));
    }

    #[test]
    fn ounce_override_uses_the_fixed_table() {
        let record = normalize(&banana(), Some(1.0), Some("oz"));
        let scale = 28.3495 / 100.0;
        assert_eq!(record.serving_size, 1.0);
        assert_eq!(record.serving_size_unit, "oz");
        assert_eq!(record.calories, Some(89.0 * scale));
    }

    #[test]
    fn kilogram_override_uses_the_fixed_table() {
        let record = normalize(&banana(), Some(0.5), Some("kg"));
        assert_eq!(record.calories, Some(89.0 * 5.0));
    }

    #[test]
    fn unknown_unit_counts_as_grams() {
        let record = normalize(&banana(), Some(250.0), Some("bottles"));
        assert_eq!(record.serving_size_unit, "bottles");
        assert_eq!(record.calories, Some(89.0 * 2.5));
    }

    #[test]
    fn zero_or_negative_serving_is_ignored() {
        for bad in [0.0, -150.0] {
            let record = normalize(&banana(), Some(bad), Some("g"));
            assert_eq!(record.serving_size, 100.0, "display stays the provider's");
            assert_eq!(record.serving_size_unit, "g");
            assert_eq!(record.calories, Some(89.0), "macros stay raw");
        }
    }

    #[test]
    fn provider_serving_in_ounces_converts_before_scaling() {
        let mut food = banana();
        food.serving_size = Some(3.5);
        food.serving_size_unit = Some("oz".into());
        // 3.5 oz ≈ 99.22 g; requesting the same mass gives scale 1.
        let record = normalize(&food, Some(3.5 * 28.3495), Some("g"));
        let calories = record.calories.unwrap();
        assert!((calories - 89.0).abs() < 1e-9);
    }

    #[test]
    fn missing_nutrient_stays_null_regardless_of_scale() {
        let food: FoodDetail = serde_json::from_value(serde_json::json!({
            "fdcId": 2,
            "description": "Mystery paste",
            "foodNutrients": [
                { "nutrientName": "Energy", "unitName": "kcal", "value": 50.0 }
            ]
        }))
        .unwrap();
        let record = normalize(&food, Some(200.0), Some("g"));
        assert_eq!(record.calories, Some(100.0));
        assert_eq!(record.protein, None);
        assert_eq!(record.carbs, None);
        assert_eq!(record.fat, None);
    }

    #[test]
    fn atwater_energy_entry_is_accepted_when_exact_name_is_absent() {
        let food: FoodDetail = serde_json::from_value(serde_json::json!({
            "fdcId": 3,
            "description": "Branded bar",
            "foodNutrients": [
                {
                    "nutrient": { "name": "Energy (Atwater General Factors)", "unitName": "kcal" },
                    "amount": 210.0
                }
            ]
        }))
        .unwrap();
        let record = normalize(&food, None, None);
        assert_eq!(record.calories, Some(210.0));
    }

    #[test]
    fn energy_in_kilojoules_is_not_mistaken_for_kcal() {
        let food: FoodDetail = serde_json::from_value(serde_json::json!({
            "fdcId": 4,
            "description": "Metric snack",
            "foodNutrients": [
                { "nutrient": { "name": "Energy", "unitName": "kJ" }, "amount": 372.0 }
            ]
        }))
        .unwrap();
        let record = normalize(&food, None, None);
        assert_eq!(record.calories, None);
    }
}
