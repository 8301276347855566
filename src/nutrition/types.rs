use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub foods: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    pub fdc_id: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodDetail {
    pub fdc_id: i64,
    pub description: String,
    pub data_type: Option<String>,
    pub serving_size: Option<f64>,
    pub serving_size_unit: Option<String>,
    #[serde(default)]
    pub food_nutrients: Vec<FoodNutrient>,
}

/// One nutrient entry from a detail payload. The provider uses two shapes
/// depending on data type (`nutrient.name` vs a flat `nutrientName`), so
/// every field is optional and the accessors try both.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodNutrient {
    pub nutrient: Option<NutrientRef>,
    pub nutrient_name: Option<String>,
    pub unit_name: Option<String>,
    pub amount: Option<f64>,
    pub value: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutrientRef {
    pub name: Option<String>,
    pub unit_name: Option<String>,
    pub amount: Option<f64>,
}

impl FoodNutrient {
    pub fn name(&self) -> &str {
        self.nutrient
            .as_ref()
            .and_then(|n| n.name.as_deref())
            .or(self.nutrient_name.as_deref())
            .unwrap_or("")
    }

    pub fn unit(&self) -> &str {
        self.nutrient
            .as_ref()
            .and_then(|n| n.unit_name.as_deref())
            .or(self.unit_name.as_deref())
            .unwrap_or("")
    }

    pub fn amount(&self) -> Option<f64> {
        self.amount
            .or(self.value)
            .or_else(|| self.nutrient.as_ref().and_then(|n| n.amount))
    }
}

/// Normalized food record returned to the client. Macros are per the
/// displayed serving; a nutrient the provider did not report stays null.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodRecord {
    pub description: String,
    pub fdc_id: i64,
    pub data_type: Option<String>,
    pub serving_size: f64,
    pub serving_size_unit: String,
    pub calories: Option<f64>,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nutrient_accessors_read_the_nested_shape() {
        let n: FoodNutrient = serde_json::from_value(serde_json::json!({
            "nutrient": { "name": "Protein", "unitName": "g" },
            "amount": 1.09
        }))
        .unwrap();
        assert_eq!(n.name(), "Protein");
        assert_eq!(n.unit(), "g");
        assert_eq!(n.amount(), Some(1.09));
    }

    #[test]
    fn nutrient_accessors_read_the_flat_shape() {
        let n: FoodNutrient = serde_json::from_value(serde_json::json!({
            "nutrientName": "Energy",
            "unitName": "kcal",
            "value": 89.0
        }))
        .unwrap();
        assert_eq!(n.name(), "Energy");
        assert_eq!(n.unit(), "kcal");
        assert_eq!(n.amount(), Some(89.0));
    }

    #[test]
    fn nutrient_amount_falls_back_to_nested_amount() {
        let n: FoodNutrient = serde_json::from_value(serde_json::json!({
            "nutrient": { "name": "Protein", "unitName": "g", "amount": 2.5 }
        }))
        .unwrap();
        assert_eq!(n.amount(), Some(2.5));
    }

    #[test]
    fn food_record_serializes_camel_case() {
        let record = FoodRecord {
            description: "Banana, raw".into(),
            fdc_id: 1_105_314,
            data_type: Some("SR Legacy".into()),
            serving_size: 100.0,
            serving_size_unit: "g".into(),
            calories: Some(89.0),
            protein: Some(1.09),
            carbs: None,
            fat: None,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["fdcId"], 1_105_314);
        assert_eq!(json["servingSizeUnit"], "g");
        assert_eq!(json["carbs"], serde_json::Value::Null);
    }
}
