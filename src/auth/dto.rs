use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

/// Request body for user registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response returned after register or login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: PublicUser,
}

/// Public part of the user returned to the client.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub email: String,
}

/// Daily macro targets embedded on the user record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyGoals {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
}

impl Default for DailyGoals {
    fn default() -> Self {
        Self {
            calories: 2000.0,
            protein: 150.0,
            carbs: 200.0,
            fats: 65.0,
        }
    }
}

impl DailyGoals {
    pub fn validate(&self) -> Result<(), ApiError> {
        for (name, value) in [
            ("calories", self.calories),
            ("protein", self.protein),
            ("carbs", self.carbs),
            ("fats", self.fats),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ApiError::Validation(format!(
                    "dailyGoals.{name} must be a positive number"
                )));
            }
        }
        Ok(())
    }
}

/// Request body for PUT /auth/me. Only the goals sub-object is mutable here.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMeRequest {
    pub daily_goals: DailyGoals,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub id: Uuid,
    pub email: String,
    pub daily_goals: DailyGoals,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_goals_match_documented_targets() {
        let goals = DailyGoals::default();
        assert_eq!(goals.calories, 2000.0);
        assert_eq!(goals.protein, 150.0);
        assert_eq!(goals.carbs, 200.0);
        assert_eq!(goals.fats, 65.0);
    }

    #[test]
    fn goals_reject_non_positive_targets() {
        let goals = DailyGoals {
            calories: 0.0,
            ..DailyGoals::default()
        };
        assert!(goals.validate().is_err());

        let goals = DailyGoals {
            protein: -10.0,
            ..DailyGoals::default()
        };
        assert!(goals.validate().is_err());
    }

    #[test]
    fn goals_reject_non_finite_targets() {
        let goals = DailyGoals {
            fats: f64::NAN,
            ..DailyGoals::default()
        };
        assert!(goals.validate().is_err());
    }

    #[test]
    fn me_response_serializes_camel_case() {
        let response = MeResponse {
            id: Uuid::new_v4(),
            email: "test@example.com".to_string(),
            daily_goals: DailyGoals::default(),
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("test@example.com"));
        assert!(json.contains("dailyGoals"));
    }
}
