use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{
            AuthResponse, LoginRequest, MeResponse, PublicUser, RegisterRequest, UpdateMeRequest,
        },
        jwt::{AuthUser, JwtKeys},
        password::{hash_password, verify_password},
        repo::User,
    },
    error::ApiError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/auth/me", get(get_me).put(update_me))
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    // Emails are folded to lowercase, so uniqueness is case-insensitive.
    payload.email = payload.email.trim().to_lowercase();

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::Validation("Invalid email".into()));
    }

    if payload.password.len() < 8 {
        warn!("password too short");
        return Err(ApiError::Validation(
            "Password must be at least 8 characters".into(),
        ));
    }

    if User::find_by_email(&state.db, &payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(ApiError::Conflict("User already exists"));
    }

    let hash = hash_password(&payload.password)?;
    let user = User::create(&state.db, &payload.email, &hash).await?;

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id)?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: PublicUser {
                id: user.id,
                email: user.email,
            },
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    let user = match User::find_by_email(&state.db, &payload.email).await? {
        Some(u) => u,
        None => {
            warn!(email = %payload.email, "login unknown email");
            return Err(ApiError::Unauthenticated("Invalid credentials"));
        }
    };

    let ok = verify_password(&payload.password, &user.password_hash)?;
    if !ok {
        warn!(email = %payload.email, user_id = %user.id, "login invalid password");
        return Err(ApiError::Unauthenticated("Invalid credentials"));
    }

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id)?;

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(Json(AuthResponse {
        token,
        user: PublicUser {
            id: user.id,
            email: user.email,
        },
    }))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<MeResponse>, ApiError> {
    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or(ApiError::NotFound("User not found"))?;

    Ok(Json(MeResponse {
        id: user.id,
        email: user.email,
        daily_goals: user.daily_goals.map(|g| g.0).unwrap_or_default(),
    }))
}

#[instrument(skip(state, payload))]
pub async fn update_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<UpdateMeRequest>,
) -> Result<Json<MeResponse>, ApiError> {
    payload.daily_goals.validate()?;

    let user = User::update_goals(&state.db, user_id, &payload.daily_goals)
        .await?
        .ok_or(ApiError::NotFound("User not found"))?;

    info!(user_id = %user.id, "daily goals updated");
    Ok(Json(MeResponse {
        id: user.id,
        email: user.email,
        daily_goals: user.daily_goals.map(|g| g.0).unwrap_or_default(),
    }))
}
