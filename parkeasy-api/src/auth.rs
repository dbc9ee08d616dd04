use axum::{extract::State, routing::post, Json, Router};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use parkeasy_core::identity::{IdentityError, NewUser, UserProfile};
use parkeasy_shared::pii::Masked;

use crate::error::AppError;
use crate::middleware::auth::CustomerClaims;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct LoginRequest {
    email: String,
    password: Masked<String>,
}

#[derive(Debug, Deserialize)]
struct RegisterRequest {
    name: String,
    email: String,
    password: Masked<String>,
    phone: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VerifyRequest {
    token: String,
}

#[derive(Debug, Serialize)]
struct AuthResponse {
    token: String,
    user: UserProfile,
}

#[derive(Debug, Serialize)]
struct VerifyResponse {
    valid: bool,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/auth/login", post(login))
        .route("/v1/auth/register", post(register))
        .route("/v1/auth/verify", post(verify))
}

async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let profile = state
        .identity
        .authenticate(&req.email, &req.password.0)
        .await
        .map_err(identity_error)?;

    state.users.ensure_account(&profile);
    let token = issue_token(&state, &profile)?;

    Ok(Json(AuthResponse {
        token,
        user: profile,
    }))
}

async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let profile = state
        .identity
        .register(NewUser {
            name: req.name,
            email: req.email,
            password: req.password,
            phone: req.phone,
        })
        .await
        .map_err(identity_error)?;

    state.users.ensure_account(&profile);
    let token = issue_token(&state, &profile)?;

    Ok(Json(AuthResponse {
        token,
        user: profile,
    }))
}

async fn verify(
    State(state): State<AppState>,
    Json(req): Json<VerifyRequest>,
) -> Result<Json<VerifyResponse>, AppError> {
    decode::<CustomerClaims>(
        &req.token,
        &DecodingKey::from_secret(state.auth.secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::AuthenticationError("Invalid token".to_string()))?;

    Ok(Json(VerifyResponse { valid: true }))
}

fn issue_token(state: &AppState, profile: &UserProfile) -> Result<String, AppError> {
    let claims = CustomerClaims {
        sub: profile.id.clone(),
        email: profile.email.clone(),
        role: "CUSTOMER".to_owned(),
        exp: (Utc::now() + Duration::seconds(state.auth.expiration as i64)).timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(state.auth.secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalServerError(format!("Token encoding failed: {}", e)))
}

fn identity_error(err: IdentityError) -> AppError {
    match err {
        IdentityError::InvalidCredentials => AppError::AuthenticationError(err.to_string()),
        IdentityError::AlreadyRegistered => AppError::ConflictError(err.to_string()),
        IdentityError::MissingFields => AppError::ValidationError(err.to_string()),
    }
}
