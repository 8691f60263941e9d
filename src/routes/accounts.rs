use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use super::extractors::JsonBody;
use crate::{
	dependencies::AppState,
	domain::user::{Login, Register},
	services::response::ServiceResult,
};

/// POST /api/register
pub async fn register(
	State(state): State<AppState>,
	JsonBody(cmd): JsonBody<Register>,
) -> ServiceResult<(StatusCode, Json<Value>)> {
	state.accounts.register(cmd).await?;
	Ok((StatusCode::CREATED, Json(json!({ "message": "User registered successfully" }))))
}

/// POST /api/login
pub async fn login(
	State(state): State<AppState>,
	JsonBody(cmd): JsonBody<Login>,
) -> ServiceResult<Json<Value>> {
	let token = state.accounts.login(cmd).await?;
	Ok(Json(json!({ "token": token })))
}
