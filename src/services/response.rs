use axum::{
	http::StatusCode,
	response::{IntoResponse, Response},
	Json,
};
use serde_json::json;
use thiserror::Error;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, Error)]
pub enum ServiceError {
	#[error("{0}")]
	Validation(String),

	#[error("{resource} not found")]
	NotFound { resource: &'static str, id: String },

	#[error("{0}")]
	Conflict(String),

	#[error("Invalid credentials")]
	InvalidCredentials,

	#[error("Unauthorized")]
	Unauthorized,

	#[error("Storage error: {0}")]
	Storage(#[from] std::io::Error),

	#[error("Serialization error: {0}")]
	Serialization(#[from] serde_json::Error),

	#[error("Token error: {0}")]
	Token(#[from] jsonwebtoken::errors::Error),

	#[error("Password hashing error: {0}")]
	Hashing(String),

	#[error("Upload error: {0}")]
	Upload(String),

	#[error("Configuration error: {0}")]
	Config(String),

	#[error("Internal error: {0}")]
	Internal(String),
}

impl ServiceError {
	pub fn validation(message: impl Into<String>) -> Self {
		Self::Validation(message.into())
	}

	pub fn not_found(
		resource: &'static str,
		id: impl Into<String>,
	) -> Self {
		Self::NotFound { resource, id: id.into() }
	}

	pub fn status(&self) -> StatusCode {
		match self {
			// Conflict and bad credentials surface as 400 to stay compatible with the front end.
			Self::Validation(_) | Self::Conflict(_) | Self::InvalidCredentials => StatusCode::BAD_REQUEST,
			Self::NotFound { .. } => StatusCode::NOT_FOUND,
			Self::Unauthorized => StatusCode::UNAUTHORIZED,
			_ => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}
}

impl IntoResponse for ServiceError {
	fn into_response(self) -> Response {
		let status = self.status();
		let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
			tracing::error!("{}", self);
			"Internal server error".to_string()
		} else {
			self.to_string()
		};

		(status, Json(json!({ "error": message }))).into_response()
	}
}
