use axum::{
	async_trait,
	body::Body,
	extract::FromRequest,
	http::Request,
	Json,
};
use serde::de::DeserializeOwned;

use crate::services::response::ServiceError;

/// `Json<T>` whose rejections go through `ServiceError`. Any body axum refuses
/// to decode comes back as 400 `{"error": ...}`, same as other validation failures.
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S, Body> for JsonBody<T>
where
	S: Send + Sync,
	T: DeserializeOwned,
{
	type Rejection = ServiceError;

	async fn from_request(
		req: Request<Body>,
		state: &S,
	) -> Result<Self, Self::Rejection> {
		let Json(value) = Json::<T>::from_request(req, state)
			.await
			.map_err(|rejection| ServiceError::validation(rejection.body_text()))?;
		Ok(Self(value))
	}
}
