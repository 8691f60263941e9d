/// Session tokens: HS256 JWTs carrying the user id and email.
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use crate::{
	domain::user::{Claims, User},
	services::response::{ServiceError, ServiceResult},
};

#[derive(Clone)]
pub struct TokenIssuer {
	encoding_key: EncodingKey,
	decoding_key: DecodingKey,
	ttl: Duration,
}

impl TokenIssuer {
	pub fn new(
		secret: &str,
		ttl_secs: i64,
	) -> Self {
		Self {
			encoding_key: EncodingKey::from_secret(secret.as_bytes()),
			decoding_key: DecodingKey::from_secret(secret.as_bytes()),
			ttl: Duration::seconds(ttl_secs),
		}
	}

	pub fn issue(
		&self,
		user: &User,
	) -> ServiceResult<String> {
		let now = Utc::now();
		let claims = Claims {
			sub: user.id.clone(),
			email: user.email.clone(),
			iat: now.timestamp(),
			exp: (now + self.ttl).timestamp(),
		};
		Ok(encode(&Header::default(), &claims, &self.encoding_key)?)
	}

	/// Checks signature and expiry
	pub fn verify(
		&self,
		token: &str,
	) -> ServiceResult<Claims> {
		decode::<Claims>(token, &self.decoding_key, &Validation::default())
			.map(|data| data.claims)
			.map_err(|err| {
				tracing::debug!("Rejected session token: {}", err);
				ServiceError::Unauthorized
			})
	}
}
