use serde::{Deserialize, Serialize};

use crate::database::Record;

/// Stored account. Never serialized into a response, the hash only goes to disk.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
	pub id: String,
	pub username: String,
	pub email: String,
	pub password_hash: String,
}

impl Record for User {
	const COLLECTION: &'static str = "users";

	fn id(&self) -> &str {
		&self.id
	}
}

// No Debug on the credential payloads, they carry plaintext passwords.
#[derive(Clone, Default, Deserialize)]
pub struct Register {
	#[serde(default)]
	pub username: String,
	#[serde(default)]
	pub email: String,
	#[serde(default)]
	pub password: String,
}

#[derive(Clone, Default, Deserialize)]
pub struct Login {
	#[serde(default)]
	pub email: String,
	#[serde(default)]
	pub password: String,
}

/// Session token claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
	/// User id
	pub sub: String,
	pub email: String,
	pub iat: i64,
	pub exp: i64,
}
