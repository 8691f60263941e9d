/// Password hashing and verification using Argon2id
use argon2::{
	password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
	Algorithm, Argon2, Params, PasswordHash, PasswordVerifier, Version,
};

use crate::services::response::{ServiceError, ServiceResult};

/// Salted, deliberately slow password hashing.
///
/// `time_cost` is the number of Argon2 passes, `memory_kib` the memory each
/// hash touches. Verification reads the parameters back from the stored hash,
/// so raising the cost later keeps old accounts working.
#[derive(Debug, Clone)]
pub struct Hasher {
	params: Params,
}

impl Hasher {
	pub fn new(
		time_cost: u32,
		memory_kib: u32,
	) -> ServiceResult<Self> {
		let params = Params::new(memory_kib, time_cost, Params::DEFAULT_P_COST, None)
			.map_err(|err| ServiceError::Hashing(format!("invalid parameters: {err}")))?;
		Ok(Self { params })
	}

	fn argon2(&self) -> Argon2<'static> {
		Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
	}

	/// Returns a PHC string suitable for storage
	pub fn hash(
		&self,
		password: &str,
	) -> ServiceResult<String> {
		let salt = SaltString::generate(&mut OsRng);
		let hash = self
			.argon2()
			.hash_password(password.as_bytes(), &salt)
			.map_err(|_| ServiceError::Hashing("failed to hash password".into()))?;
		Ok(hash.to_string())
	}

	pub fn verify(
		&self,
		password: &str,
		hash: &str,
	) -> ServiceResult<bool> {
		let parsed = PasswordHash::new(hash).map_err(|_| ServiceError::Hashing("stored hash is malformed".into()))?;
		Ok(self.argon2().verify_password(password.as_bytes(), &parsed).is_ok())
	}
}
