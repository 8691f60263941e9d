use std::sync::Arc;

use crate::{
	common::id_generator::IdGenerator,
	database::RecordStore,
	domain::user::{Claims, Login, Register, User},
	security::{Hasher, TokenIssuer},
	services::response::{ServiceError, ServiceResult},
};

/// Registration and credential checks.
///
/// Passwords only ever leave this service as Argon2 hashes, and hashing runs on
/// the blocking pool so it does not stall other requests.
pub struct AccountService {
	store: Arc<RecordStore<User>>,
	ids: Arc<IdGenerator>,
	hasher: Hasher,
	tokens: TokenIssuer,
}

impl AccountService {
	pub fn new(
		store: Arc<RecordStore<User>>,
		ids: Arc<IdGenerator>,
		hasher: Hasher,
		tokens: TokenIssuer,
	) -> Self {
		Self {
			store,
			ids,
			hasher,
			tokens,
		}
	}

	pub async fn register(
		&self,
		cmd: Register,
	) -> ServiceResult<()> {
		let Register { username, email, password } = cmd;
		if username.is_empty() || email.is_empty() || password.is_empty() {
			return Err(ServiceError::validation("Missing fields"));
		}

		self.store.refresh().await;
		if self.store.snapshot().await.iter().any(|user| user.email == email) {
			return Err(email_taken());
		}

		let hasher = self.hasher.clone();
		let password_hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
			.await
			.map_err(|err| ServiceError::Internal(err.to_string()))??;

		let user = User {
			id: self.ids.next(),
			username,
			email,
			password_hash,
		};
		self.store
			.mutate(|users| {
				// Someone may have registered the address while we were hashing.
				if users.iter().any(|existing| existing.email == user.email) {
					return Err(email_taken());
				}
				users.push(user.clone());
				Ok(())
			})
			.await?;

		tracing::info!("Registered user {}", user.id);
		Ok(())
	}

	/// Unknown email and wrong password fail the same way.
	pub async fn login(
		&self,
		cmd: Login,
	) -> ServiceResult<String> {
		let Login { email, password } = cmd;

		self.store.refresh().await;
		let user = self.store.snapshot().await.into_iter().find(|user| user.email == email);

		let hasher = self.hasher.clone();
		let stored_hash = user.as_ref().map(|user| user.password_hash.clone());
		let matches = tokio::task::spawn_blocking(move || match stored_hash {
			Some(stored_hash) => hasher.verify(&password, &stored_hash),
			// Unknown address still pays for one hash so response time gives nothing away.
			None => hasher.hash(&password).map(|_| false),
		})
		.await
		.map_err(|err| ServiceError::Internal(err.to_string()))??;

		let user = match user {
			Some(user) if matches => user,
			_ => return Err(ServiceError::InvalidCredentials),
		};

		tracing::info!("User {} logged in", user.id);
		self.tokens.issue(&user)
	}

	pub fn verify_token(
		&self,
		token: &str,
	) -> ServiceResult<Claims> {
		self.tokens.verify(token)
	}
}

fn email_taken() -> ServiceError {
	ServiceError::Conflict("Email already registered".into())
}
