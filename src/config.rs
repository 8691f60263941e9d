use std::{path::PathBuf, str::FromStr};

use axum::http::HeaderValue;

use crate::services::response::ServiceError;

pub struct Config {
	/// Which errors we want to log
	pub log_level: String,

	/// Port server is listening to
	pub server_ip_port: String,
	pub allow_origins: String,

	/// Directory holding posts.json, comments.json and users.json
	pub data_dir: PathBuf,
	/// Front end root, uploaded images go to `assets/images` below it
	pub static_dir: PathBuf,
	pub max_upload_bytes: usize,

	pub jwt_secret: String,
	pub token_ttl_secs: i64,
	/// Argon2 iteration count
	pub hash_cost: u32,
	pub hash_memory_kib: u32,
}

impl Config {
	pub fn new() -> Result<Config, ServiceError> {
		dotenv::dotenv().ok();
		let log_level = std::env::var("LOG_LEVEL").unwrap_or("info".to_string());
		let server_ip_port = std::env::var("SERVER_IP_PORT").unwrap_or("0.0.0.0:3000".into());
		let allow_origins = std::env::var("ALLOW_ORIGINS").unwrap_or("http://localhost:3000".to_string());
		let data_dir = std::env::var("DATA_DIR").unwrap_or(".".into()).into();
		let static_dir = std::env::var("STATIC_DIR").unwrap_or("docs".into()).into();
		let jwt_secret = std::env::var("JWT_SECRET").map_err(|_| ServiceError::Config("JWT_SECRET must be set".into()))?;

		Ok(Config {
			log_level,
			server_ip_port,
			allow_origins,
			data_dir,
			static_dir,
			max_upload_bytes: parse_var("MAX_UPLOAD_BYTES", 25 * 1024 * 1024)?,
			jwt_secret,
			token_ttl_secs: parse_var("TOKEN_TTL_SECS", 3600)?,
			hash_cost: parse_var("HASH_COST", 10)?,
			hash_memory_kib: parse_var("HASH_MEMORY_KIB", 19 * 1024)?,
		})
	}

	pub fn upload_dir(&self) -> PathBuf {
		self.static_dir.join("assets").join("images")
	}

	/// Comma separated `ALLOW_ORIGINS`. Blank entries are skipped, anything that
	/// is not a valid header value stops startup.
	pub fn cors_origins(&self) -> Result<Vec<HeaderValue>, ServiceError> {
		self.allow_origins
			.split(',')
			.map(str::trim)
			.filter(|origin| !origin.is_empty())
			.map(|origin| {
				origin.parse().map_err(|_| ServiceError::Config(format!("ALLOW_ORIGINS has an invalid origin: {origin:?}")))
			})
			.collect()
	}
}

fn parse_var<T: FromStr>(
	key: &str,
	default: T,
) -> Result<T, ServiceError> {
	match std::env::var(key) {
		Ok(raw) => raw.trim().parse().map_err(|_| ServiceError::Config(format!("{key} has an invalid value: {raw}"))),
		Err(_) => Ok(default),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn with_origins(allow_origins: &str) -> Config {
		Config {
			log_level: "info".into(),
			server_ip_port: "127.0.0.1:0".into(),
			allow_origins: allow_origins.into(),
			data_dir: ".".into(),
			static_dir: "docs".into(),
			max_upload_bytes: 1024,
			jwt_secret: "secret".into(),
			token_ttl_secs: 3600,
			hash_cost: 1,
			hash_memory_kib: 64,
		}
	}

	#[test]
	fn test_cors_origins_skip_blank_entries() {
		let origins = with_origins("http://localhost:3000, https://blog.example.com,").cors_origins().unwrap();
		let origins: Vec<&str> = origins.iter().map(|origin| origin.to_str().unwrap()).collect();
		assert_eq!(origins, vec!["http://localhost:3000", "https://blog.example.com"]);
	}

	#[test]
	fn test_cors_origins_reject_malformed_entry() {
		let result = with_origins("http://localhost:3000,http://bad\u{7}origin").cors_origins();
		assert!(matches!(result, Err(ServiceError::Config(_))));
	}
}
