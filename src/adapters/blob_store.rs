use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;
use uuid::Uuid;

use crate::services::response::{ServiceError, ServiceResult};

/// Storage for uploaded files. Callers only ever see the returned reference.
#[async_trait]
pub trait BlobStore: Send + Sync {
	async fn put(
		&self,
		file_name: &str,
		bytes: Bytes,
	) -> ServiceResult<String>;
}

/// Keeps uploads in a directory served as static files.
pub struct LocalBlobStore {
	root: PathBuf,
	public_prefix: String,
}

impl LocalBlobStore {
	pub fn new(
		root: impl Into<PathBuf>,
		public_prefix: impl Into<String>,
	) -> Self {
		Self {
			root: root.into(),
			public_prefix: public_prefix.into().trim_end_matches('/').to_string(),
		}
	}

	pub fn root(&self) -> &Path {
		&self.root
	}
}

#[async_trait]
impl BlobStore for LocalBlobStore {
	async fn put(
		&self,
		file_name: &str,
		bytes: Bytes,
	) -> ServiceResult<String> {
		fs::create_dir_all(&self.root).await.map_err(|err| ServiceError::Upload(err.to_string()))?;

		let stored_name = format!("image-{}{}", Uuid::new_v4(), extension_of(file_name));
		fs::write(self.root.join(&stored_name), &bytes)
			.await
			.map_err(|err| ServiceError::Upload(err.to_string()))?;

		tracing::info!("Stored upload {} ({} bytes)", stored_name, bytes.len());
		Ok(format!("{}/{}", self.public_prefix, stored_name))
	}
}

// Keeps the client's extension only when it is plain alphanumerics.
fn extension_of(file_name: &str) -> String {
	Path::new(file_name)
		.extension()
		.and_then(|ext| ext.to_str())
		.filter(|ext| !ext.is_empty() && ext.len() <= 10 && ext.chars().all(|c| c.is_ascii_alphanumeric()))
		.map(|ext| format!(".{}", ext.to_ascii_lowercase()))
		.unwrap_or_default()
}
