use std::sync::{Arc, OnceLock};

use crate::{
	adapters::blob_store::{BlobStore, LocalBlobStore},
	common::id_generator::IdGenerator,
	config::Config,
	database::RecordStore,
	security::{Hasher, TokenIssuer},
	services::{response::ServiceResult, AccountService, CommentService, PostService},
};

/// Public path under which uploaded images are served.
pub const IMAGE_PREFIX: &str = "/assets/images";

pub fn config() -> ServiceResult<&'static Config> {
	static CONFIG: OnceLock<Config> = OnceLock::new();
	let config = match CONFIG.get() {
		None => {
			let config = Config::new()?;

			CONFIG.get_or_init(|| config)
		}
		Some(config) => config,
	};
	Ok(config)
}

/// Everything a request handler may reach, built once at startup.
#[derive(Clone)]
pub struct AppState {
	pub posts: Arc<PostService>,
	pub comments: Arc<CommentService>,
	pub accounts: Arc<AccountService>,
	pub blobs: Arc<dyn BlobStore>,
	pub max_upload_bytes: usize,
}

impl AppState {
	pub async fn new(config: &Config) -> ServiceResult<Self> {
		let ids = Arc::new(IdGenerator::new());
		let hasher = Hasher::new(config.hash_cost, config.hash_memory_kib)?;
		let tokens = TokenIssuer::new(&config.jwt_secret, config.token_ttl_secs);

		let posts = RecordStore::open(&config.data_dir).await;
		let comments = RecordStore::open(&config.data_dir).await;
		let users = RecordStore::open(&config.data_dir).await;
		tracing::info!("Collections loaded from {}", config.data_dir.display());

		Ok(Self {
			posts: Arc::new(PostService::new(Arc::new(posts), ids.clone())),
			comments: Arc::new(CommentService::new(Arc::new(comments), ids.clone())),
			accounts: Arc::new(AccountService::new(Arc::new(users), ids, hasher, tokens)),
			blobs: Arc::new(LocalBlobStore::new(config.upload_dir(), IMAGE_PREFIX)),
			max_upload_bytes: config.max_upload_bytes,
		})
	}
}
