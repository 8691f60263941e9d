use std::sync::Arc;

use crate::{
	common::id_generator::IdGenerator,
	database::RecordStore,
	domain::comment::{Comment, CreateComment},
	services::response::ServiceResult,
};

pub struct CommentService {
	store: Arc<RecordStore<Comment>>,
	ids: Arc<IdGenerator>,
}

impl CommentService {
	pub fn new(
		store: Arc<RecordStore<Comment>>,
		ids: Arc<IdGenerator>,
	) -> Self {
		Self { store, ids }
	}

	/// Comments in the order they were written, optionally for a single post.
	pub async fn list(
		&self,
		post_id: Option<&str>,
	) -> Vec<Comment> {
		self.store.refresh().await;
		let comments = self.store.snapshot().await;
		match post_id {
			Some(post_id) => comments.into_iter().filter(|comment| comment.post_id == post_id).collect(),
			None => comments,
		}
	}

	pub async fn create(
		&self,
		cmd: CreateComment,
	) -> ServiceResult<Comment> {
		let comment = Comment::write(self.ids.next(), cmd)?;

		self.store.refresh().await;
		self.store
			.mutate(|comments| {
				comments.push(comment.clone());
				Ok(())
			})
			.await?;

		tracing::info!("Comment {} added to post {}", comment.id, comment.post_id);
		Ok(comment)
	}
}
