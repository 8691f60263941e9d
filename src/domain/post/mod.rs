pub mod commands;
pub mod entity;

use chrono::Utc;

use self::commands::{CreatePost, UpdatePost};
pub use self::entity::{Post, PostStatus};
use crate::services::response::{ServiceError, ServiceResult};

impl Post {
	/// Builds a freshly submitted post, waiting for moderation.
	pub fn submit(
		id: String,
		cmd: CreatePost,
		image: Option<String>,
	) -> ServiceResult<Post> {
		cmd.validate()?;
		let CreatePost {
			title,
			content,
			author,
			category,
		} = cmd;

		Ok(Post {
			id,
			title,
			content,
			author,
			category,
			image,
			status: PostStatus::Pending,
			views: 0,
			date: Utc::now(),
		})
	}

	/// Applies the fields present in `cmd`. Validation happens before any field
	/// is touched, so a rejected update leaves the post as it was.
	pub fn apply(
		&mut self,
		cmd: UpdatePost,
	) -> ServiceResult<()> {
		let status = match cmd.status.as_deref() {
			Some(raw) => {
				let next: PostStatus = raw.parse()?;
				if !self.status.can_transition_to(next) {
					return Err(ServiceError::validation(format!("Cannot move a {} post back to {}", self.status, next)));
				}
				Some(next)
			}
			None => None,
		};

		if let Some(title) = cmd.title {
			self.title = title;
		}
		if let Some(content) = cmd.content {
			self.content = content;
		}
		if let Some(author) = cmd.author {
			self.author = author;
		}
		if let Some(image) = cmd.image {
			self.image = image;
		}
		if let Some(status) = status {
			self.status = status;
		}
		if let Some(date) = cmd.date {
			self.date = date;
		}
		Ok(())
	}

	pub fn is_published(&self) -> bool {
		self.status == PostStatus::Published
	}
}
