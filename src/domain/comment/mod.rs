// domain for comments left on posts
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
	database::Record,
	services::response::{ServiceError, ServiceResult},
};

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
	pub id: String,
	/// Not checked against the posts collection.
	pub post_id: String,
	pub author: String,
	pub text: String,
	pub date: DateTime<Utc>,
}

impl Record for Comment {
	const COLLECTION: &'static str = "comments";

	fn id(&self) -> &str {
		&self.id
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateComment {
	#[serde(default)]
	pub author: String,
	#[serde(default)]
	pub text: String,
	#[serde(default)]
	pub post_id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCommentsParams {
	pub post_id: Option<String>,
}

impl Comment {
	pub fn write(
		id: String,
		cmd: CreateComment,
	) -> ServiceResult<Comment> {
		if cmd.author.is_empty() || cmd.text.is_empty() || cmd.post_id.is_empty() {
			return Err(ServiceError::validation("Missing fields"));
		}

		Ok(Comment {
			id,
			post_id: cmd.post_id,
			author: cmd.author,
			text: cmd.text,
			date: Utc::now(),
		})
	}
}

#[test]
fn test_comment_wire_format() {
	let comment = Comment::write(
		"1".into(),
		CreateComment {
			author: "Luis".into(),
			text: "Nice post".into(),
			post_id: "42".into(),
		},
	)
	.unwrap();

	let jsonified = serde_json::to_value(&comment).unwrap();
	assert_eq!(jsonified["postId"], "42");
	assert!(jsonified.get("post_id").is_none());
}

#[test]
fn test_comment_requires_every_field() {
	let cmd: CreateComment = serde_json::from_str(r#"{"author":"Luis","text":"hi"}"#).unwrap();
	assert!(matches!(Comment::write("1".into(), cmd), Err(ServiceError::Validation(_))));
}
