use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::{database::Record, services::response::ServiceError};

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Post {
	pub id: String,
	pub title: String,
	pub content: String,
	pub author: String,
	#[serde(default)]
	pub category: String,
	/// Reference handed out by the blob store, stored verbatim.
	#[serde(default)]
	pub image: Option<String>,
	#[serde(default)]
	pub status: PostStatus,
	#[serde(default, deserialize_with = "null_as_zero")]
	pub views: u64,
	pub date: DateTime<Utc>,
}

impl Record for Post {
	const COLLECTION: &'static str = "posts";

	fn id(&self) -> &str {
		&self.id
	}
}

/// Moderation status. Posts start pending and become visible once published.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
	#[default]
	Pending,
	Published,
}

impl PostStatus {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Pending => "pending",
			Self::Published => "published",
		}
	}

	/// Only `pending -> published` moves the machine; staying put is allowed.
	pub fn can_transition_to(
		&self,
		next: PostStatus,
	) -> bool {
		matches!(
			(self, next),
			(Self::Pending, Self::Published) | (Self::Pending, Self::Pending) | (Self::Published, Self::Published)
		)
	}
}

impl fmt::Display for PostStatus {
	fn fmt(
		&self,
		f: &mut fmt::Formatter<'_>,
	) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for PostStatus {
	type Err = ServiceError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"pending" => Ok(Self::Pending),
			"published" => Ok(Self::Published),
			other => Err(ServiceError::validation(format!("Invalid status: {other}"))),
		}
	}
}

// Older posts.json files carry no view counter, or a null one.
fn null_as_zero<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
	D: Deserializer<'de>,
{
	Ok(Option::<u64>::deserialize(deserializer)?.unwrap_or_default())
}
