use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

use crate::services::response::{ServiceError, ServiceResult};

const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatePost {
	#[serde(default)]
	pub title: String,
	#[serde(default)]
	pub content: String,
	#[serde(default)]
	pub author: String,
	#[serde(default)]
	pub category: String,
}

impl CreatePost {
	pub fn validate(&self) -> ServiceResult<()> {
		if [&self.title, &self.content, &self.author, &self.category].iter().any(|field| field.is_empty()) {
			return Err(ServiceError::validation("Missing fields"));
		}
		Ok(())
	}
}

/// Fields an update may touch. Anything else in the request body is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePost {
	pub title: Option<String>,
	pub content: Option<String>,
	pub author: Option<String>,
	/// `None` leaves the image alone, `Some(None)` clears it.
	#[serde(default, deserialize_with = "present")]
	pub image: Option<Option<String>>,
	pub status: Option<String>,
	pub date: Option<DateTime<Utc>>,
}

// A key that is present, even as null, wraps in Some.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
	D: Deserializer<'de>,
	T: Deserialize<'de>,
{
	T::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListPosts {
	pub include_all: bool,
	/// Zero based
	pub page: usize,
	pub page_size: usize,
}

impl Default for ListPosts {
	fn default() -> Self {
		Self {
			include_all: false,
			page: 0,
			page_size: DEFAULT_PAGE_SIZE,
		}
	}
}

/// Raw `?all=&page=&limit=` query, parsed leniently.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListPostsParams {
	pub all: Option<String>,
	pub page: Option<String>,
	pub limit: Option<String>,
}

impl From<ListPostsParams> for ListPosts {
	fn from(params: ListPostsParams) -> Self {
		let include_all = matches!(params.all.as_deref(), Some("1") | Some("true"));
		let page = params.page.and_then(|page| page.trim().parse().ok()).unwrap_or(0);
		let page_size = params
			.limit
			.and_then(|limit| limit.trim().parse().ok())
			.filter(|limit: &usize| *limit > 0)
			.unwrap_or(DEFAULT_PAGE_SIZE);

		Self {
			include_all,
			page,
			page_size,
		}
	}
}
