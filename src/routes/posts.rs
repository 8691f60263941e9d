use axum::{
	async_trait,
	body::Body,
	extract::{FromRequest, Multipart, Path, Query, State},
	http::{header::CONTENT_TYPE, Request, StatusCode},
	Json,
};
use bytes::Bytes;
use serde_json::{json, Value};

use super::extractors::JsonBody;
use crate::{
	dependencies::AppState,
	domain::post::{
		commands::{CreatePost, ListPostsParams, UpdatePost},
		Post,
	},
	services::response::{ServiceError, ServiceResult},
};

/// A new post, sent either as a multipart form with an optional `image` file
/// or as a plain JSON body.
pub struct PostSubmission {
	pub post: CreatePost,
	pub image: Option<ImageUpload>,
}

pub struct ImageUpload {
	pub file_name: String,
	pub bytes: Bytes,
}

#[async_trait]
impl<S> FromRequest<S, Body> for PostSubmission
where
	S: Send + Sync,
{
	type Rejection = ServiceError;

	async fn from_request(
		req: Request<Body>,
		state: &S,
	) -> Result<Self, Self::Rejection> {
		let is_multipart = req
			.headers()
			.get(CONTENT_TYPE)
			.and_then(|value| value.to_str().ok())
			.map(|value| value.starts_with("multipart/form-data"))
			.unwrap_or(false);

		if !is_multipart {
			let JsonBody(post) = JsonBody::<CreatePost>::from_request(req, state).await?;
			return Ok(Self { post, image: None });
		}

		let mut multipart = Multipart::from_request(req, state)
			.await
			.map_err(|rejection| ServiceError::Upload(rejection.body_text()))?;
		let mut post = CreatePost::default();
		let mut image = None;

		while let Some(field) = multipart.next_field().await.map_err(|err| ServiceError::Upload(err.to_string()))? {
			let name = field.name().unwrap_or_default().to_string();
			if name == "image" {
				let file_name = field.file_name().unwrap_or_default().to_string();
				let bytes = field.bytes().await.map_err(|err| ServiceError::Upload(err.to_string()))?;
				// Browsers send an empty part when no file was picked.
				if !bytes.is_empty() {
					image = Some(ImageUpload { file_name, bytes });
				}
				continue;
			}

			let text = field.text().await.map_err(|err| ServiceError::Upload(err.to_string()))?;
			match name.as_str() {
				"title" => post.title = text,
				"content" => post.content = text,
				"author" => post.author = text,
				"category" => post.category = text,
				_ => {}
			}
		}

		Ok(Self { post, image })
	}
}

/// GET /api/posts
pub async fn list_posts(
	State(state): State<AppState>,
	Query(params): Query<ListPostsParams>,
) -> Json<Vec<Post>> {
	Json(state.posts.list(params.into()).await)
}

/// GET /api/posts/:id
pub async fn get_post(
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> ServiceResult<Json<Post>> {
	Ok(Json(state.posts.get(&id).await?))
}

/// POST /api/posts
pub async fn create_post(
	State(state): State<AppState>,
	submission: PostSubmission,
) -> ServiceResult<(StatusCode, Json<Post>)> {
	let PostSubmission { post, image } = submission;

	// Reject before the upload lands on disk.
	post.validate()?;
	let image = match image {
		Some(upload) => Some(state.blobs.put(&upload.file_name, upload.bytes).await?),
		None => None,
	};

	let post = state.posts.create(post, image).await?;
	Ok((StatusCode::CREATED, Json(post)))
}

/// PUT /api/posts/:id
pub async fn update_post(
	State(state): State<AppState>,
	Path(id): Path<String>,
	JsonBody(cmd): JsonBody<UpdatePost>,
) -> ServiceResult<Json<Post>> {
	Ok(Json(state.posts.update(&id, cmd).await?))
}

/// DELETE /api/posts/:id
pub async fn delete_post(
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> ServiceResult<StatusCode> {
	state.posts.delete(&id).await?;
	Ok(StatusCode::NO_CONTENT)
}

/// POST /api/posts/:id/views
pub async fn increment_views(
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> ServiceResult<Json<Value>> {
	let views = state.posts.increment_views(&id).await?;
	Ok(Json(json!({ "views": views })))
}
