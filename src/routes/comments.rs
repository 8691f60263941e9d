use axum::{
	extract::{Query, State},
	http::StatusCode,
	Json,
};

use super::extractors::JsonBody;
use crate::{
	dependencies::AppState,
	domain::comment::{Comment, CreateComment, ListCommentsParams},
	services::response::ServiceResult,
};

/// GET /api/comments?postId=
pub async fn list_comments(
	State(state): State<AppState>,
	Query(params): Query<ListCommentsParams>,
) -> Json<Vec<Comment>> {
	let post_id = params.post_id.filter(|post_id| !post_id.is_empty());
	Json(state.comments.list(post_id.as_deref()).await)
}

/// POST /api/comments
pub async fn create_comment(
	State(state): State<AppState>,
	JsonBody(cmd): JsonBody<CreateComment>,
) -> ServiceResult<(StatusCode, Json<Comment>)> {
	let comment = state.comments.create(cmd).await?;
	Ok((StatusCode::CREATED, Json(comment)))
}
