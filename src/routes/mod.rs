mod accounts;
mod comments;
mod extractors;
mod posts;

use axum::{
	extract::DefaultBodyLimit,
	middleware,
	routing::{get, post},
	Json, Router,
};
use serde_json::{json, Value};

use crate::{
	common::middleware_auth::{read_current_user, require_session},
	dependencies::AppState,
};

pub use extractors::JsonBody;
pub use posts::{ImageUpload, PostSubmission};

async fn health() -> Json<Value> {
	Json(json!({ "status": "ok" }))
}

/// JSON API under `/api` plus `/health`. Static pages are mounted by the binary.
pub fn create_routes(state: AppState) -> Router {
	let api = Router::new()
		.route("/posts", get(posts::list_posts).post(posts::create_post))
		.route("/posts/:id", get(posts::get_post).put(posts::update_post).delete(posts::delete_post))
		.route("/posts/:id/views", post(posts::increment_views))
		.route("/comments", get(comments::list_comments).post(comments::create_comment))
		.route("/register", post(accounts::register))
		.route("/login", post(accounts::login))
		.route(
			"/me",
			get(read_current_user).route_layer(middleware::from_fn_with_state(state.clone(), require_session)),
		)
		.layer(DefaultBodyLimit::max(state.max_upload_bytes));

	Router::new().route("/health", get(health)).nest("/api", api).with_state(state)
}
