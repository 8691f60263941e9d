use std::path::Path;

use axum::Router;
use tower_http::services::{ServeDir, ServeFile};

/// The front end: `/` and everything under the static root, plus `/admin`.
pub fn page_routers(static_dir: &Path) -> Router {
	Router::new()
		.route_service("/admin", ServeFile::new(static_dir.join("admin.html")))
		.fallback_service(ServeDir::new(static_dir).append_index_html_on_directories(true))
}
