pub mod routers;

use std::{net::SocketAddr, str::FromStr};

use axum::http::Method;

use blog::{
	dependencies::{config, AppState},
	routes::create_routes,
	services::response::ServiceError,
};
use tower::ServiceBuilder;
use tower_http::{
	cors::{AllowOrigin, CorsLayer},
	trace::TraceLayer,
};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), ServiceError> {
	let config = config()?;

	// ! Tracing
	tracing_subscriber::registry()
		.with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
			// axum logs rejections from built-in extractors with the `axum::rejection`
			// target, at `TRACE` level. `axum::rejection=trace` enables showing those events
			format!("blog={},web={},tower_http=debug,axum::rejection=trace", config.log_level, config.log_level).into()
		}))
		.with(tracing_subscriber::fmt::layer())
		.init();

	// ! Collections
	tracing::info!("Loading collections...");
	let state = AppState::new(config).await?;

	let origins = config.cors_origins()?;

	let app = create_routes(state).merge(routers::page_routers(&config.static_dir)).layer(
		ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(
			CorsLayer::new()
				.allow_origin(AllowOrigin::list(origins))
				.allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE]),
		),
	);

	let addr = SocketAddr::from_str(&config.server_ip_port)
		.map_err(|err| ServiceError::Config(format!("SERVER_IP_PORT {}: {}", config.server_ip_port, err)))?;
	tracing::info!("Server running at http://{}", addr);
	axum::Server::bind(&addr)
		.serve(app.into_make_service())
		.await
		.map_err(|err| ServiceError::Internal(err.to_string()))
}
