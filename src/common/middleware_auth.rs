use axum::extract::State;
use axum::headers::{authorization::Bearer, Authorization, HeaderMapExt};
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;
use axum::{Extension, Json};

use crate::dependencies::AppState;
use crate::domain::user::Claims;
use crate::services::response::ServiceError;

pub async fn read_current_user(Extension(claims): Extension<Claims>) -> Json<Claims> {
    Json(claims)
}

/// Verifies the bearer session token and hands its claims to the handler.
pub async fn require_session<B>(
    State(state): State<AppState>,
    mut request: Request<B>,
    next: Next<B>,
) -> Result<Response, ServiceError> {
    let bearer = request
        .headers()
        .typed_get::<Authorization<Bearer>>()
        .ok_or(ServiceError::Unauthorized)?;

    let claims = state.accounts.verify_token(bearer.0.token())?;

    let extensions = request.extensions_mut();
    extensions.insert(claims);

    Ok(next.run(request).await)
}
