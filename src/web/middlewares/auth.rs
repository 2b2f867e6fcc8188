use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use tower_cookies::Cookies;

use crate::{
    auth,
    web::{AppState, AuthenticatedUser, RequestContext, UserRole, error::WebError},
};

pub static AUTH_TOKEN: &str = "SID";

/// Reads the token from the `SID` cookie, falling back to `Authorization: Bearer`.
pub async fn extract_context_fn(
    State(state): State<AppState>,
    cookies: Cookies,
    mut req: Request,
    next: Next,
) -> Result<Response, WebError> {
    let token = match cookies.get(AUTH_TOKEN) {
        Some(cookie) => Some((AUTH_TOKEN, cookie.value().to_string())),
        None => req
            .headers()
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(|t| ("authorization", t.trim().to_string())),
    };

    let Some((source, token)) = token else {
        req.extensions_mut().insert(RequestContext::new(None));
        return Ok(next.run(req).await);
    };

    let claims = auth::process_token(&token, state.jwt())
        .map_err(|e| WebError::auth_token_invalid(source, e))?;
    let user_id = claims
        .user_id()
        .map_err(|e| WebError::auth_token_invalid(source, e))?;
    let role = UserRole::from(claims.role.as_deref());

    tracing::trace!(%user_id, %role, "request authenticated");
    req.extensions_mut()
        .insert(RequestContext::new(Some(AuthenticatedUser::new(user_id, role))));

    Ok(next.run(req).await)
}
