use axum::{
    Json, Router, extract::State, http::StatusCode, middleware, response::IntoResponse,
    routing::get,
};

use crate::web::{
    AppState, RequestContext, WebResult, dto::progress::ProgressResponse, error::ErrorResponse,
    middlewares,
};

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/", get(progress_get_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::extract_context_fn,
        ))
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/api/v1/progress/",
    description = "Get current learner's XP, streaks, completed and unlocked lessons",
    responses(
        (status = 200, description = "Progress found", body = ProgressResponse),
        (status = 401, description = "You're not authorized to do this", body = ErrorResponse),
        (status = 503, description = "Progress storage unavailable", body = ErrorResponse),
    ),
    tag = "progress",
    security(
        ("cookie" = []),
        ("bearer" = [])
    )
)]
pub async fn progress_get_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let (snapshot, unlock) = state.progress_of(user).await?;
    let res = ProgressResponse::new(snapshot, &unlock, state.course().lesson_count());

    Ok((StatusCode::OK, Json(res)))
}
