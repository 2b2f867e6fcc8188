use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::get,
};

use crate::model::{Page, ResourceType};
use crate::progress::LeaderboardEntry;
use crate::web::{
    AppState, RequestContext, WebError, WebResult, error::ErrorResponse, middlewares,
    routes::PaginationQuery,
};

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/", get(leaderboard_list_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::extract_context_fn,
        ))
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/api/v1/leaderboard/",
    description = "Learners ranked by total XP",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Leaderboard page", body = Page<LeaderboardEntry>),
        (status = 401, description = "You're not authorized to do this", body = ErrorResponse),
        (status = 503, description = "Progress storage unavailable", body = ErrorResponse),
    ),
    tag = "leaderboard",
    security(
        ("cookie" = []),
        ("bearer" = [])
    )
)]
pub async fn leaderboard_list_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Query(page): Query<PaginationQuery>,
) -> WebResult<impl IntoResponse> {
    ctx.user()?;
    let page = state
        .store()
        .leaderboard(page.limit(), page.offset())
        .await
        .map_err(|e| WebError::resource_fetch_error(ResourceType::Leaderboard, e))?;

    Ok((StatusCode::OK, Json(page)))
}
