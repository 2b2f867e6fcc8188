use axum::{
    Json, Router, extract::State, http::StatusCode, middleware, response::IntoResponse,
    routing::get,
};

use crate::web::{
    AppState, RequestContext, WebResult, dto::course::CourseResponse, error::ErrorResponse,
    middlewares,
};

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/", get(course_get_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::extract_context_fn,
        ))
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/api/v1/course/",
    description = "The whole catalog with lock and completion state for the current learner",
    responses(
        (status = 200, description = "Course found", body = CourseResponse),
        (status = 401, description = "You had to be authorized to do this", body = ErrorResponse),
        (status = 503, description = "Progress storage unavailable", body = ErrorResponse),
    ),
    tag = "course",
    security(
        ("cookie" = []),
        ("bearer" = [])
    )
)]
pub async fn course_get_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let (_, unlock) = state.progress_of(user).await?;

    Ok((
        StatusCode::OK,
        Json(CourseResponse::new(state.course(), &unlock)),
    ))
}
