use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use tokio::sync::OwnedMutexGuard;
use uuid::Uuid;

use crate::model::ResourceTyped;
use crate::quiz::{QuizSession, QuizState};
use crate::web::dto::quiz::{OpenSessionRequest, SessionView, SubmitAnswerRequest};
use crate::web::error::ErrorResponse;
use crate::web::{
    AppState, AuthenticatedUser, RequestContext, WebError, WebResult, check_access, middlewares,
};

pub fn routes<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/", post(quiz_open_handler))
        .route("/{sid}", get(quiz_get_handler).delete(quiz_delete_handler))
        .route("/{sid}/start", post(quiz_start_handler))
        .route("/{sid}/submit", post(quiz_submit_handler))
        .route("/{sid}/next", post(quiz_next_handler))
        .route("/{sid}/commit", post(quiz_commit_handler))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            middlewares::extract_context_fn,
        ))
        .with_state(state)
}

/// Locks the session for the rest of the request.
pub async fn lock_session(
    state: &AppState,
    user: &AuthenticatedUser,
    sid: Uuid,
) -> WebResult<OwnedMutexGuard<QuizSession>> {
    let session = state
        .sessions()
        .get(sid, state.clock().now())
        .await
        .ok_or(WebError::resource_not_found(QuizSession::get_resource_type()))?
        .lock_owned()
        .await;
    check_access(user, &*session)?;
    Ok(session)
}

pub async fn commit(state: &AppState, session: &mut QuizSession) -> WebResult<()> {
    session
        .commit(state.course(), state.store(), state.clock())
        .await?;
    Ok(())
}

#[utoipa::path(
    post,
    path = "/api/v1/quiz/",
    description = "Open a quiz session on an unlocked lesson. The session starts on the lesson content",
    request_body = OpenSessionRequest,
    responses(
        (status = 201, description = "Session opened", body = SessionView),
        (status = 401, description = "You're not authorized to do this", body = ErrorResponse),
        (status = 403, description = "Lesson is still locked", body = ErrorResponse),
        (status = 404, description = "Lesson not found", body = ErrorResponse),
        (status = 503, description = "Progress storage unavailable", body = ErrorResponse),
    ),
    security(
        ("cookie" = []),
        ("bearer" = [])
    ),
    tag = "quiz"
)]
pub async fn quiz_open_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Json(body): Json<OpenSessionRequest>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let (lesson, _, _) = state.unlocked_lesson(user, &body.lesson_id).await?;

    let session = QuizSession::new(user.user_id(), lesson);
    let view = SessionView::from(&session);
    let sid = state.sessions().insert(session, state.clock().now()).await;
    state
        .sessions()
        .retain_latest(user.user_id(), &body.lesson_id, sid)
        .await;

    tracing::debug!(%sid, lesson = %body.lesson_id, "quiz session opened");
    Ok((StatusCode::CREATED, Json(view)))
}

#[utoipa::path(
    get,
    path = "/api/v1/quiz/{session_id}",
    description = "Current state of a quiz session",
    params(
        ("session_id" = Uuid, Path, description = "ID of the session")
    ),
    responses(
        (status = 200, description = "Session found", body = SessionView),
        (status = 401, description = "You're not authorized to do this", body = ErrorResponse),
        (status = 403, description = "Session belongs to someone else", body = ErrorResponse),
        (status = 404, description = "Session not found", body = ErrorResponse),
    ),
    security(
        ("cookie" = []),
        ("bearer" = [])
    ),
    tag = "quiz"
)]
pub async fn quiz_get_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(sid): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let session = lock_session(&state, user, sid).await?;

    Ok((StatusCode::OK, Json(SessionView::from(&*session))))
}

#[utoipa::path(
    post,
    path = "/api/v1/quiz/{session_id}/start",
    description = "Leave the lesson content and show the first question",
    params(
        ("session_id" = Uuid, Path, description = "ID of the session")
    ),
    responses(
        (status = 200, description = "Quiz started", body = SessionView),
        (status = 404, description = "Session not found", body = ErrorResponse),
        (status = 409, description = "Session is past the lesson content", body = ErrorResponse),
    ),
    security(
        ("cookie" = []),
        ("bearer" = [])
    ),
    tag = "quiz"
)]
pub async fn quiz_start_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(sid): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let mut session = lock_session(&state, user, sid).await?;

    if session.start()? == QuizState::Complete {
        commit(&state, &mut session).await?;
    }

    Ok((StatusCode::OK, Json(SessionView::from(&*session))))
}

#[utoipa::path(
    post,
    path = "/api/v1/quiz/{session_id}/submit",
    description = "Answer the current question. The verdict and explanation are returned",
    params(
        ("session_id" = Uuid, Path, description = "ID of the session")
    ),
    request_body = SubmitAnswerRequest,
    responses(
        (status = 200, description = "Answer graded", body = SessionView),
        (status = 404, description = "Session not found", body = ErrorResponse),
        (status = 409, description = "No question is waiting for an answer", body = ErrorResponse),
        (status = 422, description = "Empty or mis-shaped answer", body = ErrorResponse),
    ),
    security(
        ("cookie" = []),
        ("bearer" = [])
    ),
    tag = "quiz"
)]
pub async fn quiz_submit_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(sid): Path<Uuid>,
    Json(body): Json<SubmitAnswerRequest>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let mut session = lock_session(&state, user, sid).await?;
    session.submit(body.answer)?;

    Ok((StatusCode::OK, Json(SessionView::from(&*session))))
}

#[utoipa::path(
    post,
    path = "/api/v1/quiz/{session_id}/next",
    description = "Move past the explanation. After the last question the completion is recorded",
    params(
        ("session_id" = Uuid, Path, description = "ID of the session")
    ),
    responses(
        (status = 200, description = "Advanced", body = SessionView),
        (status = 404, description = "Session not found", body = ErrorResponse),
        (status = 409, description = "No explanation is being shown", body = ErrorResponse),
        (status = 503, description = "Completion not recorded, retry with commit", body = ErrorResponse),
    ),
    security(
        ("cookie" = []),
        ("bearer" = [])
    ),
    tag = "quiz"
)]
pub async fn quiz_next_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(sid): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let mut session = lock_session(&state, user, sid).await?;

    if session.next()? == QuizState::Complete {
        commit(&state, &mut session).await?;
    }

    Ok((StatusCode::OK, Json(SessionView::from(&*session))))
}

#[utoipa::path(
    post,
    path = "/api/v1/quiz/{session_id}/commit",
    description = "Record a completed session. Safe to repeat, the store is written once",
    params(
        ("session_id" = Uuid, Path, description = "ID of the session")
    ),
    responses(
        (status = 200, description = "Completion recorded", body = SessionView),
        (status = 404, description = "Session not found", body = ErrorResponse),
        (status = 409, description = "Session is not complete", body = ErrorResponse),
        (status = 503, description = "Progress storage unavailable", body = ErrorResponse),
    ),
    security(
        ("cookie" = []),
        ("bearer" = [])
    ),
    tag = "quiz"
)]
pub async fn quiz_commit_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(sid): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    let mut session = lock_session(&state, user, sid).await?;
    commit(&state, &mut session).await?;

    Ok((StatusCode::OK, Json(SessionView::from(&*session))))
}

#[utoipa::path(
    delete,
    path = "/api/v1/quiz/{session_id}",
    description = "Abandon a session. Nothing is recorded",
    params(
        ("session_id" = Uuid, Path, description = "ID of the session")
    ),
    responses(
        (status = 204, description = "Session discarded"),
        (status = 403, description = "Session belongs to someone else", body = ErrorResponse),
        (status = 404, description = "Session not found", body = ErrorResponse),
    ),
    security(
        ("cookie" = []),
        ("bearer" = [])
    ),
    tag = "quiz"
)]
pub async fn quiz_delete_handler(
    ctx: RequestContext,
    State(state): State<AppState>,
    Path(sid): Path<Uuid>,
) -> WebResult<impl IntoResponse> {
    let user = ctx.user()?;
    {
        let _session = lock_session(&state, user, sid).await?;
    }
    state.sessions().remove(sid).await;

    Ok(StatusCode::NO_CONTENT)
}
