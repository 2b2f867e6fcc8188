use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

pub struct TokenAuthModifier;

impl Modify for TokenAuthModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(schema) = openapi.components.as_mut() {
            schema.add_security_scheme(
                "cookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                    "SID",
                    "JWT token for current user",
                ))),
            );
            schema.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::web::routes::course::course_get_handler,
        crate::web::routes::lessons::lessons_get_handler,
        crate::web::routes::quiz::quiz_open_handler,
        crate::web::routes::quiz::quiz_get_handler,
        crate::web::routes::quiz::quiz_start_handler,
        crate::web::routes::quiz::quiz_submit_handler,
        crate::web::routes::quiz::quiz_next_handler,
        crate::web::routes::quiz::quiz_commit_handler,
        crate::web::routes::quiz::quiz_delete_handler,
        crate::web::routes::progress::progress_get_handler,
        crate::web::routes::leaderboard::leaderboard_list_handler,
    ),
    modifiers(&TokenAuthModifier),
    tags(
        (name = "course", description = "Catalog with per-learner lock state"),
        (name = "quiz", description = "Lesson and quiz sessions"),
    )
)]
pub struct ApiDoc;
