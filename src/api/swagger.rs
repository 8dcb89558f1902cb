use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "User Directory API",
        version = "1.0.0",
        description = "CRUD API for user records (name, email, address, phone).\n\n**Result envelope:** every `/api/v1/users` response is `{success, status, message, data?, errors?}`; the HTTP status always equals `status`.\n\n**Validation:** failures return 400 with `errors: [{path, message}]` and `message` set to all messages joined with \", \".\n\n**Caching:** `GET /api/v1/users` returns a weak `ETag` that changes after every successful add, edit or delete."
    ),
    paths(
        // Users
        crate::api::users::add_user,
        crate::api::users::list_users,
        crate::api::users::edit_user,
        crate::api::users::delete_user,

        // Health & Metrics
        crate::api::health::health_check,
        crate::api::metrics::get_metrics,
    ),
    components(
        schemas(
            crate::models::User,
            crate::models::UserCandidate,
            crate::models::FieldError,
            crate::api::health::HealthResponse,
            crate::api::metrics::MetricsResponse,
        )
    ),
    tags(
        (name = "Users", description = "Add, edit, list and delete user records."),
        (name = "Health", description = "Health check and system metrics endpoints for monitoring service status."),
    )
)]
pub struct ApiDoc;
