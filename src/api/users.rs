use actix_web::{
    error::{InternalError, JsonPayloadError},
    http::{
        header::{self, HeaderValue},
        StatusCode,
    },
    web, HttpRequest, HttpResponse, Responder,
};
use serde::Serialize;

use crate::{
    api::metrics::{increment_error_count, increment_mutation_count, increment_request_count},
    models::{ResultEnvelope, UserCandidate},
    services::UserService,
};

/// Converte o envelope em resposta HTTP usando `status` como código
fn respond<T: Serialize>(envelope: &ResultEnvelope<T>) -> HttpResponse {
    if envelope.status >= 400 {
        increment_error_count();
    }

    let status = StatusCode::from_u16(envelope.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    HttpResponse::build(status).json(envelope)
}

/// Body JSON inválido também responde com o envelope (400)
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    log::warn!("⚠️ Rejected request body: {}", err);
    increment_request_count();
    increment_error_count();

    let envelope = ResultEnvelope::<()>::failure(400, err.to_string());
    let response = HttpResponse::BadRequest().json(envelope);
    InternalError::from_response(err, response).into()
}

#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "Users",
    request_body = UserCandidate,
    responses(
        (status = 201, description = "User added successfully"),
        (status = 400, description = "Validation failed; `errors` lists each field violation"),
        (status = 500, description = "Store failure or duplicate email")
    )
)]
pub async fn add_user(
    service: web::Data<UserService>,
    request: web::Json<UserCandidate>,
) -> impl Responder {
    increment_request_count();
    log::info!(
        "📝 POST /users - email: {}",
        request.email.as_ref().and_then(|v| v.as_str()).unwrap_or("N/A")
    );

    let envelope = service.add_user(request.into_inner()).await;
    if envelope.success {
        increment_mutation_count();
    }

    respond(&envelope)
}

#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "Users",
    responses(
        (status = 200, description = "All users (possibly empty)"),
        (status = 304, description = "Listing unchanged since the given ETag"),
        (status = 500, description = "Store failure")
    )
)]
pub async fn list_users(req: HttpRequest, service: web::Data<UserService>) -> impl Responder {
    increment_request_count();
    log::info!("📋 GET /users");

    // Revisão lida antes da consulta: na pior das hipóteses o ETag fica velho
    // e o cliente busca de novo
    let etag = service.revision().etag();

    let not_modified = req
        .headers()
        .get(header::IF_NONE_MATCH)
        .and_then(|value| value.to_str().ok())
        .map(|value| service.revision().matches(value))
        .unwrap_or(false);

    if not_modified {
        return HttpResponse::NotModified()
            .insert_header((header::ETAG, etag))
            .finish();
    }

    let envelope = service.list_users().await;
    let mut response = respond(&envelope);

    if envelope.success {
        log::info!("✅ Listed {} users", envelope.data.as_ref().map_or(0, |u| u.len()));
        if let Ok(value) = HeaderValue::from_str(&etag) {
            response.headers_mut().insert(header::ETAG, value);
        }
        response
            .headers_mut()
            .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    }

    response
}

#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User id (ObjectId hex)")),
    request_body = UserCandidate,
    responses(
        (status = 200, description = "User updated successfully"),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Store failure or duplicate email")
    )
)]
pub async fn edit_user(
    service: web::Data<UserService>,
    user_id: web::Path<String>,
    request: web::Json<UserCandidate>,
) -> impl Responder {
    increment_request_count();
    log::info!("🔧 PUT /users/{}", user_id);

    let envelope = service.edit_user(&user_id, request.into_inner()).await;
    if envelope.success {
        increment_mutation_count();
    }

    respond(&envelope)
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User id (ObjectId hex)")),
    responses(
        (status = 200, description = "User deleted; body carries the removed record"),
        (status = 404, description = "User not found"),
        (status = 500, description = "Store failure")
    )
)]
pub async fn delete_user(
    service: web::Data<UserService>,
    user_id: web::Path<String>,
) -> impl Responder {
    increment_request_count();
    log::info!("🗑️  DELETE /users/{}", user_id);

    let envelope = service.delete_user(&user_id).await;
    if envelope.success {
        increment_mutation_count();
    }

    respond(&envelope)
}

/// Registra as rotas de usuários sob o scope atual
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .route("", web::post().to(add_user))
        .route("", web::get().to(list_users))
        .route("/{id}", web::put().to(edit_user))
        .route("/{id}", web::delete().to(delete_user));
}
