use actix_web::{HttpResponse, Responder, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::middleware::{AuthenticatedAccount, AuthenticatedUser};
use crate::db::appeals as appeal_db;
use crate::handlers::require_admin;
use crate::models::appeals::{CreateAppeal, UpdateAppealStatus};
use crate::models::users::Roles;

/// POST /api/appeals — a provider contests a suspension. Uses the
/// account-level extractor: suspended accounts must be able to file.
pub async fn create_appeal(
    account: AuthenticatedAccount,
    db: web::Data<DatabaseConnection>,
    body: web::Json<CreateAppeal>,
) -> impl Responder {
    if account.0.role != Roles::Provider {
        return HttpResponse::Forbidden().json(serde_json::json!({
            "error": "Only providers can file suspension appeals",
        }));
    }

    match appeal_db::insert_appeal(db.get_ref(), account.0.id, body.into_inner()).await {
        Ok(appeal) => HttpResponse::Created().json(appeal),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Failed to file appeal: {e}"),
        })),
    }
}

/// GET /api/appeals — the admin review queue, newest first.
pub async fn get_appeals(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> impl Responder {
    if let Err(resp) = require_admin(&user.0) {
        return resp;
    }

    match appeal_db::get_all_appeals(db.get_ref()).await {
        Ok(appeals) => HttpResponse::Ok().json(appeals),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Database error: {e}"),
        })),
    }
}

/// GET /api/appeals/mine — the caller's own appeals (suspended accounts
/// included, so they can watch the review status).
pub async fn my_appeals(
    account: AuthenticatedAccount,
    db: web::Data<DatabaseConnection>,
) -> impl Responder {
    match appeal_db::get_appeals_by_provider(db.get_ref(), account.0.id).await {
        Ok(appeals) => HttpResponse::Ok().json(appeals),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Database error: {e}"),
        })),
    }
}

/// PUT /api/appeals/{id}/status — admin moves an appeal through review.
/// Appeals are never deleted.
pub async fn update_status(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateAppealStatus>,
) -> impl Responder {
    if let Err(resp) = require_admin(&user.0) {
        return resp;
    }

    let appeal_id = path.into_inner();
    match appeal_db::update_appeal_status(db.get_ref(), appeal_id, body.into_inner()).await {
        Ok(updated) => HttpResponse::Ok().json(updated),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Failed to update appeal: {e}"),
        })),
    }
}
