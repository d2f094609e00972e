use actix_web::{HttpResponse, Responder, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::middleware::AuthenticatedUser;
use crate::db::subscriptions as subscription_db;
use crate::db::users as user_db;
use crate::handlers::require_admin;
use crate::models::subscriptions::GrantSubscription;
use crate::models::users::Roles;

/// POST /api/subscriptions/grant — admin grants (or renews) a provider's
/// paid-visibility window.
pub async fn grant(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    body: web::Json<GrantSubscription>,
) -> impl Responder {
    if let Err(resp) = require_admin(&user.0) {
        return resp;
    }

    let input = body.into_inner();

    match user_db::get_user_by_id(db.get_ref(), input.provider_id).await {
        Ok(Some(target)) if target.role == Roles::Provider => {}
        Ok(Some(_)) => {
            return HttpResponse::BadRequest().json(serde_json::json!({
                "error": "Subscriptions can only be granted to providers",
            }));
        }
        Ok(None) => {
            return HttpResponse::NotFound().json(serde_json::json!({
                "error": format!("Provider {} not found", input.provider_id),
            }));
        }
        Err(e) => {
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": format!("Database error: {e}"),
            }));
        }
    }

    match subscription_db::grant(db.get_ref(), input).await {
        Ok(record) => HttpResponse::Created().json(record),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Failed to grant subscription: {e}"),
        })),
    }
}

/// POST /api/subscriptions/{provider_id}/disable — admin expires every
/// active record for the provider.
pub async fn disable(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> impl Responder {
    if let Err(resp) = require_admin(&user.0) {
        return resp;
    }

    let provider_id = path.into_inner();
    match subscription_db::disable(db.get_ref(), provider_id).await {
        Ok(disabled) => HttpResponse::Ok().json(serde_json::json!({
            "disabled": disabled,
        })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Failed to disable subscription: {e}"),
        })),
    }
}

/// GET /api/subscriptions/me — the caller's most recent subscription
/// record (providers check their own access window here).
pub async fn my_subscription(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> impl Responder {
    match subscription_db::get_current_for_provider(db.get_ref(), user.0.id).await {
        Ok(Some(record)) => HttpResponse::Ok().json(record),
        Ok(None) => HttpResponse::NotFound().json(serde_json::json!({
            "error": "No subscription on record",
        })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Database error: {e}"),
        })),
    }
}
