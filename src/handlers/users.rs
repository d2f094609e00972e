use actix_web::{HttpResponse, Responder, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::middleware::AuthenticatedUser;
use crate::db::users as user_db;
use crate::models::users::{Roles, UpdateUser, UserResponse};

/// GET /api/users/{id} — public profile of any user.
pub async fn get_user(
    _user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> impl Responder {
    let user_id = path.into_inner();

    match user_db::get_user_by_id(db.get_ref(), user_id).await {
        Ok(Some(found)) => HttpResponse::Ok().json(UserResponse::from(found)),
        Ok(None) => HttpResponse::NotFound().json(serde_json::json!({
            "error": format!("User {user_id} not found"),
        })),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Database error: {e}"),
        })),
    }
}

/// PUT /api/users/{id} — update a profile. Users can edit themselves;
/// only admins can edit others or touch the activation flag.
pub async fn update_user(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateUser>,
) -> impl Responder {
    let target_id = path.into_inner();
    let is_admin = user.0.role == Roles::Admin;

    if target_id != user.0.id && !is_admin {
        return HttpResponse::Forbidden().json(serde_json::json!({
            "error": "You can only update your own profile",
        }));
    }
    if body.is_activated.is_some() && !is_admin {
        return HttpResponse::Forbidden().json(serde_json::json!({
            "error": "Only admins can suspend or reactivate accounts",
        }));
    }

    match user_db::update_user(db.get_ref(), target_id, body.into_inner()).await {
        Ok(updated) => HttpResponse::Ok().json(UserResponse::from(updated)),
        Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({
            "error": format!("Failed to update user: {e}"),
        })),
    }
}
