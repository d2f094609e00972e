use actix_web::FromRequest;
use actix_web::{Error, HttpRequest, dev::Payload, web};
use sea_orm::DatabaseConnection;
use std::future::Future;
use std::pin::Pin;

use crate::auth::jwt;
use crate::db::users::find_or_create_from_auth;
use crate::models::users::{self, CreateUserFromAuth, Roles};

/// Any authenticated account, suspended or not. Only the appeal endpoints
/// and `/auth/me` accept this directly — everything else goes through
/// [`AuthenticatedUser`], which additionally requires the account to be
/// active.
pub struct AuthenticatedAccount(pub users::Model);

/// An authenticated, non-suspended account.
pub struct AuthenticatedUser(pub users::Model);

async fn authenticate(req: HttpRequest) -> Result<users::Model, Error> {
    // 1. Extract the Bearer token from the Authorization header.
    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| actix_web::error::ErrorUnauthorized("Missing Authorization header"))?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        actix_web::error::ErrorUnauthorized("Authorization header must be: Bearer <token>")
    })?;

    // 2. Get the shared signing secret from app data.
    let secret = req
        .app_data::<web::Data<JwtSecret>>()
        .ok_or_else(|| actix_web::error::ErrorInternalServerError("JWT secret not configured"))?;

    // 3. Validate the JWT.
    let claims = jwt::validate_token(token, &secret.get_ref().0)
        .map_err(|e| actix_web::error::ErrorUnauthorized(format!("Invalid token: {e}")))?;

    // 4. Extract user info from claims.
    let user_id = claims
        .user_id()
        .map_err(actix_web::error::ErrorUnauthorized)?;

    let email = claims
        .user_email()
        .ok_or_else(|| actix_web::error::ErrorUnauthorized("No email in token claims"))?;

    // 5. Get the database connection.
    let db = req
        .app_data::<web::Data<DatabaseConnection>>()
        .ok_or_else(|| actix_web::error::ErrorInternalServerError("Database not configured"))?;

    // 6. Find or create the user.
    find_or_create_from_auth(
        db.get_ref(),
        CreateUserFromAuth {
            id: user_id,
            email,
            display_name: claims.display_name(),
            avatar_url: claims.avatar_url(),
            role: Roles::Customer, // default role for new users
        },
    )
    .await
    .map_err(|e| actix_web::error::ErrorInternalServerError(format!("Database error: {e}")))
}

impl FromRequest for AuthenticatedAccount {
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move { authenticate(req).await.map(AuthenticatedAccount) })
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let user = authenticate(req).await?;

            // Suspended accounts keep their session but lose API access;
            // they can still reach /api/appeals and /api/auth/me.
            if !user.is_activated {
                return Err(actix_web::error::ErrorForbidden(
                    "Account is suspended. You may file an appeal.",
                ));
            }

            Ok(AuthenticatedUser(user))
        })
    }
}

/// Wrapper type to store the JWT secret in Actix app data.
#[derive(Clone)]
pub struct JwtSecret(pub String);
