use actix_web::{post, get, put, delete, web, HttpResponse};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use tracing::error;
use validator::{Validate, ValidationError};

use crate::config::AppConfig;
use crate::errors::UserError;
use crate::middleware::AuthUser;
use crate::models::dto::{TokenResponse, UserResponse};
use crate::services::user_service::UserService;

// DTO pour l'inscription
#[derive(Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 20))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 200), custom(function = validate_password_content))]
    pub password: String,
}

// DTO pour la connexion (corps form-encoded)
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

// DTO pour changer le mot de passe
#[derive(Deserialize, Validate)]
pub struct NewPasswordRequest {
    #[validate(length(min = 8, max = 200), custom(function = validate_password_content))]
    pub new_password: String,
}

// Au moins un chiffre et une lettre
fn validate_password_content(password: &str) -> Result<(), ValidationError> {
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(ValidationError::new("password_must_contain_a_digit"));
    }
    if !password.chars().any(|c| c.is_alphabetic()) {
        return Err(ValidationError::new("password_must_contain_a_letter"));
    }
    Ok(())
}

fn internal_error<E: std::fmt::Display>(context: &str, e: E) -> HttpResponse {
    error!("{}: {}", context, e);
    HttpResponse::InternalServerError().json(serde_json::json!({
        "error": "Internal server error"
    }))
}

/// POST /users/ - Créer un compte (PUBLIC)
#[post("/users/")]
pub async fn register(
    body: web::Json<RegisterRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    if let Err(errors) = body.validate() {
        return HttpResponse::BadRequest().json(errors);
    }

    match UserService::register(db.get_ref(), &body.name, &body.email, &body.password).await {
        Ok(user) => HttpResponse::Created().json(UserResponse {
            user_id: user.id,
            name: user.name,
            email: user.email,
        }),
        Err(UserError::EmailAlreadyExists) => HttpResponse::Conflict().json(serde_json::json!({
            "error": "User with this email already exists"
        })),
        Err(e) => internal_error("Failed to register user", e),
    }
}

/// POST /users/login - Se connecter (PUBLIC, corps form-encoded)
#[post("/users/login")]
pub async fn login(
    body: web::Form<LoginRequest>,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
) -> HttpResponse {
    match UserService::login(db.get_ref(), &body.email, &body.password, &config.jwt_secret).await {
        Ok(token) => HttpResponse::Ok().json(TokenResponse { token }),
        // Même message pour email inconnu et mauvais mot de passe
        Err(UserError::InvalidCredentials) => HttpResponse::Unauthorized().json(
            serde_json::json!({
                "error": "Invalid email or password"
            }),
        ),
        Err(e) => internal_error("Login failed", e),
    }
}

/// GET /users - Profil de l'appelant (PROTÉGÉE)
#[get("/users")]
pub async fn me(auth_user: AuthUser, db: web::Data<DatabaseConnection>) -> HttpResponse {
    match UserService::get(db.get_ref(), auth_user.user_id).await {
        Ok(user) => HttpResponse::Ok().json(UserResponse {
            user_id: user.id,
            name: user.name,
            email: user.email,
        }),
        Err(UserError::NotFound(_)) => HttpResponse::NotFound().json(serde_json::json!({
            "error": "User not found"
        })),
        Err(e) => internal_error("Failed to load user profile", e),
    }
}

/// PUT /users/{user_id}/password/ - Changer son mot de passe (PROTÉGÉE)
#[put("/users/{user_id}/password/")]
pub async fn update_password(
    auth_user: AuthUser,
    path: web::Path<i32>,
    body: web::Json<NewPasswordRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let user_id = path.into_inner();

    // Chacun ne modifie que son propre mot de passe
    if user_id != auth_user.user_id {
        return HttpResponse::Forbidden().json(serde_json::json!({
            "error": "Access denied"
        }));
    }

    if let Err(errors) = body.validate() {
        return HttpResponse::BadRequest().json(errors);
    }

    match UserService::update_password(db.get_ref(), user_id, &body.new_password).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "message": "Password updated successfully"
        })),
        Err(UserError::NotFound(_)) => HttpResponse::NotFound().json(serde_json::json!({
            "error": "User not found"
        })),
        Err(e) => internal_error("Failed to update password", e),
    }
}

/// DELETE /users/{user_id} - Supprimer son compte (PROTÉGÉE)
#[delete("/users/{user_id}")]
pub async fn delete_user(
    auth_user: AuthUser,
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let user_id = path.into_inner();

    if user_id != auth_user.user_id {
        return HttpResponse::Forbidden().json(serde_json::json!({
            "error": "Access denied"
        }));
    }

    match UserService::delete(db.get_ref(), user_id).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "message": "User deleted"
        })),
        Err(UserError::NotFound(_)) => HttpResponse::NotFound().json(serde_json::json!({
            "error": "User not found"
        })),
        Err(e) => internal_error("Failed to delete user", e),
    }
}

pub fn user_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(register)
        .service(login)
        .service(me)
        .service(update_password)
        .service(delete_user);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_needs_a_digit() {
        assert!(validate_password_content("abcdefgh").is_err());
        assert!(validate_password_content("abcd1234").is_ok());
    }

    #[test]
    fn test_password_needs_a_letter() {
        assert!(validate_password_content("12345678").is_err());
    }

    #[test]
    fn test_register_request_validation() {
        let valid = RegisterRequest {
            name: "Alice".to_string(),
            email: "a@x.com".to_string(),
            password: "abcd1234".to_string(),
        };
        assert!(valid.validate().is_ok());

        let short_password = RegisterRequest {
            password: "ab1".to_string(),
            ..valid
        };
        assert!(short_password.validate().is_err());

        let bad_email = RegisterRequest {
            name: "Alice".to_string(),
            email: "not-an-email".to_string(),
            password: "abcd1234".to_string(),
        };
        assert!(bad_email.validate().is_err());
    }
}
