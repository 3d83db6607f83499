use actix_web::{dev::Payload, web, Error, FromRequest, HttpRequest, HttpResponse};
use futures::future::{ready, Ready};
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::errors::AuthError;
use crate::utils::jwt;

/// Structure qui contient l'identité de l'utilisateur authentifié.
/// Utilisée comme extracteur dans les routes protégées.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub user_id: i32,
}

fn unauthorized(message: &str) -> Error {
    let response = HttpResponse::Unauthorized().json(serde_json::json!({
        "error": message
    }));
    actix_web::error::InternalError::from_response("", response).into()
}

/// Implémentation de FromRequest pour AuthUser.
/// Actix-Web extrait automatiquement AuthUser des requêtes : header
/// Authorization au format "Bearer <token>", vérifié avec la clé secrète
/// de la configuration.
impl FromRequest for AuthUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        // 1. Extraire le header Authorization
        let auth_header = match req.headers().get("Authorization") {
            Some(header) => header,
            None => return ready(Err(unauthorized(&AuthError::MissingHeader.to_string()))),
        };

        // 2. Convertir le header en string
        let auth_str = match auth_header.to_str() {
            Ok(s) => s,
            Err(_) => return ready(Err(unauthorized(&AuthError::InvalidHeader.to_string()))),
        };

        // 3. Extraire le token (format: "Bearer <token>")
        let token = match auth_str.strip_prefix("Bearer ") {
            Some(token) => token,
            None => return ready(Err(unauthorized(&AuthError::InvalidHeader.to_string()))),
        };

        // 4. Récupérer la clé secrète depuis la configuration partagée
        let config = match req.app_data::<web::Data<AppConfig>>() {
            Some(config) => config,
            None => {
                let response = HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": "Internal server error"
                }));
                return ready(Err(
                    actix_web::error::InternalError::from_response("", response).into(),
                ));
            }
        };

        // 5. Vérifier le token JWT
        let claims = match jwt::verify_token(token, &config.jwt_secret) {
            Ok(claims) => claims,
            Err(e) => return ready(Err(unauthorized(&e.to_string()))),
        };

        ready(Ok(AuthUser {
            user_id: claims.sub,
        }))
    }
}
