// Configuration de l'application
//
// Chargée une seule fois au démarrage depuis les variables d'environnement
// (fichier .env via dotenv), puis partagée aux routes avec web::Data.
// Pas d'objet global mutable : tout passe par cette struct.

use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let database_url = env::var("DATABASE_URL")
            .map_err(|_| "DATABASE_URL must be set in .env file".to_string())?;

        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| "JWT_SECRET must be set in .env file".to_string())?;

        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let port = match env::var("PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|_| format!("PORT must be a valid port number, got '{raw}'"))?,
            Err(_) => 8080,
        };

        Ok(AppConfig {
            database_url,
            jwt_secret,
            host,
            port,
        })
    }
}
