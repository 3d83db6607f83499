// Inscription, connexion et gestion de profil.
//
// L'inscription crée aussi la corbeille de l'utilisateur : elle vit ensuite
// aussi longtemps que le compte. La connexion répond par le même message
// pour un email inconnu et un mauvais mot de passe (pas de fuite d'info).

use sea_orm::*;
use tracing::info;

use crate::errors::UserError;
use crate::models::{cart, users};
use crate::utils::{jwt, password};

pub struct UserService;

impl UserService {
    pub async fn get(db: &DatabaseConnection, user_id: i32) -> Result<users::Model, UserError> {
        users::Entity::find_by_id(user_id)
            .one(db)
            .await?
            .ok_or(UserError::NotFound(user_id))
    }

    /// Crée le compte (email unique) et sa corbeille.
    pub async fn register(
        db: &DatabaseConnection,
        name: &str,
        email: &str,
        plain_password: &str,
    ) -> Result<users::Model, UserError> {
        // L'unicité est aussi garantie par la contrainte en base; le
        // pré-contrôle donne une erreur de conflit propre
        let existing = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(db)
            .await?;

        if existing.is_some() {
            return Err(UserError::EmailAlreadyExists);
        }

        let password_hash = password::hash_password(plain_password)
            .map_err(UserError::PasswordHash)?;

        let user = users::ActiveModel {
            name: Set(name.to_string()),
            email: Set(email.to_string()),
            password: Set(password_hash),
            ..Default::default()
        }
        .insert(db)
        .await?;

        cart::ActiveModel {
            user_id: Set(user.id),
            ..Default::default()
        }
        .insert(db)
        .await?;

        info!("Registered user {} and created their cart", user.id);
        Ok(user)
    }

    /// Vérifie les identifiants et émet un token signé portant l'id
    /// utilisateur en sujet.
    pub async fn login(
        db: &DatabaseConnection,
        email: &str,
        plain_password: &str,
        jwt_secret: &str,
    ) -> Result<String, UserError> {
        let user = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(db)
            .await?
            .ok_or(UserError::InvalidCredentials)?;

        let valid = password::verify_password(plain_password, &user.password)
            .map_err(|_| UserError::InvalidCredentials)?;

        if !valid {
            return Err(UserError::InvalidCredentials);
        }

        jwt::generate_token(user.id, jwt_secret).map_err(|e| UserError::Token(e.to_string()))
    }

    pub async fn update_password(
        db: &DatabaseConnection,
        user_id: i32,
        new_password: &str,
    ) -> Result<users::Model, UserError> {
        let user = Self::get(db, user_id).await?;

        let password_hash = password::hash_password(new_password)
            .map_err(UserError::PasswordHash)?;

        let mut active: users::ActiveModel = user.into();
        active.password = Set(password_hash);
        let updated = active.update(db).await?;

        info!("Password updated for user {}", user_id);
        Ok(updated)
    }

    pub async fn delete(db: &DatabaseConnection, user_id: i32) -> Result<(), UserError> {
        let user = Self::get(db, user_id).await?;
        user.delete(db).await?;
        info!("Deleted user {}", user_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn sample_user(id: i32, email: &str) -> users::Model {
        users::Model {
            id,
            name: "Alice".to_string(),
            email: email.to_string(),
            password: password::hash_password("abcd1234").unwrap(),
        }
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate_email() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![sample_user(1, "a@x.com")]])
            .into_connection();

        let result = UserService::register(&db, "Bob", "a@x.com", "abcd1234").await;
        assert!(matches!(result, Err(UserError::EmailAlreadyExists)));
    }

    #[tokio::test]
    async fn test_register_creates_user_and_cart() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<users::Model>::new()])
            .append_query_results([vec![sample_user(1, "a@x.com")]])
            .append_query_results([vec![cart::Model { id: 1, user_id: 1 }]])
            .into_connection();

        let user = UserService::register(&db, "Alice", "a@x.com", "abcd1234")
            .await
            .unwrap();
        assert_eq!(user.id, 1);
        assert_eq!(user.email, "a@x.com");
    }

    #[tokio::test]
    async fn test_login_unknown_email_is_invalid_credentials() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<users::Model>::new()])
            .into_connection();

        let result = UserService::login(&db, "nobody@x.com", "abcd1234", "secret").await;
        assert!(matches!(result, Err(UserError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_wrong_password_is_invalid_credentials() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![sample_user(1, "a@x.com")]])
            .into_connection();

        let result = UserService::login(&db, "a@x.com", "wrong-password", "secret").await;
        assert!(matches!(result, Err(UserError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_issues_token_with_user_id() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![sample_user(42, "a@x.com")]])
            .into_connection();

        let token = UserService::login(&db, "a@x.com", "abcd1234", "secret")
            .await
            .unwrap();

        let claims = crate::utils::jwt::verify_token(&token, "secret").unwrap();
        assert_eq!(claims.sub, 42);
    }
}
