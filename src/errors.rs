// ============================================================================
// ERREURS MÉTIER
// ============================================================================
//
// Description:
//   Une enum d'erreurs par domaine (utilisateur, corbeille, commande, produit,
//   avis, auth). Les services retournent ces erreurs, les routes les
//   traduisent en codes HTTP par un match explicite.
//
// Correspondance avec les codes HTTP:
//   - NotFound / ItemNotFound / CartNotFound  -> 404
//   - EmailAlreadyExists                      -> 409
//   - CartIsEmpty / Recommendation            -> 400
//   - InvalidCredentials / Token*             -> 401
//   - Db / tout le reste                      -> 500 (détail loggé, message opaque)
//
// ============================================================================

use sea_orm::DbErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("User with ID {0} not found")]
    NotFound(i32),

    #[error("User with this email already exists")]
    EmailAlreadyExists,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Failed to hash password: {0}")]
    PasswordHash(String),

    #[error("Failed to generate token: {0}")]
    Token(String),

    #[error("Database error: {0}")]
    Db(#[from] DbErr),
}

#[derive(Debug, Error)]
pub enum CartError {
    #[error("Cart not found for user {0}")]
    CartNotFound(i32),

    #[error("Product {product_id} not found in cart")]
    ItemNotFound { product_id: i32 },

    // Enveloppe l'erreur d'accès aux données survenue pendant l'ajout
    #[error("Failed to add product {product_id} to cart: {source}")]
    Add { product_id: i32, source: DbErr },

    #[error("Database error: {0}")]
    Db(#[from] DbErr),
}

#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Cannot create order: cart is empty")]
    CartIsEmpty,

    #[error("Order with ID {0} not found")]
    NotFound(i32),

    #[error("Database error: {0}")]
    Db(#[from] DbErr),
}

#[derive(Debug, Error)]
pub enum ProductError {
    #[error("Product with ID {0} not found")]
    NotFound(i32),

    #[error("Failed to build recommendations for product {0}")]
    Recommendation(i32),

    #[error("Malformed catalog data for product {0}: {1}")]
    Malformed(i32, serde_json::Error),

    #[error("Database error: {0}")]
    Db(#[from] DbErr),
}

// Le 404 "avis inexistant" se décide en route, via le lookup Option
#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("Database error: {0}")]
    Db(#[from] DbErr),
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing Authorization header")]
    MissingHeader,

    #[error("Invalid Authorization format (expected: Bearer <token>)")]
    InvalidHeader,

    #[error("Token has expired")]
    TokenExpired,

    #[error("Invalid token")]
    TokenInvalid,

    #[error("Failed to generate token: {0}")]
    TokenCreation(String),
}
