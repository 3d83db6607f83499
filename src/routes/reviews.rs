use actix_web::{post, put, delete, web, HttpResponse};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use tracing::error;
use validator::Validate;

use crate::middleware::AuthUser;
use crate::models::dto::ReviewResponse;
use crate::services::review_service::ReviewService;

// DTO pour poster/modifier un avis
#[derive(Deserialize, Validate)]
pub struct ReviewRequest {
    #[validate(range(min = 1, max = 5))]
    pub rating: i32,
}

fn internal_error<E: std::fmt::Display>(context: &str, e: E) -> HttpResponse {
    error!("{}: {}", context, e);
    HttpResponse::InternalServerError().json(serde_json::json!({
        "error": "Internal server error"
    }))
}

fn review_not_found(product_id: i32) -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "error": format!("Review not found for product {}", product_id)
    }))
}

/// POST /products/{product_id}/reviews - Noter un produit (PROTÉGÉE)
#[post("/products/{product_id}/reviews")]
pub async fn create_review(
    auth_user: AuthUser,
    path: web::Path<i32>,
    body: web::Json<ReviewRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let product_id = path.into_inner();

    if let Err(errors) = body.validate() {
        return HttpResponse::BadRequest().json(errors);
    }

    match ReviewService::create(db.get_ref(), auth_user.user_id, product_id, body.rating).await {
        Ok(review) => HttpResponse::Created().json(ReviewResponse {
            review_id: review.id,
            product_id: review.product_id,
            rating: review.rating,
        }),
        Err(e) => internal_error("Failed to create review", e),
    }
}

/// PUT /products/{product_id}/reviews - Modifier sa note (PROTÉGÉE)
#[put("/products/{product_id}/reviews")]
pub async fn update_review(
    auth_user: AuthUser,
    path: web::Path<i32>,
    body: web::Json<ReviewRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let product_id = path.into_inner();

    if let Err(errors) = body.validate() {
        return HttpResponse::BadRequest().json(errors);
    }

    // L'avis existant est recherché par (user, product) : c'est ce qui tient
    // lieu d'unicité en l'absence de contrainte en base
    let existing = match ReviewService::find_for_user(db.get_ref(), auth_user.user_id, product_id)
        .await
    {
        Ok(Some(review)) => review,
        Ok(None) => return review_not_found(product_id),
        Err(e) => return internal_error("Failed to look up review", e),
    };

    match ReviewService::update_rating(db.get_ref(), existing, body.rating).await {
        Ok(review) => HttpResponse::Ok().json(ReviewResponse {
            review_id: review.id,
            product_id: review.product_id,
            rating: review.rating,
        }),
        Err(e) => internal_error("Failed to update review", e),
    }
}

/// DELETE /products/{product_id}/reviews - Supprimer sa note (PROTÉGÉE)
#[delete("/products/{product_id}/reviews")]
pub async fn delete_review(
    auth_user: AuthUser,
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let product_id = path.into_inner();

    let existing = match ReviewService::find_for_user(db.get_ref(), auth_user.user_id, product_id)
        .await
    {
        Ok(Some(review)) => review,
        Ok(None) => return review_not_found(product_id),
        Err(e) => return internal_error("Failed to look up review", e),
    };

    match ReviewService::delete(db.get_ref(), existing).await {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => internal_error("Failed to delete review", e),
    }
}

pub fn review_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(create_review)
        .service(update_review)
        .service(delete_review);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_must_be_between_1_and_5() {
        assert!(ReviewRequest { rating: 0 }.validate().is_err());
        assert!(ReviewRequest { rating: 1 }.validate().is_ok());
        assert!(ReviewRequest { rating: 5 }.validate().is_ok());
        assert!(ReviewRequest { rating: 6 }.validate().is_err());
    }
}
