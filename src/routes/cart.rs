use actix_web::{post, get, put, delete, web, HttpResponse};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use tracing::error;
use validator::Validate;

use crate::errors::CartError;
use crate::middleware::AuthUser;
use crate::services::cart_service::CartService;

// DTO pour ajouter un produit à la corbeille
#[derive(Deserialize, Validate)]
pub struct AddCartItemRequest {
    pub product_id: i32,
    #[validate(range(min = 1, max = 100))]
    pub quantity: i32,
    pub variant_id: Option<String>,
    pub selected_options: Option<serde_json::Value>,
}

// DTO pour changer la quantité d'une ligne
#[derive(Deserialize, Validate)]
pub struct UpdateCartItemRequest {
    #[validate(range(min = 1, max = 100))]
    pub quantity: i32,
    pub variant_id: Option<String>,
}

// variant_id optionnel en query pour cibler une variante précise
#[derive(Deserialize)]
pub struct RemoveItemParams {
    pub variant_id: Option<String>,
}

fn internal_error<E: std::fmt::Display>(context: &str, e: E) -> HttpResponse {
    error!("{}: {}", context, e);
    HttpResponse::InternalServerError().json(serde_json::json!({
        "error": "Internal server error"
    }))
}

fn cart_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "error": "Cart not found"
    }))
}

fn item_not_found(product_id: i32) -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "error": format!("Product {} not found in cart", product_id)
    }))
}

/// POST /users/carts/items/ - Ajouter un produit à sa corbeille (PROTÉGÉE)
#[post("/users/carts/items/")]
pub async fn add_item(
    auth_user: AuthUser,
    body: web::Json<AddCartItemRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    if let Err(errors) = body.validate() {
        return HttpResponse::BadRequest().json(errors);
    }

    let cart = match CartService::cart_for_user(db.get_ref(), auth_user.user_id).await {
        Ok(cart) => cart,
        Err(CartError::CartNotFound(_)) => return cart_not_found(),
        Err(e) => return internal_error("Failed to load cart", e),
    };

    let request = body.into_inner();
    match CartService::add_item(
        db.get_ref(),
        cart.id,
        request.product_id,
        request.quantity,
        request.variant_id,
        request.selected_options,
    )
    .await
    {
        Ok(item) => HttpResponse::Created().json(serde_json::json!({
            "message": "Product added to cart",
            "product_id": item.product_id,
            "quantity": item.quantity,
            "variant_id": item.variant_id,
        })),
        Err(e) => internal_error("Failed to add product to cart", e),
    }
}

/// PUT /users/carts/items/{product_id}/ - Changer la quantité (PROTÉGÉE)
#[put("/users/carts/items/{product_id}/")]
pub async fn update_item_quantity(
    auth_user: AuthUser,
    path: web::Path<i32>,
    body: web::Json<UpdateCartItemRequest>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let product_id = path.into_inner();

    if let Err(errors) = body.validate() {
        return HttpResponse::BadRequest().json(errors);
    }

    let cart = match CartService::cart_for_user(db.get_ref(), auth_user.user_id).await {
        Ok(cart) => cart,
        Err(CartError::CartNotFound(_)) => return cart_not_found(),
        Err(e) => return internal_error("Failed to load cart", e),
    };

    match CartService::update_quantity(
        db.get_ref(),
        cart.id,
        product_id,
        body.quantity,
        body.variant_id.as_deref(),
    )
    .await
    {
        Ok(item) => HttpResponse::Ok().json(serde_json::json!({
            "message": "Quantity updated",
            "product_id": item.product_id,
            "quantity": item.quantity,
            "variant_id": item.variant_id,
        })),
        Err(CartError::ItemNotFound { product_id }) => item_not_found(product_id),
        Err(e) => internal_error("Failed to update cart item", e),
    }
}

/// DELETE /users/carts/items/{product_id}/ - Retirer un produit (PROTÉGÉE)
/// Renvoie la vue rafraîchie de la corbeille.
#[delete("/users/carts/items/{product_id}/")]
pub async fn remove_item(
    auth_user: AuthUser,
    path: web::Path<i32>,
    params: web::Query<RemoveItemParams>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let product_id = path.into_inner();

    let cart = match CartService::cart_for_user(db.get_ref(), auth_user.user_id).await {
        Ok(cart) => cart,
        Err(CartError::CartNotFound(_)) => return cart_not_found(),
        Err(e) => return internal_error("Failed to load cart", e),
    };

    match CartService::remove_item(db.get_ref(), cart.id, product_id, params.variant_id.as_deref())
        .await
    {
        Ok(()) => {}
        Err(CartError::ItemNotFound { product_id }) => return item_not_found(product_id),
        Err(e) => return internal_error("Failed to remove cart item", e),
    }

    match CartService::build_cart_view(db.get_ref(), &cart).await {
        Ok(view) => HttpResponse::Ok().json(view),
        Err(e) => internal_error("Failed to build cart view", e),
    }
}

/// GET /users/carts/ - Vue valorisée de sa corbeille (PROTÉGÉE)
#[get("/users/carts/")]
pub async fn get_cart(auth_user: AuthUser, db: web::Data<DatabaseConnection>) -> HttpResponse {
    let cart = match CartService::cart_for_user(db.get_ref(), auth_user.user_id).await {
        Ok(cart) => cart,
        Err(CartError::CartNotFound(_)) => return cart_not_found(),
        Err(e) => return internal_error("Failed to load cart", e),
    };

    match CartService::build_cart_view(db.get_ref(), &cart).await {
        Ok(view) => HttpResponse::Ok().json(view),
        Err(e) => internal_error("Failed to build cart view", e),
    }
}

pub fn cart_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(add_item)
        .service(update_item_quantity)
        .service(remove_item)
        .service(get_cart);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantity_must_be_between_1_and_100() {
        let request = AddCartItemRequest {
            product_id: 1,
            quantity: 0,
            variant_id: None,
            selected_options: None,
        };
        assert!(request.validate().is_err());

        let request = AddCartItemRequest {
            product_id: 1,
            quantity: 101,
            variant_id: None,
            selected_options: None,
        };
        assert!(request.validate().is_err());

        let request = AddCartItemRequest {
            product_id: 1,
            quantity: 100,
            variant_id: None,
            selected_options: None,
        };
        assert!(request.validate().is_ok());
    }
}
