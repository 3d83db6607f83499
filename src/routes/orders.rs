use actix_web::{post, get, put, web, HttpResponse};
use sea_orm::DatabaseConnection;
use tracing::{error, info, warn};

use crate::errors::OrderError;
use crate::middleware::AuthUser;
use crate::models::dto::OrderResponse;
use crate::services::order_service::OrderService;

fn internal_error<E: std::fmt::Display>(context: &str, e: E) -> HttpResponse {
    error!("{}: {}", context, e);
    HttpResponse::InternalServerError().json(serde_json::json!({
        "error": "Internal server error"
    }))
}

fn order_not_found(order_id: i32) -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "error": format!("Order with ID {} not found", order_id)
    }))
}

/// POST /users/order/ - Créer une commande depuis sa corbeille (PROTÉGÉE)
#[post("/users/order/")]
pub async fn create_order(auth_user: AuthUser, db: web::Data<DatabaseConnection>) -> HttpResponse {
    info!("Order creation requested by user {}", auth_user.user_id);

    match OrderService::create(db.get_ref(), auth_user.user_id).await {
        Ok((order, items)) => {
            HttpResponse::Created().json(OrderResponse::from_entities(order, items))
        }
        Err(OrderError::CartIsEmpty) => {
            warn!("Order creation failed for user {}: empty cart", auth_user.user_id);
            HttpResponse::BadRequest().json(serde_json::json!({
                "error": "Cannot create order: cart is empty"
            }))
        }
        Err(e) => internal_error("Failed to create order", e),
    }
}

/// GET /users/order/{order_id}/ - Récupérer une commande (PROTÉGÉE)
#[get("/users/order/{order_id}/")]
pub async fn get_order(
    auth_user: AuthUser,
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let order_id = path.into_inner();

    let order = match OrderService::get(db.get_ref(), order_id).await {
        Ok(order) => order,
        Err(OrderError::NotFound(_)) => return order_not_found(order_id),
        Err(e) => return internal_error("Failed to load order", e),
    };

    // Chaque utilisateur ne voit que ses propres commandes
    if order.user_id != auth_user.user_id {
        warn!(
            "User {} denied access to order {}",
            auth_user.user_id, order_id
        );
        return HttpResponse::Forbidden().json(serde_json::json!({
            "error": "Access denied"
        }));
    }

    match OrderService::items(db.get_ref(), order_id).await {
        Ok(items) => HttpResponse::Ok().json(OrderResponse::from_entities(order, items)),
        Err(e) => internal_error("Failed to load order items", e),
    }
}

/// GET /users/orders/ - Toutes ses commandes (PROTÉGÉE)
#[get("/users/orders/")]
pub async fn get_user_orders(
    auth_user: AuthUser,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let orders = match OrderService::list_for_user(db.get_ref(), auth_user.user_id).await {
        Ok(orders) => orders,
        Err(e) => return internal_error("Failed to list orders", e),
    };

    let mut responses = Vec::with_capacity(orders.len());
    for order in orders {
        let items = match OrderService::items(db.get_ref(), order.id).await {
            Ok(items) => items,
            Err(e) => return internal_error("Failed to load order items", e),
        };
        responses.push(OrderResponse::from_entities(order, items));
    }

    HttpResponse::Ok().json(responses)
}

/// PUT /users/order/{order_id}/complete/ - Marquer comme payée (PROTÉGÉE)
#[put("/users/order/{order_id}/complete/")]
pub async fn complete_order(
    auth_user: AuthUser,
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let order_id = path.into_inner();

    let order = match OrderService::get(db.get_ref(), order_id).await {
        Ok(order) => order,
        Err(OrderError::NotFound(_)) => return order_not_found(order_id),
        Err(e) => return internal_error("Failed to load order", e),
    };

    if order.user_id != auth_user.user_id {
        return HttpResponse::Forbidden().json(serde_json::json!({
            "error": "Access denied"
        }));
    }

    let completed = match OrderService::complete(db.get_ref(), order_id).await {
        Ok(completed) => completed,
        Err(e) => return internal_error("Failed to complete order", e),
    };

    match OrderService::items(db.get_ref(), order_id).await {
        Ok(items) => HttpResponse::Ok().json(OrderResponse::from_entities(completed, items)),
        Err(e) => internal_error("Failed to load order items", e),
    }
}

pub fn order_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(create_order)
        .service(complete_order)
        .service(get_order)
        .service(get_user_orders);
}
