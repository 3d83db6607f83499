pub mod cart;
pub mod health;
pub mod orders;
pub mod products;
pub mod reviews;
pub mod users;

use actix_web::web;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(health::health_check)
            .configure(users::user_routes)
            .configure(products::product_routes)
            .configure(reviews::review_routes)
            .configure(cart::cart_routes)
            .configure(orders::order_routes),
    );
}
