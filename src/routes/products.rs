use actix_web::{get, web, HttpResponse};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::errors::ProductError;
use crate::models::dto::{ProductDetailResponse, ProductListResponse, ProductSummary};
use crate::services::product_service::ProductService;
use crate::services::review_service::ReviewService;

#[derive(Deserialize)]
pub struct Pagination {
    pub page: Option<u64>,
    pub count: Option<u64>,
}

impl Pagination {
    // page > 0, 0 < count <= 100, sinon 400
    fn resolve(&self) -> Result<(u64, u64), HttpResponse> {
        let page = self.page.unwrap_or(1);
        let count = self.count.unwrap_or(10);

        if page == 0 || count == 0 || count > 100 {
            return Err(HttpResponse::BadRequest().json(serde_json::json!({
                "error": "page must be > 0 and count must be between 1 and 100"
            })));
        }

        Ok((page, count))
    }
}

fn internal_error<E: std::fmt::Display>(context: &str, e: E) -> HttpResponse {
    error!("{}: {}", context, e);
    HttpResponse::InternalServerError().json(serde_json::json!({
        "error": "Internal server error"
    }))
}

/// GET /products/{product_id} - Détail d'un produit avec sa note moyenne
#[get("/products/{product_id}")]
pub async fn get_product(
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let product_id = path.into_inner();

    let product = match ProductService::get(db.get_ref(), product_id).await {
        Ok(product) => product,
        Err(ProductError::NotFound(_)) => {
            warn!("Product {} not found", product_id);
            return HttpResponse::NotFound().json(serde_json::json!({
                "error": format!("Product with ID {} not found", product_id)
            }));
        }
        Err(e) => return internal_error("Failed to load product", e),
    };

    let rating = match ReviewService::average_rating(db.get_ref(), product_id).await {
        Ok(rating) => rating,
        Err(e) => return internal_error("Failed to compute product rating", e),
    };

    match ProductDetailResponse::from_entity(&product, rating) {
        Ok(detail) => {
            info!("Product {} served", product_id);
            HttpResponse::Ok().json(detail)
        }
        Err(e) => internal_error(
            "Malformed catalog data",
            ProductError::Malformed(product_id, e),
        ),
    }
}

/// GET /products?page=&count= - Liste paginée au format réduit
#[get("/products")]
pub async fn list_products(
    query: web::Query<Pagination>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let (page, count) = match query.resolve() {
        Ok(resolved) => resolved,
        Err(response) => return response,
    };

    match ProductService::list(db.get_ref(), page, count).await {
        Ok(products) => {
            let summaries: Vec<ProductSummary> =
                products.iter().map(ProductSummary::from_entity).collect();

            info!("Product list served: page {}, count {}", page, count);
            HttpResponse::Ok().json(ProductListResponse { products: summaries })
        }
        Err(e) => internal_error("Failed to list products", e),
    }
}

/// GET /category/{category_id}?page=&count= - Produits d'une catégorie,
/// chacun avec sa note moyenne
#[get("/category/{category_id}")]
pub async fn products_by_category(
    path: web::Path<i32>,
    query: web::Query<Pagination>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let category_id = path.into_inner();

    let (page, count) = match query.resolve() {
        Ok(resolved) => resolved,
        Err(response) => return response,
    };

    let products = match ProductService::by_category(db.get_ref(), category_id, page, count).await {
        Ok(products) => products,
        Err(e) => return internal_error("Failed to list category products", e),
    };

    let mut summaries = Vec::with_capacity(products.len());
    for product in &products {
        let rating = match ReviewService::average_rating(db.get_ref(), product.id).await {
            Ok(rating) => rating,
            Err(e) => return internal_error("Failed to compute product rating", e),
        };
        summaries.push(ProductSummary::from_entity(product).with_rating(rating));
    }

    info!("Category {} products served", category_id);
    HttpResponse::Ok().json(ProductListResponse { products: summaries })
}

/// GET /products/{product_id}/recommendations - Top 5 par similarité de
/// description
#[get("/products/{product_id}/recommendations")]
pub async fn get_recommendations(
    path: web::Path<i32>,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    let product_id = path.into_inner();

    let recommended = match ProductService::recommendations(db.get_ref(), product_id).await {
        Ok(recommended) => recommended,
        Err(ProductError::NotFound(_)) => {
            warn!("Product {} not found for recommendations", product_id);
            return HttpResponse::NotFound().json(serde_json::json!({
                "error": format!("Product with ID {} not found", product_id)
            }));
        }
        Err(e @ ProductError::Db(_)) => return internal_error("Failed to load product", e),
        Err(e) => {
            warn!("Recommendation failure for product {}: {}", product_id, e);
            return HttpResponse::BadRequest().json(serde_json::json!({
                "error": format!("Failed to build recommendations for product {}", product_id)
            }));
        }
    };

    // Une donnée catalogue illisible fait échouer toute l'opération,
    // pas de liste partielle silencieuse
    let mut edges = Vec::with_capacity(recommended.len());
    for product in &recommended {
        match ProductDetailResponse::from_entity(product, 0.0) {
            Ok(detail) => edges.push(detail),
            Err(e) => {
                warn!(
                    "Recommendation serialization failure for product {}: {}",
                    product_id, e
                );
                return HttpResponse::BadRequest().json(serde_json::json!({
                    "error": format!("Failed to build recommendations for product {}", product_id)
                }));
            }
        }
    }

    info!("Recommendations served for product {}", product_id);
    HttpResponse::Ok().json(serde_json::json!({ "edges": edges }))
}

pub fn product_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(get_recommendations)
        .service(get_product)
        .service(list_products)
        .service(products_by_category);
}
