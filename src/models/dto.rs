// DTO pour les réponses API.
//
// La surface storefront (détail produit, lignes de corbeille) suit le format
// camelCase d'origine; le reste (utilisateurs, commandes, avis) reste en
// snake_case.

use chrono::Utc;
use serde::Serialize;
use serde_json::{Value, json};

use crate::models::catalog::{Money, PriceRange, ProductImage, SelectedOption, Variant};
use crate::models::{order, order_product, product};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub time: chrono::DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Utilisateurs
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user_id: i32,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

// ---------------------------------------------------------------------------
// Avis
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct ReviewResponse {
    pub review_id: i32,
    pub product_id: i32,
    pub rating: i32,
}

// ---------------------------------------------------------------------------
// Corbeille
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct CartResponse {
    pub id: i32,
    pub user_id: i32,
    pub items: Vec<CartLineResponse>,
    pub total_items: usize, // nombre de lignes distinctes, PAS la somme des quantités
    pub total_price: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineResponse {
    pub id: String, // "line-{cart_product_id}"
    pub quantity: i32,
    pub cost: LineCost,
    pub merchandise: Merchandise,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineCost {
    pub total_amount: Money,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Merchandise {
    pub id: String, // id de la variante
    pub title: String,
    pub product: LineProduct,
    pub selected_options: Vec<SelectedOption>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineProduct {
    pub id: String, // "product-{id}"
    pub title: String,
    pub handle: Option<String>,
    pub featured_image: LineImage,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineImage {
    pub url: Option<String>,
    pub alt_text: String,
}

// ---------------------------------------------------------------------------
// Commandes
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub id: i32,
    pub user_id: i32,
    pub payment: bool,
    pub items: Vec<OrderItemResponse>,
}

#[derive(Debug, Serialize)]
pub struct OrderItemResponse {
    pub id: i32,
    pub product_id: i32,
    pub quantity: i32,
}

impl OrderResponse {
    pub fn from_entities(order: order::Model, items: Vec<order_product::Model>) -> Self {
        OrderResponse {
            id: order.id,
            user_id: order.user_id,
            payment: order.payment,
            items: items
                .into_iter()
                .map(|item| OrderItemResponse {
                    id: item.id,
                    product_id: item.product_id,
                    quantity: item.quantity,
                })
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Produits
// ---------------------------------------------------------------------------

/// Format réduit pour les listes (/products, /category/{id})
#[derive(Debug, Serialize)]
pub struct ProductSummary {
    pub id: i32,
    pub name: String,
    pub price: f64, // prix minimum des variantes
    pub description: String,
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
}

impl ProductSummary {
    // Lecture tolérante : price_range ou image illisibles -> 0.0 / None
    pub fn from_entity(product: &product::Model) -> Self {
        let price = PriceRange::parse_or_default(product.price_range.as_ref())
            .min_variant_price
            .parse_amount()
            .unwrap_or(0.0);

        let image_url = ProductImage::parse(product.featured_image.as_ref()).map(|img| img.url);

        ProductSummary {
            id: product.id,
            name: product.title.clone(),
            price,
            description: product.description.clone(),
            image_url,
            rating: None,
        }
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }
}

#[derive(Debug, Serialize)]
pub struct ProductListResponse {
    pub products: Vec<ProductSummary>,
}

#[derive(Debug, Serialize)]
pub struct Edges<T> {
    pub edges: Vec<Node<T>>,
}

#[derive(Debug, Serialize)]
pub struct Node<T> {
    pub node: T,
}

#[derive(Debug, Serialize)]
pub struct ProductOption {
    pub id: String,
    pub name: String,
    pub values: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeaturedImage {
    pub url: String,
    pub alt_text: String,
    pub width: u32,
    pub height: u32,
}

/// Format complet storefront pour /products/{id} et les recommandations
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetailResponse {
    pub id: String, // "product-{id}"
    pub handle: Option<String>,
    pub available_for_sale: bool,
    pub title: String,
    pub description: String,
    pub description_html: String,
    pub options: Vec<ProductOption>,
    pub price_range: PriceRange,
    pub variants: Edges<Variant>,
    pub featured_image: FeaturedImage,
    pub images: Edges<ProductImage>,
    pub seo: Value,
    pub tags: Value,
    pub updated_at: String,
    pub rating: f64,
}

impl ProductDetailResponse {
    /// Construit la réponse détaillée. La colonne `variants` est décodée
    /// strictement : une liste illisible est une erreur, pas un silence.
    pub fn from_entity(product: &product::Model, rating: f64) -> Result<Self, serde_json::Error> {
        let variants = Variant::parse_list(&product.variants)?;
        let options = extract_options(&variants);

        let featured = ProductImage::parse(product.featured_image.as_ref());
        let featured_image = FeaturedImage {
            url: featured.as_ref().map(|img| img.url.clone()).unwrap_or_default(),
            alt_text: featured
                .as_ref()
                .and_then(|img| img.alt_text.clone())
                .unwrap_or_else(|| product.title.clone()),
            width: featured.as_ref().map(|img| img.width).unwrap_or(800),
            height: featured.as_ref().map(|img| img.height).unwrap_or(800),
        };

        let images: Vec<ProductImage> = product
            .images
            .as_ref()
            .and_then(|value| serde_json::from_value(value.clone()).ok())
            .unwrap_or_default();

        Ok(ProductDetailResponse {
            id: format!("product-{}", product.id),
            handle: product.handle.clone(),
            available_for_sale: product.available_for_sale,
            title: product.title.clone(),
            description: product.description.clone(),
            description_html: product
                .description_html
                .clone()
                .unwrap_or_else(|| format!("<p>{}</p>", product.description)),
            options,
            price_range: PriceRange::parse_or_default(product.price_range.as_ref()),
            variants: Edges {
                edges: variants.into_iter().map(|node| Node { node }).collect(),
            },
            featured_image,
            images: Edges {
                edges: images.into_iter().map(|node| Node { node }).collect(),
            },
            seo: product.seo.clone().unwrap_or_else(|| {
                json!({"title": product.title, "description": product.description})
            }),
            tags: product.tags.clone().unwrap_or_else(|| json!([])),
            updated_at: product
                .updated_at
                .map(|dt| dt.to_rfc3339())
                .unwrap_or_else(|| Utc::now().to_rfc3339()),
            rating,
        })
    }
}

/// Reconstitue les options uniques (nom -> valeurs) à partir des variantes,
/// en préservant l'ordre de première apparition.
fn extract_options(variants: &[Variant]) -> Vec<ProductOption> {
    let mut options: Vec<(String, Vec<String>)> = Vec::new();

    for variant in variants {
        for selected in &variant.selected_options {
            match options.iter_mut().find(|(name, _)| *name == selected.name) {
                Some((_, values)) => {
                    if !values.contains(&selected.value) {
                        values.push(selected.value.clone());
                    }
                }
                None => options.push((selected.name.clone(), vec![selected.value.clone()])),
            }
        }
    }

    options
        .into_iter()
        .enumerate()
        .map(|(i, (name, values))| ProductOption {
            id: format!("option-{}", i + 1),
            name,
            values,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_product() -> product::Model {
        product::Model {
            id: 7,
            title: "Blue Shirt".to_string(),
            description: "A comfortable blue shirt".to_string(),
            description_html: None,
            handle: Some("blue-shirt".to_string()),
            variants: json!([
                {
                    "id": "variant-M-Blue",
                    "availableForSale": true,
                    "selectedOptions": [
                        {"name": "Size", "value": "M"},
                        {"name": "Color", "value": "Blue"}
                    ],
                    "price": {"amount": "19.99", "currencyCode": "USD"}
                },
                {
                    "id": "variant-L-Blue",
                    "availableForSale": true,
                    "selectedOptions": [
                        {"name": "Size", "value": "L"},
                        {"name": "Color", "value": "Blue"}
                    ],
                    "price": {"amount": "21.99", "currencyCode": "USD"}
                }
            ]),
            options: None,
            price_range: Some(json!({
                "minVariantPrice": {"amount": "19.99", "currencyCode": "USD"},
                "maxVariantPrice": {"amount": "21.99", "currencyCode": "USD"}
            })),
            featured_image: Some(json!({"url": "http://img/shirt.png", "altText": "Blue Shirt"})),
            images: None,
            available_for_sale: true,
            seo: None,
            tags: Some(json!(["shirts"])),
            category_id: 1,
            updated_at: None,
        }
    }

    #[test]
    fn test_detail_extracts_options_from_variants() {
        let detail = ProductDetailResponse::from_entity(&sample_product(), 4.5).unwrap();

        assert_eq!(detail.id, "product-7");
        assert_eq!(detail.rating, 4.5);
        assert_eq!(detail.variants.edges.len(), 2);
        assert_eq!(detail.options.len(), 2);
        assert_eq!(detail.options[0].name, "Size");
        assert_eq!(detail.options[0].values, vec!["M", "L"]);
        assert_eq!(detail.options[1].name, "Color");
        assert_eq!(detail.options[1].values, vec!["Blue"]);
        assert_eq!(detail.description_html, "<p>A comfortable blue shirt</p>");
    }

    #[test]
    fn test_detail_rejects_malformed_variants() {
        let mut product = sample_product();
        product.variants = json!("not a list");
        assert!(ProductDetailResponse::from_entity(&product, 0.0).is_err());
    }

    #[test]
    fn test_summary_reads_min_variant_price() {
        let summary = ProductSummary::from_entity(&sample_product());
        assert_eq!(summary.price, 19.99);
        assert_eq!(summary.name, "Blue Shirt");
        assert_eq!(summary.image_url.as_deref(), Some("http://img/shirt.png"));
        assert!(summary.rating.is_none());
    }

    #[test]
    fn test_summary_tolerates_missing_price_range() {
        let mut product = sample_product();
        product.price_range = None;
        product.featured_image = None;

        let summary = ProductSummary::from_entity(&product).with_rating(4.0);
        assert_eq!(summary.price, 0.0);
        assert!(summary.image_url.is_none());
        assert_eq!(summary.rating, Some(4.0));
    }
}
