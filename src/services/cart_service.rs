// ============================================================================
// CART SERVICE
// ============================================================================
//
// Description:
//   Gestion des lignes de la corbeille et calcul de la vue prix.
//   Une ligne = (cart_id, product_id, variant_id) + quantité : re-ajouter la
//   même combinaison incrémente la quantité au lieu de créer une ligne.
//
// Résolution de variante:
//   - variant_id fourni et trouvé  -> cette variante
//   - variant_id fourni non trouvé -> première variante (tolérance héritée)
//   - variant_id absent            -> première variante
//   - aucune variante              -> ligne non valorisée, exclue du total
//                                     (loggée, jamais fatale)
//
// ============================================================================

use sea_orm::*;
use tracing::{info, warn};

use crate::errors::CartError;
use crate::models::catalog::{Money, Variant};
use crate::models::dto::{
    CartLineResponse, CartResponse, LineCost, LineImage, LineProduct, Merchandise,
};
use crate::models::catalog::ProductImage;
use crate::models::{cart, cart_product, product};

pub struct CartService;

impl CartService {
    /// Corbeille de l'utilisateur (créée à l'inscription)
    pub async fn cart_for_user(
        db: &DatabaseConnection,
        user_id: i32,
    ) -> Result<cart::Model, CartError> {
        cart::Entity::find()
            .filter(cart::Column::UserId.eq(user_id))
            .one(db)
            .await?
            .ok_or(CartError::CartNotFound(user_id))
    }

    // Requête d'une ligne : variant_id, quand fourni, restreint le match;
    // absent, la première ligne du produit correspond quelle que soit la variante
    fn item_query(
        cart_id: i32,
        product_id: i32,
        variant_id: Option<&str>,
    ) -> Select<cart_product::Entity> {
        let mut query = cart_product::Entity::find()
            .filter(cart_product::Column::CartId.eq(cart_id))
            .filter(cart_product::Column::ProductId.eq(product_id));

        if let Some(variant_id) = variant_id {
            query = query.filter(cart_product::Column::VariantId.eq(variant_id));
        }

        query
    }

    /// Ajoute un produit à la corbeille. Si la combinaison (produit, variante)
    /// existe déjà, incrémente la quantité de la ligne existante.
    pub async fn add_item(
        db: &DatabaseConnection,
        cart_id: i32,
        product_id: i32,
        quantity: i32,
        variant_id: Option<String>,
        selected_options: Option<serde_json::Value>,
    ) -> Result<cart_product::Model, CartError> {
        let existing = Self::item_query(cart_id, product_id, variant_id.as_deref())
            .one(db)
            .await
            .map_err(|e| CartError::Add {
                product_id,
                source: e,
            })?;

        match existing {
            Some(item) => {
                let new_quantity = item.quantity + quantity;
                let mut active: cart_product::ActiveModel = item.into();
                active.quantity = Set(new_quantity);

                let updated = active.update(db).await.map_err(|e| CartError::Add {
                    product_id,
                    source: e,
                })?;

                info!("Updated quantity for product {} in cart {}", product_id, cart_id);
                Ok(updated)
            }
            None => {
                let new_item = cart_product::ActiveModel {
                    cart_id: Set(cart_id),
                    product_id: Set(product_id),
                    quantity: Set(quantity),
                    variant_id: Set(variant_id),
                    selected_options: Set(selected_options),
                    ..Default::default()
                };

                let inserted = new_item.insert(db).await.map_err(|e| CartError::Add {
                    product_id,
                    source: e,
                })?;

                info!("Added product {} to cart {}", product_id, cart_id);
                Ok(inserted)
            }
        }
    }

    /// Supprime la ligne correspondante; erreur not-found si aucune ne matche.
    pub async fn remove_item(
        db: &DatabaseConnection,
        cart_id: i32,
        product_id: i32,
        variant_id: Option<&str>,
    ) -> Result<(), CartError> {
        let item = Self::item_query(cart_id, product_id, variant_id)
            .one(db)
            .await?;

        let Some(item) = item else {
            warn!("Product {} not found in cart {}", product_id, cart_id);
            return Err(CartError::ItemNotFound { product_id });
        };

        item.delete(db).await?;
        info!("Removed product {} from cart {}", product_id, cart_id);
        Ok(())
    }

    /// Fixe la quantité d'une ligne existante (le contrôle 1..100 se fait à la
    /// couche HTTP); erreur not-found si la ligne n'existe pas.
    pub async fn update_quantity(
        db: &DatabaseConnection,
        cart_id: i32,
        product_id: i32,
        quantity: i32,
        variant_id: Option<&str>,
    ) -> Result<cart_product::Model, CartError> {
        let item = Self::item_query(cart_id, product_id, variant_id)
            .one(db)
            .await?;

        let Some(item) = item else {
            warn!("Product {} not found in cart {}", product_id, cart_id);
            return Err(CartError::ItemNotFound { product_id });
        };

        let mut active: cart_product::ActiveModel = item.into();
        active.quantity = Set(quantity);
        let updated = active.update(db).await?;

        info!("Updated quantity for product {} in cart {}", product_id, cart_id);
        Ok(updated)
    }

    pub async fn list_items(
        db: &DatabaseConnection,
        cart_id: i32,
    ) -> Result<Vec<cart_product::Model>, CartError> {
        Ok(cart_product::Entity::find()
            .filter(cart_product::Column::CartId.eq(cart_id))
            .all(db)
            .await?)
    }

    /// Résolution de variante (voir l'en-tête du module).
    pub fn resolve_variant<'a>(
        variants: &'a [Variant],
        variant_id: Option<&str>,
    ) -> Option<&'a Variant> {
        if let Some(variant_id) = variant_id {
            if let Some(variant) = variants.iter().find(|v| v.id == variant_id) {
                return Some(variant);
            }
        }
        variants.first()
    }

    /// Sérialise une ligne au format storefront et retourne son total.
    /// None quand la ligne ne peut pas être valorisée (exclue des totaux).
    pub fn serialize_line(
        item: &cart_product::Model,
        product: &product::Model,
    ) -> Option<(CartLineResponse, f64)> {
        let variants = match Variant::parse_list(&product.variants) {
            Ok(variants) => variants,
            Err(e) => {
                warn!(
                    "Unreadable variants for product {} (cart line {}): {}",
                    product.id, item.id, e
                );
                return None;
            }
        };

        let Some(variant) = Self::resolve_variant(&variants, item.variant_id.as_deref()) else {
            warn!(
                "Product {} has no variants, cart line {} left unpriced",
                product.id, item.id
            );
            return None;
        };

        let Some(price) = variant.price.parse_amount() else {
            warn!(
                "Invalid price amount '{}' for product {} (variant {})",
                variant.price.amount, product.id, variant.id
            );
            return None;
        };

        let line_total = price * item.quantity as f64;

        let featured = ProductImage::parse(product.featured_image.as_ref());
        let line = CartLineResponse {
            id: format!("line-{}", item.id),
            quantity: item.quantity,
            cost: LineCost {
                total_amount: Money {
                    amount: format!("{:.2}", line_total),
                    currency_code: variant.price.currency_code.clone(),
                },
            },
            merchandise: Merchandise {
                id: variant.id.clone(),
                title: variant.title(),
                product: LineProduct {
                    id: format!("product-{}", product.id),
                    title: product.title.clone(),
                    handle: product.handle.clone(),
                    featured_image: LineImage {
                        url: featured.as_ref().map(|img| img.url.clone()),
                        alt_text: featured
                            .and_then(|img| img.alt_text)
                            .unwrap_or_else(|| product.title.clone()),
                    },
                },
                selected_options: variant.selected_options.clone(),
            },
        };

        Some((line, line_total))
    }

    /// Vue complète de la corbeille : lignes valorisées + totaux.
    /// total_items compte les lignes distinctes, y compris les lignes non
    /// valorisées; total_price ne somme que les lignes valorisées.
    pub async fn build_cart_view(
        db: &DatabaseConnection,
        cart: &cart::Model,
    ) -> Result<CartResponse, CartError> {
        let items = Self::list_items(db, cart.id).await?;
        let total_items = items.len();

        let mut lines = Vec::with_capacity(items.len());
        let mut total_price = 0.0;

        for item in &items {
            let product = product::Entity::find_by_id(item.product_id).one(db).await?;

            let Some(product) = product else {
                warn!(
                    "Product {} missing for cart line {}, left unpriced",
                    item.product_id, item.id
                );
                continue;
            };

            if let Some((line, line_total)) = Self::serialize_line(item, &product) {
                total_price += line_total;
                lines.push(line);
            }
        }

        Ok(CartResponse {
            id: cart.id,
            user_id: cart.user_id,
            items: lines,
            total_items,
            total_price,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use serde_json::json;

    fn variant(id: &str, amount: &str) -> Variant {
        serde_json::from_value(json!({
            "id": id,
            "availableForSale": true,
            "selectedOptions": [{"name": "Size", "value": "M"}],
            "price": {"amount": amount, "currencyCode": "USD"}
        }))
        .unwrap()
    }

    fn sample_item(id: i32, quantity: i32, variant_id: Option<&str>) -> cart_product::Model {
        cart_product::Model {
            id,
            cart_id: 1,
            product_id: 10,
            quantity,
            variant_id: variant_id.map(str::to_string),
            selected_options: None,
        }
    }

    fn sample_product(variants: serde_json::Value) -> product::Model {
        product::Model {
            id: 10,
            title: "Shirt".to_string(),
            description: "A shirt".to_string(),
            description_html: None,
            handle: Some("shirt".to_string()),
            variants,
            options: None,
            price_range: None,
            featured_image: None,
            images: None,
            available_for_sale: true,
            seo: None,
            tags: None,
            category_id: 1,
            updated_at: None,
        }
    }

    #[test]
    fn test_resolve_variant_by_id() {
        let variants = vec![variant("v1", "10.00"), variant("v2", "12.00")];

        let resolved = CartService::resolve_variant(&variants, Some("v2")).unwrap();
        assert_eq!(resolved.id, "v2");
    }

    #[test]
    fn test_resolve_variant_defaults_to_first() {
        let variants = vec![variant("v1", "10.00"), variant("v2", "12.00")];

        // Pas de variant_id -> première variante
        assert_eq!(CartService::resolve_variant(&variants, None).unwrap().id, "v1");
        // variant_id inconnu -> première variante également
        assert_eq!(
            CartService::resolve_variant(&variants, Some("missing")).unwrap().id,
            "v1"
        );
        // Aucune variante -> None
        assert!(CartService::resolve_variant(&[], Some("v1")).is_none());
    }

    #[test]
    fn test_serialize_line_prices_variant() {
        let item = sample_item(3, 2, Some("v2"));
        let product = sample_product(json!([
            {"id": "v1", "price": {"amount": "10.00"}},
            {"id": "v2", "price": {"amount": "12.50"}}
        ]));

        let (line, total) = CartService::serialize_line(&item, &product).unwrap();
        assert_eq!(total, 25.0);
        assert_eq!(line.id, "line-3");
        assert_eq!(line.cost.total_amount.amount, "25.00");
        assert_eq!(line.merchandise.id, "v2");
        assert_eq!(line.merchandise.product.id, "product-10");
    }

    #[test]
    fn test_serialize_line_without_variants_is_unpriced() {
        let item = sample_item(3, 2, None);
        let product = sample_product(json!([]));

        assert!(CartService::serialize_line(&item, &product).is_none());
    }

    #[test]
    fn test_serialize_line_bad_amount_is_unpriced() {
        let item = sample_item(3, 2, None);
        let product = sample_product(json!([
            {"id": "v1", "price": {"amount": "not-a-number"}}
        ]));

        assert!(CartService::serialize_line(&item, &product).is_none());
    }

    #[tokio::test]
    async fn test_add_item_merges_existing_line() {
        // Une ligne (produit 10, variante v1) existe déjà avec quantité 3 :
        // ajouter 2 doit donner une seule ligne à quantité 5
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![cart_product::Model {
                variant_id: Some("v1".to_string()),
                ..sample_item(3, 3, Some("v1"))
            }]])
            .append_query_results([vec![cart_product::Model {
                variant_id: Some("v1".to_string()),
                ..sample_item(3, 5, Some("v1"))
            }]])
            .into_connection();

        let item = CartService::add_item(&db, 1, 10, 2, Some("v1".to_string()), None)
            .await
            .unwrap();

        assert_eq!(item.id, 3);
        assert_eq!(item.quantity, 5);
    }

    #[tokio::test]
    async fn test_add_item_inserts_new_line() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<cart_product::Model>::new()])
            .append_query_results([vec![sample_item(7, 2, None)]])
            .into_connection();

        let item = CartService::add_item(&db, 1, 10, 2, None, None).await.unwrap();
        assert_eq!(item.id, 7);
        assert_eq!(item.quantity, 2);
    }

    #[tokio::test]
    async fn test_cart_view_counts_unpriced_lines_but_prices_only_priced() {
        // Deux lignes : produit 10 valorisable (12.50 x 2), produit 20
        // introuvable. total_items compte les deux, total_price seulement
        // la ligne valorisée
        let priced_product = product::Model {
            variants: json!([
                {"id": "v1", "price": {"amount": "12.50"}}
            ]),
            ..sample_product(json!([]))
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![
                sample_item(1, 2, None),
                cart_product::Model {
                    id: 2,
                    product_id: 20,
                    ..sample_item(2, 1, None)
                },
            ]])
            .append_query_results([vec![priced_product]])
            .append_query_results([Vec::<product::Model>::new()])
            .into_connection();

        let cart = cart::Model { id: 1, user_id: 42 };
        let view = CartService::build_cart_view(&db, &cart).await.unwrap();

        assert_eq!(view.total_items, 2);
        assert_eq!(view.items.len(), 1);
        assert_eq!(view.total_price, 25.0);
        assert_eq!(view.items[0].id, "line-1");
    }

    #[tokio::test]
    async fn test_remove_missing_item_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<cart_product::Model>::new()])
            .into_connection();

        let result = CartService::remove_item(&db, 1, 99, None).await;
        assert!(matches!(
            result,
            Err(CartError::ItemNotFound { product_id: 99 })
        ));
    }
}
