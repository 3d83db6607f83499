// ============================================================================
// PRODUCT SERVICE
// ============================================================================
//
// Description:
//   Lecture du catalogue (détail, pagination, catégorie) et recommandations
//   naïves par similarité de contenu : score = taille de l'intersection des
//   ensembles de mots des descriptions (minuscules, découpées sur les
//   espaces). Les candidats sans recouvrement sont exclus, pas juste mal
//   classés; tri décroissant par score (ordre d'entrée stable à égalité),
//   tronqué aux 5 premiers.
//
// ============================================================================

use std::collections::HashSet;

use sea_orm::*;
use tracing::warn;

use crate::errors::ProductError;
use crate::models::product;

const RECOMMENDATION_POOL_SIZE: u64 = 100;
const RECOMMENDATION_LIMIT: usize = 5;

pub struct ProductService;

impl ProductService {
    pub async fn get(
        db: &DatabaseConnection,
        product_id: i32,
    ) -> Result<product::Model, ProductError> {
        product::Entity::find_by_id(product_id)
            .one(db)
            .await?
            .ok_or(ProductError::NotFound(product_id))
    }

    pub async fn list(
        db: &DatabaseConnection,
        page: u64,
        count: u64,
    ) -> Result<Vec<product::Model>, ProductError> {
        let offset = (page - 1) * count;
        Ok(product::Entity::find()
            .offset(offset)
            .limit(count)
            .all(db)
            .await?)
    }

    pub async fn by_category(
        db: &DatabaseConnection,
        category_id: i32,
        page: u64,
        count: u64,
    ) -> Result<Vec<product::Model>, ProductError> {
        let offset = (page - 1) * count;
        Ok(product::Entity::find()
            .filter(product::Column::CategoryId.eq(category_id))
            .offset(offset)
            .limit(count)
            .all(db)
            .await?)
    }

    /// Produits recommandés pour un produit donné.
    /// Produit source introuvable -> NotFound; pool de candidats illisible ->
    /// erreur de recommandation (jamais une liste vide silencieuse).
    pub async fn recommendations(
        db: &DatabaseConnection,
        product_id: i32,
    ) -> Result<Vec<product::Model>, ProductError> {
        let current = Self::get(db, product_id).await?;

        let candidates = product::Entity::find()
            .filter(product::Column::Id.ne(product_id))
            .limit(RECOMMENDATION_POOL_SIZE)
            .all(db)
            .await
            .map_err(|e| {
                warn!("Failed to load recommendation pool for product {}: {}", product_id, e);
                ProductError::Recommendation(product_id)
            })?;

        Ok(Self::rank_by_overlap(&current.description, candidates))
    }

    fn description_tokens(text: &str) -> HashSet<String> {
        text.to_lowercase()
            .split_whitespace()
            .map(str::to_string)
            .collect()
    }

    /// Classe les candidats par recouvrement de vocabulaire avec la
    /// description source.
    pub fn rank_by_overlap(
        description: &str,
        candidates: Vec<product::Model>,
    ) -> Vec<product::Model> {
        let current_words = Self::description_tokens(description);

        let mut scored: Vec<(product::Model, usize)> = candidates
            .into_iter()
            .filter_map(|candidate| {
                let words = Self::description_tokens(&candidate.description);
                let score = words.intersection(&current_words).count();
                (score > 0).then_some((candidate, score))
            })
            .collect();

        // sort stable : à score égal, l'ordre d'entrée est conservé
        scored.sort_by(|a, b| b.1.cmp(&a.1));

        scored
            .into_iter()
            .take(RECOMMENDATION_LIMIT)
            .map(|(candidate, _)| candidate)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use serde_json::json;

    fn sample_product(id: i32, description: &str) -> product::Model {
        product::Model {
            id,
            title: format!("Product {}", id),
            description: description.to_string(),
            description_html: None,
            handle: None,
            variants: json!([]),
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
    fn test_rank_by_overlap_orders_by_score() {
        let candidates = vec![
            sample_product(2, "a warm wool sweater"),          // 1 mot commun
            sample_product(3, "warm blue cotton shirt"),       // 3 mots communs
            sample_product(4, "kitchen table"),                // 0 -> exclu
            sample_product(5, "a blue shirt"),                 // 2 mots communs
        ];

        let ranked = ProductService::rank_by_overlap("warm blue shirt", candidates);

        let ids: Vec<i32> = ranked.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![3, 5, 2]);
    }

    #[test]
    fn test_rank_by_overlap_is_case_insensitive() {
        let candidates = vec![sample_product(2, "BLUE Shirt")];
        let ranked = ProductService::rank_by_overlap("blue shirt", candidates);
        assert_eq!(ranked.len(), 1);
    }

    #[test]
    fn test_rank_by_overlap_truncates_to_five() {
        let candidates: Vec<product::Model> = (2..=10)
            .map(|id| sample_product(id, "blue shirt"))
            .collect();

        let ranked = ProductService::rank_by_overlap("blue shirt", candidates);
        assert_eq!(ranked.len(), 5);
        // Égalité de score : l'ordre d'entrée est conservé
        assert_eq!(ranked[0].id, 2);
        assert_eq!(ranked[4].id, 6);
    }

    #[test]
    fn test_rank_by_overlap_excludes_zero_score() {
        let candidates = vec![sample_product(2, "completely unrelated text")];
        let ranked = ProductService::rank_by_overlap("blue shirt", candidates);
        assert!(ranked.is_empty());
    }

    #[tokio::test]
    async fn test_recommendations_missing_product_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<product::Model>::new()])
            .into_connection();

        let result = ProductService::recommendations(&db, 77).await;
        assert!(matches!(result, Err(ProductError::NotFound(77))));
    }
}
