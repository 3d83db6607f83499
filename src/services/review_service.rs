// Avis produits : création, recherche par (user, product), mise à jour,
// suppression et moyenne arithmétique.
//
// L'unicité par (user, product) n'est pas imposée en base; les routes passent
// par find_for_user avant update/delete, comme le suppose le modèle.

use sea_orm::*;
use tracing::info;

use crate::errors::ReviewError;
use crate::models::review;

pub struct ReviewService;

impl ReviewService {
    pub async fn create(
        db: &DatabaseConnection,
        user_id: i32,
        product_id: i32,
        rating: i32,
    ) -> Result<review::Model, ReviewError> {
        let created = review::ActiveModel {
            user_id: Set(user_id),
            product_id: Set(product_id),
            rating: Set(rating),
            ..Default::default()
        }
        .insert(db)
        .await?;

        info!("User {} rated product {} with {}", user_id, product_id, rating);
        Ok(created)
    }

    pub async fn find_for_user(
        db: &DatabaseConnection,
        user_id: i32,
        product_id: i32,
    ) -> Result<Option<review::Model>, ReviewError> {
        Ok(review::Entity::find()
            .filter(review::Column::UserId.eq(user_id))
            .filter(review::Column::ProductId.eq(product_id))
            .one(db)
            .await?)
    }

    pub async fn update_rating(
        db: &DatabaseConnection,
        existing: review::Model,
        rating: i32,
    ) -> Result<review::Model, ReviewError> {
        let mut active: review::ActiveModel = existing.into();
        active.rating = Set(rating);
        Ok(active.update(db).await?)
    }

    pub async fn delete(
        db: &DatabaseConnection,
        existing: review::Model,
    ) -> Result<(), ReviewError> {
        existing.delete(db).await?;
        Ok(())
    }

    /// Moyenne des notes d'un produit; 0.0 sans avis (jamais null, jamais
    /// une erreur).
    pub async fn average_rating(
        db: &DatabaseConnection,
        product_id: i32,
    ) -> Result<f64, ReviewError> {
        let reviews = review::Entity::find()
            .filter(review::Column::ProductId.eq(product_id))
            .all(db)
            .await?;

        let ratings: Vec<i32> = reviews.iter().map(|r| r.rating).collect();
        Ok(Self::average_of(&ratings))
    }

    pub fn average_of(ratings: &[i32]) -> f64 {
        if ratings.is_empty() {
            return 0.0;
        }
        ratings.iter().sum::<i32>() as f64 / ratings.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[test]
    fn test_average_of_no_reviews_is_zero() {
        assert_eq!(ReviewService::average_of(&[]), 0.0);
    }

    #[test]
    fn test_average_of_ratings() {
        assert_eq!(ReviewService::average_of(&[5, 3, 4]), 4.0);
        assert_eq!(ReviewService::average_of(&[2]), 2.0);
        assert_eq!(ReviewService::average_of(&[1, 2]), 1.5);
    }

    #[tokio::test]
    async fn test_average_rating_reads_product_reviews() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![
                review::Model { id: 1, user_id: 1, product_id: 9, rating: 5 },
                review::Model { id: 2, user_id: 2, product_id: 9, rating: 3 },
                review::Model { id: 3, user_id: 3, product_id: 9, rating: 4 },
            ]])
            .into_connection();

        let average = ReviewService::average_rating(&db, 9).await.unwrap();
        assert_eq!(average, 4.0);
    }

    #[tokio::test]
    async fn test_find_for_user_returns_none_without_review() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<review::Model>::new()])
            .into_connection();

        let found = ReviewService::find_for_user(&db, 1, 9).await.unwrap();
        assert!(found.is_none());
    }
}
