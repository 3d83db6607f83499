// ============================================================================
// ORDER SERVICE
// ============================================================================
//
// Description:
//   Transformation corbeille -> commande (instantané immuable).
//   Une commande copie product_id/quantité de chaque ligne distincte de la
//   corbeille, dans une transaction. La corbeille n'est PAS vidée après
//   création : appeler deux fois crée deux commandes identiques (comportement
//   actuel documenté, à ne pas changer sans décision produit).
//
// ============================================================================

use sea_orm::*;
use tracing::{debug, info, warn};

use crate::errors::OrderError;
use crate::models::{cart, cart_product, order, order_product};

pub struct OrderService;

impl OrderService {
    /// Crée une commande depuis la corbeille de l'utilisateur.
    /// Précondition : la corbeille existe et contient au moins une ligne,
    /// sinon CartIsEmpty (aucune ligne n'est écrite).
    pub async fn create(
        db: &DatabaseConnection,
        user_id: i32,
    ) -> Result<(order::Model, Vec<order_product::Model>), OrderError> {
        info!("Creating order for user {}", user_id);

        let cart = cart::Entity::find()
            .filter(cart::Column::UserId.eq(user_id))
            .one(db)
            .await?;

        let Some(cart) = cart else {
            warn!("User {} has no cart, order not created", user_id);
            return Err(OrderError::CartIsEmpty);
        };

        let items = cart_product::Entity::find()
            .filter(cart_product::Column::CartId.eq(cart.id))
            .all(db)
            .await?;

        if items.is_empty() {
            warn!("Cart of user {} is empty, order not created", user_id);
            return Err(OrderError::CartIsEmpty);
        }

        let txn = db.begin().await?;

        let new_order = order::ActiveModel {
            user_id: Set(user_id),
            payment: Set(false),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let mut order_items = Vec::with_capacity(items.len());
        for item in &items {
            let line = order_product::ActiveModel {
                order_id: Set(new_order.id),
                product_id: Set(item.product_id),
                quantity: Set(item.quantity),
                ..Default::default()
            }
            .insert(&txn)
            .await?;

            debug!(
                "Added product {} (x{}) to order {}",
                item.product_id, item.quantity, new_order.id
            );
            order_items.push(line);
        }

        txn.commit().await?;
        info!("Created order {} for user {}", new_order.id, user_id);

        Ok((new_order, order_items))
    }

    pub async fn get(db: &DatabaseConnection, order_id: i32) -> Result<order::Model, OrderError> {
        order::Entity::find_by_id(order_id)
            .one(db)
            .await?
            .ok_or(OrderError::NotFound(order_id))
    }

    pub async fn items(
        db: &DatabaseConnection,
        order_id: i32,
    ) -> Result<Vec<order_product::Model>, OrderError> {
        Ok(order_product::Entity::find()
            .filter(order_product::Column::OrderId.eq(order_id))
            .all(db)
            .await?)
    }

    pub async fn list_for_user(
        db: &DatabaseConnection,
        user_id: i32,
    ) -> Result<Vec<order::Model>, OrderError> {
        Ok(order::Entity::find()
            .filter(order::Column::UserId.eq(user_id))
            .all(db)
            .await?)
    }

    /// Marque la commande comme payée. Transition inconditionnelle :
    /// aucun workflow au-delà du flag (pas de passerelle de paiement).
    pub async fn complete(
        db: &DatabaseConnection,
        order_id: i32,
    ) -> Result<order::Model, OrderError> {
        let existing = Self::get(db, order_id).await?;

        let mut active: order::ActiveModel = existing.into();
        active.payment = Set(true);
        let updated = active.update(db).await?;

        info!("Order {} marked as paid", order_id);
        Ok(updated)
    }
}
