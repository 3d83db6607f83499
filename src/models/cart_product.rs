use serde::{Serialize, Deserialize};
use sea_orm::entity::prelude::*;

// Au plus une ligne par (cart_id, product_id, variant_id) : re-ajouter la même
// combinaison incrémente la quantité au lieu de dupliquer la ligne.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "carts_products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub cart_id: i32,
    pub product_id: i32,
    pub quantity: i32, // 1..100, validé à la couche HTTP
    pub variant_id: Option<String>, // ID du variant (ex: "variant-M-Blue")
    pub selected_options: Option<Json>, // Options choisies, ex: {"Color": "Blue", "Size": "M"}
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::cart::Entity",
        from = "Column::CartId",
        to = "super::cart::Column::Id"
    )]
    Cart,

    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
}

impl Related<super::cart::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cart.def()
    }
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
