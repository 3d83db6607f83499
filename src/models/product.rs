use serde::{Serialize, Deserialize};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub description: String,
    pub description_html: Option<String>,
    #[sea_orm(unique)]
    pub handle: Option<String>,

    // Variantes et prix — colonnes JSON, décodées en structures typées
    // (models::catalog) à la lecture
    pub variants: Json, // liste de catalog::Variant
    pub options: Option<Json>,
    pub price_range: Option<Json>, // catalog::PriceRange

    // Images
    pub featured_image: Option<Json>, // catalog::ProductImage
    pub images: Option<Json>,

    // Métadonnées
    pub available_for_sale: bool,
    pub seo: Option<Json>,
    pub tags: Option<Json>,

    pub category_id: i32,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id"
    )]
    Category,

    #[sea_orm(has_many = "super::review::Entity")]
    Review,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::review::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Review.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
