// ============================================================================
// MODELS - MODULE PRINCIPAL
// ============================================================================
//
// Description:
//   Point d'entrée pour tous les modèles de données.
//   Chaque modèle correspond à une table PostgreSQL avec SeaORM.
//
// Liste des modules:
//   - users : Utilisateurs (email unique, mot de passe hashé)
//   - cart : Corbeille (une par utilisateur, créée à l'inscription)
//   - cart_product : Lignes de la corbeille (produit + variante + quantité)
//   - product : Catalogue produits (variantes/options/prix en JSON)
//   - category : Catégories de produits (nom unique)
//   - order : Commandes (flag payment, pas de passerelle de paiement)
//   - order_product : Lignes de commande (instantané product_id/quantité)
//   - review : Avis (note 1..5, contrainte CHECK en base)
//   - catalog : Structures typées décodées depuis les colonnes JSON
//   - dto : Data Transfer Objects pour les réponses API
//
// Points d'attention:
//   - Tous les modèles utilisent SeaORM (pas de SQL brut)
//   - Les colonnes JSON (variants, price_range, images...) sont décodées
//     en structures typées de `catalog` à la frontière de stockage
//   - Les relations entre tables sont définies dans chaque modèle
//
// ============================================================================

pub mod cart;
pub mod cart_product;
pub mod catalog;
pub mod category;
pub mod dto;
pub mod order;
pub mod order_product;
pub mod product;
pub mod review;
pub mod users;
