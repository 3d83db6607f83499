// Structures typées pour les colonnes JSON du catalogue.
//
// Les colonnes `variants`, `price_range` et `featured_image` sont stockées en
// JSON (format camelCase côté storefront) et décodées ici à la frontière de
// stockage, au lieu de se promener en serde_json::Value dans les services.

use serde::{Serialize, Deserialize};
use serde_json::Value;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    pub amount: String, // montant décimal sous forme de chaîne, ex: "19.99"
    #[serde(default = "default_currency")]
    pub currency_code: String,
}

impl Money {
    pub fn zero() -> Self {
        Money {
            amount: "0.00".to_string(),
            currency_code: default_currency(),
        }
    }

    /// Parse le montant en f64. L'arithmétique des totaux se fait en flottant
    /// sur la chaîne décimale (limitation de précision connue et conservée).
    pub fn parse_amount(&self) -> Option<f64> {
        self.amount.parse::<f64>().ok()
    }
}

fn default_currency() -> String {
    "USD".to_string()
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SelectedOption {
    pub name: String,
    pub value: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    pub id: String,
    #[serde(default = "default_available")]
    pub available_for_sale: bool,
    #[serde(default)]
    pub selected_options: Vec<SelectedOption>,
    pub price: Money,
}

fn default_available() -> bool {
    true
}

impl Variant {
    pub fn parse_list(value: &Value) -> Result<Vec<Variant>, serde_json::Error> {
        serde_json::from_value(value.clone())
    }

    /// Titre affichable de la variante, ex: "M / Blue"
    pub fn title(&self) -> String {
        self.selected_options
            .iter()
            .map(|opt| opt.value.as_str())
            .collect::<Vec<_>>()
            .join(" / ")
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRange {
    pub min_variant_price: Money,
    pub max_variant_price: Money,
}

impl PriceRange {
    /// Décode la colonne `price_range`; colonne absente ou illisible -> 0.00 USD
    /// (tolérance héritée du format storefront).
    pub fn parse_or_default(value: Option<&Value>) -> PriceRange {
        value
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or_default()
    }
}

impl Default for PriceRange {
    fn default() -> Self {
        PriceRange {
            min_variant_price: Money::zero(),
            max_variant_price: Money::zero(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductImage {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub alt_text: Option<String>,
    #[serde(default = "default_dimension")]
    pub width: u32,
    #[serde(default = "default_dimension")]
    pub height: u32,
}

impl ProductImage {
    pub fn parse(value: Option<&Value>) -> Option<ProductImage> {
        value.and_then(|v| serde_json::from_value(v.clone()).ok())
    }
}

fn default_dimension() -> u32 {
    800
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_variant_list() {
        let value = json!([
            {
                "id": "variant-M-Blue",
                "availableForSale": true,
                "selectedOptions": [
                    {"name": "Size", "value": "M"},
                    {"name": "Color", "value": "Blue"}
                ],
                "price": {"amount": "19.99", "currencyCode": "USD"}
            }
        ]);

        let variants = Variant::parse_list(&value).unwrap();
        assert_eq!(variants.len(), 1);
        assert_eq!(variants[0].id, "variant-M-Blue");
        assert_eq!(variants[0].title(), "M / Blue");
        assert_eq!(variants[0].price.parse_amount(), Some(19.99));
    }

    #[test]
    fn test_parse_variant_defaults() {
        // availableForSale et selectedOptions absents -> valeurs par défaut
        let value = json!([
            {"id": "variant-1", "price": {"amount": "5"}}
        ]);

        let variants = Variant::parse_list(&value).unwrap();
        assert!(variants[0].available_for_sale);
        assert!(variants[0].selected_options.is_empty());
        assert_eq!(variants[0].price.currency_code, "USD");
        assert_eq!(variants[0].title(), "");
    }

    #[test]
    fn test_parse_variant_list_malformed() {
        let value = json!({"not": "a list"});
        assert!(Variant::parse_list(&value).is_err());
    }

    #[test]
    fn test_price_range_fallback() {
        let range = PriceRange::parse_or_default(None);
        assert_eq!(range.min_variant_price.amount, "0.00");

        let value = json!({
            "minVariantPrice": {"amount": "10.00", "currencyCode": "EUR"},
            "maxVariantPrice": {"amount": "25.00", "currencyCode": "EUR"}
        });
        let range = PriceRange::parse_or_default(Some(&value));
        assert_eq!(range.min_variant_price.parse_amount(), Some(10.0));
        assert_eq!(range.max_variant_price.currency_code, "EUR");
    }

    #[test]
    fn test_money_parse_amount_invalid() {
        let money = Money {
            amount: "abc".to_string(),
            currency_code: "USD".to_string(),
        };
        assert_eq!(money.parse_amount(), None);
    }
}
