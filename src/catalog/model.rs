use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

const DEFAULT_MAX_ORDER: u32 = 5;

/// Storefront identity shown in the header and used for the WhatsApp order link.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slogan: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whatsapp: Option<String>,
    /// Keys this editor does not manage, kept so a save does not drop them.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, serialize_with = "serialize_price")]
    pub price: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub stock: u32,
    #[serde(default = "default_max_order")]
    pub max_order: u32,
    #[serde(default)]
    pub category: String,
    /// Path relative to the project root, e.g. `assets/products/prod_1_cake.png`.
    #[serde(default)]
    pub image: String,
    /// Topping ids. Not checked against the topping collection.
    #[serde(default)]
    pub toppings: Vec<String>,
}

impl Default for Product {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            price: 0.0,
            description: String::new(),
            stock: 10,
            max_order: DEFAULT_MAX_ORDER,
            category: String::new(),
            image: String::new(),
            toppings: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Topping {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, serialize_with = "serialize_price")]
    pub price: f64,
}

/// A product pointing at a topping id that no longer exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingRef {
    pub product_id: String,
    pub product_name: String,
    pub topping_id: String,
}

fn default_max_order() -> u32 {
    DEFAULT_MAX_ORDER
}

// Whole amounts are written as integers so `1000` stays `1000` in the JSON files.
fn serialize_price<S: Serializer>(price: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if price.fract() == 0.0 && (0.0..u64::MAX as f64).contains(price) {
        serializer.serialize_u64(*price as u64)
    } else {
        serializer.serialize_f64(*price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_fills_missing_fields_with_defaults() {
        let product: Product =
            serde_json::from_str(r#"{"id":"p1","name":"Cake","price":15000}"#).unwrap();

        assert_eq!(product.max_order, 5);
        assert_eq!(product.stock, 0);
        assert!(product.toppings.is_empty());
        assert!(product.image.is_empty());
    }

    #[test]
    fn whole_prices_are_written_as_integers() {
        let topping = Topping {
            id: "t1".into(),
            name: "Cheese".into(),
            price: 1000.0,
        };
        let json = serde_json::to_string(&topping).unwrap();
        assert_eq!(json, r#"{"id":"t1","name":"Cheese","price":1000}"#);

        let topping = Topping {
            price: 2.5,
            ..topping
        };
        let json = serde_json::to_string(&topping).unwrap();
        assert!(json.contains(r#""price":2.5"#));
    }

    #[test]
    fn store_config_keeps_unknown_keys() {
        let payload = r#"{"name":"BiteBabe","instagram":"@bitebabe"}"#;
        let config: StoreConfig = serde_json::from_str(payload).unwrap();

        assert_eq!(config.name.as_deref(), Some("BiteBabe"));
        assert!(config.slogan.is_none());
        assert_eq!(config.extra["instagram"], "@bitebabe");

        let value: Value = serde_json::to_value(&config).unwrap();
        assert_eq!(value["instagram"], "@bitebabe");
        assert!(value.get("slogan").is_none());
    }
}
