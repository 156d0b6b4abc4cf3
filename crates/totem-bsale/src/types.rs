//! Bsale API response types.
//!
//! ## Shape notes
//!
//! ### Collections
//! List endpoints (`variants.json`, `price_lists/{id}/details.json`) wrap
//! results in an envelope with `href`, `count`, `limit`, `offset` and
//! `items`. Only `items` is modelled; an absent `items` is an empty list.
//!
//! ### `fields=[...]`
//! Bsale honours the `fields` query parameter and omits everything else, so
//! every field here is optional or defaulted.
//!
//! ### Numeric values
//! `stock`, `price`, `variantValue` and `variantValueWithTaxes` are JSON
//! numbers. They are kept as [`serde_json::Number`] so integers round-trip
//! as integers. A value of any other JSON type is treated as absent rather
//! than failing the whole payload.
//!
//! ### Ids
//! Variant and product ids are usually numbers but have been seen as numeric
//! strings (`"9"`). Both forms are accepted; anything else reads as no id.

use serde::{Deserialize, Deserializer};
use serde_json::{Number, Value};

/// Top-level envelope of a Bsale collection response.
#[derive(Debug, Deserialize)]
pub struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

/// A product variant as returned by `variants.json` or `variants/{id}.json`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<i64>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub bar_code: String,

    /// Internal SKU.
    #[serde(default, deserialize_with = "lenient_string")]
    pub code: String,

    pub product: Option<ProductRef>,

    #[serde(default, deserialize_with = "lenient_number")]
    pub stock: Option<Number>,

    #[serde(default, deserialize_with = "lenient_number")]
    pub price: Option<Number>,
}

impl Variant {
    /// Parent product id, when Bsale included a usable one.
    #[must_use]
    pub fn product_id(&self) -> Option<i64> {
        self.product.as_ref().and_then(|p| p.id).filter(|id| *id != 0)
    }
}

/// Reference to the parent product embedded in a variant.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductRef {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<i64>,
}

/// `products/{id}.json?fields=[name]`
#[derive(Debug, Deserialize)]
pub(crate) struct ProductSummary {
    pub name: Option<String>,
}

/// One row of `price_lists/{id}/details.json`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceListDetail {
    #[serde(default, deserialize_with = "lenient_number")]
    pub variant_value_with_taxes: Option<Number>,

    #[serde(default, deserialize_with = "lenient_number")]
    pub variant_value: Option<Number>,
}

impl PriceListDetail {
    /// Tax-inclusive value when present, otherwise the net value.
    #[must_use]
    pub fn best_value(&self) -> Option<Number> {
        self.variant_value_with_taxes
            .clone()
            .or_else(|| self.variant_value.clone())
    }
}

/// Filter accepted by the price-list details endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailKey {
    Barcode,
    Code,
    VariantId,
}

impl DetailKey {
    /// Query parameter name understood by Bsale.
    #[must_use]
    pub fn as_param(self) -> &'static str {
        match self {
            Self::Barcode => "barcode",
            Self::Code => "code",
            Self::VariantId => "variantid",
        }
    }
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<Number>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => Some(n),
        _ => None,
    })
}

fn lenient_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    })
}
