//! Price-list detail lookup.
//!
//! Bsale lets a price-list detail be filtered by barcode, SKU or variant id,
//! and which of them a given account indexes varies. Candidates are tried in
//! that order; the first row found decides the price.

use serde_json::Number;
use totem_bsale::{BsaleClient, DetailKey};

/// Identifiers a price-list row can be matched on. Empty values are skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetailIdentifiers<'a> {
    pub barcode: Option<&'a str>,
    pub code: Option<&'a str>,
    pub variant_id: Option<i64>,
}

/// Query keys to try, in precedence order: barcode, code, variant id.
#[must_use]
pub fn candidate_keys(ids: &DetailIdentifiers<'_>) -> Vec<(DetailKey, String)> {
    let mut keys = Vec::with_capacity(3);
    if let Some(barcode) = ids.barcode.filter(|b| !b.is_empty()) {
        keys.push((DetailKey::Barcode, barcode.to_owned()));
    }
    if let Some(code) = ids.code.filter(|c| !c.is_empty()) {
        keys.push((DetailKey::Code, code.to_owned()));
    }
    if let Some(variant_id) = ids.variant_id.filter(|id| *id != 0) {
        keys.push((DetailKey::VariantId, variant_id.to_string()));
    }
    keys
}

/// Returns the priced value of the first matching detail row.
///
/// Returns `None` without any request when `price_list_id` is absent. A
/// failed or unparseable candidate is skipped. Once a row is found its value
/// is returned as-is, even when the row carries no value, and the remaining
/// candidates are not tried.
pub async fn price_from_list(
    client: &BsaleClient,
    price_list_id: Option<&str>,
    ids: &DetailIdentifiers<'_>,
) -> Option<Number> {
    let price_list_id = price_list_id?;

    for (key, value) in candidate_keys(ids) {
        match client.price_list_detail(price_list_id, key, &value).await {
            Ok(Some(detail)) => return detail.best_value(),
            Ok(None) => {}
            Err(error) => {
                tracing::warn!(
                    price_list_id,
                    key = key.as_param(),
                    %error,
                    "price list detail lookup failed; trying next key"
                );
            }
        }
    }

    None
}
