use serde::Serialize;
use serde_json::Number;

use crate::error::LookupError;

/// A validated lookup request. Construct with [`LookupRequest::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRequest {
    barcode: String,
    price_list_id: Option<String>,
}

impl LookupRequest {
    /// Trims both inputs; a blank price-list id counts as absent.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::InvalidInput`] if `barcode` is missing or blank.
    pub fn new(barcode: Option<&str>, price_list_id: Option<&str>) -> Result<Self, LookupError> {
        let barcode = barcode
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .ok_or(LookupError::InvalidInput)?;
        let price_list_id = price_list_id
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_owned);

        Ok(Self {
            barcode: barcode.to_owned(),
            price_list_id,
        })
    }

    #[must_use]
    pub fn barcode(&self) -> &str {
        &self.barcode
    }

    #[must_use]
    pub fn price_list_id(&self) -> Option<&str> {
        self.price_list_id.as_deref()
    }
}

/// Normalized product record returned to the kiosk.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupResult {
    pub name: String,
    pub sku: String,
    pub barcode: String,
    pub stock_total: Option<Number>,
    pub price: Option<Number>,
    pub price_list_id: Option<String>,
}
