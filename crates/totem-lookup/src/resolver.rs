use serde_json::Number;
use totem_bsale::{BsaleClient, Variant};

use crate::error::LookupError;
use crate::fallback::Fallback;
use crate::price_list::{price_from_list, DetailIdentifiers};
use crate::types::{LookupRequest, LookupResult};

/// Name reported when the product name cannot be fetched.
pub const DEFAULT_PRODUCT_NAME: &str = "Producto";

/// Resolves a barcode into a [`LookupResult`] against the Bsale API.
///
/// Only the primary variant search can fail a lookup. Name, stock and price
/// each come from an ordered [`Fallback`] and degrade to a default or `None`.
#[derive(Debug, Clone)]
pub struct LookupResolver {
    client: BsaleClient,
    default_price_list_id: Option<String>,
}

impl LookupResolver {
    #[must_use]
    pub fn new(client: BsaleClient, default_price_list_id: Option<String>) -> Self {
        Self {
            client,
            default_price_list_id: default_price_list_id.filter(|id| !id.trim().is_empty()),
        }
    }

    /// Runs the full lookup for one request.
    ///
    /// Once the variant is known, name, stock and price are resolved
    /// concurrently; each chain stays sequential internally.
    ///
    /// # Errors
    ///
    /// - [`LookupError::UpstreamUnavailable`] if the variant search fails to
    ///   reach Bsale or gets a non-2xx answer.
    /// - [`LookupError::NotFound`] if no variant carries the barcode.
    /// - [`LookupError::Internal`] if the variant search body is unreadable.
    pub async fn resolve(&self, request: &LookupRequest) -> Result<LookupResult, LookupError> {
        let barcode = request.barcode();
        let variant = self
            .client
            .find_variant_by_barcode(barcode)
            .await
            .map_err(LookupError::from_primary)?
            .ok_or_else(|| LookupError::NotFound {
                barcode: barcode.to_owned(),
            })?;

        let price_list_id = request
            .price_list_id()
            .or(self.default_price_list_id.as_deref());

        let (name, stock_total, price) = tokio::join!(
            self.resolve_name(variant.product_id()),
            self.resolve_stock(&variant),
            self.resolve_price(&variant, barcode, price_list_id),
        );

        tracing::debug!(
            barcode,
            variant_id = ?variant.id,
            price_list_id = ?price_list_id,
            has_stock = stock_total.is_some(),
            has_price = price.is_some(),
            "lookup resolved"
        );

        Ok(LookupResult {
            name,
            sku: variant.code,
            barcode: variant.bar_code,
            stock_total,
            price,
            price_list_id: price_list_id.map(str::to_owned),
        })
    }

    async fn resolve_name(&self, product_id: Option<i64>) -> String {
        Fallback::new("name")
            .or_from("product", async move {
                let product_id = product_id?;
                self.client
                    .product_name(product_id)
                    .await
                    .inspect_err(|error| {
                        tracing::warn!(product_id, %error, "product name lookup failed");
                    })
                    .ok()
                    .flatten()
                    .filter(|name| !name.is_empty())
            })
            .resolve()
            .await
            .unwrap_or_else(|| DEFAULT_PRODUCT_NAME.to_owned())
    }

    async fn resolve_stock(&self, variant: &Variant) -> Option<Number> {
        Fallback::new("stock")
            .or_from("variant_record", async { variant.stock.clone() })
            .or_from("variant_fetch", self.fetch_stock(variant.id))
            .resolve()
            .await
    }

    async fn resolve_price(
        &self,
        variant: &Variant,
        barcode: &str,
        price_list_id: Option<&str>,
    ) -> Option<Number> {
        let ids = DetailIdentifiers {
            barcode: Some(barcode),
            code: Some(&variant.code),
            variant_id: variant.id,
        };

        Fallback::new("price")
            .or_from("price_list", async move {
                price_from_list(&self.client, price_list_id, &ids).await
            })
            .or_from("variant_record", async { variant.price.clone() })
            .or_from("variant_fetch", self.fetch_price(variant.id))
            .resolve()
            .await
    }

    async fn fetch_stock(&self, variant_id: Option<i64>) -> Option<Number> {
        let variant_id = variant_id?;
        self.client
            .variant_stock(variant_id)
            .await
            .inspect_err(|error| {
                tracing::warn!(variant_id, %error, "variant stock lookup failed");
            })
            .ok()
            .flatten()
    }

    async fn fetch_price(&self, variant_id: Option<i64>) -> Option<Number> {
        let variant_id = variant_id?;
        self.client
            .variant_price(variant_id)
            .await
            .inspect_err(|error| {
                tracing::warn!(variant_id, %error, "variant price lookup failed");
            })
            .ok()
            .flatten()
    }
}
