//! HTTP client for the Bsale REST API.
//!
//! Wraps `reqwest` with the `access_token` header, per-call timeouts and
//! typed response deserialization. Each method maps to exactly one upstream
//! request; fallback policy lives in the caller.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde_json::Number;

use crate::error::BsaleError;
use crate::types::{DetailKey, ListResponse, PriceListDetail, ProductSummary, Variant};

const ACCESS_TOKEN_HEADER: &str = "access_token";
const VARIANT_SEARCH_FIELDS: &str = "[id,barCode,code,product,stock,price]";

/// Client for the Bsale REST API.
///
/// Production code configures one through [`BsaleClient::builder`];
/// [`BsaleClient::with_base_url`] is the short form used against mock servers.
#[derive(Clone)]
pub struct BsaleClient {
    client: Client,
    access_token: String,
    base_url: Url,
}

impl std::fmt::Debug for BsaleClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BsaleClient")
            .field("base_url", &self.base_url.as_str())
            .field("access_token", &"[redacted]")
            .finish_non_exhaustive()
    }
}

impl BsaleClient {
    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`BsaleError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`BsaleError::InvalidBaseUrl`] if
    /// `base_url` is not a valid URL.
    pub fn with_base_url(
        access_token: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, BsaleError> {
        Self::builder(base_url)
            .access_token(access_token)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
    }

    /// Starts a builder for full control over timeouts and user agent.
    #[must_use]
    pub fn builder(base_url: &str) -> BsaleClientBuilder {
        BsaleClientBuilder {
            base_url: base_url.to_owned(),
            access_token: String::new(),
            timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(5),
            user_agent: "totem/0.1 (kiosk-lookup)".to_owned(),
        }
    }

    /// Searches variants by barcode and returns the first match.
    ///
    /// # Errors
    ///
    /// - [`BsaleError::Http`] on network failure or timeout.
    /// - [`BsaleError::UnexpectedStatus`] on a non-2xx response.
    /// - [`BsaleError::Deserialize`] if the body is not a variant collection.
    pub async fn find_variant_by_barcode(
        &self,
        barcode: &str,
    ) -> Result<Option<Variant>, BsaleError> {
        let url = self.build_url(
            &["variants.json"],
            &[("barcode", barcode), ("fields", VARIANT_SEARCH_FIELDS)],
        )?;
        let page: ListResponse<Variant> = self
            .get_json(&url, &format!("variant search (barcode={barcode})"))
            .await?;
        Ok(page.items.into_iter().next())
    }

    /// Fetches the display name of a product. `Ok(None)` when Bsale omits it.
    ///
    /// # Errors
    ///
    /// Same as [`BsaleClient::find_variant_by_barcode`].
    pub async fn product_name(&self, product_id: i64) -> Result<Option<String>, BsaleError> {
        let id_segment = format!("{product_id}.json");
        let url = self.build_url(&["products", &id_segment], &[("fields", "[name]")])?;
        let product: ProductSummary = self
            .get_json(&url, &format!("product {product_id}"))
            .await?;
        Ok(product.name)
    }

    /// Fetches the `stock` field of a single variant.
    ///
    /// # Errors
    ///
    /// Same as [`BsaleClient::find_variant_by_barcode`].
    pub async fn variant_stock(&self, variant_id: i64) -> Result<Option<Number>, BsaleError> {
        Ok(self.variant_fields(variant_id, "[stock]").await?.stock)
    }

    /// Fetches the `price` field of a single variant.
    ///
    /// # Errors
    ///
    /// Same as [`BsaleClient::find_variant_by_barcode`].
    pub async fn variant_price(&self, variant_id: i64) -> Result<Option<Number>, BsaleError> {
        Ok(self.variant_fields(variant_id, "[price]").await?.price)
    }

    /// Looks up the first price-list detail row matching a single filter.
    ///
    /// # Errors
    ///
    /// Same as [`BsaleClient::find_variant_by_barcode`].
    pub async fn price_list_detail(
        &self,
        price_list_id: &str,
        key: DetailKey,
        value: &str,
    ) -> Result<Option<PriceListDetail>, BsaleError> {
        let url = self.build_url(
            &["price_lists", price_list_id, "details.json"],
            &[(key.as_param(), value), ("limit", "1")],
        )?;
        let page: ListResponse<PriceListDetail> = self
            .get_json(
                &url,
                &format!(
                    "price list {price_list_id} details ({}={value})",
                    key.as_param()
                ),
            )
            .await?;
        Ok(page.items.into_iter().next())
    }

    async fn variant_fields(&self, variant_id: i64, fields: &str) -> Result<Variant, BsaleError> {
        let id_segment = format!("{variant_id}.json");
        let url = self.build_url(&["variants", &id_segment], &[("fields", fields)])?;
        self.get_json(&url, &format!("variant {variant_id} {fields}"))
            .await
    }

    /// Appends percent-encoded path segments and query pairs to the base URL.
    fn build_url(&self, segments: &[&str], query: &[(&str, &str)]) -> Result<Url, BsaleError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| BsaleError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: "cannot be a base".to_owned(),
            })?
            .pop_if_empty()
            .extend(segments);
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in query {
                pairs.append_pair(k, v);
            }
        }
        Ok(url)
    }

    /// Sends an authenticated GET, asserts a 2xx status and parses the body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &Url,
        context: &str,
    ) -> Result<T, BsaleError> {
        tracing::debug!(url = %url, "bsale request");
        let response = self
            .client
            .get(url.clone())
            .header(ACCESS_TOKEN_HEADER, &self.access_token)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(BsaleError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| BsaleError::Deserialize {
            context: context.to_owned(),
            source: e,
        })
    }
}

/// Builder returned by [`BsaleClient::builder`].
pub struct BsaleClientBuilder {
    base_url: String,
    access_token: String,
    timeout: Duration,
    connect_timeout: Duration,
    user_agent: String,
}

impl BsaleClientBuilder {
    #[must_use]
    pub fn access_token(mut self, token: &str) -> Self {
        token.clone_into(&mut self.access_token);
        self
    }

    /// Overall deadline for a single upstream call.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    #[must_use]
    pub fn user_agent(mut self, user_agent: &str) -> Self {
        user_agent.clone_into(&mut self.user_agent);
        self
    }

    /// # Errors
    ///
    /// Returns [`BsaleError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`BsaleError::InvalidBaseUrl`] if the base URL does not parse.
    pub fn build(self) -> Result<BsaleClient, BsaleError> {
        let client = Client::builder()
            .timeout(self.timeout)
            .connect_timeout(self.connect_timeout)
            .user_agent(&self.user_agent)
            .build()?;

        // Normalise to exactly one trailing slash so path segments append
        // under the API root instead of replacing its last segment.
        let normalised = format!("{}/", self.base_url.trim().trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| BsaleError::InvalidBaseUrl {
            base_url: self.base_url.clone(),
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(BsaleError::InvalidBaseUrl {
                base_url: self.base_url,
                reason: "cannot be a base".to_owned(),
            });
        }

        Ok(BsaleClient {
            client,
            access_token: self.access_token,
            base_url,
        })
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
