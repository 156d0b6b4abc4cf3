//! Typed client for the subset of the Bsale REST API used by the kiosk
//! lookup: variant search, product names, per-variant fields and
//! price-list details.

pub mod client;
pub mod error;
pub mod types;

pub use client::BsaleClient;
pub use error::BsaleError;
pub use types::{DetailKey, ListResponse, PriceListDetail, ProductRef, Variant};
