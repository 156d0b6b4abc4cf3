//! Barcode lookup for the kiosk: resolves a Bsale variant into a single
//! product record, degrading every secondary attribute to a default
//! instead of failing the request.

pub mod error;
pub mod fallback;
pub mod price_list;
pub mod resolver;
pub mod types;

pub use error::LookupError;
pub use fallback::Fallback;
pub use resolver::LookupResolver;
pub use types::{LookupRequest, LookupResult};
