use thiserror::Error;
use totem_bsale::BsaleError;

/// Hard failures of a lookup. Secondary attributes never produce one of these.
#[derive(Debug, Error)]
pub enum LookupError {
    /// The barcode was missing or blank.
    #[error("barcode is required")]
    InvalidInput,

    /// Bsale has no variant with this barcode.
    #[error("no variant matches barcode {barcode}")]
    NotFound { barcode: String },

    /// The primary variant search could not be completed.
    #[error("variant search failed: {0}")]
    UpstreamUnavailable(#[source] BsaleError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl LookupError {
    /// Classifies a failure of the primary variant search.
    pub(crate) fn from_primary(err: BsaleError) -> Self {
        if err.is_transport() {
            Self::UpstreamUnavailable(err)
        } else {
            Self::Internal(err.to_string())
        }
    }
}
