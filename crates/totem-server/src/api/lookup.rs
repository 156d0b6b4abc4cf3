use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Extension, Json,
};
use serde::Deserialize;
use totem_lookup::{LookupRequest, LookupResult};

use crate::middleware::RequestId;

use super::{ApiError, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct LookupQuery {
    pub barcode: Option<String>,
    #[serde(rename = "priceListId")]
    pub price_list_id: Option<String>,
}

pub(super) async fn lookup_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    query: Result<Query<LookupQuery>, QueryRejection>,
) -> Result<Json<LookupResult>, ApiError> {
    let Query(query) = query.map_err(|rejection| {
        tracing::error!(request_id = %req_id.0, %rejection, "unreadable lookup query");
        ApiError::internal()
    })?;

    let request = LookupRequest::new(query.barcode.as_deref(), query.price_list_id.as_deref())
        .map_err(|e| ApiError::from_lookup(&req_id.0, &e))?;

    let result = state
        .resolver
        .resolve(&request)
        .await
        .map_err(|e| ApiError::from_lookup(&req_id.0, &e))?;

    tracing::info!(
        request_id = %req_id.0,
        barcode = request.barcode(),
        sku = %result.sku,
        "lookup served"
    );

    Ok(Json(result))
}
