//! End-to-end resolution tests against a wiremock stand-in for Bsale.
//!
//! Mocks mounted with `.expect(0)` assert that a fallback source was never
//! consulted; wiremock verifies expectations when the server drops.

use serde_json::{json, Number};
use totem_bsale::BsaleClient;
use totem_lookup::{LookupError, LookupRequest, LookupResolver, LookupResult};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const BARCODE: &str = "7801234567890";

fn resolver(server: &MockServer, default_price_list: Option<&str>) -> LookupResolver {
    let client = BsaleClient::with_base_url("test-token", 5, &server.uri())
        .expect("client construction should not fail");
    LookupResolver::new(client, default_price_list.map(str::to_owned))
}

fn request(price_list_id: Option<&str>) -> LookupRequest {
    LookupRequest::new(Some(BARCODE), price_list_id).expect("valid request")
}

async fn mount_variant_search(server: &MockServer, item: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/variants.json"))
        .and(query_param("barcode", BARCODE))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [item] })))
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_product_name(server: &MockServer, product_id: i64, name: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/products/{product_id}.json")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "name": name })))
        .mount(server)
        .await;
}

async fn mount_variant_field(
    server: &MockServer,
    field: &str,
    response: ResponseTemplate,
    expected_calls: u64,
) {
    Mock::given(method("GET"))
        .and(path("/variants/42.json"))
        .and(query_param("fields", format!("[{field}]")))
        .respond_with(response)
        .expect(expected_calls)
        .mount(server)
        .await;
}

fn widget_variant() -> serde_json::Value {
    json!({
        "id": 42,
        "barCode": BARCODE,
        "code": "SKU1",
        "product": { "id": 9 },
        "stock": 5,
        "price": 1000
    })
}

#[tokio::test]
async fn resolves_the_reference_scenario() {
    let server = MockServer::start().await;
    mount_variant_search(&server, widget_variant()).await;
    mount_product_name(&server, 9, "Widget").await;
    mount_variant_field(&server, "stock", ResponseTemplate::new(200), 0).await;
    mount_variant_field(&server, "price", ResponseTemplate::new(200), 0).await;

    let result = resolver(&server, None)
        .resolve(&request(None))
        .await
        .expect("lookup should succeed");

    assert_eq!(
        result,
        LookupResult {
            name: "Widget".to_owned(),
            sku: "SKU1".to_owned(),
            barcode: BARCODE.to_owned(),
            stock_total: Some(Number::from(5)),
            price: Some(Number::from(1000)),
            price_list_id: None,
        }
    );
    assert_eq!(
        serde_json::to_value(&result).unwrap(),
        json!({
            "name": "Widget",
            "sku": "SKU1",
            "barcode": BARCODE,
            "stockTotal": 5,
            "price": 1000,
            "priceListId": null
        })
    );
}

#[tokio::test]
async fn unknown_barcode_is_not_found_even_with_price_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/variants.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "count": 0, "items": [] })))
        .mount(&server)
        .await;

    let err = resolver(&server, Some("3"))
        .resolve(&request(Some("5")))
        .await
        .unwrap_err();
    assert!(matches!(err, LookupError::NotFound { .. }), "got: {err:?}");
}

#[tokio::test]
async fn variant_search_failure_is_upstream_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/variants.json"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let err = resolver(&server, None)
        .resolve(&request(None))
        .await
        .unwrap_err();
    assert!(
        matches!(err, LookupError::UpstreamUnavailable(_)),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn unreadable_variant_search_body_is_internal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/variants.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = resolver(&server, None)
        .resolve(&request(None))
        .await
        .unwrap_err();
    assert!(matches!(err, LookupError::Internal(_)), "got: {err:?}");
}

#[tokio::test]
async fn missing_stock_falls_back_to_variant_fetch() {
    let server = MockServer::start().await;
    let mut item = widget_variant();
    item["stock"] = json!(null);
    mount_variant_search(&server, item).await;
    mount_product_name(&server, 9, "Widget").await;
    mount_variant_field(
        &server,
        "stock",
        ResponseTemplate::new(200).set_body_json(json!({ "stock": 17 })),
        1,
    )
    .await;

    let result = resolver(&server, None)
        .resolve(&request(None))
        .await
        .unwrap();
    assert_eq!(result.stock_total, Some(Number::from(17)));
}

#[tokio::test]
async fn stock_is_null_when_every_source_fails() {
    let server = MockServer::start().await;
    let mut item = widget_variant();
    item.as_object_mut().unwrap().remove("stock");
    mount_variant_search(&server, item).await;
    mount_product_name(&server, 9, "Widget").await;
    mount_variant_field(&server, "stock", ResponseTemplate::new(500), 1).await;

    let result = resolver(&server, None)
        .resolve(&request(None))
        .await
        .expect("stock failure must not fail the lookup");
    assert!(result.stock_total.is_none());
}

#[tokio::test]
async fn price_list_value_with_taxes_beats_variant_price() {
    let server = MockServer::start().await;
    mount_variant_search(&server, widget_variant()).await;
    mount_product_name(&server, 9, "Widget").await;
    Mock::given(method("GET"))
        .and(path("/price_lists/3/details.json"))
        .and(query_param("barcode", BARCODE))
        .and(query_param("limit", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{ "variantValue": 1260, "variantValueWithTaxes": 1500 }]
        })))
        .expect(1)
        .mount(&server)
        .await;
    mount_variant_field(&server, "price", ResponseTemplate::new(200), 0).await;

    let result = resolver(&server, None)
        .resolve(&request(Some("3")))
        .await
        .unwrap();
    assert_eq!(result.price, Some(Number::from(1500)));
    assert_eq!(result.price_list_id.as_deref(), Some("3"));
}

#[tokio::test]
async fn configured_default_price_list_is_used_when_request_has_none() {
    let server = MockServer::start().await;
    mount_variant_search(&server, widget_variant()).await;
    mount_product_name(&server, 9, "Widget").await;
    Mock::given(method("GET"))
        .and(path("/price_lists/8/details.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{ "variantValue": 700 }]
        })))
        .mount(&server)
        .await;

    let result = resolver(&server, Some("8"))
        .resolve(&request(None))
        .await
        .unwrap();
    assert_eq!(result.price, Some(Number::from(700)));
    assert_eq!(result.price_list_id.as_deref(), Some("8"));
}

#[tokio::test]
async fn request_price_list_overrides_default() {
    let server = MockServer::start().await;
    mount_variant_search(&server, widget_variant()).await;
    mount_product_name(&server, 9, "Widget").await;
    Mock::given(method("GET"))
        .and(path("/price_lists/5/details.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{ "variantValueWithTaxes": 1100 }]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/price_lists/8/details.json"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let result = resolver(&server, Some("8"))
        .resolve(&request(Some("5")))
        .await
        .unwrap();
    assert_eq!(result.price, Some(Number::from(1100)));
    assert_eq!(result.price_list_id.as_deref(), Some("5"));
}

#[tokio::test]
async fn price_list_skips_failed_and_unparseable_candidates() {
    let server = MockServer::start().await;
    mount_variant_search(&server, widget_variant()).await;
    mount_product_name(&server, 9, "Widget").await;
    Mock::given(method("GET"))
        .and(path("/price_lists/3/details.json"))
        .and(query_param("barcode", BARCODE))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/price_lists/3/details.json"))
        .and(query_param("code", "SKU1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{broken"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/price_lists/3/details.json"))
        .and(query_param("variantid", "42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{ "variantValueWithTaxes": 1234 }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = resolver(&server, None)
        .resolve(&request(Some("3")))
        .await
        .unwrap();
    assert_eq!(result.price, Some(Number::from(1234)));
}

#[tokio::test]
async fn price_list_stops_at_first_row_even_without_value() {
    let server = MockServer::start().await;
    mount_variant_search(&server, widget_variant()).await;
    mount_product_name(&server, 9, "Widget").await;
    Mock::given(method("GET"))
        .and(path("/price_lists/3/details.json"))
        .and(query_param("barcode", BARCODE))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{ "variantValue": null }]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/price_lists/3/details.json"))
        .and(query_param("code", "SKU1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let result = resolver(&server, None)
        .resolve(&request(Some("3")))
        .await
        .unwrap();
    // The empty row yields no price-list value; the variant's own price applies.
    assert_eq!(result.price, Some(Number::from(1000)));
}

#[tokio::test]
async fn variant_price_is_used_without_secondary_fetch() {
    let server = MockServer::start().await;
    mount_variant_search(&server, widget_variant()).await;
    mount_product_name(&server, 9, "Widget").await;
    mount_variant_field(&server, "price", ResponseTemplate::new(200), 0).await;

    let result = resolver(&server, None)
        .resolve(&request(None))
        .await
        .unwrap();
    assert_eq!(result.price, Some(Number::from(1000)));
    assert!(result.price_list_id.is_none());
}

#[tokio::test]
async fn missing_price_falls_back_to_variant_fetch() {
    let server = MockServer::start().await;
    let mut item = widget_variant();
    item["price"] = json!(null);
    mount_variant_search(&server, item).await;
    mount_product_name(&server, 9, "Widget").await;
    mount_variant_field(
        &server,
        "price",
        ResponseTemplate::new(200).set_body_json(json!({ "price": 990 })),
        1,
    )
    .await;

    let result = resolver(&server, None)
        .resolve(&request(None))
        .await
        .unwrap();
    assert_eq!(result.price, Some(Number::from(990)));
}

#[tokio::test]
async fn price_is_null_when_every_source_is_empty() {
    let server = MockServer::start().await;
    let mut item = widget_variant();
    item.as_object_mut().unwrap().remove("price");
    mount_variant_search(&server, item).await;
    mount_product_name(&server, 9, "Widget").await;
    mount_variant_field(
        &server,
        "price",
        ResponseTemplate::new(200).set_body_json(json!({ "price": null })),
        1,
    )
    .await;

    let result = resolver(&server, None)
        .resolve(&request(None))
        .await
        .unwrap();
    assert!(result.price.is_none());
}

#[tokio::test]
async fn failed_product_name_defaults_to_producto() {
    let server = MockServer::start().await;
    mount_variant_search(&server, widget_variant()).await;
    Mock::given(method("GET"))
        .and(path("/products/9.json"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let result = resolver(&server, None)
        .resolve(&request(None))
        .await
        .expect("name failure must not fail the lookup");
    assert_eq!(result.name, "Producto");
}

#[tokio::test]
async fn unreadable_product_body_defaults_to_producto() {
    let server = MockServer::start().await;
    mount_variant_search(&server, widget_variant()).await;
    Mock::given(method("GET"))
        .and(path("/products/9.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let result = resolver(&server, None)
        .resolve(&request(None))
        .await
        .expect("unreadable product must not fail the lookup");
    assert_eq!(result.name, "Producto");
    assert_eq!(result.stock_total, Some(Number::from(5)));
}

#[tokio::test]
async fn string_product_id_still_resolves_name() {
    let server = MockServer::start().await;
    let mut item = widget_variant();
    item["product"] = json!({ "href": "https://api.bsale.io/v1/products/9.json", "id": "9" });
    mount_variant_search(&server, item).await;
    mount_product_name(&server, 9, "Widget").await;

    let result = resolver(&server, None)
        .resolve(&request(None))
        .await
        .expect("string product id must not fail the lookup");
    assert_eq!(result.name, "Widget");
    assert_eq!(result.sku, "SKU1");
}

#[tokio::test]
async fn variant_without_product_skips_name_lookup() {
    let server = MockServer::start().await;
    let mut item = widget_variant();
    item.as_object_mut().unwrap().remove("product");
    mount_variant_search(&server, item).await;
    Mock::given(method("GET"))
        .and(path("/products/9.json"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let result = resolver(&server, None)
        .resolve(&request(None))
        .await
        .unwrap();
    assert_eq!(result.name, "Producto");
}

#[tokio::test]
async fn empty_product_name_defaults_to_producto() {
    let server = MockServer::start().await;
    mount_variant_search(&server, widget_variant()).await;
    mount_product_name(&server, 9, "").await;

    let result = resolver(&server, None)
        .resolve(&request(None))
        .await
        .unwrap();
    assert_eq!(result.name, "Producto");
}
