//! Integration tests for `CartSubmitter` against a mocked storefront.

use std::sync::Arc;

use quickview_core::{
    resolve, CartLineRequest, ErrorKind, Product, ProductOption, PromotionRules, SelectionState,
    Variant, VariantId,
};
use quickview_modal::CartSubmitter;
use quickview_storefront::StorefrontClient;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn tee() -> Product {
    let variant = |id: u64, color: &str, size: &str, price: i64| Variant {
        id: VariantId(id),
        title: format!("{color} / {size}"),
        price,
        available: true,
        options: vec![color.to_owned(), size.to_owned()],
    };
    Product {
        id: 1000,
        handle: "classic-tee".to_owned(),
        title: "Classic Tee".to_owned(),
        description: None,
        image_url: None,
        price: 2500,
        options: vec![
            ProductOption {
                name: "Color".to_owned(),
                values: vec!["Black".to_owned(), "White".to_owned()],
                position: 0,
            },
            ProductOption {
                name: "Size".to_owned(),
                values: vec!["Small".to_owned(), "Medium".to_owned()],
                position: 1,
            },
        ],
        variants: vec![
            variant(1, "Black", "Small", 2500),
            variant(2, "Black", "Medium", 2700),
            variant(3, "White", "Small", 2500),
            variant(4, "White", "Medium", 2700),
        ],
    }
}

fn jacket_js() -> serde_json::Value {
    json!({
        "id": 7,
        "title": "Soft Winter Jacket",
        "handle": "soft-winter-jacket",
        "price": 8900,
        "options": [{ "name": "Title", "position": 1, "values": ["Default Title"] }],
        "variants": [{
            "id": 70,
            "title": "Default Title",
            "price": 8900,
            "available": true,
            "options": ["Default Title"]
        }]
    })
}

fn cart_ok(variant_id: u64, quantity: u32) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "items": [{ "id": variant_id, "variant_id": variant_id, "quantity": quantity }]
    }))
}

fn submitter(server: &MockServer, promotions: PromotionRules) -> CartSubmitter {
    let client = StorefrontClient::new(&server.uri(), 5, "quickview-test/0.1")
        .expect("failed to build test StorefrontClient");
    CartSubmitter::new(Arc::new(client), promotions)
}

fn selection(color: &str, size: &str) -> (SelectionState, CartLineRequest) {
    let product = tee();
    let selection = SelectionState::from_pairs(&product, [("Color", color), ("Size", size)])
        .expect("options exist");
    let variant = resolve(&selection, &product.variants).expect("combination exists");
    (selection, CartLineRequest::single(variant.id))
}

#[tokio::test]
async fn black_medium_adds_primary_then_bonus() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/cart/add.js"))
        .and(body_json(json!({ "items": [{ "id": 2, "quantity": 1 }] })))
        .respond_with(cart_ok(2, 1))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/products/soft-winter-jacket.js"))
        .respond_with(ResponseTemplate::new(200).set_body_json(jacket_js()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/cart/add.js"))
        .and(body_json(json!({ "items": [{ "id": 70, "quantity": 1 }] })))
        .respond_with(cart_ok(70, 1))
        .expect(1)
        .mount(&server)
        .await;

    let (selection, line) = selection("Black", "Medium");
    assert_eq!(line.variant_id(), VariantId(2));

    let result = submitter(&server, PromotionRules::default())
        .submit(line, &selection)
        .await;

    assert!(result.primary_added);
    assert!(result.bonus_added);
    assert!(result.error.is_none());
}

#[tokio::test]
async fn white_medium_adds_only_primary() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/cart/add.js"))
        .and(body_json(json!({ "items": [{ "id": 4, "quantity": 1 }] })))
        .respond_with(cart_ok(4, 1))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/products/soft-winter-jacket.js"))
        .respond_with(ResponseTemplate::new(200).set_body_json(jacket_js()))
        .expect(0)
        .mount(&server)
        .await;

    let (selection, line) = selection("White", "Medium");
    assert_eq!(line.variant_id(), VariantId(4));

    let result = submitter(&server, PromotionRules::default())
        .submit(line, &selection)
        .await;

    assert!(result.primary_added);
    assert!(!result.bonus_added);
    assert!(result.error.is_none());
}

#[tokio::test]
async fn primary_failure_never_requests_bonus() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/cart/add.js"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "status": 422,
            "message": "Cart Error",
            "description": "Black / Medium is sold out."
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/products/soft-winter-jacket.js"))
        .respond_with(ResponseTemplate::new(200).set_body_json(jacket_js()))
        .expect(0)
        .mount(&server)
        .await;

    let (selection, line) = selection("Black", "Medium");
    let result = submitter(&server, PromotionRules::default())
        .submit(line, &selection)
        .await;

    assert!(!result.is_success());
    assert!(!result.bonus_added);
    let failure = result.error.expect("failure should be reported");
    assert_eq!(failure.kind, ErrorKind::CartService);
    assert!(failure.message.contains("sold out"), "{}", failure.message);
}

#[tokio::test]
async fn missing_bonus_product_keeps_primary_add() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/cart/add.js"))
        .respond_with(cart_ok(2, 1))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/products/soft-winter-jacket.js"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/products.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "products": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let (selection, line) = selection("Black", "Medium");
    let result = submitter(&server, PromotionRules::default())
        .submit(line, &selection)
        .await;

    assert!(result.is_success());
    assert!(!result.bonus_added);
    let failure = result.error.expect("bonus failure should be reported");
    assert_eq!(failure.kind, ErrorKind::BonusLookup);
}

#[tokio::test]
async fn bonus_found_by_title_when_handle_is_missing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/cart/add.js"))
        .and(body_json(json!({ "items": [{ "id": 2, "quantity": 1 }] })))
        .respond_with(cart_ok(2, 1))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/products/soft-winter-jacket.js"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/products.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "products": [{
                "id": 8,
                "title": "Soft Winter Jacket",
                "handle": "jacket-2024",
                "options": [{ "name": "Title", "position": 1, "values": ["Default Title"] }],
                "variants": [{ "id": 80, "title": "Default Title", "price": "89.00", "option1": "Default Title" }]
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/cart/add.js"))
        .and(body_json(json!({ "items": [{ "id": 80, "quantity": 1 }] })))
        .respond_with(cart_ok(80, 1))
        .expect(1)
        .mount(&server)
        .await;

    let (selection, line) = selection("Black", "Medium");
    let result = submitter(&server, PromotionRules::default())
        .submit(line, &selection)
        .await;

    assert!(result.primary_added);
    assert!(result.bonus_added);
}

#[tokio::test]
async fn rejected_bonus_add_is_non_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/cart/add.js"))
        .and(body_json(json!({ "items": [{ "id": 2, "quantity": 2 }] })))
        .respond_with(cart_ok(2, 2))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/products/soft-winter-jacket.js"))
        .respond_with(ResponseTemplate::new(200).set_body_json(jacket_js()))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/cart/add.js"))
        .and(body_json(json!({ "items": [{ "id": 70, "quantity": 1 }] })))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let (selection, _) = selection("Black", "Medium");
    let line = CartLineRequest::new(VariantId(2), 2).unwrap();
    let result = submitter(&server, PromotionRules::default())
        .submit(line, &selection)
        .await;

    assert!(result.primary_added);
    assert!(!result.bonus_added);
    assert_eq!(result.error.map(|e| e.kind), Some(ErrorKind::BonusLookup));
}

#[tokio::test]
async fn empty_rule_set_never_adds_bonus() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/cart/add.js"))
        .respond_with(cart_ok(2, 1))
        .expect(1)
        .mount(&server)
        .await;

    let (selection, line) = selection("Black", "Medium");
    let result = submitter(&server, PromotionRules::none())
        .submit(line, &selection)
        .await;

    assert!(result.primary_added);
    assert!(!result.bonus_added);
    assert!(result.error.is_none());
}

#[tokio::test]
async fn bonus_without_variants_is_reported_unusable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/cart/add.js"))
        .and(body_json(json!({ "items": [{ "id": 2, "quantity": 1 }] })))
        .respond_with(cart_ok(2, 1))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/products/soft-winter-jacket.js"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 7,
            "title": "Soft Winter Jacket",
            "handle": "soft-winter-jacket",
            "variants": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (selection, line) = selection("Black", "Medium");
    let result = submitter(&server, PromotionRules::default())
        .submit(line, &selection)
        .await;

    assert!(result.primary_added);
    assert!(!result.bonus_added);
    let failure = result.error.expect("bonus failure should be reported");
    assert_eq!(failure.kind, ErrorKind::BonusLookup);
    assert!(
        failure.message.contains("soft-winter-jacket") && failure.message.contains("no variants"),
        "{}",
        failure.message
    );
}
