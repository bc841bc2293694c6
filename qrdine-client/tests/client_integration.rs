// qrdine-client/tests/client_integration.rs
// Gateway + store integration against an in-process backend

use axum::extract::Path;
use axum::http::HeaderMap;
use axum::routing::{get, post};
use axum::{Json, Router};
use qrdine_client::{
    find_and_validate, ClientConfig, ClientError, HttpClient, KvStore, LoginRequest, MemoryStore,
    PromoError, UnpaidOrderCache, UserAuthStore,
};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;

async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn client_for(addr: SocketAddr) -> HttpClient {
    ClientConfig::new(format!("http://{}", addr)).build_http_client()
}

#[tokio::test]
async fn test_product_catalog_decodes() {
    let app = Router::new().route(
        "/menu/products/getAll",
        get(|| async {
            Json(json!([
                {
                    "productId": 1,
                    "name": "Pho bo",
                    "price": 75000,
                    "image": null,
                    "category": {"categoryId": 1, "name": "Mains"}
                },
                {
                    "productId": 2,
                    "name": "Tra da",
                    "price": 10000,
                    "image": "tra-da.jpg",
                    "category": {"categoryId": 3, "name": "Drinks"}
                }
            ]))
        }),
    );
    let client = client_for(serve(app).await);

    let products = client.get_all_products().await.unwrap();
    assert_eq!(products.len(), 2);
    assert_eq!(products[0].name, "Pho bo");
    assert_eq!(products[1].image.as_deref(), Some("tra-da.jpg"));
}

#[tokio::test]
async fn test_login_refused_without_client_role() {
    let app = Router::new().route(
        "/auth/login",
        post(|| async {
            Json(json!({
                "message": "Login successful",
                "userId": 5,
                "name": "Staff Member",
                "phoneNumber": "0900000001",
                "role": "STAFF",
                "token": "staff-token"
            }))
        }),
    );
    let client = client_for(serve(app).await);

    let raw = Arc::new(MemoryStore::new());
    let auth = UserAuthStore::new(raw.clone());
    let request = LoginRequest {
        phone_number: "0900000001".into(),
        password: "secret".into(),
    };

    let result = auth.login(&client, &request).await;
    assert!(matches!(result, Err(ClientError::Forbidden(_))));
    // nothing was stored: no identity, no token
    assert!(auth.read().is_none());
    assert!(raw.get("userData").is_none());
    assert!(raw.get("accessToken").is_none());
}

#[tokio::test]
async fn test_login_missing_role_refused() {
    let app = Router::new().route(
        "/auth/login",
        post(|| async {
            Json(json!({
                "message": "Login successful",
                "userId": 5,
                "name": "An",
                "phoneNumber": "0900000001"
            }))
        }),
    );
    let client = client_for(serve(app).await);
    let auth = UserAuthStore::new(Arc::new(MemoryStore::new()));

    let request = LoginRequest {
        phone_number: "0900000001".into(),
        password: "secret".into(),
    };
    assert!(auth.login(&client, &request).await.is_err());
    assert!(auth.read().is_none());
}

#[tokio::test]
async fn test_client_login_attaches_bearer_to_history_call() {
    let app = Router::new()
        .route(
            "/auth/login",
            post(|| async {
                Json(json!({
                    "message": "Login successful",
                    "userId": 12,
                    "name": "An",
                    "phoneNumber": "0901234567",
                    "role": "CLIENT",
                    "token": "client-token",
                    "refreshToken": "refresh-token"
                }))
            }),
        )
        .route(
            "/auth/orders/{user_id}",
            get(|Path(user_id): Path<i64>, headers: HeaderMap| async move {
                assert_eq!(user_id, 12);
                let auth_header = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                assert_eq!(auth_header, "Bearer client-token");
                Json(json!([{
                    "orderId": 42,
                    "customerName": "An",
                    "tableNumber": 7,
                    "totalAmount": 150000,
                    "orderTime": "2025-11-02T12:30:00",
                    "status": "COMPLETED",
                    "items": []
                }]))
            }),
        );
    let addr = serve(app).await;

    let auth = UserAuthStore::new(Arc::new(MemoryStore::new()));
    let client = ClientConfig::new(format!("http://{}", addr))
        .with_token_provider(Arc::new(auth.clone()))
        .build_http_client();

    let request = LoginRequest {
        phone_number: "0901234567".into(),
        password: "secret".into(),
    };
    let stored = auth.login(&client, &request).await.unwrap();
    assert_eq!(stored.user_id, 12);

    let history = client.get_user_orders(stored.user_id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert!(history[0].status.is_terminal());
}

#[tokio::test]
async fn test_bank_account_array_payload_accepted() {
    let app = Router::new().route(
        "/banks/active",
        get(|| async {
            Json(json!([{
                "id": 1,
                "bankName": "VCB",
                "accountNumber": "00110011",
                "accountHolder": "YEN HA",
                "qrCodeImageUrl": "https://img.example/qr.png",
                "status": "ACTIVE"
            }]))
        }),
    );
    let client = client_for(serve(app).await);

    let account = client.get_active_bank_account().await.unwrap();
    assert_eq!(account.bank_name, "VCB");
    assert!(account.is_active());
}

#[tokio::test]
async fn test_inactive_bank_account_rejected() {
    let app = Router::new().route(
        "/banks/active",
        get(|| async {
            Json(json!({
                "id": 1,
                "bankName": "VCB",
                "accountNumber": "00110011",
                "accountHolder": "YEN HA",
                "status": "DISABLED"
            }))
        }),
    );
    let client = client_for(serve(app).await);

    assert!(matches!(
        client.get_active_bank_account().await,
        Err(ClientError::InvalidResponse(_))
    ));
}

#[tokio::test]
async fn test_promotion_min_order_gate_before_submission() {
    let app = Router::new().route(
        "/promotions/active",
        get(|| async {
            Json(json!([{
                "promotionId": 1,
                "code": "GIAM10",
                "promotionType": "PERCENTAGE",
                "discountPercentage": 10,
                "startDate": "2000-01-01",
                "endDate": "2099-12-31",
                "productId": null,
                "productName": null,
                "categoryId": null,
                "categoryName": null,
                "totalQuantity": 100,
                "usedCount": 10,
                "remainingCount": 90,
                "minOrderAmount": 100000,
                "status": "ACTIVE",
                "createdAt": "2025-01-01T00:00:00"
            }]))
        }),
    );
    let client = client_for(serve(app).await);

    let promotions = client.get_active_promotions().await.unwrap();
    let err = find_and_validate(&promotions, "GIAM10", 80_000).unwrap_err();
    assert_eq!(
        err,
        PromoError::MinOrderNotMet {
            required: 100_000,
            actual: 80_000
        }
    );

    // the same cart over the threshold passes
    assert!(find_and_validate(&promotions, "GIAM10", 120_000).is_ok());
}

#[tokio::test]
async fn test_validation_error_carries_backend_message() {
    let app = Router::new().route(
        "/orders/{order_id}",
        get(|| async {
            (
                axum::http::StatusCode::BAD_REQUEST,
                "Session expired or not found",
            )
        }),
    );
    let client = client_for(serve(app).await);

    let err = client.get_order(1).await.unwrap_err();
    match &err {
        ClientError::Validation(msg) => assert_eq!(msg, "Session expired or not found"),
        other => panic!("expected Validation, got {:?}", other),
    }
    assert!(err.user_message().contains("scan the QR code"));
}

#[tokio::test]
async fn test_reconcile_drops_terminal_and_keeps_failed() {
    // order 41 is still SERVED, order 42 got PAID, order 43 errors
    let app = Router::new().route(
        "/orders/{order_id}",
        get(|Path(order_id): Path<i64>| async move {
            match order_id {
                41 => Ok(Json(json!({
                    "orderId": 41,
                    "customerName": "An",
                    "tableNumber": 7,
                    "totalAmount": 90000,
                    "orderTime": "2025-11-02T12:00:00",
                    "status": "SERVED",
                    "items": []
                }))),
                42 => Ok(Json(json!({
                    "orderId": 42,
                    "customerName": "An",
                    "tableNumber": 7,
                    "totalAmount": 150000,
                    "orderTime": "2025-11-02T12:30:00",
                    "status": "PAID",
                    "items": []
                }))),
                _ => Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR),
            }
        }),
    );
    let client = client_for(serve(app).await);

    let cache = UnpaidOrderCache::new(Arc::new(MemoryStore::new()));
    cache.add("sess-1", 41);
    cache.add("sess-1", 42);
    cache.add("sess-1", 43);

    let fresh = cache.reconcile("sess-1", &client).await;

    // only the live order comes back
    assert_eq!(fresh.len(), 1);
    assert_eq!(fresh[0].order_id, 41);
    // the paid order left the cache, the unreachable one stayed
    assert_eq!(cache.list("sess-1"), vec![43, 41]);
}
