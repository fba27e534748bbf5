//! HTTP interface - routes, shared state and JSON error mapping.

/// Error to response conversion
pub mod error;
/// Endpoint handlers
pub mod handlers;

use axum::{
    Router,
    routing::{get, post},
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// State shared by all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub database: Arc<DatabaseConnection>,
}

/// Builds the application router with request tracing and permissive CORS.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/restock",
            post(handlers::restock).fallback(handlers::restock_method_not_allowed),
        )
        .route("/store-performance", get(handlers::store_performance))
        .route("/health", get(handlers::health))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{
        core::product_location::create_product_location,
        entities::PurchaseOrder,
        errors::Result,
        test_utils::*,
    };
    use axum::{
        body::{Body, to_bytes},
        http::{Method, Request, StatusCode, header},
    };
    use sea_orm::{EntityTrait, PaginatorTrait};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn test_app(db: DatabaseConnection) -> Router {
        router(AppState {
            database: Arc::new(db),
        })
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() -> Result<()> {
        let db = setup_test_db().await?;
        let app = test_app(db);

        let (status, body) = send(app, get_request("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "ok" }));

        Ok(())
    }

    #[tokio::test]
    async fn test_restock_creates_order() -> Result<()> {
        let db = setup_test_db().await?;
        let supplier = create_test_supplier(&db, "Acme Wholesale").await?;
        let product = create_test_product(&db, "Tea", Some(supplier.id)).await?;
        let store = create_test_store(&db, "Main Street Store").await?;
        create_product_location(&db, product.id, store.id, 30).await?;
        let db = Arc::new(db);
        let app = router(AppState {
            database: Arc::clone(&db),
        });

        let body = json!({ "productId": product.id }).to_string();
        let (status, body) = send(app, post_json("/restock", &body)).await;
        assert_eq!(status, StatusCode::OK);
        let message = body["message"].as_str().unwrap();
        assert!(message.starts_with("Purchase order "));
        assert!(message.ends_with(&format!("for product ID {} with quantity 20.", product.id)));
        assert_eq!(PurchaseOrder::find().count(db.as_ref()).await?, 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_restock_sufficient_stock_message() -> Result<()> {
        let (db, product, store) = setup_with_product_and_store().await?;
        create_product_location(&db, product.id, store.id, 60).await?;
        let app = test_app(db);

        let body = json!({ "productId": product.id }).to_string();
        let (status, body) = send(app, post_json("/restock", &body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["message"],
            format!(
                "Stock level (60) for product ID {} is sufficient. No purchase order needed.",
                product.id
            )
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_restock_bad_requests() -> Result<()> {
        let db = setup_test_db().await?;
        let app = test_app(db);

        let (status, body) = send(app.clone(), post_json("/restock", "{}")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Product ID is required." }));

        let (status, body) = send(app.clone(), post_json("/restock", r#"{"productId": 0}"#)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Product ID is required." }));

        let (status, body) = send(app, post_json("/restock", "{not json")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Invalid JSON payload." }));

        Ok(())
    }

    #[tokio::test]
    async fn test_restock_unknown_product() -> Result<()> {
        let db = setup_test_db().await?;
        let app = test_app(db);

        let (status, body) = send(app, post_json("/restock", r#"{"productId": 41}"#)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "Product 41 does not exist" }));

        Ok(())
    }

    #[tokio::test]
    async fn test_restock_rejects_other_methods() -> Result<()> {
        let db = setup_test_db().await?;
        let app = test_app(db);

        let (status, body) = send(app, get_request("/restock")).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body, json!({ "error": "Only POST method is allowed." }));

        Ok(())
    }

    #[tokio::test]
    async fn test_store_performance_endpoint() -> Result<()> {
        let (db, product, store) = setup_with_product_and_store().await?;
        create_test_sale(&db, store.id, Some(product.id), None, 15.0, date(2024, 1, 10)).await?;
        create_test_sale(&db, store.id, Some(product.id), None, 5.0, date(2024, 3, 10)).await?;
        let app = test_app(db);

        let uri = "/store-performance?start_date=2024-01-01&end_date=2024-01-31";
        let (status, body) = send(app.clone(), get_request(uri)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "store_sales": [
                    { "store_name": "Main Street Store", "total_sales": 15.0 }
                ],
                "product_sales": [
                    {
                        "store_name": "Main Street Store",
                        "product_name": "Test Product",
                        "total_sales": 15.0
                    }
                ]
            })
        );

        let (status, body) = send(app.clone(), get_request("/store-performance?start_date=&end_date=")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["store_sales"][0]["total_sales"], 20.0);

        let (status, body) =
            send(app, get_request("/store-performance?start_date=January")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("January"));

        Ok(())
    }
}
