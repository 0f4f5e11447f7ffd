//! HTTP presentation layer for Espresso Emporium
//!
//! Serves the REST API over an [`Emporium`] service. The store behind the
//! service is chosen by the binary; handlers only ever see the service.

use axum::{
    http::StatusCode,
    middleware::from_fn,
    response::Json,
    routing::get,
    Router,
};
use espresso_core::prelude::*;
use std::future::Future;
use std::net::SocketAddr;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, warn};

pub mod config;
mod extract;
mod handlers;
mod middleware;
mod models;

pub use config::{ServerConfig, StorageBackend, StorageConfig};
pub use extract::{JsonBody, MessageQuery, PathId, RequesterId, TokenPath};
pub use models::*;

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct HttpServerConfig {
    /// Server bind address
    pub bind_address: SocketAddr,
    /// Enable CORS
    pub enable_cors: bool,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([0, 0, 0, 0], 3000)),
            enable_cors: true,
        }
    }
}

/// HTTP presentation adapter
pub struct HttpServer {
    config: HttpServerConfig,
}

impl HttpServer {
    /// Create a new HTTP server
    pub fn new(config: HttpServerConfig) -> Self {
        Self { config }
    }

    /// Build the Axum router with all routes
    pub fn build_router(&self, emporium: Emporium) -> Router {
        let app_state = AppState {
            emporium,
            config: self.config.clone(),
        };

        let mut router = Router::new()
            .route("/", get(handlers::health::hello))
            .route("/health", get(handlers::health::health_check))

            // Users
            .route("/users", get(handlers::users::list_users).post(handlers::users::register_user))
            .route(
                "/users/:id",
                get(handlers::users::get_user)
                    .put(handlers::users::update_user)
                    .delete(handlers::users::delete_user),
            )

            // Products
            .route("/products", get(handlers::products::list_products).post(handlers::products::create_product))
            .route(
                "/products/:id",
                get(handlers::products::get_product)
                    .put(handlers::products::update_product)
                    .delete(handlers::products::delete_product),
            )

            // Cart
            .route("/cart", axum::routing::post(handlers::cart::add_cart_item))
            .route(
                "/cart/:id",
                get(handlers::cart::list_cart_items).delete(handlers::cart::delete_cart_item),
            )

            // Reviews
            .route("/reviews", axum::routing::post(handlers::reviews::create_review))
            .route(
                "/reviews/:id",
                get(handlers::reviews::list_reviews).delete(handlers::reviews::delete_review),
            )

            // Admin
            .route("/admin/stats", get(handlers::admin::stats))

            .with_state(app_state);

        // Add middleware
        let service_builder = ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(from_fn(middleware::request_logging));

        if self.config.enable_cors {
            router = router.layer(CorsLayer::permissive());
        }

        router.layer(service_builder)
    }

    /// Bind and serve until `shutdown` resolves
    pub async fn serve<F>(&self, emporium: Emporium, shutdown: F) -> Result<(), CoreError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        info!("Starting HTTP server on {}", self.config.bind_address);

        let router = self.build_router(emporium);

        let listener = tokio::net::TcpListener::bind(&self.config.bind_address)
            .await
            .map_err(|e| CoreError::Configuration(format!("Failed to bind to {}: {}", self.config.bind_address, e)))?;

        info!("Espresso Emporium listening on {}", self.config.bind_address);

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| CoreError::Internal(format!("Server error: {}", e)))?;

        info!("HTTP server stopped");
        Ok(())
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub emporium: Emporium,
    pub config: HttpServerConfig,
}

/// Error half of every handler's result
pub type ApiError = (StatusCode, Json<MessageResponse>);

pub const INVALID_ID: &str = "Invalid ID";
pub const INVALID_BODY: &str = "Invalid request format";
pub const INVALID_QUERY: &str = "Invalid query parameters";
pub const INVALID_PATH: &str = "Invalid path";
pub const INTERNAL_ERROR: &str = "Internal server error";

/// Convert core errors to HTTP status codes and responses
pub fn handle_core_error(error: CoreError) -> ApiError {
    let (status, message) = match error {
        CoreError::InvalidId(raw) => {
            warn!("Rejected malformed identifier {:?}", raw);
            (StatusCode::BAD_REQUEST, INVALID_ID.to_string())
        }
        CoreError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
        CoreError::Serialization(e) => {
            warn!("Invalid request body: {}", e);
            (StatusCode::BAD_REQUEST, INVALID_BODY.to_string())
        }
        CoreError::Storage(e) => {
            error!("Storage failure: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR.to_string())
        }
        CoreError::Configuration(msg) | CoreError::Internal(msg) => {
            error!("Internal failure: {}", msg);
            (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR.to_string())
        }
    };

    (status, Json(MessageResponse::new(message)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request};
    use espresso_adapter_in_memory::InMemoryStore;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app() -> (Router, Emporium) {
        let emporium = Emporium::new(Arc::new(InMemoryStore::new()));
        let router = HttpServer::new(HttpServerConfig::default()).build_router(emporium.clone());
        (router, emporium)
    }

    async fn send(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
        (status, value)
    }

    async fn create(router: &Router, uri: &str, body: Value) -> String {
        let (status, value) = send(router, Method::POST, uri, Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);
        value["insertedId"].as_str().unwrap().to_string()
    }

    #[test]
    fn test_config_default() {
        let config = HttpServerConfig::default();
        assert_eq!(config.bind_address.port(), 3000);
        assert!(config.enable_cors);
    }

    #[test]
    fn test_error_mapping() {
        let (status, Json(body)) = handle_core_error(CoreError::InvalidId("x".into()));
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.message, INVALID_ID);

        let (status, _) = handle_core_error(CoreError::NotFound("Review not found".into()));
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = handle_core_error(CoreError::Forbidden("Unauthorized".into()));
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, Json(body)) = handle_core_error(CoreError::Storage(StoreError::ConnectionFailed("down".into())));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.message, INTERNAL_ERROR);
    }

    #[tokio::test]
    async fn test_root_says_hello() {
        let (router, _) = app();
        let (status, body) = send(&router, Method::GET, "/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!("Hello World!"));
    }

    #[tokio::test]
    async fn test_health() {
        let (router, _) = app();
        let (status, body) = send(&router, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], json!("healthy"));
    }

    #[tokio::test]
    async fn test_register_user_twice() {
        let (router, emporium) = app();
        let user = json!({"email": "ann@x.com", "name": "Ann", "role": "Buyer"});

        let (status, body) = send(&router, Method::POST, "/users", Some(user.clone())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["acknowledged"], json!(true));

        let (status, body) = send(&router, Method::POST, "/users", Some(user)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"message": "User already exists"}));

        assert_eq!(emporium.store().count(Collection::Users, Filter::All).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_get_user_by_id_or_email() {
        let (router, _) = app();
        let id = create(&router, "/users", json!({"email": "ann@x.com", "name": "Ann"})).await;

        let (status, body) = send(&router, Method::GET, &format!("/users/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["_id"], json!(id));

        let (status, body) = send(&router, Method::GET, "/users/ann@x.com", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], json!("Ann"));

        let (status, body) = send(&router, Method::GET, "/users/nobody@x.com", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"message": "User not found"}));
    }

    #[tokio::test]
    async fn test_list_users_with_filters() {
        let (router, _) = app();
        create(&router, "/users", json!({"email": "a@x.com", "name": "Ann", "role": "Buyer"})).await;
        create(&router, "/users", json!({"email": "b@x.com", "name": "Bob", "role": "Seller"})).await;

        let (status, body) = send(&router, Method::GET, "/users?role=Seller", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["name"], json!("Bob"));

        let (_, body) = send(&router, Method::GET, "/users?search=an", None).await;
        assert_eq!(body.as_array().unwrap().len(), 1);

        let (_, body) = send(&router, Method::GET, "/users", None).await;
        assert_eq!(body.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_update_and_delete_user() {
        let (router, _) = app();
        let id = create(&router, "/users", json!({"email": "a@x.com", "name": "Ann"})).await;

        let (status, body) = send(&router, Method::PUT, &format!("/users/{}", id), Some(json!({"name": "Anna"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["matchedCount"], json!(1));
        assert_eq!(body["modifiedCount"], json!(1));

        let (status, body) = send(&router, Method::DELETE, &format!("/users/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"acknowledged": true, "deletedCount": 1}));

        let (status, body) = send(&router, Method::DELETE, &format!("/users/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["deletedCount"], json!(0));
    }

    #[tokio::test]
    async fn test_malformed_ids_are_rejected() {
        let (router, _) = app();
        for (method, uri, body) in [
            (Method::PUT, "/users/not-an-id", Some(json!({"name": "x"}))),
            (Method::DELETE, "/users/not-an-id", None),
            (Method::GET, "/products/not-an-id", None),
            (Method::PUT, "/products/123", Some(json!({"name": "x"}))),
            (Method::DELETE, "/products/123", None),
            (Method::DELETE, "/cart/zzzzzzzzzzzzzzzzzzzzzzzz", None),
        ] {
            let (status, value) = send(&router, method, uri, body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
            assert_eq!(value, json!({"message": "Invalid ID"}));
        }
    }

    #[tokio::test]
    async fn test_product_search_and_lookup() {
        let (router, _) = app();
        let mocha = create(&router, "/products", json!({"name": "Mocha Magic", "company": "Beans"})).await;
        create(&router, "/products", json!({"name": "Flat White", "company": "MOCHA Inc"})).await;
        create(&router, "/products", json!({"name": "Latte", "company": "Milk"})).await;

        let (status, body) = send(&router, Method::GET, "/products?search=mocha", None).await;
        assert_eq!(status, StatusCode::OK);
        let names: Vec<_> = body.as_array().unwrap().iter().map(|p| p["name"].clone()).collect();
        assert_eq!(names, vec![json!("Mocha Magic"), json!("Flat White")]);

        let (status, body) = send(&router, Method::GET, &format!("/products/{}", mocha), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["company"], json!("Beans"));

        let missing = DocumentId::new().to_hex();
        let (status, body) = send(&router, Method::GET, &format!("/products/{}", missing), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"message": "Product not found"}));
    }

    #[tokio::test]
    async fn test_cart_flow() {
        let (router, _) = app();
        let item = create(&router, "/cart", json!({"buyerId": "u1", "productId": "p1", "quantity": 2})).await;
        create(&router, "/cart", json!({"buyerId": "u2", "productId": "p1", "quantity": 1})).await;

        let (status, body) = send(&router, Method::GET, "/cart/u1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);

        let (_, body) = send(&router, Method::DELETE, &format!("/cart/{}", item), None).await;
        assert_eq!(body["deletedCount"], json!(1));

        let missing = DocumentId::new().to_hex();
        let (status, body) = send(&router, Method::DELETE, &format!("/cart/{}", missing), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["deletedCount"], json!(0));
    }

    #[tokio::test]
    async fn test_review_deletion_rules() {
        let (router, _) = app();
        let product = create(&router, "/products", json!({"name": "Mocha", "sellerEmail": "a@x.com"})).await;
        let buyer = create(&router, "/users", json!({"email": "b@x.com", "role": "Buyer"})).await;
        let seller = create(&router, "/users", json!({"email": "a@x.com", "role": "Seller"})).await;
        let admin = create(&router, "/users", json!({"email": "root@x.com", "role": "Admin"})).await;

        let first = create(&router, "/reviews", json!({"coffeeId": product, "rating": 4})).await;
        let second = create(&router, "/reviews", json!({"coffeeId": product, "rating": 2})).await;

        let (status, body) = send(&router, Method::GET, &format!("/reviews/{}", product), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 2);
        assert!(body[0]["createdAt"].is_string());

        // Invalid ids are rejected before any lookup
        let (status, body) = send(&router, Method::DELETE, &format!("/reviews/bad?requesterId={}", admin), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"message": "Invalid ID"}));
        let (status, _) = send(&router, Method::DELETE, &format!("/reviews/{}", first), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(&router, Method::DELETE, &format!("/reviews/{}?requesterId={}", first, buyer), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["message"], json!("Permission denied: Only Admin or Seller can delete this review"));

        let stranger = DocumentId::new().to_hex();
        let (status, body) = send(&router, Method::DELETE, &format!("/reviews/{}?requesterId={}", first, stranger), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body, json!({"message": "Unauthorized"}));

        let (status, body) = send(&router, Method::DELETE, &format!("/reviews/{}?requesterId={}", first, seller), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], json!("Review deleted successfully"));
        assert_eq!(body["result"]["deletedCount"], json!(1));

        let (status, _) = send(&router, Method::DELETE, &format!("/reviews/{}?requesterId={}", second, admin), None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&router, Method::DELETE, &format!("/reviews/{}?requesterId={}", second, admin), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"message": "Review not found"}));
    }

    #[tokio::test]
    async fn test_review_of_deleted_product() {
        let (router, _) = app();
        let product = create(&router, "/products", json!({"name": "Gone", "sellerEmail": "a@x.com"})).await;
        let admin = create(&router, "/users", json!({"email": "root@x.com", "role": "Admin"})).await;
        let review = create(&router, "/reviews", json!({"coffeeId": product})).await;

        send(&router, Method::DELETE, &format!("/products/{}", product), None).await;

        let (status, body) = send(&router, Method::DELETE, &format!("/reviews/{}?requesterId={}", review, admin), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"message": "Coffee not found"}));
    }

    #[tokio::test]
    async fn test_admin_stats() {
        let (router, _) = app();
        create(&router, "/users", json!({"email": "1@x.com", "role": "Buyer"})).await;
        create(&router, "/users", json!({"email": "2@x.com", "role": "Buyer"})).await;
        create(&router, "/users", json!({"email": "3@x.com", "role": "Seller"})).await;
        create(&router, "/products", json!({"name": "Mocha"})).await;

        let (status, body) = send(&router, Method::GET, "/admin/stats", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"totalBuyers": 2, "totalSellers": 1, "totalProducts": 1, "totalReviews": 0})
        );
    }

    #[tokio::test]
    async fn test_non_object_body_is_rejected() {
        let (router, _) = app();
        let (status, body) = send(&router, Method::POST, "/products", Some(json!([1, 2, 3]))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"message": "Invalid request format"}));

        let (status, _) = send(&router, Method::GET, "/products", None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_malformed_requests_get_message_bodies() {
        let (router, _) = app();
        let product = create(&router, "/products", json!({"name": "Mocha", "sellerEmail": "a@x.com"})).await;
        let admin = create(&router, "/users", json!({"email": "root@x.com", "role": "Admin"})).await;
        let review = create(&router, "/reviews", json!({"coffeeId": product})).await;

        let uri = format!("/reviews/{}?requesterId={}&requesterId={}", review, admin, admin);
        let (status, body) = send(&router, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"message": "Invalid ID"}));

        let (status, body) = send(&router, Method::GET, "/users?role=Buyer&role=Seller", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"message": "Invalid query parameters"}));

        let (status, body) = send(&router, Method::GET, "/products?search=a&search=b", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"message": "Invalid query parameters"}));

        for uri in ["/users/%FF", "/cart/%FF", "/reviews/%FF"] {
            let (status, body) = send(&router, Method::GET, uri, None).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(body, json!({"message": "Invalid path"}), "{uri}");
        }

        // The review survives every rejected request
        let (status, body) = send(&router, Method::GET, &format!("/reviews/{}", product), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);
    }
}
