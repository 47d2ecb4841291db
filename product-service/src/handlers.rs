//! Handler模块

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::error;
use utoipa::ToSchema;

use common::errors::AppError;
use common::models::Product;

use crate::state::AppState;

/// 查询产品列表
///
/// 数据库错误只在此处捕获一次：记录日志并返回空列表，状态码保持 200。
/// 令牌获取失败不在捕获范围内，直接向上传播。
#[utoipa::path(
    get,
    path = "/api/products",
    tag = "products",
    responses(
        (status = 200, description = "产品列表（查询失败时为空列表）", body = Vec<Product>),
        (status = 500, description = "令牌获取失败")
    )
)]
pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<Product>>, AppError> {
    let token = state
        .token_provider
        .get_token(&state.config.token_resource)
        .await?;

    let mut products = Vec::new();
    match state.catalog.fetch_products(&token).await {
        Ok(found) => products = found,
        Err(e) => error!(error = %e, "产品查询失败"),
    }

    Ok(Json(products))
}

/// 健康检查端点
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "health",
    responses(
        (status = 200, description = "服务运行正常", body = HealthResponse)
    )
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "product-service".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
    })
}

/// 健康检查响应
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    /// 服务状态
    pub status: String,
    /// 服务名称
    pub service: String,
    /// 服务版本
    pub version: String,
    /// 当前时间戳
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use common::config::AppConfig;
    use common::errors::AppResult;

    use crate::service::ProductCatalog;
    use crate::token::{CredentialSource, TokenProvider};

    /// Issues a fresh numbered token on every call.
    struct CountingSource {
        calls: AtomicUsize,
    }

    impl CountingSource {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl CredentialSource for CountingSource {
        async fn access_token(&self, _scopes: &[&str]) -> AppResult<String> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(format!("token-{}", n))
        }
    }

    struct FailingSource;

    #[async_trait]
    impl CredentialSource for FailingSource {
        async fn access_token(&self, _scopes: &[&str]) -> AppResult<String> {
            Err(AppError::TokenAcquisition(
                "identity provider unreachable".into(),
            ))
        }
    }

    /// Returns a fixed product list and records the tokens it was handed.
    struct StubCatalog {
        products: Vec<Product>,
        tokens_seen: Mutex<Vec<String>>,
    }

    impl StubCatalog {
        fn with_products(products: Vec<Product>) -> Self {
            Self {
                products,
                tokens_seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ProductCatalog for StubCatalog {
        async fn fetch_products(&self, token: &str) -> AppResult<Vec<Product>> {
            self.tokens_seen.lock().unwrap().push(token.to_string());
            Ok(self.products.clone())
        }
    }

    struct FailingCatalog;

    #[async_trait]
    impl ProductCatalog for FailingCatalog {
        async fn fetch_products(&self, _token: &str) -> AppResult<Vec<Product>> {
            Err(AppError::DatabaseConnection("connection timed out".into()))
        }
    }

    fn test_state(
        source: Arc<dyn CredentialSource>,
        catalog: Arc<dyn ProductCatalog>,
    ) -> AppState {
        AppState {
            config: AppConfig::load_with_service("product-service"),
            token_provider: Arc::new(TokenProvider::new(source)),
            catalog,
        }
    }

    fn app(state: AppState) -> axum::Router {
        crate::routes::router().with_state(state)
    }

    async fn get_body(response: axum::response::Response) -> axum::body::Bytes {
        response.into_body().collect().await.unwrap().to_bytes()
    }

    fn products_request() -> Request<Body> {
        Request::builder()
            .uri("/api/products")
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn returns_rows_in_cursor_order() {
        let catalog = Arc::new(StubCatalog::with_products(vec![
            Product::new("Widget", "W-100"),
            Product::new("Gadget", "G-200"),
        ]));
        let state = test_state(Arc::new(CountingSource::new()), catalog);

        let response = app(state).oneshot(products_request()).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = get_body(response).await;
        assert_eq!(
            &body[..],
            br#"[{"name":"Widget","productNumber":"W-100"},{"name":"Gadget","productNumber":"G-200"}]"#
        );
    }

    #[tokio::test]
    async fn empty_result_is_an_empty_array() {
        let catalog = Arc::new(StubCatalog::with_products(Vec::new()));
        let state = test_state(Arc::new(CountingSource::new()), catalog);

        let response = app(state).oneshot(products_request()).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = get_body(response).await;
        assert_eq!(&body[..], b"[]");
    }

    #[tokio::test]
    async fn database_failure_still_returns_ok_with_empty_body() {
        let state = test_state(Arc::new(CountingSource::new()), Arc::new(FailingCatalog));

        let response = app(state).oneshot(products_request()).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = get_body(response).await;
        assert_eq!(&body[..], b"[]");
    }

    #[tokio::test]
    async fn each_request_acquires_a_fresh_token() {
        let source = Arc::new(CountingSource::new());
        let catalog = Arc::new(StubCatalog::with_products(Vec::new()));
        let state = test_state(source.clone(), catalog.clone());
        let app = app(state);

        app.clone().oneshot(products_request()).await.unwrap();
        app.oneshot(products_request()).await.unwrap();

        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
        let tokens = catalog.tokens_seen.lock().unwrap();
        assert_eq!(tokens.as_slice(), ["token-1", "token-2"]);
    }

    #[tokio::test]
    async fn token_failure_is_not_swallowed() {
        let catalog = Arc::new(StubCatalog::with_products(Vec::new()));
        let state = test_state(Arc::new(FailingSource), catalog);

        let response = app(state).oneshot(products_request()).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = get_body(response).await;
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["code"], "TOKEN_ACQUISITION_FAILED");
    }

    #[tokio::test]
    async fn health_endpoint_reports_healthy() {
        let catalog = Arc::new(StubCatalog::with_products(Vec::new()));
        let state = test_state(Arc::new(CountingSource::new()), catalog);

        let response = app(state)
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = get_body(response).await;
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["service"], "product-service");
    }
}
