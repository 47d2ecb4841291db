//! 产品查询服务模块
//!
//! 每次请求打开一条数据库连接，执行固定查询并按游标顺序读出产品行。

use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::{Connection, Row};

use common::errors::{AppError, AppResult};
use common::models::Product;

/// 发送到数据库的固定查询语句，无参数、无排序子句
pub const PRODUCT_QUERY: &str = "select Name, ProductNumber from SalesLT.Product";

/// 产品目录 Trait
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// 使用给定的访问令牌查询完整产品列表
    async fn fetch_products(&self, token: &str) -> AppResult<Vec<Product>>;
}

/// 基于 northwind 数据库的产品查询服务
pub struct ProductService {
    connection_string: String,
}

impl ProductService {
    /// 创建新的产品查询服务实例
    pub fn new(connection_string: String) -> Self {
        Self { connection_string }
    }

    /// 执行固定查询并逐行读出产品
    async fn read_products(conn: &mut PgConnection) -> AppResult<Vec<Product>> {
        let rows = sqlx::query(PRODUCT_QUERY)
            .fetch_all(conn)
            .await
            .map_err(|e| AppError::DatabaseQuery(e.to_string()))?;

        let mut products = Vec::with_capacity(rows.len());
        for row in &rows {
            // 两列都必须是文本类型，类型不符视为致命读取错误
            let name: String = row
                .try_get(0)
                .map_err(|e| AppError::DatabaseQuery(e.to_string()))?;
            let product_number: String = row
                .try_get(1)
                .map_err(|e| AppError::DatabaseQuery(e.to_string()))?;
            products.push(Product {
                name,
                product_number,
            });
        }
        Ok(products)
    }
}

#[async_trait]
impl ProductCatalog for ProductService {
    async fn fetch_products(&self, token: &str) -> AppResult<Vec<Product>> {
        // 连接串只含服务器与数据库，凭据以访问令牌形式在此附加
        let options: PgConnectOptions = self
            .connection_string
            .parse()
            .map_err(|e: sqlx::Error| AppError::DatabaseConnection(e.to_string()))?;
        let options = options.password(token);

        let mut conn = PgConnection::connect_with(&options)
            .await
            .map_err(|e| AppError::DatabaseConnection(e.to_string()))?;

        let result = Self::read_products(&mut conn).await;

        // 成功、空结果或出错都要关闭连接
        if let Err(e) = conn.close().await {
            tracing::warn!(error = %e, "关闭数据库连接失败");
        }

        result
    }
}
