//! 令牌获取模块
//!
//! 通过 Azure AD 凭据链获取数据库访问令牌。每次请求都重新获取，
//! 不做缓存与重试，令牌有效期由身份提供方管理。

use std::sync::Arc;

use async_trait::async_trait;
use azure_core::auth::TokenCredential;

use common::errors::{AppError, AppResult};

/// 数据库令牌固定请求的资源 URI
pub const DATABASE_RESOURCE: &str = "https://database.windows.net/";

/// AAD v2 作用域形式的资源 URI
const DATABASE_SCOPE: &str = "https://database.windows.net/.default";

/// 凭据来源 Trait
///
/// 将环境凭据解析抽象为可注入能力，测试中可替换。
#[async_trait]
pub trait CredentialSource: Send + Sync {
    /// 为给定作用域请求一个访问令牌
    async fn access_token(&self, scopes: &[&str]) -> AppResult<String>;
}

/// 基于 Azure 默认凭据链的凭据来源
///
/// 凭据按托管身份、环境变量、工作负载身份等顺序解析，
/// 由 azure_identity SDK 决定。
pub struct AzureCredentialSource {
    credential: Arc<dyn TokenCredential>,
}

impl AzureCredentialSource {
    /// 从进程环境解析默认凭据链
    pub fn from_environment() -> AppResult<Self> {
        let credential = azure_identity::create_default_credential()
            .map_err(|e| AppError::TokenAcquisition(e.to_string()))?;
        Ok(Self { credential })
    }
}

#[async_trait]
impl CredentialSource for AzureCredentialSource {
    async fn access_token(&self, scopes: &[&str]) -> AppResult<String> {
        let token = self
            .credential
            .get_token(scopes)
            .await
            .map_err(|e| AppError::TokenAcquisition(e.to_string()))?;
        Ok(token.token.secret().to_string())
    }
}

/// 数据库访问令牌提供者
pub struct TokenProvider {
    source: Arc<dyn CredentialSource>,
}

impl TokenProvider {
    /// 创建新的令牌提供者
    pub fn new(source: Arc<dyn CredentialSource>) -> Self {
        Self { source }
    }

    /// 获取数据库访问令牌
    ///
    /// 作用域固定为 [`DATABASE_RESOURCE`]；传入的配置值不参与作用域选择。
    pub async fn get_token(&self, _configured_resource: &str) -> AppResult<String> {
        self.source.access_token(&[DATABASE_SCOPE]).await
    }
}
