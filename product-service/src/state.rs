//! Application state for product service.

use std::sync::Arc;

use common::config::AppConfig;
use common::errors::AppResult;

use crate::service::{ProductCatalog, ProductService};
use crate::token::{AzureCredentialSource, TokenProvider};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub token_provider: Arc<TokenProvider>,
    pub catalog: Arc<dyn ProductCatalog>,
}

impl AppState {
    /// Creates a new application state backed by the Azure credential chain.
    pub fn new(config: AppConfig) -> AppResult<Self> {
        let source = Arc::new(AzureCredentialSource::from_environment()?);
        let token_provider = Arc::new(TokenProvider::new(source));
        let catalog: Arc<dyn ProductCatalog> =
            Arc::new(ProductService::new(config.northwind_url.clone()));

        Ok(Self {
            config,
            token_provider,
            catalog,
        })
    }
}
