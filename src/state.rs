//! Application State
//!
//! Wires the concrete collaborators described by the configuration into a
//! router, a SQL executor and a request store.

use std::sync::Arc;

use sales_assistant_core::NoticeSink;
use sales_assistant_geo::{GeocoderAdapter, HereClient, RouteResolver};
use sales_assistant_llm::{
    build_http_client, AddressExtractor, CompletionProvider, CortexAgentProvider,
};

use crate::models::settings::AppConfig;
use crate::services::analyst::{AnalystService, AnalystTools};
use crate::services::intake::{RequestStore, SqlRequestStore};
use crate::services::router::QueryRouter;
use crate::services::sql::{SnowflakeSqlClient, SqlClientConfig, SqlExecutor};
use crate::utils::error::{AppError, AppResult};

pub struct AppState {
    router: QueryRouter,
    sql: Arc<dyn SqlExecutor>,
    requests: Arc<dyn RequestStore>,
    notices: Arc<dyn NoticeSink>,
}

impl AppState {
    /// Build every service from `config`. Notices from all of them go to `notices`.
    pub fn from_config(config: &AppConfig, notices: Arc<dyn NoticeSink>) -> AppResult<Self> {
        config.validate().map_err(AppError::validation)?;

        let provider: Arc<dyn CompletionProvider> =
            Arc::new(CortexAgentProvider::new(config.cortex.provider_config())?);
        let here_config = config.here.client_config();
        let here_http = build_http_client(here_config.timeout)?;
        let here = Arc::new(HereClient::new(here_config, here_http));

        let sql: Arc<dyn SqlExecutor> = Arc::new(SnowflakeSqlClient::new(SqlClientConfig {
            account_url: config.cortex.account_url.clone(),
            token: config.cortex.token.clone(),
            token_type: config.cortex.token_type.clone(),
            timeout: config.cortex.timeout(),
        })?);
        let requests: Arc<dyn RequestStore> =
            Arc::new(SqlRequestStore::new(sql.clone(), config.cortex.model.clone()));

        let router = QueryRouter::new(
            AddressExtractor::new(provider.clone(), notices.clone()),
            GeocoderAdapter::new(here.clone(), notices.clone()),
            RouteResolver::new(here.clone(), here),
            AnalystService::new(
                provider,
                notices.clone(),
                AnalystTools::from(&config.cortex),
            ),
            notices.clone(),
        );

        tracing::debug!("application state initialized");
        Ok(Self {
            router,
            sql,
            requests,
            notices,
        })
    }

    pub fn router(&self) -> &QueryRouter {
        &self.router
    }

    pub fn sql(&self) -> &dyn SqlExecutor {
        self.sql.as_ref()
    }

    pub fn requests(&self) -> Arc<dyn RequestStore> {
        self.requests.clone()
    }

    pub fn notices(&self) -> &dyn NoticeSink {
        self.notices.as_ref()
    }
}
