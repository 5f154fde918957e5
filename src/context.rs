use std::sync::Arc;

use crate::config::AppConfig;
use crate::domain::assets::AssetResolver;
use crate::services::TicketSource;

#[derive(Clone)]
pub struct AppContext {
    pub config: AppConfig,
    pub ticket_source: Arc<dyn TicketSource>,
    pub assets: AssetResolver,
}

impl AppContext {
    pub fn new(config: AppConfig, ticket_source: Arc<dyn TicketSource>) -> Self {
        let assets = AssetResolver::new(config.asset_root.clone());
        Self {
            config,
            ticket_source,
            assets,
        }
    }
}
