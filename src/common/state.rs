use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::avimex::AvimexClient;
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<Config>,
    pub avimex_client: Arc<AvimexClient>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: Config, avimex_client: AvimexClient) -> Self {
        Self {
            db,
            config: Arc::new(config),
            avimex_client: Arc::new(avimex_client),
        }
    }
}
