use std::sync::Arc;

use crate::shared::structs::config::Configuration;

pub mod config;
pub mod discord;

#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<Configuration>,
}

impl AppState {
    pub fn new(config: Configuration) -> Self {
        AppState {
            config: Arc::new(config),
        }
    }
}
