use super::{api_config::ApiConfig, ui_config::UiConfig};

pub struct AppConfig {
    pub api: ApiConfig,
    pub ui: UiConfig,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            api: ApiConfig::from_env(),
            ui: UiConfig::from_env(),
        }
    }
}
