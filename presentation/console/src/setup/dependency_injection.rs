use std::sync::Arc;

use anyhow::Context;

use logger::TracingLogger;

use api_client::client::ApiClient;
use api_client::product::repository::ProductRepositoryApi;
use api_client::product::verification::IdVerificationApi;

use business::application::notification::queue::NotificationQueue;
use business::application::product::form::{FormSettings, ProductFormController};
use business::application::product::id_availability::IdAvailabilityValidator;
use business::application::product::list::ProductListController;
use business::application::product::search::SearchDebouncer;
use business::domain::logger::Logger;
use business::domain::product::repository::ProductRepository;
use business::domain::shared::dates::DateEngine;

use crate::config::app_config::AppConfig;
use crate::console::navigator::ConsoleNavigator;

pub struct DependencyContainer {
    pub repository: Arc<dyn ProductRepository>,
    pub notifications: NotificationQueue,
    pub list: Arc<ProductListController>,
    pub search: SearchDebouncer,
    pub navigator: Arc<ConsoleNavigator>,
    pub engine: DateEngine,
    id_validator: IdAvailabilityValidator,
    form_settings: FormSettings,
    logger: Arc<dyn Logger>,
}

impl DependencyContainer {
    pub fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let logger: Arc<dyn Logger> = Arc::new(TracingLogger);
        let engine = DateEngine::new(config.ui.date_priority.clone());

        // Infrastructure adapters
        let api = ApiClient::new(config.api.base_url.clone(), config.api.timeout)
            .context("Failed to build the products API client")?;
        let repository: Arc<dyn ProductRepository> =
            Arc::new(ProductRepositoryApi::new(api.clone(), engine.clone()));
        let verification = Arc::new(IdVerificationApi::new(api));

        // Shared screen state
        let notifications = NotificationQueue::new(config.ui.toast_duration);
        let list = Arc::new(ProductListController::new(
            repository.clone(),
            notifications.clone(),
            logger.clone(),
            config.ui.page_size,
        ));
        let search = SearchDebouncer::new(list.clone(), config.ui.search_delay);
        let id_validator =
            IdAvailabilityValidator::new(verification, logger.clone(), config.ui.id_check_delay);

        let form_settings = FormSettings {
            engine: engine.clone(),
            display_format: config.ui.display_format,
            min_release_date: None,
            release_format: config.ui.release_format,
        };

        Ok(Self {
            repository,
            notifications,
            list,
            search,
            navigator: Arc::new(ConsoleNavigator::default()),
            engine,
            id_validator,
            form_settings,
            logger,
        })
    }

    /// A fresh create/edit form; each screen visit gets its own.
    pub fn product_form(&self) -> ProductFormController {
        ProductFormController::new(
            self.repository.clone(),
            self.id_validator.clone(),
            self.notifications.clone(),
            self.navigator.clone(),
            self.logger.clone(),
            self.form_settings.clone(),
        )
    }
}
