use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use super::list::ProductListController;

pub const DEFAULT_SEARCH_DELAY: Duration = Duration::from_millis(300);

/// Debounces raw search-box input before it reaches the list.
///
/// Only the latest keystroke survives the quiet period, and a term equal to
/// the last one applied is dropped.
#[derive(Clone)]
pub struct SearchDebouncer {
    list: Arc<ProductListController>,
    delay: Duration,
    generation: Arc<AtomicU64>,
    last_applied: Arc<Mutex<Option<String>>>,
}

impl SearchDebouncer {
    pub fn new(list: Arc<ProductListController>, delay: Duration) -> Self {
        Self {
            list,
            delay,
            generation: Arc::new(AtomicU64::new(0)),
            last_applied: Arc::new(Mutex::new(None)),
        }
    }

    /// Returns true when this input ended up applied to the list.
    pub async fn input(&self, raw: &str) -> bool {
        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::time::sleep(self.delay).await;
        if self.generation.load(Ordering::SeqCst) != ticket {
            return false;
        }

        let term = Some(raw.trim().to_string()).filter(|term| !term.is_empty());
        {
            let mut last = self
                .last_applied
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            if *last == term {
                return false;
            }
            last.clone_from(&term);
        }
        self.list.search(term);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::notification::queue::NotificationQueue;
    use crate::application::product::list::PageSize;
    use crate::domain::errors::RepositoryError;
    use crate::domain::logger::Logger;
    use crate::domain::product::model::{Product, ProductUpdate};
    use crate::domain::product::repository::ProductRepository;
    use crate::domain::shared::value_objects::ProductId;
    use async_trait::async_trait;
    use mockall::mock;
    use tokio::time::sleep;

    mock! {
        pub ProductRepo {}

        #[async_trait]
        impl ProductRepository for ProductRepo {
            async fn get_all(&self) -> Result<Vec<Product>, RepositoryError>;
            async fn get_by_id(&self, id: &ProductId) -> Result<Product, RepositoryError>;
            async fn create(&self, product: &Product) -> Result<Product, RepositoryError>;
            async fn update(&self, id: &ProductId, update: &ProductUpdate) -> Result<Product, RepositoryError>;
            async fn delete(&self, id: &ProductId) -> Result<(), RepositoryError>;
        }
    }

    mock! {
        pub Log {}

        impl Logger for Log {
            fn info(&self, message: &str);
            fn warn(&self, message: &str);
            fn error(&self, message: &str);
            fn debug(&self, message: &str);
        }
    }

    fn debouncer() -> (SearchDebouncer, Arc<ProductListController>) {
        let mut logger = MockLog::new();
        logger.expect_info().returning(|_| ());
        logger.expect_debug().returning(|_| ());
        let list = Arc::new(ProductListController::new(
            Arc::new(MockProductRepo::new()),
            NotificationQueue::default(),
            Arc::new(logger),
            PageSize::Five,
        ));
        (SearchDebouncer::new(list.clone(), DEFAULT_SEARCH_DELAY), list)
    }

    #[tokio::test(start_paused = true)]
    async fn should_apply_only_latest_input_after_quiet_period() {
        let (search, list) = debouncer();

        let early = {
            let search = search.clone();
            tokio::spawn(async move { search.input("vi").await })
        };
        sleep(Duration::from_millis(100)).await;
        let applied = search.input("visa").await;

        assert!(!early.await.unwrap());
        assert!(applied);
        assert_eq!(list.state().search.as_deref(), Some("visa"));
    }

    #[tokio::test(start_paused = true)]
    async fn should_drop_repeated_term() {
        let (search, list) = debouncer();

        assert!(search.input("card").await);
        list.set_page(1);
        assert!(!search.input(" card ").await);
        assert!(search.input("").await);
        assert_eq!(list.state().search, None);
    }
}
