use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::sync::Arc;

use tokio::sync::watch;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::application::notification::queue::NotificationQueue;
use crate::application::product::messages;
use crate::domain::logger::Logger;
use crate::domain::product::errors::ProductError;
use crate::domain::product::model::Product;
use crate::domain::product::repository::ProductRepository;
use crate::domain::shared::value_objects::ProductId;

/// Rows per page offered by the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageSize {
    #[default]
    Five,
    Ten,
    Twenty,
}

impl PageSize {
    pub const ALL: [PageSize; 3] = [PageSize::Five, PageSize::Ten, PageSize::Twenty];

    pub fn rows(self) -> usize {
        match self {
            PageSize::Five => 5,
            PageSize::Ten => 10,
            PageSize::Twenty => 20,
        }
    }
}

impl TryFrom<usize> for PageSize {
    type Error = String;

    fn try_from(rows: usize) -> Result<Self, Self::Error> {
        PageSize::ALL
            .into_iter()
            .find(|size| size.rows() == rows)
            .ok_or_else(|| format!("Invalid page size: {}", rows))
    }
}

/// Lowercase with diacritics stripped, so "Ícono" sorts with the "i" names.
fn collation_key(value: &str) -> String {
    value
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

/// Accent- and case-insensitive ordering, ties broken by the raw text.
fn locale_cmp(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.cmp(b))
}

/// Snapshot of the list screen. Replaced as a whole on every transition.
#[derive(Debug, Clone)]
pub struct ListViewState {
    pub products: Arc<Vec<Product>>,
    pub search: Option<String>,
    pub page_size: PageSize,
    /// 1-based.
    pub page: usize,
    pub pending_delete: Option<Product>,
    pub deleting: BTreeSet<ProductId>,
    pub fetching: bool,
}

impl Default for ListViewState {
    fn default() -> Self {
        Self {
            products: Arc::new(Vec::new()),
            search: None,
            page_size: PageSize::default(),
            page: 1,
            pending_delete: None,
            deleting: BTreeSet::new(),
            fetching: false,
        }
    }
}

/// One rendered page of the filtered list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductPage {
    pub items: Vec<Product>,
    pub page: usize,
    pub page_count: usize,
    pub total: usize,
    pub page_size: PageSize,
}

impl ListViewState {
    pub fn filtered(&self) -> Vec<&Product> {
        match self.search.as_deref() {
            None => self.products.iter().collect(),
            Some(term) => {
                let term = term.to_lowercase();
                self.products
                    .iter()
                    .filter(|product| product.name.to_lowercase().contains(&term))
                    .collect()
            }
        }
    }

    pub fn page_count(&self) -> usize {
        self.filtered().len().div_ceil(self.page_size.rows()).max(1)
    }

    pub fn view(&self) -> ProductPage {
        let filtered = self.filtered();
        let rows = self.page_size.rows();
        let page_count = filtered.len().div_ceil(rows).max(1);
        let page = self.page.clamp(1, page_count);
        let items = filtered
            .iter()
            .skip((page - 1) * rows)
            .take(rows)
            .map(|product| (*product).clone())
            .collect();

        ProductPage {
            items,
            page,
            page_count,
            total: filtered.len(),
            page_size: self.page_size,
        }
    }
}

/// Search, pagination and delete confirmation for the product list.
///
/// Only one product can wait for confirmation, but several deletions may be
/// in flight at once.
pub struct ProductListController {
    repository: Arc<dyn ProductRepository>,
    notifications: NotificationQueue,
    logger: Arc<dyn Logger>,
    state: watch::Sender<Arc<ListViewState>>,
}

impl ProductListController {
    pub fn new(
        repository: Arc<dyn ProductRepository>,
        notifications: NotificationQueue,
        logger: Arc<dyn Logger>,
        page_size: PageSize,
    ) -> Self {
        let initial = ListViewState {
            page_size,
            ..ListViewState::default()
        };
        let (state, _) = watch::channel(Arc::new(initial));
        Self {
            repository,
            notifications,
            logger,
            state,
        }
    }

    fn transition(&self, apply: impl FnOnce(&mut ListViewState)) {
        self.state.send_modify(|current| {
            let mut next = (**current).clone();
            apply(&mut next);
            *current = Arc::new(next);
        });
    }

    pub fn state(&self) -> Arc<ListViewState> {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<ListViewState>> {
        self.state.subscribe()
    }

    pub fn view(&self) -> ProductPage {
        self.state().view()
    }

    pub fn is_fetching(&self) -> bool {
        self.state().fetching
    }

    pub fn is_deleting(&self, id: &ProductId) -> bool {
        self.state().deleting.contains(id)
    }

    pub fn pending_delete(&self) -> Option<Product> {
        self.state().pending_delete.clone()
    }

    /// Replaces the collection with a fresh, name-sorted copy. On failure the
    /// previous collection stays.
    pub async fn load(&self) -> Result<(), ProductError> {
        self.transition(|state| state.fetching = true);
        self.logger.info("Fetching product list");

        match self.repository.get_all().await {
            Ok(mut products) => {
                products.sort_by(|a, b| locale_cmp(&a.name, &b.name));
                self.logger
                    .info(&format!("Loaded {} products", products.len()));
                self.transition(|state| {
                    state.products = Arc::new(products);
                    state.fetching = false;
                });
                Ok(())
            }
            Err(e) => {
                self.logger
                    .error(&format!("Failed to fetch product list: {}", e));
                self.transition(|state| state.fetching = false);
                Err(e.into())
            }
        }
    }

    /// Sets the name filter and returns to the first page. Empty means none.
    pub fn search(&self, term: Option<String>) {
        let term = term.filter(|term| !term.is_empty());
        self.transition(|state| {
            state.search = term;
            state.page = 1;
        });
    }

    pub fn set_page_size(&self, page_size: PageSize) {
        self.transition(|state| {
            state.page_size = page_size;
            state.page = state.page.clamp(1, state.page_count());
        });
    }

    pub fn set_page(&self, page: usize) {
        self.transition(|state| state.page = page.clamp(1, state.page_count()));
    }

    pub fn next_page(&self) {
        let page = self.state().page.saturating_add(1);
        self.set_page(page);
    }

    pub fn previous_page(&self) {
        let page = self.state().page.saturating_sub(1);
        self.set_page(page);
    }

    /// Stages a product for confirmation; unknown ids clear the stage.
    pub fn request_delete(&self, id: &ProductId) {
        self.transition(|state| {
            state.pending_delete = state
                .products
                .iter()
                .find(|product| &product.id == id)
                .cloned();
        });
    }

    pub fn cancel_delete(&self) {
        self.transition(|state| state.pending_delete = None);
    }

    /// Deletes the staged product. Does nothing when nothing is staged or
    /// when that product is already being deleted.
    ///
    /// On failure the staged product is kept so the user can retry.
    pub async fn confirm_delete(&self) -> Result<(), ProductError> {
        let Some(product) = self.pending_delete() else {
            return Ok(());
        };
        let id = product.id.clone();

        let mut in_flight = false;
        self.transition(|state| {
            in_flight = !state.deleting.insert(id.clone());
        });
        if in_flight {
            self.logger
                .debug(&format!("Delete of {} already in flight", id));
            return Ok(());
        }
        self.logger.info(&format!("Deleting product: {}", id));

        match self.repository.delete(&id).await {
            Ok(()) => {
                self.transition(|state| {
                    if state
                        .pending_delete
                        .as_ref()
                        .is_some_and(|pending| pending.id == id)
                    {
                        state.pending_delete = None;
                    }
                    state.deleting.remove(&id);
                });
                self.logger.info(&format!("Product deleted: {}", id));
                if self.load().await.is_err() {
                    self.logger
                        .warn("Product list could not be refreshed after delete");
                }
                self.notifications.success(messages::deleted(&product.name));
                Ok(())
            }
            Err(e) => {
                let error = ProductError::from(e);
                self.logger
                    .error(&format!("Failed to delete product {}: {}", id, error));
                self.transition(|state| {
                    state.deleting.remove(&id);
                });
                self.notifications.error(messages::delete_failed(&error));
                Err(error)
            }
        }
    }
}
