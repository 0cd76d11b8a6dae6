use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::NaiveDate;
use tokio::runtime::Handle;

use crate::application::notification::queue::NotificationQueue;
use crate::application::product::id_availability::{IdAvailabilityValidator, IdCheck};
use crate::application::product::messages;
use crate::domain::logger::Logger;
use crate::domain::product::errors::ProductError;
use crate::domain::product::model::{NewProductProps, Product, ProductUpdate};
use crate::domain::product::repository::ProductRepository;
use crate::domain::product::services::Navigator;
use crate::domain::product::validation::{
    FieldError, ReleaseDateRule, validate_description, validate_id, validate_logo, validate_name,
};
use crate::domain::shared::dates::{DateEngine, DateFormat, DateInput, InvalidDateError};
use crate::domain::shared::value_objects::ProductId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldName {
    Id,
    Name,
    Description,
    Logo,
    DateRelease,
    DateRevision,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormField<T> {
    pub value: T,
    pub touched: bool,
    pub dirty: bool,
    pub disabled: bool,
    pub error: Option<FieldError>,
}

impl<T: Default> FormField<T> {
    fn disabled() -> Self {
        Self {
            disabled: true,
            ..Self::default()
        }
    }

    fn reset(&mut self) {
        self.value = T::default();
        self.touched = false;
        self.dirty = false;
        self.error = None;
    }

    /// Error that counts toward validity; disabled fields never block.
    fn blocking_error(&self) -> Option<&FieldError> {
        if self.disabled {
            None
        } else {
            self.error.as_ref()
        }
    }
}

/// Field values, flags and errors as rendered by the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductForm {
    pub id: FormField<String>,
    pub name: FormField<String>,
    pub description: FormField<String>,
    pub logo: FormField<String>,
    pub date_release: FormField<DateInput>,
    /// Display-only, derived from the release date.
    pub date_revision: FormField<String>,
    pub id_check_pending: bool,
}

impl Default for ProductForm {
    fn default() -> Self {
        Self {
            id: FormField::default(),
            name: FormField::default(),
            description: FormField::default(),
            logo: FormField::default(),
            date_release: FormField::default(),
            date_revision: FormField::disabled(),
            id_check_pending: false,
        }
    }
}

impl ProductForm {
    pub fn error(&self, field: FieldName) -> Option<&FieldError> {
        match field {
            FieldName::Id => self.id.error.as_ref(),
            FieldName::Name => self.name.error.as_ref(),
            FieldName::Description => self.description.error.as_ref(),
            FieldName::Logo => self.logo.error.as_ref(),
            FieldName::DateRelease => self.date_release.error.as_ref(),
            FieldName::DateRevision => self.date_revision.error.as_ref(),
        }
    }

    /// Error worth showing: only once the user has touched the field.
    pub fn visible_error(&self, field: FieldName) -> Option<&FieldError> {
        let touched = match field {
            FieldName::Id => self.id.touched,
            FieldName::Name => self.name.touched,
            FieldName::Description => self.description.touched,
            FieldName::Logo => self.logo.touched,
            FieldName::DateRelease => self.date_release.touched,
            FieldName::DateRevision => self.date_revision.touched,
        };
        if touched { self.error(field) } else { None }
    }

    pub fn is_valid(&self) -> bool {
        !self.id_check_pending
            && self.id.blocking_error().is_none()
            && self.name.blocking_error().is_none()
            && self.description.blocking_error().is_none()
            && self.logo.blocking_error().is_none()
            && self.date_release.blocking_error().is_none()
    }

    pub fn is_pristine(&self) -> bool {
        !(self.id.dirty
            || self.name.dirty
            || self.description.dirty
            || self.logo.dirty
            || self.date_release.dirty)
    }

    fn touch(&mut self, field: FieldName) {
        match field {
            FieldName::Id => self.id.touched = true,
            FieldName::Name => self.name.touched = true,
            FieldName::Description => self.description.touched = true,
            FieldName::Logo => self.logo.touched = true,
            FieldName::DateRelease => self.date_release.touched = true,
            FieldName::DateRevision => self.date_revision.touched = true,
        }
    }

    fn mark_all_touched(&mut self) {
        for field in [
            FieldName::Id,
            FieldName::Name,
            FieldName::Description,
            FieldName::Logo,
            FieldName::DateRelease,
            FieldName::DateRevision,
        ] {
            self.touch(field);
        }
    }

    fn mark_pristine(&mut self) {
        self.id.dirty = false;
        self.name.dirty = false;
        self.description.dirty = false;
        self.logo.dirty = false;
        self.date_release.dirty = false;
    }

    /// Toggles every editable field. The revision field stays disabled.
    fn set_editable(&mut self, enabled: bool) {
        self.id.disabled = !enabled;
        self.name.disabled = !enabled;
        self.description.disabled = !enabled;
        self.logo.disabled = !enabled;
        self.date_release.disabled = !enabled;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(ProductId),
}

/// Everything a view needs to render the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormView {
    pub form: ProductForm,
    pub mode: FormMode,
    pub fetching: bool,
    pub saving: bool,
}

#[derive(Debug, Clone)]
pub struct FormSettings {
    pub engine: DateEngine,
    /// Layout of the revision date shown to the user.
    pub display_format: DateFormat,
    /// Earliest accepted release date; `None` means today.
    pub min_release_date: Option<NaiveDate>,
    /// Layout typed release dates must follow; `None` accepts any known layout.
    pub release_format: Option<DateFormat>,
}

impl Default for FormSettings {
    fn default() -> Self {
        Self {
            engine: DateEngine::default(),
            display_format: DateFormat::DdMmYyyy,
            min_release_date: None,
            release_format: None,
        }
    }
}

type ReleaseObserver = Box<dyn Fn(&DateInput, &mut FormField<String>) + Send + Sync>;

struct FormState {
    form: ProductForm,
    mode: FormMode,
    fetching: bool,
    saving: bool,
    release_observers: Vec<ReleaseObserver>,
}

impl FormState {
    fn write_release(&mut self, value: DateInput) {
        self.form.date_release.value = value;
        for observer in &self.release_observers {
            observer(&self.form.date_release.value, &mut self.form.date_revision);
        }
    }
}

/// Create/edit form for a single product.
pub struct ProductFormController {
    repository: Arc<dyn ProductRepository>,
    id_validator: IdAvailabilityValidator,
    notifications: NotificationQueue,
    navigator: Arc<dyn Navigator>,
    logger: Arc<dyn Logger>,
    engine: DateEngine,
    display_format: DateFormat,
    release_rule: ReleaseDateRule,
    state: Arc<Mutex<FormState>>,
}

impl ProductFormController {
    pub fn new(
        repository: Arc<dyn ProductRepository>,
        id_validator: IdAvailabilityValidator,
        notifications: NotificationQueue,
        navigator: Arc<dyn Navigator>,
        logger: Arc<dyn Logger>,
        settings: FormSettings,
    ) -> Self {
        let release_rule = match settings.min_release_date {
            Some(min) => ReleaseDateRule::with_min_date(settings.engine.clone(), min),
            None => ReleaseDateRule::new(settings.engine.clone()),
        }
        .with_layout(settings.release_format);

        let engine = settings.engine.clone();
        let display_format = settings.display_format;
        let derive_revision: ReleaseObserver =
            Box::new(move |release: &DateInput, revision: &mut FormField<String>| {
                revision.value = engine
                    .add_years(release, 1)
                    .map(|date| engine.format_date(date, display_format))
                    .unwrap_or_default();
            });

        let mut state = FormState {
            form: ProductForm::default(),
            mode: FormMode::Create,
            fetching: false,
            saving: false,
            release_observers: vec![derive_revision],
        };
        Self::validate_all(&release_rule, &mut state.form);

        Self {
            repository,
            id_validator,
            notifications,
            navigator,
            logger,
            engine: settings.engine,
            display_format,
            release_rule,
            state: Arc::new(Mutex::new(state)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, FormState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Re-runs the synchronous rules. An `IdExists` result from the async
    /// check is kept while the id still passes the synchronous rules.
    fn validate_all(release_rule: &ReleaseDateRule, form: &mut ProductForm) {
        let id_exists = form
            .id
            .error
            .as_ref()
            .filter(|error| **error == FieldError::IdExists)
            .cloned();
        form.id.error = validate_id(&form.id.value).or(id_exists);
        form.name.error = validate_name(&form.name.value);
        form.description.error = validate_description(&form.description.value);
        form.logo.error = validate_logo(&form.logo.value);
        form.date_release.error = release_rule.validate(&form.date_release.value);
        form.date_revision.error = form
            .date_revision
            .value
            .is_empty()
            .then_some(FieldError::Required);
    }

    pub fn view(&self) -> FormView {
        let state = self.lock();
        FormView {
            form: state.form.clone(),
            mode: state.mode.clone(),
            fetching: state.fetching,
            saving: state.saving,
        }
    }

    pub fn mode(&self) -> FormMode {
        self.lock().mode.clone()
    }

    pub fn is_fetching(&self) -> bool {
        self.lock().fetching
    }

    pub fn is_saving(&self) -> bool {
        self.lock().saving
    }

    pub fn is_valid(&self) -> bool {
        self.lock().form.is_valid()
    }

    /// Switches to edit mode and fills the form with the stored product.
    /// On failure the form stays empty.
    pub async fn load(&self, id: ProductId) -> Result<(), ProductError> {
        {
            let mut state = self.lock();
            state.mode = FormMode::Edit(id.clone());
            state.form.id.disabled = true;
            state.form.id_check_pending = false;
            state.fetching = true;
        }
        self.id_validator.cancel();
        self.logger.info(&format!("Fetching product: {}", id));

        let result = self.repository.get_by_id(&id).await;

        let mut state = self.lock();
        state.fetching = false;
        match result {
            Ok(product) => {
                state.form.id.value = product.id.to_string();
                state.form.name.value = product.name;
                state.form.description.value = product.description;
                state.form.logo.value = product.logo;
                state.write_release(DateInput::Date(product.date_release));
                state.form.date_revision.value = self
                    .engine
                    .format_date(product.date_revision, self.display_format);
                Self::validate_all(&self.release_rule, &mut state.form);
                Ok(())
            }
            Err(e) => {
                self.logger
                    .error(&format!("Failed to fetch product {}: {}", id, e));
                Err(e.into())
            }
        }
    }

    /// User input on the id field. Starts a debounced availability check when
    /// the value changed and passes the synchronous rules.
    pub fn set_id(&self, value: impl Into<String>) {
        let value = value.into();
        let mut state = self.lock();
        if state.form.id.disabled || state.form.id.value == value {
            return;
        }
        state.form.id.value = value.clone();
        state.form.id.dirty = true;
        state.form.id.error = validate_id(&value);

        let ticket = self.id_validator.issue();
        if state.form.id.error.is_some() {
            state.form.id_check_pending = false;
            return;
        }

        let Ok(runtime) = Handle::try_current() else {
            self.logger
                .warn("No async runtime, skipping id availability check");
            state.form.id_check_pending = false;
            return;
        };
        state.form.id_check_pending = true;
        drop(state);

        let shared = Arc::clone(&self.state);
        let validator = self.id_validator.clone();
        runtime.spawn(async move {
            let outcome = validator.check(ticket, &value).await;
            if outcome == IdCheck::Superseded {
                return;
            }
            let mut state = shared.lock().unwrap_or_else(PoisonError::into_inner);
            if validator.is_current(ticket) {
                state.form.id.error = outcome.error();
                state.form.id_check_pending = false;
            }
        });
    }

    pub fn set_name(&self, value: impl Into<String>) {
        let mut state = self.lock();
        let field = &mut state.form.name;
        if field.disabled {
            return;
        }
        field.value = value.into();
        field.dirty = true;
        field.error = validate_name(&field.value);
    }

    pub fn set_description(&self, value: impl Into<String>) {
        let mut state = self.lock();
        let field = &mut state.form.description;
        if field.disabled {
            return;
        }
        field.value = value.into();
        field.dirty = true;
        field.error = validate_description(&field.value);
    }

    pub fn set_logo(&self, value: impl Into<String>) {
        let mut state = self.lock();
        let field = &mut state.form.logo;
        if field.disabled {
            return;
        }
        field.value = value.into();
        field.dirty = true;
        field.error = validate_logo(&field.value);
    }

    /// Accepts a date or text in any supported layout; the revision field
    /// follows immediately.
    pub fn set_release(&self, value: impl Into<DateInput>) {
        let mut state = self.lock();
        if state.form.date_release.disabled {
            return;
        }
        state.write_release(value.into());
        state.form.date_release.dirty = true;
        state.form.date_release.error = self.release_rule.validate(&state.form.date_release.value);
        state.form.date_revision.error = state
            .form
            .date_revision
            .value
            .is_empty()
            .then_some(FieldError::Required);
    }

    pub fn touch(&self, field: FieldName) {
        self.lock().form.touch(field);
    }

    fn build_product(&self, state: &FormState) -> Result<Product, ProductError> {
        let id = match &state.mode {
            FormMode::Edit(id) => id.clone(),
            FormMode::Create => ProductId::new(state.form.id.value.trim()),
        };
        let release = &state.form.date_release.value;
        let date_release = self
            .engine
            .parse_to_date(release)?
            .ok_or_else(|| InvalidDateError::new(""))?;

        Product::new(NewProductProps {
            id,
            name: state.form.name.value.clone(),
            description: state.form.description.value.clone(),
            logo: state.form.logo.value.clone(),
            date_release,
        })
    }

    /// Validates, then creates or updates depending on the mode.
    ///
    /// Invalid forms are only marked touched; nothing is sent.
    pub async fn submit(&self) -> Result<Product, ProductError> {
        let (mode, product) = {
            let mut state = self.lock();
            if state.saving {
                self.logger.debug("Submit ignored while a save is running");
                return Err(ProductError::SaveInProgress);
            }
            Self::validate_all(&self.release_rule, &mut state.form);
            if !state.form.is_valid() {
                state.form.mark_all_touched();
                self.logger.debug("Submit blocked by failing validation");
                return Err(ProductError::InvalidForm);
            }
            let product = match self.build_product(&state) {
                Ok(product) => product,
                Err(e) => {
                    state.form.mark_all_touched();
                    return Err(e);
                }
            };
            state.saving = true;
            state.form.set_editable(false);
            (state.mode.clone(), product)
        };

        let result = match &mode {
            FormMode::Create => {
                self.logger
                    .info(&format!("Creating product: {}", product.id));
                self.repository.create(&product).await
            }
            FormMode::Edit(id) => {
                self.logger.info(&format!("Updating product: {}", id));
                self.repository
                    .update(id, &ProductUpdate::from(&product))
                    .await
            }
        };

        let mut state = self.lock();
        state.saving = false;
        match result {
            Ok(saved) => {
                state.form.set_editable(true);
                if matches!(mode, FormMode::Edit(_)) {
                    state.form.id.disabled = true;
                }
                state.form.mark_pristine();
                drop(state);

                match mode {
                    FormMode::Create => {
                        self.logger
                            .info(&format!("Product created: {}", saved.id));
                        self.notifications.success(messages::created(&saved.name));
                        self.navigator.to_list();
                    }
                    FormMode::Edit(_) => {
                        self.logger
                            .info(&format!("Product updated: {}", saved.id));
                        self.notifications.success(messages::updated(&saved.name));
                    }
                }
                Ok(saved)
            }
            Err(e) => {
                let error = ProductError::from(e);
                state.form.set_editable(true);
                state.form.mark_all_touched();
                drop(state);

                self.logger
                    .error(&format!("Failed to save product {}: {}", product.id, error));
                self.notifications.error(messages::save_failed(&error));
                Err(error)
            }
        }
    }

    /// Clears every field, keeping mode, flags and disabled states.
    pub fn restart(&self) {
        self.id_validator.cancel();
        let mut state = self.lock();
        state.form.id.reset();
        state.form.name.reset();
        state.form.description.reset();
        state.form.logo.reset();
        state.form.date_release.reset();
        state.form.date_revision.reset();
        state.form.id_check_pending = false;
        state.write_release(DateInput::Empty);
        Self::validate_all(&self.release_rule, &mut state.form);
    }
}
