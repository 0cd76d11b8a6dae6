use business::application::product::form::{FieldName, FormMode, FormView};
use business::application::product::list::ListViewState;
use business::domain::notification::model::Toast;
use business::domain::product::validation::{FieldError, MinDateBound};
use business::domain::shared::dates::{DateEngine, DateFormat, DateInput};

pub fn field_error(error: &FieldError) -> String {
    match error {
        FieldError::Required => "This field is required".to_string(),
        FieldError::MinLength { required, .. } => format!("Minimum {} characters", required),
        FieldError::MaxLength { required, .. } => format!("Maximum {} characters", required),
        FieldError::InvalidUrl => "Enter a valid URL".to_string(),
        FieldError::InvalidDate => "Enter a valid date".to_string(),
        FieldError::InvalidDateFormat(format) => format!("Use the {} format", format),
        FieldError::MinDate(MinDateBound::Today) => "Date must be today or later".to_string(),
        FieldError::MinDate(MinDateBound::Date(date)) => {
            format!("Date must be {} or later", date)
        }
        FieldError::IdExists => "This id is already taken".to_string(),
    }
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let kept: String = value.chars().take(width.saturating_sub(1)).collect();
    format!("{}…", kept)
}

pub fn product_list(state: &ListViewState, engine: &DateEngine, display: DateFormat) -> String {
    let page = state.view();
    let mut lines = Vec::new();

    if state.fetching {
        lines.push("Loading products...".to_string());
    }
    if let Some(term) = &state.search {
        lines.push(format!("Filter: \"{}\"", term));
    }
    lines.push(format!(
        "{:<10} {:<24} {:<32} {:<10} {:<10}",
        "ID", "NAME", "DESCRIPTION", "RELEASE", "REVISION"
    ));
    for product in &page.items {
        let marker = if state.deleting.contains(&product.id) {
            " (deleting)"
        } else {
            ""
        };
        lines.push(format!(
            "{:<10} {:<24} {:<32} {:<10} {:<10}{}",
            product.id,
            truncate(&product.name, 24),
            truncate(&product.description, 32),
            engine.format_date(product.date_release, display),
            engine.format_date(product.date_revision, display),
            marker
        ));
    }
    if page.items.is_empty() && !state.fetching {
        lines.push("No products".to_string());
    }
    lines.push(format!(
        "{} results | page {}/{} | {} per page",
        page.total,
        page.page,
        page.page_count,
        page.page_size.rows()
    ));
    if let Some(pending) = &state.pending_delete {
        lines.push(format!(
            "Delete \"{}\"? Type 'confirm' or 'cancel'.",
            pending.name
        ));
    }
    lines.join("\n")
}

fn field_line(
    view: &FormView,
    field: FieldName,
    label: &str,
    value: &str,
    disabled: bool,
) -> String {
    let mut line = format!("  {:<12} {}", label, value);
    if disabled {
        line.push_str("  [locked]");
    }
    if let Some(error) = view.form.visible_error(field) {
        line.push_str(&format!("  ! {}", field_error(error)));
    }
    line
}

pub fn product_form(view: &FormView, display: DateFormat) -> String {
    let form = &view.form;
    let title = match &view.mode {
        FormMode::Create => "New product".to_string(),
        FormMode::Edit(id) => format!("Edit product {}", id),
    };
    let release = match &form.date_release.value {
        DateInput::Empty => String::new(),
        DateInput::Date(date) => DateEngine::default().format_date(*date, display),
        DateInput::Text(text) => text.clone(),
    };

    let mut lines = vec![title];
    if view.fetching {
        lines.push("Loading product...".to_string());
    }
    lines.push(field_line(view, FieldName::Id, "id", &form.id.value, form.id.disabled));
    if form.id_check_pending {
        lines.push("               checking availability...".to_string());
    }
    lines.push(field_line(view, FieldName::Name, "name", &form.name.value, form.name.disabled));
    lines.push(field_line(
        view,
        FieldName::Description,
        "description",
        &form.description.value,
        form.description.disabled,
    ));
    lines.push(field_line(view, FieldName::Logo, "logo", &form.logo.value, form.logo.disabled));
    lines.push(field_line(
        view,
        FieldName::DateRelease,
        "release",
        &release,
        form.date_release.disabled,
    ));
    lines.push(field_line(
        view,
        FieldName::DateRevision,
        "revision",
        &form.date_revision.value,
        form.date_revision.disabled,
    ));
    if view.saving {
        lines.push("Saving...".to_string());
    }
    lines.join("\n")
}

pub fn toasts(toasts: &[Toast]) -> String {
    toasts
        .iter()
        .map(|toast| format!("[{} #{}] {}", toast.kind, toast.id, toast.message))
        .collect::<Vec<_>>()
        .join("\n")
}
