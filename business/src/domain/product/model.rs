use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::errors::ProductError;
use crate::domain::shared::dates::{DateEngine, DateFormat, InvalidDateError};
use crate::domain::shared::value_objects::ProductId;

/// One catalog item. `date_revision` is always one calendar year after
/// `date_release`, same month and day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub logo: String,
    pub date_release: NaiveDate,
    pub date_revision: NaiveDate,
}

pub struct NewProductProps {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub logo: String,
    pub date_release: NaiveDate,
}

impl Product {
    /// Builds a product and derives its revision date from the release date.
    pub fn new(props: NewProductProps) -> Result<Self, ProductError> {
        let date_revision = DateEngine::default().add_years(props.date_release, 1)?;

        Ok(Self {
            id: props.id,
            name: props.name,
            description: props.description,
            logo: props.logo,
            date_release: props.date_release,
            date_revision,
        })
    }

    /// Constructor for data coming back from the API (no derivation).
    pub fn from_repository(
        id: ProductId,
        name: String,
        description: String,
        logo: String,
        date_release: NaiveDate,
        date_revision: NaiveDate,
    ) -> Self {
        Self {
            id,
            name,
            description,
            logo,
            date_release,
            date_revision,
        }
    }
}

/// Editable part of a product, sent on update. The id travels in the path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductUpdate {
    pub name: String,
    pub description: String,
    pub logo: String,
    pub date_release: NaiveDate,
    pub date_revision: NaiveDate,
}

impl From<&Product> for ProductUpdate {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone(),
            logo: product.logo.clone(),
            date_release: product.date_release,
            date_revision: product.date_revision,
        }
    }
}

/// Wire representation of a product. Dates are strings; outbound payloads
/// always carry `YYYY-MM-DD`, inbound ones may use any supported layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductPayload {
    pub id: String,
    pub name: String,
    pub description: String,
    pub logo: String,
    pub date_release: String,
    pub date_revision: String,
}

impl ProductPayload {
    pub fn into_product(self, engine: &DateEngine) -> Result<Product, InvalidDateError> {
        let date_release = parse_wire_date(engine, self.date_release)?;
        let date_revision = parse_wire_date(engine, self.date_revision)?;
        Ok(Product::from_repository(
            ProductId::new(self.id),
            self.name,
            self.description,
            self.logo,
            date_release,
            date_revision,
        ))
    }
}

impl From<&Product> for ProductPayload {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            description: product.description.clone(),
            logo: product.logo.clone(),
            date_release: wire_date(product.date_release),
            date_revision: wire_date(product.date_revision),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductUpdatePayload {
    pub name: String,
    pub description: String,
    pub logo: String,
    pub date_release: String,
    pub date_revision: String,
}

impl From<&ProductUpdate> for ProductUpdatePayload {
    fn from(update: &ProductUpdate) -> Self {
        Self {
            name: update.name.clone(),
            description: update.description.clone(),
            logo: update.logo.clone(),
            date_release: wire_date(update.date_release),
            date_revision: wire_date(update.date_revision),
        }
    }
}

fn wire_date(date: NaiveDate) -> String {
    DateEngine::default().format_date(date, DateFormat::YyyyMmDd)
}

fn parse_wire_date(engine: &DateEngine, value: String) -> Result<NaiveDate, InvalidDateError> {
    let raw = value.clone();
    engine
        .parse_to_date(value)?
        .ok_or_else(|| InvalidDateError::new(raw))
}
