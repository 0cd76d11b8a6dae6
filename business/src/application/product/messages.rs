//! User-facing notification texts for product flows.

use crate::domain::product::errors::ProductError;

pub fn deleted(name: &str) -> String {
    format!("Product \"{}\" was deleted", name)
}

pub fn delete_failed(error: &ProductError) -> String {
    match error {
        ProductError::NotFound => "The product no longer exists".to_string(),
        _ => "The product could not be deleted, try again later".to_string(),
    }
}

pub fn created(name: &str) -> String {
    format!("Product \"{}\" was created", name)
}

pub fn updated(name: &str) -> String {
    format!("Product \"{}\" was updated", name)
}

pub fn save_failed(error: &ProductError) -> String {
    match error {
        ProductError::ValidationRejected => {
            "The server rejected the product, review the fields".to_string()
        }
        ProductError::NotFound => "The product no longer exists".to_string(),
        _ => "The product could not be saved, try again later".to_string(),
    }
}
