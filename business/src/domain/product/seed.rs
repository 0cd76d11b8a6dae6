use chrono::{Days, NaiveDate};
use rand::Rng;

use super::errors::ProductError;
use super::model::{NewProductProps, Product};
use crate::domain::shared::value_objects::ProductId;

const ALPHABET: &[u8] = b"ABCD EFG HIJ KL MN OP QRST UVWXY Zabcd efgh ijkl mnop qrstuv wxyz ";
const ID_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
const RELEASE_SPREAD_DAYS: u64 = 5 * 365;

fn random_text<R: Rng + ?Sized>(rng: &mut R, alphabet: &[u8], min: usize, max: usize) -> String {
    let length = rng.random_range(min..=max);
    (0..length)
        .map(|_| alphabet[rng.random_range(0..alphabet.len())] as char)
        .collect()
}

/// Generates a product that passes every local rule, released within five
/// years after `after`.
pub fn random_product<R: Rng + ?Sized>(rng: &mut R, after: NaiveDate) -> Result<Product, ProductError> {
    let offset = rng.random_range(0..=RELEASE_SPREAD_DAYS);
    let date_release = after.checked_add_days(Days::new(offset)).unwrap_or(after);

    Product::new(NewProductProps {
        id: ProductId::new(random_text(rng, ID_ALPHABET, 3, 10)),
        // Leading letter keeps the name from being all blanks.
        name: format!("P{}", random_text(rng, ALPHABET, 4, 11)),
        description: format!("D{}", random_text(rng, ALPHABET, 19, 99)),
        logo: format!(
            "https://picsum.photos/300/200?random={}",
            rng.random_range(0..1000)
        ),
        date_release,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::product::validation::{
        validate_description, validate_id, validate_logo, validate_name,
    };
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn should_generate_products_that_pass_local_rules() {
        let mut rng = StdRng::seed_from_u64(7);
        let after = NaiveDate::from_ymd_opt(2025, 8, 17).unwrap();

        for _ in 0..50 {
            let product = random_product(&mut rng, after).unwrap();
            assert_eq!(validate_id(product.id.as_str()), None);
            assert_eq!(validate_name(&product.name), None);
            assert_eq!(validate_description(&product.description), None);
            assert_eq!(validate_logo(&product.logo), None);
            assert!(product.date_release >= after);
        }
    }
}
