pub mod client;
pub mod envelope;
pub mod product {
    pub mod repository;
    pub mod verification;
}
