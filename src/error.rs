use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to open metadata file '{}': {source}", path.display())]
    MetadataOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid price '{value}' on metadata line {line}: {source}")]
    InvalidPrice {
        line: usize,
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    #[error("No customers found in metadata")]
    NoCustomers,

    #[error("No products found in metadata, cannot generate {0} records")]
    NoProducts(u64),

    #[error("Total amount overflows for product {product_id}: {unit_price} x {quantity}")]
    AmountOverflow {
        product_id: String,
        unit_price: i64,
        quantity: i64,
    },

    #[error("Planning error: {0}")]
    Plan(String),
}

pub type Result<T> = std::result::Result<T, GenerateError>;
