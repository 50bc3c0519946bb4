use chrono::NaiveDate;
use serde::Serialize;
use std::path::PathBuf;

/// A seed customer read from the metadata file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub id: String,
    pub join_date: NaiveDate,
}

/// A seed product read from the metadata file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub specification: String,
    pub unit_price: i64,
    /// Empty when the metadata line has no code column
    pub code: String,
}

/// Everything the loader produced, in file order
#[derive(Debug, Clone, Default)]
pub struct Metadata {
    pub customers: Vec<Customer>,
    pub products: Vec<Product>,
}

/// Outcome of a full `generate` run
#[derive(Debug, Clone, Serialize)]
pub struct GenerationSummary {
    pub customers: usize,
    pub products: usize,
    pub records_written: u64,
    pub sales_path: PathBuf,
    pub inventory_path: PathBuf,
}
