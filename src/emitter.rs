use chrono::{Duration, NaiveDate};
use rand::seq::SliceRandom;
use rand::Rng;
use std::io::{self, Write};
use tracing::{debug, info};

use crate::config::{GenerationConfig, LabelsConfig};
use crate::constants::SALES_ID_DATE_FORMAT;
use crate::error::{GenerateError, Result};
use crate::planner::GenerationPlan;
use crate::types::{Customer, Metadata, Product};

/// One row of the sales output
#[derive(Debug, Clone)]
pub struct SalesRecord<'a> {
    pub sales_id: String,
    pub customer_id: &'a str,
    pub status: &'a str,
    pub order_date: NaiveDate,
    pub product: &'a Product,
    pub quantity: i64,
    pub total_amount: i64,
    pub payment_status: &'a str,
}

/// One row of the inventory-log output, always paired with a sale
#[derive(Debug, Clone)]
pub struct InventoryLogRecord<'a> {
    pub product: &'a Product,
    pub change_type: &'a str,
    pub change_quantity: i64,
    pub reference_id: &'a str,
    pub memo: &'a str,
    pub order_date: NaiveDate,
    pub log_time: &'a str,
}

impl SalesRecord<'_> {
    /// Columns: sales_id, customer_id, status, order_date, product_name,
    /// specification, unit_price, quantity, total_amount, payment_status,
    /// product_id, product_code
    pub fn write_line<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(
            out,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            self.sales_id,
            self.customer_id,
            self.status,
            self.order_date,
            self.product.name,
            self.product.specification,
            self.product.unit_price,
            self.quantity,
            self.total_amount,
            self.payment_status,
            self.product.id,
            self.product.code
        )
    }
}

impl InventoryLogRecord<'_> {
    /// Columns: product_id, product_name, specification, product_code,
    /// change_type, change_quantity, reference_id, memo, created_at
    pub fn write_line<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(
            out,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{} {}",
            self.product.id,
            self.product.name,
            self.product.specification,
            self.product.code,
            self.change_type,
            self.change_quantity,
            self.reference_id,
            self.memo,
            self.order_date,
            self.log_time
        )
    }
}

/// Earliest date a customer's orders may carry, and how many days past it
/// are still available before the end date.
///
/// A customer who joined after `end_date` gets a zero-day window anchored on
/// `end_date` itself.
pub fn order_window(join_date: NaiveDate, floor_date: NaiveDate, end_date: NaiveDate) -> (NaiveDate, i64) {
    let join = join_date.max(floor_date);
    let base = join.min(end_date);
    let days_available = (end_date - base).num_days().max(0);
    (base, days_available)
}

/// Writes sales and inventory-log rows for a plan.
///
/// Owns the sales-id counter for the run; the rng and the two writers are
/// borrowed from the caller.
pub struct RecordEmitter<'a> {
    settings: &'a GenerationConfig,
    labels: &'a LabelsConfig,
    next_id: u64,
    records_written: u64,
}

impl<'a> RecordEmitter<'a> {
    pub fn new(settings: &'a GenerationConfig, labels: &'a LabelsConfig) -> Self {
        Self {
            settings,
            labels,
            next_id: 1,
            records_written: 0,
        }
    }

    pub fn records_written(&self) -> u64 {
        self.records_written
    }

    /// Emit every planned transaction, customer by customer in load order.
    pub fn emit_all<R, S, I>(
        &mut self,
        metadata: &Metadata,
        plan: &GenerationPlan,
        rng: &mut R,
        sales: &mut S,
        inventory: &mut I,
    ) -> Result<u64>
    where
        R: Rng + ?Sized,
        S: Write,
        I: Write,
    {
        if plan.counts.len() != metadata.customers.len() {
            return Err(GenerateError::Plan(format!(
                "plan covers {} customers but {} were loaded",
                plan.counts.len(),
                metadata.customers.len()
            )));
        }
        if metadata.products.is_empty() && plan.total() > 0 {
            return Err(GenerateError::NoProducts(plan.total()));
        }

        for (index, (customer, &count)) in metadata.customers.iter().zip(&plan.counts).enumerate() {
            self.emit_customer(customer, count, &metadata.products, rng, sales, inventory)?;

            if (index + 1) % self.settings.progress_every == 0 {
                info!("Processed {} customers...", index + 1);
            }
        }

        Ok(self.records_written)
    }

    pub fn emit_customer<R, S, I>(
        &mut self,
        customer: &Customer,
        count: u64,
        products: &[Product],
        rng: &mut R,
        sales: &mut S,
        inventory: &mut I,
    ) -> Result<()>
    where
        R: Rng + ?Sized,
        S: Write,
        I: Write,
    {
        let (base, days_available) = order_window(
            customer.join_date,
            self.settings.floor_date,
            self.settings.end_date,
        );
        debug!(customer = %customer.id, count, %base, days_available, "Emitting customer");

        for _ in 0..count {
            let product = products
                .choose(rng)
                .ok_or(GenerateError::NoProducts(count))?;

            let offset = rng.gen_range(0..=days_available);
            let order_date = base + Duration::days(offset);

            let quantity = rng.gen_range(self.settings.min_quantity..=self.settings.max_quantity);
            let total_amount = product.unit_price.checked_mul(quantity).ok_or_else(|| {
                GenerateError::AmountOverflow {
                    product_id: product.id.clone(),
                    unit_price: product.unit_price,
                    quantity,
                }
            })?;

            let sales_id = format!("{}-{:010}", order_date.format(SALES_ID_DATE_FORMAT), self.next_id);
            self.next_id += 1;

            let sale = SalesRecord {
                sales_id,
                customer_id: &customer.id,
                status: &self.labels.order_status,
                order_date,
                product,
                quantity,
                total_amount,
                payment_status: &self.labels.payment_status,
            };
            sale.write_line(sales)?;

            let log = InventoryLogRecord {
                product,
                change_type: &self.labels.change_type,
                change_quantity: -quantity,
                reference_id: &sale.sales_id,
                memo: &self.labels.memo,
                order_date,
                log_time: &self.labels.log_time,
            };
            log.write_line(inventory)?;

            self.records_written += 1;
        }

        Ok(())
    }
}
