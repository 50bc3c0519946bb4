use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{debug, info, instrument};

use crate::config::{Config, GenerationConfig};
use crate::emitter::RecordEmitter;
use crate::error::{GenerateError, Result};
use crate::metadata::load_metadata;
use crate::planner::{plan_distribution, GenerationPlan};
use crate::types::{GenerationSummary, Metadata};

const WRITE_BUFFER_BYTES: usize = 1 << 20;

/// Loaded metadata together with the plan computed for it
#[derive(Debug)]
pub struct PlannedRun {
    pub metadata: Metadata,
    pub plan: GenerationPlan,
}

pub struct Pipeline;

impl Pipeline {
    /// Random source for a run: seeded when the config asks for reproducible
    /// output, entropy-seeded otherwise.
    pub fn rng_for(settings: &GenerationConfig) -> StdRng {
        match settings.seed {
            Some(seed) => {
                debug!(seed, "Using seeded random source");
                StdRng::seed_from_u64(seed)
            }
            None => StdRng::from_entropy(),
        }
    }

    /// Load the metadata and compute the per-customer plan without writing anything.
    #[instrument(skip_all, fields(input = %config.paths.input.display()))]
    pub fn plan<R: Rng + ?Sized>(config: &Config, rng: &mut R) -> Result<PlannedRun> {
        config.validate()?;

        // Step 1: Load customers and products
        let metadata = load_metadata(&config.paths.input, config.generation.floor_date)?;

        // Step 2: Spread the target across customers
        let plan = plan_distribution(metadata.customers.len(), &config.generation, rng)?;

        Ok(PlannedRun { metadata, plan })
    }

    /// Run the full generation and write both output files.
    #[instrument(skip_all, fields(target = config.generation.total_target))]
    pub fn generate<R: Rng + ?Sized>(config: &Config, rng: &mut R) -> Result<GenerationSummary> {
        let PlannedRun { metadata, plan } = Self::plan(config, rng)?;

        if metadata.products.is_empty() && plan.total() > 0 {
            return Err(GenerateError::NoProducts(plan.total()));
        }

        // Step 3: Emit records into both files
        let sales_path = &config.paths.sales_output;
        let inventory_path = &config.paths.inventory_output;
        let mut sales = open_output(sales_path)?;
        let mut inventory = open_output(inventory_path)?;

        info!(
            "Writing sales to {} and inventory logs to {}",
            sales_path.display(),
            inventory_path.display()
        );

        let mut emitter = RecordEmitter::new(&config.generation, &config.labels);
        let records_written = emitter.emit_all(&metadata, &plan, rng, &mut sales, &mut inventory)?;

        sales.flush()?;
        inventory.flush()?;

        info!("Generation complete: {} records written", records_written);

        Ok(GenerationSummary {
            customers: metadata.customers.len(),
            products: metadata.products.len(),
            records_written,
            sales_path: sales_path.clone(),
            inventory_path: inventory_path.clone(),
        })
    }
}

fn open_output(path: &Path) -> Result<BufWriter<File>> {
    if let Some(parent_dir) = path.parent() {
        if !parent_dir.as_os_str().is_empty() && !parent_dir.exists() {
            fs::create_dir_all(parent_dir)?;
            debug!("Created output directory: {:?}", parent_dir);
        }
    }
    let file = File::create(path)?;
    Ok(BufWriter::with_capacity(WRITE_BUFFER_BYTES, file))
}
