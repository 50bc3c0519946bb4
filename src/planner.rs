use rand::Rng;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::GenerationConfig;
use crate::error::{GenerateError, Result};

/// Number of transactions assigned to each customer, indexed like the
/// customer list. The counts always add up to the configured target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationPlan {
    pub counts: Vec<u64>,
}

/// Aggregate view of a plan, printed by the `plan` subcommand
#[derive(Debug, Clone, Serialize)]
pub struct PlanSummary {
    pub customers: usize,
    pub total: u64,
    pub min: u64,
    pub max: u64,
    pub mean: f64,
}

impl GenerationPlan {
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn min(&self) -> u64 {
        self.counts.iter().copied().min().unwrap_or(0)
    }

    pub fn max(&self) -> u64 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    pub fn mean(&self) -> f64 {
        if self.counts.is_empty() {
            0.0
        } else {
            self.total() as f64 / self.counts.len() as f64
        }
    }

    pub fn summary(&self) -> PlanSummary {
        PlanSummary {
            customers: self.counts.len(),
            total: self.total(),
            min: self.min(),
            max: self.max(),
            mean: self.mean(),
        }
    }
}

/// Assign every customer a transaction count so that the counts sum to
/// `settings.total_target` exactly while following independent random weights.
pub fn plan_distribution<R: Rng + ?Sized>(
    customer_count: usize,
    settings: &GenerationConfig,
    rng: &mut R,
) -> Result<GenerationPlan> {
    if customer_count == 0 {
        return Err(GenerateError::NoCustomers);
    }

    let raw = draw_raw_counts(customer_count, settings.min_draw, settings.max_draw, rng);
    let mut counts = scale_counts(&raw, settings.total_target)?;

    let provisional: u64 = counts.iter().sum();
    let diff = i64::try_from(settings.total_target as i128 - provisional as i128)
        .map_err(|_| GenerateError::Plan("correction does not fit in i64".to_string()))?;
    debug!(provisional, diff, "Applying correction step");

    distribute_correction(&mut counts, diff)?;

    let plan = GenerationPlan { counts };
    info!("Total records to generate: {}", plan.total());
    Ok(plan)
}

/// One uniform draw in `[min, max]` per customer
pub fn draw_raw_counts<R: Rng + ?Sized>(n: usize, min: u64, max: u64, rng: &mut R) -> Vec<u64> {
    (0..n).map(|_| rng.gen_range(min..=max)).collect()
}

/// Scale raw draws by `total_target / raw_total`, rounding each down.
///
/// The product is computed in integer space so the floor is exact; the
/// provisional sum therefore never exceeds the target.
pub fn scale_counts(raw: &[u64], total_target: u64) -> Result<Vec<u64>> {
    let raw_total: u128 = raw.iter().map(|&c| c as u128).sum();
    if raw_total == 0 {
        return Err(GenerateError::Plan("raw draw total is zero".to_string()));
    }

    Ok(raw
        .iter()
        .map(|&c| ((c as u128 * total_target as u128) / raw_total) as u64)
        .collect())
}

/// Add `sign(diff)` to `counts[i % len]` for each `i` in `0..|diff|`.
///
/// The pass cycles through customers from index 0 and wraps when `|diff|`
/// exceeds the number of customers, so early customers can receive more
/// than one unit.
pub fn distribute_correction(counts: &mut [u64], diff: i64) -> Result<()> {
    if diff == 0 {
        return Ok(());
    }
    if counts.is_empty() {
        return Err(GenerateError::Plan(format!(
            "cannot distribute correction of {} across zero customers",
            diff
        )));
    }

    let len = counts.len();
    for i in 0..diff.unsigned_abs() {
        let slot = &mut counts[(i % len as u64) as usize];
        if diff > 0 {
            *slot += 1;
        } else {
            *slot = slot.checked_sub(1).ok_or_else(|| {
                GenerateError::Plan(format!(
                    "correction of {} would drive a customer count below zero",
                    diff
                ))
            })?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn settings(total_target: u64) -> GenerationConfig {
        GenerationConfig {
            total_target,
            ..GenerationConfig::default()
        }
    }

    #[test]
    fn test_plan_sums_to_target_for_many_shapes() {
        let mut rng = StdRng::seed_from_u64(1);
        for customers in [1usize, 2, 3, 7, 100, 1001] {
            for target in [0u64, 1, 10, 999, 5_000_000] {
                let plan = plan_distribution(customers, &settings(target), &mut rng).unwrap();
                assert_eq!(plan.counts.len(), customers);
                assert_eq!(plan.total(), target, "customers={} target={}", customers, target);
            }
        }
    }

    #[test]
    fn test_plan_with_entropy_rng_sums_to_target() {
        let mut rng = rand::thread_rng();
        let plan = plan_distribution(250, &settings(12_345), &mut rng).unwrap();
        assert_eq!(plan.total(), 12_345);
    }

    #[test]
    fn test_plan_rejects_zero_customers() {
        let mut rng = StdRng::seed_from_u64(1);
        let result = plan_distribution(0, &settings(10), &mut rng);
        assert!(matches!(result, Err(GenerateError::NoCustomers)));
    }

    #[test]
    fn test_plan_is_reproducible_with_seed() {
        let a = plan_distribution(50, &settings(1000), &mut StdRng::seed_from_u64(7)).unwrap();
        let b = plan_distribution(50, &settings(1000), &mut StdRng::seed_from_u64(7)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_draws_stay_in_bounds() {
        let mut rng = StdRng::seed_from_u64(3);
        let raw = draw_raw_counts(10_000, 1, 1000, &mut rng);
        assert!(raw.iter().all(|&c| (1..=1000).contains(&c)));
    }

    #[test]
    fn test_scale_counts_floors_proportionally() {
        let scaled = scale_counts(&[1, 1, 1], 10).unwrap();
        assert_eq!(scaled, vec![3, 3, 3]);

        let scaled = scale_counts(&[1, 3], 8).unwrap();
        assert_eq!(scaled, vec![2, 6]);
    }

    #[test]
    fn test_scale_counts_rejects_zero_total() {
        assert!(scale_counts(&[0, 0], 10).is_err());
    }

    #[test]
    fn test_positive_correction_wraps_around() {
        let mut counts = vec![0, 0];
        distribute_correction(&mut counts, 5).unwrap();
        assert_eq!(counts, vec![3, 2]);
    }

    #[test]
    fn test_negative_correction_cycles_from_first_customer() {
        let mut counts = vec![5, 5, 5];
        distribute_correction(&mut counts, -7).unwrap();
        assert_eq!(counts, vec![2, 3, 3]);
        assert_eq!(counts.iter().sum::<u64>(), 8);
    }

    #[test]
    fn test_negative_correction_never_goes_below_zero() {
        let mut counts = vec![0, 4];
        assert!(distribute_correction(&mut counts, -1).is_err());
    }

    #[test]
    fn test_summary_stats() {
        let plan = GenerationPlan {
            counts: vec![2, 4, 6],
        };
        let summary = plan.summary();
        assert_eq!(summary.customers, 3);
        assert_eq!(summary.total, 12);
        assert_eq!(summary.min, 2);
        assert_eq!(summary.max, 6);
        assert!((summary.mean - 4.0).abs() < f64::EPSILON);
    }
}
