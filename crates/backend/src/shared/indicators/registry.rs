use contracts::dashboards::d402_sales_performance::FactRow;
use contracts::shared::indicators::*;
use std::collections::HashMap;

use super::compute::sales;
use super::metadata::ids;

type ComputeFn = fn(&[&FactRow]) -> IndicatorValue;

/// Central registry: maps `IndicatorId` to its compute function.
pub struct IndicatorRegistry {
    fns: HashMap<String, ComputeFn>,
}

impl Default for IndicatorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl IndicatorRegistry {
    pub fn new() -> Self {
        let mut fns: HashMap<String, ComputeFn> = HashMap::new();

        fns.insert(ids::total_revenue().0, sales::compute_total_revenue);
        fns.insert(ids::total_profit().0, sales::compute_total_profit);
        fns.insert(ids::avg_margin().0, sales::compute_avg_margin);
        fns.insert(ids::total_units().0, sales::compute_total_units);

        Self { fns }
    }

    /// Compute a batch of indicators over already filtered rows.
    /// Unknown ids are skipped.
    pub fn compute(&self, ids: &[IndicatorId], rows: &[&FactRow]) -> Vec<IndicatorValue> {
        let mut results = Vec::with_capacity(ids.len());

        for id in ids {
            if let Some(compute_fn) = self.fns.get(&id.0) {
                results.push(compute_fn(rows));
            } else {
                tracing::warn!("indicator {} not found in registry", id.0);
            }
        }

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_ids_skipped_order_kept() {
        let registry = IndicatorRegistry::new();
        let request = vec![
            ids::total_units(),
            IndicatorId::new("sales_order_count"),
            ids::total_revenue(),
        ];
        let values = registry.compute(&request, &[]);
        let returned: Vec<_> = values.iter().map(|v| v.id.clone()).collect();
        assert_eq!(returned, vec![ids::total_units(), ids::total_revenue()]);
    }
}
