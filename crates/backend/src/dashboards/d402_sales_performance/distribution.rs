use contracts::dashboards::d402_sales_performance::{
    BoxSummary, FactRow, FilterSelection, MarginDistribution,
};

/// Margin samples for every selected product, canonical order.
///
/// A selected product without matching rows still gets an entry, with no
/// values and no summary, so the chart can show it as empty.
pub fn margin_distribution(rows: &[&FactRow], selection: &FilterSelection) -> Vec<MarginDistribution> {
    selection
        .products
        .iter()
        .map(|&product| {
            let values: Vec<f64> = rows
                .iter()
                .filter(|row| row.product == product)
                .map(|row| row.margin)
                .collect();
            let summary = box_summary(&values);
            MarginDistribution {
                product,
                values,
                summary,
            }
        })
        .collect()
}

/// Quartiles, 1.5 * IQR whiskers and outliers. `None` for an empty sample.
pub fn box_summary(values: &[f64]) -> Option<BoxSummary> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f64::total_cmp);

    let q1 = quantile(&sorted, 0.25);
    let median = quantile(&sorted, 0.5);
    let q3 = quantile(&sorted, 0.75);
    let iqr = q3 - q1;
    let lower_fence = q1 - 1.5 * iqr;
    let upper_fence = q3 + 1.5 * iqr;

    let inside: Vec<f64> = sorted
        .iter()
        .copied()
        .filter(|v| *v >= lower_fence && *v <= upper_fence)
        .collect();
    let outliers: Vec<f64> = sorted
        .iter()
        .copied()
        .filter(|v| *v < lower_fence || *v > upper_fence)
        .collect();

    // q1..q3 always lies inside the fences, so `inside` is never empty
    let lower_whisker = inside.first().copied().unwrap_or(q1);
    let upper_whisker = inside.last().copied().unwrap_or(q3);

    Some(BoxSummary {
        min: sorted[0],
        q1,
        median,
        q3,
        max: sorted[sorted.len() - 1],
        lower_whisker,
        upper_whisker,
        outliers,
    })
}

/// Linear interpolation between closest ranks; `sorted` must be non-empty and ascending
fn quantile(sorted: &[f64], p: f64) -> f64 {
    let position = p * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let weight = position - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * weight
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use contracts::enums::{Product, Region};

    fn row(product: Product, revenue: i64, cost: f64) -> FactRow {
        let date = NaiveDate::from_ymd_opt(2023, 1, 31).unwrap();
        FactRow::new(date, Region::North, product, revenue, cost, 1)
    }

    #[test]
    fn test_quartiles_linear() {
        let summary = box_summary(&[4.0, 1.0, 3.0, 2.0, 5.0]).unwrap();
        assert_eq!(summary.min, 1.0);
        assert_eq!(summary.q1, 2.0);
        assert_eq!(summary.median, 3.0);
        assert_eq!(summary.q3, 4.0);
        assert_eq!(summary.max, 5.0);
        assert!(summary.outliers.is_empty());

        let even = box_summary(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(even.median, 2.5);
        assert_eq!(even.q1, 1.75);
    }

    #[test]
    fn test_outliers_and_whiskers() {
        let summary = box_summary(&[0.30, 0.31, 0.32, 0.33, 0.34, 0.95]).unwrap();
        assert_eq!(summary.outliers, vec![0.95]);
        assert_eq!(summary.upper_whisker, 0.34);
        assert_eq!(summary.lower_whisker, 0.30);
        assert_eq!(summary.max, 0.95);
    }

    #[test]
    fn test_single_value() {
        let summary = box_summary(&[0.25]).unwrap();
        assert_eq!(summary.q1, 0.25);
        assert_eq!(summary.q3, 0.25);
        assert_eq!(summary.lower_whisker, 0.25);
    }

    #[test]
    fn test_empty_sample() {
        assert_eq!(box_summary(&[]), None);
    }

    #[test]
    fn test_selected_product_without_rows_is_empty_entry() {
        let rows = vec![row(Product::ProductA, 100, 70.0), row(Product::ProductA, 100, 60.0)];
        let refs: Vec<&FactRow> = rows.iter().collect();
        let selection = FilterSelection::new(Region::all(), [Product::ProductC, Product::ProductA]);

        let dist = margin_distribution(&refs, &selection);
        assert_eq!(dist.len(), 2);
        assert_eq!(dist[0].product, Product::ProductA);
        assert_eq!(dist[0].values.len(), 2);
        assert!(dist[0].summary.is_some());
        assert_eq!(dist[1].product, Product::ProductC);
        assert!(dist[1].values.is_empty());
        assert!(dist[1].summary.is_none());
    }
}
