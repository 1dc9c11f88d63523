use contracts::dashboards::d402_sales_performance::{Insights, ProductProfit, RegionProfit};

use crate::shared::format::format_money;

pub const RECOMMENDATION: &str = "Recommendation: shift marketing spend toward the strongest region \
and review pricing and unit costs of the weakest product.";

/// Region with the highest profit. Ties go to the earliest region in canonical order.
pub fn best_region(regions: &[RegionProfit]) -> Option<RegionProfit> {
    regions
        .iter()
        .fold(None::<&RegionProfit>, |best, candidate| match best {
            Some(current)
                if current.profit > candidate.profit
                    || (current.profit == candidate.profit && current.region <= candidate.region) =>
            {
                Some(current)
            }
            _ => Some(candidate),
        })
        .cloned()
}

/// Product with the lowest profit. Ties go to the earliest product in canonical order.
pub fn worst_product(products: &[ProductProfit]) -> Option<ProductProfit> {
    products
        .iter()
        .fold(None::<&ProductProfit>, |worst, candidate| match worst {
            Some(current)
                if current.profit < candidate.profit
                    || (current.profit == candidate.profit
                        && current.product <= candidate.product) =>
            {
                Some(current)
            }
            _ => Some(candidate),
        })
        .cloned()
}

/// The three text slots; lookups over empty aggregates report "no data"
pub fn derive_insights(regions: &[RegionProfit], products: &[ProductProfit]) -> Insights {
    let best_region = best_region(regions);
    let worst_product = worst_product(products);

    let best_region_text = match &best_region {
        Some(best) => format!(
            "Best performing region: {} with {} profit",
            best.region,
            format_money(best.profit)
        ),
        None => "Best performing region: no data for the current selection".to_string(),
    };
    let worst_product_text = match &worst_product {
        Some(worst) => format!(
            "Lowest profit product: {} with {} profit",
            worst.product,
            format_money(worst.profit)
        ),
        None => "Lowest profit product: no data for the current selection".to_string(),
    };

    Insights {
        best_region,
        worst_product,
        best_region_text,
        worst_product_text,
        recommendation: RECOMMENDATION.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::enums::{Product, Region};

    fn rp(region: Region, profit: f64) -> RegionProfit {
        RegionProfit { region, profit }
    }

    fn pp(product: Product, profit: f64) -> ProductProfit {
        ProductProfit { product, profit }
    }

    #[test]
    fn test_best_region_by_profit() {
        let regions = vec![rp(Region::North, 100.0), rp(Region::South, 50.0)];
        assert_eq!(best_region(&regions).unwrap().region, Region::North);
    }

    #[test]
    fn test_best_region_tie_goes_to_canonical_first() {
        let regions = vec![rp(Region::West, 80.0), rp(Region::South, 80.0), rp(Region::East, 10.0)];
        for _ in 0..3 {
            assert_eq!(best_region(&regions).unwrap().region, Region::South);
        }
    }

    #[test]
    fn test_worst_product_tie_goes_to_canonical_first() {
        let products = vec![pp(Product::ProductC, 20.0), pp(Product::ProductB, 20.0), pp(Product::ProductA, 90.0)];
        for _ in 0..3 {
            assert_eq!(worst_product(&products).unwrap().product, Product::ProductB);
        }
    }

    #[test]
    fn test_empty_aggregates_report_no_data() {
        let insights = derive_insights(&[], &[]);
        assert!(insights.best_region.is_none());
        assert!(insights.worst_product.is_none());
        assert!(insights.best_region_text.contains("no data"));
        assert!(insights.worst_product_text.contains("no data"));
        assert_eq!(insights.recommendation, RECOMMENDATION);
    }

    #[test]
    fn test_insight_text() {
        let insights = derive_insights(
            &[rp(Region::East, 1234567.0)],
            &[pp(Product::ProductA, 5000.0), pp(Product::ProductB, 4000.0)],
        );
        assert_eq!(
            insights.best_region_text,
            "Best performing region: East with $1,234,567 profit"
        );
        assert_eq!(
            insights.worst_product_text,
            "Lowest profit product: Product B with $4,000 profit"
        );
    }
}
