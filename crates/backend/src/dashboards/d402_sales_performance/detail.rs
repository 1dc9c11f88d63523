use contracts::dashboards::d402_sales_performance::{DetailColumn, DetailSort, FactRow};
use std::cmp::Ordering;

/// Filtered rows sorted for the detail table.
///
/// The sort is stable: rows comparing equal keep their table order in both directions.
pub fn sorted_detail(rows: &[&FactRow], sort: DetailSort) -> Vec<FactRow> {
    let mut detail: Vec<FactRow> = rows.iter().map(|row| (*row).clone()).collect();
    detail.sort_by(|a, b| {
        let ord = compare(a, b, sort.column);
        if sort.descending {
            ord.reverse()
        } else {
            ord
        }
    });
    detail
}

fn compare(a: &FactRow, b: &FactRow, column: DetailColumn) -> Ordering {
    match column {
        DetailColumn::Date => a.date.cmp(&b.date),
        DetailColumn::Region => a.region.cmp(&b.region),
        DetailColumn::Product => a.product.cmp(&b.product),
        DetailColumn::Revenue => a.revenue.cmp(&b.revenue),
        DetailColumn::Cost => a.cost.total_cmp(&b.cost),
        DetailColumn::UnitsSold => a.units_sold.cmp(&b.units_sold),
        DetailColumn::Profit => a.profit.total_cmp(&b.profit),
        DetailColumn::Margin => a.margin.total_cmp(&b.margin),
    }
}

/// Detail rows as CSV with a header line
pub fn to_csv(rows: &[FactRow]) -> anyhow::Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("CSV flush failed: {}", e.error()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use contracts::enums::{Product, Region};

    fn row(day: u32, region: Region, revenue: i64, cost: f64) -> FactRow {
        let date = NaiveDate::from_ymd_opt(2023, 1, day).unwrap();
        FactRow::new(date, region, Product::ProductA, revenue, cost, 5)
    }

    #[test]
    fn test_profit_descending_stable() {
        let rows = vec![
            row(1, Region::North, 100, 50.0), // profit 50
            row(2, Region::South, 100, 20.0), // profit 80
            row(3, Region::East, 200, 150.0), // profit 50
            row(4, Region::West, 100, 50.0),  // profit 50
        ];
        let refs: Vec<&FactRow> = rows.iter().collect();

        let detail = sorted_detail(&refs, DetailSort::default());
        let regions: Vec<Region> = detail.iter().map(|r| r.region).collect();
        assert_eq!(regions, vec![Region::South, Region::North, Region::East, Region::West]);
    }

    #[test]
    fn test_ascending_by_other_column() {
        let rows = vec![
            row(1, Region::West, 300, 0.0),
            row(2, Region::North, 100, 0.0),
            row(3, Region::South, 200, 0.0),
        ];
        let refs: Vec<&FactRow> = rows.iter().collect();

        let sort = DetailSort {
            column: DetailColumn::Revenue,
            descending: false,
        };
        let revenue: Vec<i64> = sorted_detail(&refs, sort).iter().map(|r| r.revenue).collect();
        assert_eq!(revenue, vec![100, 200, 300]);

        let by_region = DetailSort {
            column: DetailColumn::Region,
            descending: false,
        };
        assert_eq!(sorted_detail(&refs, by_region)[0].region, Region::North);
    }

    #[test]
    fn test_csv_export() {
        let rows = vec![row(31, Region::North, 20000, 12000.0)];
        let bytes = to_csv(&rows).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("date,region,product,revenue,cost,units_sold,profit,margin,month")
        );
        assert_eq!(
            lines.next(),
            Some("2023-01-31,North,Product A,20000,12000.0,5,8000.0,0.4,2023-01")
        );
    }
}
