use contracts::dashboards::d402_sales_performance::{FactRow, FilterSelection};
use contracts::enums::{Product, Region};
use std::collections::BTreeSet;
use thiserror::Error;

use crate::shared::data::FactTable;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterParseError {
    #[error("unknown region: {0}")]
    UnknownRegion(String),

    #[error("unknown product: {0}")]
    UnknownProduct(String),
}

/// Rows of `table` matching the selection, in table order.
/// The table itself is never touched.
pub fn apply<'a>(table: &'a FactTable, selection: &FilterSelection) -> Vec<&'a FactRow> {
    if selection.empty_reason().is_some() {
        return Vec::new();
    }
    table
        .rows()
        .iter()
        .filter(|row| selection.matches(row))
        .collect()
}

/// Build a selection from comma-separated query parameters.
///
/// An absent parameter selects the whole axis, an empty one selects nothing.
pub fn selection_from_params(
    regions: Option<&str>,
    products: Option<&str>,
) -> Result<FilterSelection, FilterParseError> {
    let regions = match regions {
        None => Region::all().into_iter().collect(),
        Some(list) => parse_list(list, |name| {
            Region::from_name(name).ok_or_else(|| FilterParseError::UnknownRegion(name.to_string()))
        })?,
    };
    let products = match products {
        None => Product::all().into_iter().collect(),
        Some(list) => parse_list(list, |name| {
            Product::from_name(name)
                .ok_or_else(|| FilterParseError::UnknownProduct(name.to_string()))
        })?,
    };
    Ok(FilterSelection { regions, products })
}

fn parse_list<T: Ord>(
    list: &str,
    parse: impl Fn(&str) -> Result<T, FilterParseError>,
) -> Result<BTreeSet<T>, FilterParseError> {
    list.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(parse)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::build_dataset;

    #[test]
    fn test_full_selection_keeps_every_row() {
        let table = build_dataset(42);
        assert_eq!(apply(&table, &FilterSelection::all()).len(), table.len());
    }

    #[test]
    fn test_single_region_and_product() {
        let table = build_dataset(42);
        let selection = FilterSelection::new([Region::East], [Product::ProductC]);
        let rows = apply(&table, &selection);
        assert_eq!(rows.len(), 18);
        assert!(rows
            .iter()
            .all(|r| r.region == Region::East && r.product == Product::ProductC));
    }

    #[test]
    fn test_empty_axis_yields_nothing() {
        let table = build_dataset(42);
        assert!(apply(&table, &FilterSelection::new([], Product::all())).is_empty());
        assert!(apply(&table, &FilterSelection::new(Region::all(), [])).is_empty());
    }

    #[test]
    fn test_params_absent_empty_and_listed() {
        assert_eq!(selection_from_params(None, None).unwrap(), FilterSelection::all());

        let none = selection_from_params(Some(""), None).unwrap();
        assert!(none.regions.is_empty());
        assert_eq!(none.products.len(), 3);

        let some = selection_from_params(Some("west, North"), Some("Product B")).unwrap();
        assert_eq!(some.regions.iter().copied().collect::<Vec<_>>(), vec![Region::North, Region::West]);
        assert_eq!(some.products.iter().copied().collect::<Vec<_>>(), vec![Product::ProductB]);
    }

    #[test]
    fn test_params_unknown_value() {
        assert_eq!(
            selection_from_params(Some("North,Atlantis"), None),
            Err(FilterParseError::UnknownRegion("Atlantis".into()))
        );
        assert_eq!(
            selection_from_params(None, Some("Product Q")),
            Err(FilterParseError::UnknownProduct("Product Q".into()))
        );
    }
}
