use contracts::shared::indicators::*;

/// Well-known indicator IDs (constants to avoid typos).
pub mod ids {
    use super::*;

    pub fn total_revenue() -> IndicatorId {
        IndicatorId::new("total_revenue")
    }
    pub fn total_profit() -> IndicatorId {
        IndicatorId::new("total_profit")
    }
    pub fn avg_margin() -> IndicatorId {
        IndicatorId::new("avg_margin")
    }
    pub fn total_units() -> IndicatorId {
        IndicatorId::new("total_units")
    }

    /// KPI row of the sales dashboard, in display order
    pub fn kpi_row() -> Vec<IndicatorId> {
        vec![total_revenue(), total_profit(), avg_margin(), total_units()]
    }
}

/// Build the full catalogue of indicators + sets.
pub fn build_catalog() -> IndicatorCatalogResponse {
    let indicators = vec![
        IndicatorMeta {
            id: ids::total_revenue(),
            label: "Total Revenue".into(),
            short_label: Some("Revenue".into()),
            icon: "dollar-sign".into(),
            format: ValueFormat::Money {
                currency: "$".into(),
            },
            description: Some("Sum of revenue over the selected regions and products".into()),
        },
        IndicatorMeta {
            id: ids::total_profit(),
            label: "Total Profit".into(),
            short_label: Some("Profit".into()),
            icon: "trending-up".into(),
            format: ValueFormat::Money {
                currency: "$".into(),
            },
            description: Some("Revenue minus cost".into()),
        },
        IndicatorMeta {
            id: ids::avg_margin(),
            label: "Avg Profit Margin".into(),
            short_label: Some("Margin".into()),
            icon: "percent".into(),
            format: ValueFormat::Percent { decimals: 1 },
            description: Some("Mean of per-row profit / revenue; N/A without data".into()),
        },
        IndicatorMeta {
            id: ids::total_units(),
            label: "Units Sold".into(),
            short_label: None,
            icon: "package".into(),
            format: ValueFormat::Integer,
            description: Some("Sum of units sold".into()),
        },
    ];

    let sets = vec![IndicatorSetMeta {
        id: IndicatorSetId::new("sales_overview"),
        label: "Sales Overview".into(),
        indicators: ids::kpi_row(),
        columns: 4,
    }];

    IndicatorCatalogResponse { indicators, sets }
}
