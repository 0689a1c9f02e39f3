use strum::{Display, EnumIter, IntoEnumIterator};

use crate::{
    expansion::ExpansionState,
    group::{AssetClass, Grouping},
    holding::{Holding, HoldingKey},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum Column {
    Name,
    Ticker,
    #[strum(to_string = "Asset Class")]
    AssetClass,
    #[strum(to_string = "Average Price")]
    AveragePrice,
    #[strum(to_string = "Market Price")]
    MarketPrice,
    #[strum(to_string = "Latest Change %")]
    LatestChange,
    #[strum(to_string = "Market Value (Base CCY)")]
    MarketValue,
}

impl Column {
    pub fn all() -> Vec<Column> {
        Column::iter().collect()
    }

    /// Share of the table width, in percent.
    pub fn width(self) -> u16 {
        match self {
            Column::Name => 20,
            Column::Ticker => 10,
            Column::AssetClass => 15,
            Column::AveragePrice => 10,
            Column::MarketPrice => 10,
            Column::LatestChange => 10,
            Column::MarketValue => 25,
        }
    }

    /// Raw field value, without rounding or currency symbol.
    pub fn value(self, holding: &Holding) -> String {
        match self {
            Column::Name => holding.name.clone(),
            Column::Ticker => holding.ticker.clone(),
            Column::AssetClass => holding.asset_class.clone().unwrap_or_default(),
            Column::AveragePrice => holding.avg_price.to_string(),
            Column::MarketPrice => holding.market_price.to_string(),
            Column::LatestChange => holding.latest_chg_pct.to_string(),
            Column::MarketValue => holding.market_value_ccy.to_string(),
        }
    }
}

/// Identity of a visible line, stable across re-renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Group(AssetClass),
    Holding(HoldingKey),
}

#[derive(Debug, Clone, PartialEq)]
pub enum TableLine<'a> {
    Header {
        label: &'a AssetClass,
        expanded: bool,
        count: usize,
    },
    Detail {
        key: HoldingKey,
        holding: &'a Holding,
    },
}

impl TableLine<'_> {
    pub fn selection(&self) -> Selection {
        match self {
            TableLine::Header { label, .. } => Selection::Group((*label).clone()),
            TableLine::Detail { key, .. } => Selection::Holding(key.clone()),
        }
    }

    pub fn is_header(&self) -> bool {
        matches!(self, TableLine::Header { .. })
    }
}

/// Visible table body: one header per group, then the group's rows when it
/// is expanded.
pub fn table_lines<'a>(grouping: &'a Grouping, expansion: &ExpansionState) -> Vec<TableLine<'a>> {
    let mut lines = vec![];
    for group in grouping.groups() {
        let expanded = expansion.is_expanded(&group.label);
        lines.push(TableLine::Header {
            label: &group.label,
            expanded,
            count: group.holdings.len(),
        });
        if expanded {
            lines.extend(
                group
                    .keys()
                    .into_iter()
                    .zip(group.holdings.iter())
                    .map(|(key, holding)| TableLine::Detail { key, holding }),
            );
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use serde_json::json;

    use super::*;
    use crate::{
        group::{group_by_asset_class, tests::holding},
        holding::Amount,
    };

    fn detail_names<'a>(lines: &[TableLine<'a>]) -> Vec<&'a str> {
        lines
            .iter()
            .filter_map(|line| match line {
                TableLine::Detail { holding, .. } => Some(holding.name.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_scenario_toggle_equity() {
        let holdings = vec![
            holding("A", Some("Equity")),
            holding("B", Some("Bond")),
            holding("C", Some("Equity")),
        ];
        let grouping = group_by_asset_class(&holdings);
        let mut expansion = ExpansionState::new();

        let lines = table_lines(&grouping, &expansion);
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().all(|l| l.is_header()));

        expansion.toggle(&AssetClass::from("Equity"));
        let lines = table_lines(&grouping, &expansion);
        assert_eq!(lines.iter().filter(|l| l.is_header()).count(), 2);
        assert_eq!(detail_names(&lines), vec!["A", "C"]);
        assert!(matches!(
            lines[0],
            TableLine::Header { expanded: true, count: 2, .. }
        ));
        assert!(lines[3].is_header());
    }

    #[test]
    fn test_empty_grouping_has_no_lines() {
        let grouping = group_by_asset_class(&[]);
        assert!(table_lines(&grouping, &ExpansionState::new()).is_empty());
    }

    #[test]
    fn test_expansion_survives_regrouping() {
        let mut expansion = ExpansionState::new();
        expansion.toggle(&AssetClass::from("Bond"));

        let grouping = group_by_asset_class(&[
            holding("X", Some("Cash")),
            holding("Y", Some("Bond")),
        ]);
        let lines = table_lines(&grouping, &expansion);
        assert_eq!(detail_names(&lines), vec!["Y"]);
    }

    #[test]
    fn test_column_values_are_verbatim() {
        let mut h = holding("Gold ETF", Some("Commodities"));
        h.avg_price = dec!(1500.000).into();
        h.latest_chg_pct = dec!(-0.0375).into();
        h.market_price = Amount::try_from(json!(1e-30)).unwrap();

        assert_eq!(Column::AveragePrice.value(&h), "1500.000");
        assert_eq!(Column::LatestChange.value(&h), "-0.0375");
        assert_eq!(Column::AssetClass.value(&h), "Commodities");
        assert_eq!(Column::MarketValue.value(&h), "1125");
        assert_eq!(Column::MarketPrice.value(&h), "1e-30");
    }

    #[test]
    fn test_columns() {
        let titles: Vec<String> = Column::all().iter().map(|c| c.to_string()).collect();
        assert_eq!(
            titles,
            vec![
                "Name",
                "Ticker",
                "Asset Class",
                "Average Price",
                "Market Price",
                "Latest Change %",
                "Market Value (Base CCY)"
            ]
        );
        assert_eq!(Column::all().iter().map(|c| c.width()).sum::<u16>(), 100);
    }
}
