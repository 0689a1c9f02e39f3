use std::{collections::HashMap, fmt::Display};

use crate::holding::{Holding, HoldingKey};

pub const UNCLASSIFIED_LABEL: &str = "(no asset class)";

/// Grouping label. Holdings without an asset class share the
/// `Unclassified` bucket, displayed as `UNCLASSIFIED_LABEL`.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum AssetClass {
    Named(String),
    Unclassified,
}

impl From<Option<String>> for AssetClass {
    fn from(value: Option<String>) -> Self {
        match value {
            Some(label) => AssetClass::Named(label),
            None => AssetClass::Unclassified,
        }
    }
}

impl From<&str> for AssetClass {
    fn from(value: &str) -> Self {
        AssetClass::Named(value.to_string())
    }
}

impl Display for AssetClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetClass::Named(label) => write!(f, "{}", label),
            AssetClass::Unclassified => write!(f, "{}", UNCLASSIFIED_LABEL),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Group {
    pub label: AssetClass,
    pub holdings: Vec<Holding>,
}

impl Group {
    /// Stable keys for the group's rows, in row order.
    pub fn keys(&self) -> Vec<HoldingKey> {
        let mut seen: HashMap<&str, usize> = HashMap::new();
        self.holdings
            .iter()
            .map(|holding| {
                let occurrence = seen.entry(holding.ticker.as_str()).or_insert(0);
                let key = HoldingKey {
                    ticker: holding.ticker.clone(),
                    asset_class: self.label.clone(),
                    occurrence: *occurrence,
                };
                *occurrence += 1;
                key
            })
            .collect()
    }
}

/// Holdings partitioned by asset class.
///
/// Groups are kept in the order their label first appears in the source list,
/// and each group keeps the source order of its holdings.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Grouping {
    groups: Vec<Group>,
}

impl Grouping {
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn labels(&self) -> impl Iterator<Item = &AssetClass> {
        self.groups.iter().map(|group| &group.label)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

pub fn group_by_asset_class(holdings: &[Holding]) -> Grouping {
    let mut index: HashMap<AssetClass, usize> = HashMap::new();
    let mut groups: Vec<Group> = vec![];

    for holding in holdings {
        let label = holding.asset_class();
        match index.get(&label) {
            Some(&i) => groups[i].holdings.push(holding.clone()),
            None => {
                index.insert(label.clone(), groups.len());
                groups.push(Group {
                    label,
                    holdings: vec![holding.clone()],
                });
            }
        }
    }

    Grouping { groups }
}
