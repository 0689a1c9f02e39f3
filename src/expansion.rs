use std::collections::HashMap;

use crate::group::AssetClass;

/// Per-group expanded flag. Labels never toggled are collapsed.
#[derive(Clone, Debug, Default)]
pub struct ExpansionState {
    expanded: HashMap<AssetClass, bool>,
}

impl ExpansionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips the flag for `label` and returns the new value.
    pub fn toggle(&mut self, label: &AssetClass) -> bool {
        let expanded = self.expanded.entry(label.clone()).or_insert(false);
        *expanded = !*expanded;
        *expanded
    }

    pub fn is_expanded(&self, label: &AssetClass) -> bool {
        self.expanded.get(label).copied().unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unseen_label_is_collapsed() {
        let state = ExpansionState::new();
        assert!(!state.is_expanded(&AssetClass::from("Equity")));
        assert!(!state.is_expanded(&AssetClass::Unclassified));
    }

    #[test]
    fn test_toggle_twice_restores() {
        let mut state = ExpansionState::new();
        let equity = AssetClass::from("Equity");

        assert!(state.toggle(&equity));
        assert!(state.is_expanded(&equity));
        assert!(!state.toggle(&equity));
        assert!(!state.is_expanded(&equity));

        for _ in 0..2 {
            state.toggle(&equity);
        }
        assert!(!state.is_expanded(&equity));
    }

    #[test]
    fn test_expanded_only_after_odd_toggles() {
        let mut state = ExpansionState::new();
        let bond = AssetClass::from("Bond");
        let cash = AssetClass::from("Cash");

        for n in 1..=9 {
            state.toggle(&bond);
            assert_eq!(state.is_expanded(&bond), n % 2 == 1);
            assert!(!state.is_expanded(&cash));
        }
    }
}
